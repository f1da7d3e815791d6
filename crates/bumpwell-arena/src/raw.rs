//! Low-level backing storage for arena blocks.
//!
//! This is the only module in the crate that contains `unsafe` code. A
//! [`RawBlock`] owns one zero-initialised buffer from the global allocator
//! and hands it out as ordinary byte slices, so everything above this
//! module works with safe indexing.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::fmt;
use std::ptr::NonNull;

use crate::error::ArenaError;

/// Base alignment of every block buffer, and the largest alignment an
/// allocation may request.
///
/// Because each block starts on this boundary, rounding an offset up to
/// `align` also aligns the resulting address.
pub const MAX_ALIGN: usize = 16;

/// An owned, fixed-size, `MAX_ALIGN`-aligned heap buffer.
pub(crate) struct RawBlock {
    ptr: NonNull<u8>,
    layout: Layout,
}

// SAFETY: the buffer is uniquely owned by this value and only reachable
// through `&self`/`&mut self`, so it follows ordinary borrow rules.
unsafe impl Send for RawBlock {}
// SAFETY: shared access only ever produces `&[u8]`.
unsafe impl Sync for RawBlock {}

impl RawBlock {
    /// Obtain a zeroed buffer of `capacity` bytes from the system allocator.
    pub(crate) fn new(capacity: usize) -> Result<Self, ArenaError> {
        if capacity == 0 {
            return Err(ArenaError::InvalidArgument {
                reason: "block capacity must be > 0".to_string(),
            });
        }
        let layout = Layout::from_size_align(capacity, MAX_ALIGN)
            .map_err(|_| ArenaError::OutOfMemory {
                requested: capacity,
            })?;
        // SAFETY: `layout` has a non-zero size (checked above).
        let ptr = unsafe { alloc::alloc_zeroed(layout) };
        let ptr = NonNull::new(ptr).ok_or(ArenaError::OutOfMemory {
            requested: capacity,
        })?;
        Ok(Self { ptr, layout })
    }

    pub(crate) fn len(&self) -> usize {
        self.layout.size()
    }

    pub(crate) fn addr(&self) -> usize {
        self.ptr.as_ptr() as usize
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        // SAFETY: `ptr` points to `len()` initialised bytes (zeroed at
        // allocation, only ever written through `as_mut_slice`) that live
        // until `self` is dropped.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len()) }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: as for `as_slice`; `&mut self` guarantees exclusivity.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len()) }
    }
}

impl Drop for RawBlock {
    fn drop(&mut self) {
        // SAFETY: `ptr` was returned by `alloc_zeroed` with this exact layout
        // and is released exactly once.
        unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) }
    }
}

impl fmt::Debug for RawBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawBlock")
            .field("addr", &format_args!("{:#x}", self.addr()))
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_block_is_zeroed_and_aligned() {
        let block = RawBlock::new(100).unwrap();
        assert_eq!(block.len(), 100);
        assert_eq!(block.addr() % MAX_ALIGN, 0);
        assert!(block.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn writes_are_visible_through_shared_view() {
        let mut block = RawBlock::new(8).unwrap();
        block.as_mut_slice()[7] = 0xAB;
        assert_eq!(block.as_slice()[7], 0xAB);
    }

    #[test]
    fn zero_capacity_rejected() {
        assert!(matches!(
            RawBlock::new(0),
            Err(ArenaError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn unrepresentable_size_is_out_of_memory() {
        assert_eq!(
            RawBlock::new(usize::MAX).unwrap_err(),
            ArenaError::OutOfMemory {
                requested: usize::MAX
            }
        );
    }
}
