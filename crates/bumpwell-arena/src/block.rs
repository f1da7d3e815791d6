//! Contiguous backing blocks with bump allocation.
//!
//! A [`Block`] is one fixed-capacity byte buffer with a cursor that only
//! moves forward. Blocks are never compacted: an offset handed out stays
//! at the same address until the block is dropped.

use crate::error::ArenaError;
use crate::raw::{RawBlock, MAX_ALIGN};

/// Reject requests no block can serve: zero sizes, and alignments that are
/// not a power of two or exceed [`MAX_ALIGN`].
pub(crate) fn check_request(size: usize, align: usize) -> Result<(), ArenaError> {
    if size == 0 {
        return Err(ArenaError::InvalidArgument {
            reason: "allocation size must be > 0".to_string(),
        });
    }
    if !align.is_power_of_two() {
        return Err(ArenaError::InvalidArgument {
            reason: format!("alignment must be a power of two (got {align})"),
        });
    }
    if align > MAX_ALIGN {
        return Err(ArenaError::InvalidArgument {
            reason: format!("alignment {align} exceeds the maximum of {MAX_ALIGN}"),
        });
    }
    Ok(())
}

/// A single contiguous memory block with bump allocation.
///
/// Blocks are the fundamental storage unit of the arena. Each one is a
/// pre-allocated, zero-initialised buffer with a cursor that advances on
/// each allocation. Blocks are only rewound by [`Block::reset`] or
/// released when dropped.
#[derive(Debug)]
pub struct Block {
    /// Backing storage. Allocated to full capacity at creation.
    raw: RawBlock,
    /// Bump pointer: next free byte offset.
    used: usize,
}

impl Block {
    /// Create a new zero-initialised block of `capacity` bytes.
    pub fn new(capacity: usize) -> Result<Self, ArenaError> {
        Ok(Self {
            raw: RawBlock::new(capacity)?,
            used: 0,
        })
    }

    /// Bump-allocate `size` bytes aligned to `align`.
    ///
    /// Rounds the cursor up to the next multiple of `align` and reserves
    /// `[offset, offset + size)`. Returns the offset, or `None` if the
    /// request does not fit in the remaining space. An `align` that is not
    /// a power of two, or is above [`MAX_ALIGN`], is never served: the
    /// block base only guarantees `MAX_ALIGN`.
    pub fn try_bump(&mut self, size: usize, align: usize) -> Option<usize> {
        if !align.is_power_of_two() || align > MAX_ALIGN {
            return None;
        }
        let offset = self.used.checked_add(align - 1)? & !(align - 1);
        let end = offset.checked_add(size)?;
        if end > self.capacity() {
            return None;
        }
        self.used = end;
        Some(offset)
    }

    /// Shared view of `len` bytes starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset + len` exceeds the block's capacity.
    pub fn bytes(&self, offset: usize, len: usize) -> &[u8] {
        &self.raw.as_slice()[offset..offset + len]
    }

    /// Mutable view of `len` bytes starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset + len` exceeds the block's capacity.
    pub fn bytes_mut(&mut self, offset: usize, len: usize) -> &mut [u8] {
        &mut self.raw.as_mut_slice()[offset..offset + len]
    }

    /// Rewind the bump pointer to zero without releasing or zeroing.
    pub fn reset(&mut self) {
        self.used = 0;
    }

    /// Bytes handed out so far, alignment padding included.
    pub fn used(&self) -> usize {
        self.used
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.raw.len()
    }

    /// Bytes left after the cursor (before any alignment padding).
    pub fn remaining(&self) -> usize {
        self.capacity() - self.used
    }

    /// Address of the first byte of the block.
    pub fn base_addr(&self) -> usize {
        self.raw.addr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_bumps_are_contiguous() {
        let mut block = Block::new(64).unwrap();
        assert_eq!(block.try_bump(10, 1), Some(0));
        assert_eq!(block.try_bump(10, 1), Some(10));
        assert_eq!(block.used(), 20);
        assert_eq!(block.remaining(), 44);
    }

    #[test]
    fn bump_rounds_cursor_up_to_alignment() {
        let mut block = Block::new(64).unwrap();
        assert_eq!(block.try_bump(1, 8), Some(0));
        assert_eq!(block.try_bump(1, 8), Some(8));
        assert_eq!(block.try_bump(3, 4), Some(12));
        assert_eq!(block.used(), 15);
    }

    #[test]
    fn bump_fails_when_full_and_leaves_cursor() {
        let mut block = Block::new(16).unwrap();
        assert!(block.try_bump(16, 1).is_some());
        assert!(block.try_bump(1, 1).is_none());
        assert_eq!(block.used(), 16);
    }

    #[test]
    fn padding_counts_against_capacity() {
        let mut block = Block::new(16).unwrap();
        block.try_bump(1, 1).unwrap();
        // Offset would round to 16, leaving no room for 8 bytes.
        assert!(block.try_bump(8, 16).is_none());
        assert_eq!(block.used(), 1);
    }

    #[test]
    fn huge_request_does_not_overflow() {
        let mut block = Block::new(16).unwrap();
        block.try_bump(3, 1).unwrap();
        assert!(block.try_bump(usize::MAX, 8).is_none());
    }

    #[test]
    fn unsupported_alignment_is_never_served() {
        let mut block = Block::new(256).unwrap();
        block.try_bump(1, 1).unwrap();
        assert_eq!(block.try_bump(1, 0), None);
        assert_eq!(block.try_bump(1, 3), None);
        assert_eq!(block.try_bump(1, MAX_ALIGN * 4), None);
        assert_eq!(block.used(), 1);
        // Every served offset is also address-aligned.
        let offset = block.try_bump(1, MAX_ALIGN).unwrap();
        assert_eq!((block.base_addr() + offset) % MAX_ALIGN, 0);
    }

    #[test]
    fn check_request_rejects_zero_size_and_bad_alignment() {
        assert!(check_request(1, 1).is_ok());
        assert!(check_request(8, MAX_ALIGN).is_ok());
        for (size, align) in [(0, 1), (1, 0), (1, 6), (1, MAX_ALIGN * 2)] {
            assert!(matches!(
                check_request(size, align),
                Err(ArenaError::InvalidArgument { .. })
            ));
        }
    }

    #[test]
    fn reset_allows_realloc_from_base() {
        let mut block = Block::new(32).unwrap();
        block.try_bump(32, 1).unwrap();
        block.reset();
        assert_eq!(block.used(), 0);
        assert_eq!(block.try_bump(32, 1), Some(0));
    }

    #[test]
    fn bytes_reads_written_data() {
        let mut block = Block::new(32).unwrap();
        let offset = block.try_bump(4, 4).unwrap();
        block.bytes_mut(offset, 4).copy_from_slice(&[1, 2, 3, 4]);
        assert_eq!(block.bytes(offset, 4), &[1, 2, 3, 4]);
    }

    #[test]
    fn fresh_block_is_zeroed() {
        let block = Block::new(32).unwrap();
        assert!(block.bytes(0, 32).iter().all(|&b| b == 0));
    }
}
