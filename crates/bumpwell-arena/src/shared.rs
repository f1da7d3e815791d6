//! An arena shared between threads behind a lock.
//!
//! [`SharedArena`] wraps one [`Arena`] in `Arc<Mutex<..>>`. The lock is
//! held only for the duration of each call, which is short because every
//! arena operation is a bounded cursor bump. Handles are cheap to clone
//! and all refer to the same arena.
//!
//! Unlike a plain [`Arena`], whose `destroy` consumes it, a shared arena
//! can outlive its destruction through other handles, so it tracks an
//! explicit [`ArenaState`] and rejects calls after `destroy`.

use std::sync::Arc;

use bytemuck::Pod;
use parking_lot::Mutex;

use crate::arena::{Arena, ArenaStats};
use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::range::ArenaRange;

/// Lifecycle state of a [`SharedArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArenaState {
    /// Allocation and reset are valid.
    Live,
    /// Backing memory released; every operation fails with
    /// [`ArenaError::Destroyed`].
    Destroyed,
}

/// Thread-safe handle to a single arena guarded by a mutex.
#[derive(Clone, Debug)]
pub struct SharedArena {
    inner: Arc<Mutex<Option<Arena>>>,
}

impl SharedArena {
    /// Share an existing arena.
    pub fn new(arena: Arena) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(arena))),
        }
    }

    /// Build and share an arena from `config`.
    pub fn with_config(config: ArenaConfig) -> Result<Self, ArenaError> {
        Ok(Self::new(Arena::with_config(config)?))
    }

    /// See [`Arena::allocate`].
    pub fn allocate(&self, size: usize, align: usize) -> Result<ArenaRange, ArenaError> {
        self.with_live(|arena| arena.allocate(size, align))
    }

    /// See [`Arena::alloc_pod`].
    pub fn alloc_pod<T: Pod>(&self, value: &T) -> Result<ArenaRange, ArenaError> {
        self.with_live(|arena| arena.alloc_pod(value))
    }

    /// See [`Arena::read_pod`].
    pub fn read_pod<T: Pod>(&self, range: ArenaRange) -> Result<T, ArenaError> {
        self.with_live(|arena| arena.read_pod(range))
    }

    /// Run `f` over the bytes of `range` with the lock held.
    pub fn with_bytes<R>(
        &self,
        range: ArenaRange,
        f: impl FnOnce(&[u8]) -> R,
    ) -> Result<R, ArenaError> {
        self.with_live(|arena| arena.bytes(range).map(f))
    }

    /// Run `f` over the bytes of `range` mutably with the lock held.
    pub fn with_bytes_mut<R>(
        &self,
        range: ArenaRange,
        f: impl FnOnce(&mut [u8]) -> R,
    ) -> Result<R, ArenaError> {
        self.with_live(|arena| arena.bytes_mut(range).map(f))
    }

    /// See [`Arena::reset`]. Every handle observes the reset.
    pub fn reset(&self) -> Result<(), ArenaError> {
        self.with_live(|arena| {
            arena.reset();
            Ok(())
        })
    }

    /// Release the arena's memory for every handle.
    ///
    /// A second call, from this or any other handle, fails with
    /// [`ArenaError::Destroyed`] instead of releasing twice.
    pub fn destroy(&self) -> Result<ArenaStats, ArenaError> {
        let arena = self.inner.lock().take().ok_or(ArenaError::Destroyed)?;
        Ok(arena.destroy())
    }

    /// See [`Arena::stats`].
    pub fn stats(&self) -> Result<ArenaStats, ArenaError> {
        self.with_live(|arena| Ok(arena.stats()))
    }

    /// Whether the arena is still usable.
    pub fn state(&self) -> ArenaState {
        if self.inner.lock().is_some() {
            ArenaState::Live
        } else {
            ArenaState::Destroyed
        }
    }

    fn with_live<R>(
        &self,
        f: impl FnOnce(&mut Arena) -> Result<R, ArenaError>,
    ) -> Result<R, ArenaError> {
        let mut guard = self.inner.lock();
        let arena = guard.as_mut().ok_or(ArenaError::Destroyed)?;
        f(arena)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_arena() {
        let a = SharedArena::with_config(ArenaConfig::new(64)).unwrap();
        let b = a.clone();
        let first = a.allocate(10, 1).unwrap();
        let second = b.allocate(10, 1).unwrap();
        assert_eq!(first.arena_id(), second.arena_id());
        assert_eq!(second.offset(), 10);
        assert_eq!(a.stats().unwrap().allocations, 2);
    }

    #[test]
    fn bytes_written_by_one_handle_read_by_another() {
        let a = SharedArena::with_config(ArenaConfig::new(64)).unwrap();
        let b = a.clone();
        let range = a.allocate(4, 4).unwrap();
        a.with_bytes_mut(range, |bytes| bytes.copy_from_slice(&[9, 8, 7, 6]))
            .unwrap();
        let read = b.with_bytes(range, |bytes| bytes.to_vec()).unwrap();
        assert_eq!(read, vec![9, 8, 7, 6]);
    }

    #[test]
    fn destroy_is_terminal() {
        let arena = SharedArena::with_config(ArenaConfig::new(64)).unwrap();
        let other = arena.clone();
        let range = arena.alloc_pod(&7u32).unwrap();
        assert_eq!(arena.state(), ArenaState::Live);

        let stats = arena.destroy().unwrap();
        assert_eq!(stats.allocations, 1);

        assert_eq!(other.state(), ArenaState::Destroyed);
        assert_eq!(other.allocate(4, 4), Err(ArenaError::Destroyed));
        assert_eq!(other.read_pod::<u32>(range), Err(ArenaError::Destroyed));
        assert_eq!(other.reset(), Err(ArenaError::Destroyed));
        assert_eq!(other.stats(), Err(ArenaError::Destroyed));
    }

    #[test]
    fn double_destroy_detected() {
        let arena = SharedArena::with_config(ArenaConfig::new(64)).unwrap();
        arena.destroy().unwrap();
        assert_eq!(arena.destroy(), Err(ArenaError::Destroyed));
    }

    #[test]
    fn reset_through_shared_handle_invalidates_ranges() {
        let arena = SharedArena::with_config(ArenaConfig::new(64)).unwrap();
        let range = arena.alloc_pod(&1u64).unwrap();
        arena.reset().unwrap();
        assert!(matches!(
            arena.read_pod::<u64>(range),
            Err(ArenaError::StaleRange { .. })
        ));
    }
}
