//! Arena-specific error types.

use thiserror::Error;

use crate::range::ArenaId;

/// Errors that can occur during arena operations.
///
/// Every fallible arena call reports its failure through this type; the
/// arena never retries or recovers internally.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ArenaError {
    /// Zero size, a non-power-of-two alignment, an alignment above
    /// [`MAX_ALIGN`](crate::MAX_ALIGN), or a typed read of the wrong shape.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the request.
        reason: String,
    },
    /// The system allocator could not supply a block.
    #[error("out of memory: system allocator could not provide {requested} bytes")]
    OutOfMemory {
        /// Size of the block that was requested.
        requested: usize,
    },
    /// Fixed arena full, or the chained arena hit its block cap.
    #[error("arena exhausted: requested {requested} bytes, capacity {capacity} bytes")]
    ArenaExhausted {
        /// Number of bytes requested.
        requested: usize,
        /// Capacity available when the request failed.
        capacity: usize,
    },
    /// An [`ArenaRange`](crate::ArenaRange) from before the last reset.
    #[error("stale range: generation {range_generation}, arena generation {arena_generation}")]
    StaleRange {
        /// The generation encoded in the range.
        range_generation: u64,
        /// The arena's current generation.
        arena_generation: u64,
    },
    /// An [`ArenaRange`](crate::ArenaRange) handed out by a different arena.
    #[error("range belongs to arena {range_arena}, not arena {arena}")]
    ForeignRange {
        /// Arena that produced the range.
        range_arena: ArenaId,
        /// Arena the range was presented to.
        arena: ArenaId,
    },
    /// Configuration that no arena can be built from.
    #[error("invalid arena config: {reason}")]
    InvalidConfig {
        /// Why the config was rejected.
        reason: String,
    },
    /// Operation on a shared arena after it was destroyed.
    #[error("arena has been destroyed")]
    Destroyed,
}
