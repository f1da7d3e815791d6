//! Arena configuration parameters.

use crate::error::ArenaError;

/// What an arena does when the current block cannot satisfy a request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Growth {
    /// Single block. Overflow fails with [`ArenaError::ArenaExhausted`].
    Fixed,
    /// Overflow links a fresh block and retries the request against it.
    #[default]
    Chained,
}

/// Configuration for the arena allocator.
///
/// Controls block sizing, growth policy and the optional block cap.
/// Validated at construction; all values are immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Size of the first block in bytes.
    ///
    /// `0` selects [`ArenaConfig::DEFAULT_BLOCK_SIZE`] so a caller never
    /// ends up with a degenerate empty block.
    pub initial_capacity: usize,

    /// Minimum size in bytes of each block chained after the first.
    ///
    /// Default: 4096. A chained block is sized
    /// `max(block_size, size + align - 1)` for the request that caused it.
    pub block_size: usize,

    /// Overflow policy.
    pub growth: Growth,

    /// Upper bound on the number of blocks, including the first.
    ///
    /// `None` means unbounded. Only meaningful for [`Growth::Chained`].
    pub max_blocks: Option<usize>,
}

impl ArenaConfig {
    /// Default block size: one 4 KiB page.
    pub const DEFAULT_BLOCK_SIZE: usize = 4096;

    /// Create a chained arena config whose first block holds
    /// `initial_capacity` bytes.
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            block_size: Self::DEFAULT_BLOCK_SIZE,
            growth: Growth::Chained,
            max_blocks: None,
        }
    }

    /// Create a single-block arena config of exactly `capacity` bytes.
    pub fn fixed(capacity: usize) -> Self {
        Self {
            growth: Growth::Fixed,
            ..Self::new(capacity)
        }
    }

    /// Set the minimum size of chained blocks.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Set the overflow policy.
    pub fn with_growth(mut self, growth: Growth) -> Self {
        self.growth = growth;
        self
    }

    /// Cap the number of blocks the arena may own.
    pub fn with_max_blocks(mut self, max_blocks: usize) -> Self {
        self.max_blocks = Some(max_blocks);
        self
    }

    /// Size in bytes of the block allocated at creation.
    pub fn first_block_size(&self) -> usize {
        if self.initial_capacity == 0 {
            Self::DEFAULT_BLOCK_SIZE
        } else {
            self.initial_capacity
        }
    }

    /// Check the configuration for values no arena can be built from.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.block_size == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "block_size must be > 0".to_string(),
            });
        }
        if self.max_blocks == Some(0) {
            return Err(ArenaError::InvalidConfig {
                reason: "max_blocks must be >= 1 (the first block always exists)".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(0)
    }
}
