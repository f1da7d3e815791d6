//! Growable chains of blocks.
//!
//! A [`BlockChain`] owns every [`Block`] of an arena. The newest block is
//! the one being filled; when a request does not fit, the chain either
//! fails (fixed growth) or links a fresh block sized for the request and
//! retries there. Requests are never split across blocks.

use log::debug;

use crate::block::{check_request, Block};
use crate::config::{ArenaConfig, Growth};
use crate::error::ArenaError;

/// The blocks owned by one arena, oldest first.
///
/// Always holds at least one block. Dropping the chain releases every
/// block back to the system allocator.
#[derive(Debug)]
pub struct BlockChain {
    blocks: Vec<Block>,
    block_size: usize,
    growth: Growth,
    max_blocks: Option<usize>,
}

impl BlockChain {
    /// Create a chain holding one block of `config.first_block_size()` bytes.
    pub fn new(config: &ArenaConfig) -> Result<Self, ArenaError> {
        let first = Block::new(config.first_block_size())?;
        let mut blocks = Vec::with_capacity(config.max_blocks.unwrap_or(1).min(16));
        blocks.push(first);
        Ok(Self {
            blocks,
            block_size: config.block_size,
            growth: config.growth,
            max_blocks: config.max_blocks,
        })
    }

    /// Bump-allocate `size` bytes aligned to `align`, chaining if allowed.
    ///
    /// Returns `(block_index, offset)`. Fails with `InvalidArgument` for a
    /// zero size or an unsupported alignment, with `ArenaExhausted` when the
    /// current block is full and growth is fixed or the block cap is
    /// reached, and with `OutOfMemory` when a new block cannot be obtained.
    pub fn bump(&mut self, size: usize, align: usize) -> Result<(usize, usize), ArenaError> {
        check_request(size, align)?;
        let current = self.blocks.len() - 1;
        if let Some(offset) = self.blocks[current].try_bump(size, align) {
            return Ok((current, offset));
        }

        if self.growth == Growth::Fixed {
            return Err(ArenaError::ArenaExhausted {
                requested: size,
                capacity: self.blocks[current].capacity(),
            });
        }

        if self
            .max_blocks
            .is_some_and(|max| self.blocks.len() >= max)
        {
            return Err(ArenaError::ArenaExhausted {
                requested: size,
                capacity: self.total_capacity(),
            });
        }

        // Worst-case padding is `align - 1`; the block base is already
        // MAX_ALIGN-aligned so this always fits.
        let needed = size
            .checked_add(align - 1)
            .ok_or(ArenaError::OutOfMemory { requested: size })?;
        let mut block = Block::new(self.block_size.max(needed))?;
        let offset = block
            .try_bump(size, align)
            .ok_or(ArenaError::OutOfMemory { requested: needed })?;
        debug!(
            "arena chained block #{} ({} bytes) for a {size}-byte request",
            self.blocks.len(),
            block.capacity(),
        );
        self.blocks.push(block);
        Ok((self.blocks.len() - 1, offset))
    }

    /// The block at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn block(&self, index: usize) -> &Block {
        &self.blocks[index]
    }

    /// The block at `index`, mutably.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn block_mut(&mut self, index: usize) -> &mut Block {
        &mut self.blocks[index]
    }

    /// The block currently being filled.
    pub fn current(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    /// Release every block but the first and rewind the first.
    ///
    /// Returns the number of blocks released.
    pub fn reset(&mut self) -> usize {
        let released = self.blocks.len() - 1;
        self.blocks.truncate(1);
        self.blocks[0].reset();
        released
    }

    /// Number of blocks currently owned.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Sum of `used` across all blocks, padding included.
    pub fn total_used(&self) -> usize {
        self.blocks.iter().map(Block::used).sum()
    }

    /// Unused tails of the blocks left behind when newer ones were chained.
    ///
    /// Only the current block can still be bumped, so these bytes stay
    /// unusable until the next reset.
    pub fn abandoned_bytes(&self) -> usize {
        let retired = self.blocks.len() - 1;
        self.blocks[..retired].iter().map(Block::remaining).sum()
    }

    /// Sum of block capacities in bytes.
    pub fn total_capacity(&self) -> usize {
        self.blocks.iter().map(Block::capacity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chained(initial: usize, block_size: usize) -> BlockChain {
        BlockChain::new(&ArenaConfig::new(initial).with_block_size(block_size)).unwrap()
    }

    #[test]
    fn alloc_within_first_block() {
        let mut chain = chained(64, 64);
        assert_eq!(chain.bump(10, 1).unwrap(), (0, 0));
        assert_eq!(chain.block_count(), 1);
    }

    #[test]
    fn chained_grows_on_overflow() {
        let mut chain = chained(16, 64);
        chain.bump(10, 1).unwrap();
        let (block, offset) = chain.bump(10, 1).unwrap();
        assert_eq!((block, offset), (1, 0));
        assert_eq!(chain.block_count(), 2);
        assert_eq!(chain.current().capacity(), 64);
    }

    #[test]
    fn oversized_request_gets_dedicated_block() {
        let mut chain = chained(16, 64);
        let (block, _) = chain.bump(1000, 8).unwrap();
        assert_eq!(block, 1);
        assert_eq!(chain.current().capacity(), 1000 + 7);
    }

    #[test]
    fn invalid_requests_rejected_before_chaining() {
        let mut chain = chained(16, 64);
        for (size, align) in [(1, 0), (1, 64), (0, 1)] {
            assert!(matches!(
                chain.bump(size, align),
                Err(ArenaError::InvalidArgument { .. })
            ));
        }
        assert_eq!(chain.block_count(), 1);
        assert_eq!(chain.total_used(), 0);
    }

    #[test]
    fn fixed_growth_reports_exhaustion() {
        let mut chain = BlockChain::new(&ArenaConfig::fixed(16)).unwrap();
        chain.bump(10, 1).unwrap();
        assert_eq!(
            chain.bump(10, 1),
            Err(ArenaError::ArenaExhausted {
                requested: 10,
                capacity: 16
            })
        );
        assert_eq!(chain.block_count(), 1);
    }

    #[test]
    fn block_cap_reports_exhaustion() {
        let config = ArenaConfig::new(16).with_block_size(16).with_max_blocks(2);
        let mut chain = BlockChain::new(&config).unwrap();
        chain.bump(16, 1).unwrap();
        chain.bump(16, 1).unwrap();
        assert_eq!(
            chain.bump(1, 1),
            Err(ArenaError::ArenaExhausted {
                requested: 1,
                capacity: 32
            })
        );
    }

    #[test]
    fn reset_keeps_only_first_block() {
        let mut chain = chained(16, 16);
        chain.bump(16, 1).unwrap();
        chain.bump(16, 1).unwrap();
        chain.bump(16, 1).unwrap();
        assert_eq!(chain.reset(), 2);
        assert_eq!(chain.block_count(), 1);
        assert_eq!(chain.total_used(), 0);
        assert_eq!(chain.bump(4, 1).unwrap(), (0, 0));
    }

    #[test]
    fn totals_span_all_blocks() {
        let mut chain = chained(16, 32);
        chain.bump(12, 1).unwrap();
        chain.bump(20, 1).unwrap();
        assert_eq!(chain.total_used(), 32);
        assert_eq!(chain.total_capacity(), 48);
    }

    #[test]
    fn chaining_abandons_the_old_tail() {
        let mut chain = chained(16, 16);
        chain.bump(10, 1).unwrap();
        assert_eq!(chain.abandoned_bytes(), 0);
        chain.bump(10, 1).unwrap();
        assert_eq!(chain.abandoned_bytes(), 6);
        chain.bump(7, 1).unwrap();
        assert_eq!(chain.abandoned_bytes(), 6 + 6);
        chain.reset();
        assert_eq!(chain.abandoned_bytes(), 0);
    }

    #[test]
    fn huge_chained_request_is_out_of_memory() {
        let mut chain = chained(16, 16);
        chain.bump(16, 1).unwrap();
        assert!(matches!(
            chain.bump(usize::MAX - 4, 8),
            Err(ArenaError::OutOfMemory { .. })
        ));
        assert_eq!(chain.block_count(), 1);
    }
}
