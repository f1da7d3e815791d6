//! The bump-pointer arena.
//!
//! [`Arena`] is the top-level type. It owns a chain of blocks, hands out
//! [`ArenaRange`]s, and resolves them back to bytes. The lifecycle is:
//!
//! 1. `Arena::new()` / `Arena::with_config()`: allocate the first block
//! 2. `allocate()` (and the typed helpers): bump, chaining if configured
//! 3. `reset()`: rewind, bump the generation, invalidate all ranges
//! 4. `destroy()` or drop: release every block
//!
//! `destroy` takes the arena by value, so no operation can follow it.

use std::alloc::Layout;
use std::any::type_name;

use bytemuck::Pod;
use log::{debug, trace};

use crate::chain::BlockChain;
use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::range::{ArenaId, ArenaRange};

/// Point-in-time usage figures for an arena.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArenaStats {
    /// Allocations served since creation or the last reset.
    pub allocations: u64,
    /// Bytes requested by those allocations.
    pub requested_bytes: usize,
    /// Bytes consumed across all blocks, alignment padding included.
    pub used_bytes: usize,
    /// Unused tails of earlier blocks, left behind when a request forced a
    /// new block to be chained. Not part of `used_bytes`.
    pub abandoned_bytes: usize,
    /// Blocks currently owned.
    pub block_count: usize,
    /// Backing bytes currently owned.
    pub capacity_bytes: usize,
    /// Number of resets so far.
    pub generation: u64,
}

impl ArenaStats {
    /// Bytes lost to alignment padding inside blocks.
    pub fn padding_bytes(&self) -> usize {
        self.used_bytes.saturating_sub(self.requested_bytes)
    }

    /// All bytes that cannot serve a request before the next reset:
    /// alignment padding plus abandoned block tails.
    pub fn wasted_bytes(&self) -> usize {
        self.padding_bytes().saturating_add(self.abandoned_bytes)
    }
}

/// Fixed-lifetime bump allocator over one or more owned blocks.
///
/// Allocation is a cursor bump in the newest block; there is no
/// per-allocation bookkeeping and no individual free. Memory comes back
/// all at once on [`Arena::reset`] (kept for reuse) or
/// [`Arena::destroy`] / drop (released).
///
/// The arena is not internally synchronised. Give each thread its own
/// arena, or share one through [`SharedArena`](crate::SharedArena).
#[derive(Debug)]
pub struct Arena {
    id: ArenaId,
    chain: BlockChain,
    /// Incremented on every reset; stamped into each range.
    generation: u64,
    allocations: u64,
    requested_bytes: usize,
    config: ArenaConfig,
}

impl Arena {
    /// Create a chained arena whose first block holds `initial_capacity`
    /// bytes (`0` selects [`ArenaConfig::DEFAULT_BLOCK_SIZE`]).
    pub fn new(initial_capacity: usize) -> Result<Self, ArenaError> {
        Self::with_config(ArenaConfig::new(initial_capacity))
    }

    /// Create an arena from an explicit configuration.
    ///
    /// Returns `InvalidConfig` for a config that fails
    /// [`ArenaConfig::validate`] and `OutOfMemory` if the first block
    /// cannot be obtained.
    pub fn with_config(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let chain = BlockChain::new(&config)?;
        let id = ArenaId::next();
        debug!(
            "arena {id} created: first block {} bytes, growth {:?}",
            config.first_block_size(),
            config.growth,
        );
        Ok(Self {
            id,
            chain,
            generation: 0,
            allocations: 0,
            requested_bytes: 0,
            config,
        })
    }

    /// Reserve `size` bytes whose start address is a multiple of `align`.
    ///
    /// The returned range never overlaps any other range from this arena
    /// and keeps its address until the arena is reset or destroyed.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `size == 0`, or `align` is not a power of two
    ///   or exceeds [`MAX_ALIGN`](crate::MAX_ALIGN).
    /// - `ArenaExhausted` if the block is full and the arena cannot grow.
    /// - `OutOfMemory` if a new block is needed and cannot be obtained.
    pub fn allocate(&mut self, size: usize, align: usize) -> Result<ArenaRange, ArenaError> {
        let (block, offset) = self.chain.bump(size, align)?;
        let addr = self.chain.block(block).base_addr() + offset;
        self.allocations += 1;
        self.requested_bytes = self.requested_bytes.saturating_add(size);
        trace!(
            "arena {} allocated {size} bytes (align {align}) at block {block} offset {offset}",
            self.id,
        );
        Ok(ArenaRange {
            arena: self.id,
            generation: self.generation,
            block,
            offset,
            len: size,
            addr,
        })
    }

    /// Reserve space shaped by `layout`.
    pub fn alloc_layout(&mut self, layout: Layout) -> Result<ArenaRange, ArenaError> {
        self.allocate(layout.size(), layout.align())
    }

    /// Reserve space for one `T` and copy `value` into it.
    ///
    /// Size and alignment come from `T`. Zero-sized types are rejected.
    pub fn alloc_pod<T: Pod>(&mut self, value: &T) -> Result<ArenaRange, ArenaError> {
        let range = self.alloc_layout(Layout::new::<T>())?;
        self.bytes_mut(range)?.copy_from_slice(bytemuck::bytes_of(value));
        Ok(range)
    }

    /// Reserve space for `values.len()` elements of `T` and copy them in.
    pub fn alloc_slice_copy<T: Pod>(&mut self, values: &[T]) -> Result<ArenaRange, ArenaError> {
        let layout = Layout::array::<T>(values.len()).map_err(|_| ArenaError::OutOfMemory {
            requested: values.len().saturating_mul(std::mem::size_of::<T>()),
        })?;
        let range = self.alloc_layout(layout)?;
        self.bytes_mut(range)?.copy_from_slice(bytemuck::cast_slice(values));
        Ok(range)
    }

    /// Copy a `T` out of `range`.
    ///
    /// Fails with `InvalidArgument` if the range is not exactly
    /// `size_of::<T>()` bytes or is misaligned for `T`.
    pub fn read_pod<T: Pod>(&self, range: ArenaRange) -> Result<T, ArenaError> {
        let bytes = self.bytes(range)?;
        bytemuck::try_from_bytes::<T>(bytes)
            .copied()
            .map_err(|e| ArenaError::InvalidArgument {
                reason: format!("cannot read {} from {range}: {e:?}", type_name::<T>()),
            })
    }

    /// View `range` as a slice of `T`.
    pub fn read_slice<T: Pod>(&self, range: ArenaRange) -> Result<&[T], ArenaError> {
        let bytes = self.bytes(range)?;
        bytemuck::try_cast_slice(bytes).map_err(|e| ArenaError::InvalidArgument {
            reason: format!("cannot view {range} as [{}]: {e:?}", type_name::<T>()),
        })
    }

    /// Shared view of the bytes of `range`.
    ///
    /// Fails with `ForeignRange` or `StaleRange` if the range was not
    /// handed out by this arena in its current generation.
    pub fn bytes(&self, range: ArenaRange) -> Result<&[u8], ArenaError> {
        self.check_range(&range)?;
        Ok(self.chain.block(range.block).bytes(range.offset, range.len))
    }

    /// Mutable view of the bytes of `range`.
    pub fn bytes_mut(&mut self, range: ArenaRange) -> Result<&mut [u8], ArenaError> {
        self.check_range(&range)?;
        Ok(self
            .chain
            .block_mut(range.block)
            .bytes_mut(range.offset, range.len))
    }

    /// Raw pointer to the first byte of `range`, for handing to code that
    /// manages its own access. The pointer dangles after reset or destroy.
    pub fn as_ptr(&self, range: ArenaRange) -> Result<*const u8, ArenaError> {
        Ok(self.bytes(range)?.as_ptr())
    }

    /// Invalidate every outstanding range and make the memory reusable.
    ///
    /// Blocks chained after the first are released; the first block is
    /// rewound (not zeroed), so the next allocation starts at its base
    /// address again. Ranges from before the reset resolve to `StaleRange`.
    pub fn reset(&mut self) {
        let released = self.chain.reset();
        self.generation += 1;
        self.allocations = 0;
        self.requested_bytes = 0;
        debug!(
            "arena {} reset to generation {} ({released} chained blocks released)",
            self.id, self.generation,
        );
    }

    /// Release all backing memory and end the arena's life.
    ///
    /// Returns the usage figures at the moment of destruction. Dropping an
    /// arena releases memory the same way without reporting.
    pub fn destroy(self) -> ArenaStats {
        let stats = self.stats();
        debug!(
            "arena {} destroyed: {} blocks, {} bytes released",
            self.id, stats.block_count, stats.capacity_bytes,
        );
        stats
    }

    /// Current usage figures.
    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            allocations: self.allocations,
            requested_bytes: self.requested_bytes,
            used_bytes: self.chain.total_used(),
            abandoned_bytes: self.chain.abandoned_bytes(),
            block_count: self.chain.block_count(),
            capacity_bytes: self.chain.total_capacity(),
            generation: self.generation,
        }
    }

    /// This arena's identity.
    pub fn id(&self) -> ArenaId {
        self.id
    }

    /// The configuration the arena was built with.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Number of resets so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Bytes handed out from the current block, padding included.
    pub fn used(&self) -> usize {
        self.chain.current().used()
    }

    /// Capacity of the current block in bytes.
    pub fn capacity(&self) -> usize {
        self.chain.current().capacity()
    }

    /// Bytes left in the current block.
    pub fn remaining(&self) -> usize {
        self.chain.current().remaining()
    }

    /// Number of blocks owned.
    pub fn block_count(&self) -> usize {
        self.chain.block_count()
    }

    /// Backing memory owned, in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.chain.total_capacity()
    }

    fn check_range(&self, range: &ArenaRange) -> Result<(), ArenaError> {
        if range.arena != self.id {
            return Err(ArenaError::ForeignRange {
                range_arena: range.arena,
                arena: self.id,
            });
        }
        if range.generation != self.generation {
            return Err(ArenaError::StaleRange {
                range_generation: range.generation,
                arena_generation: self.generation,
            });
        }
        Ok(())
    }
}
