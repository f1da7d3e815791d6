//! Allocation handles.
//!
//! An [`ArenaRange`] records where an allocation lives: which arena, which
//! generation of that arena, which block and which bytes. It is a plain
//! `Copy` value rather than a borrow, so the arena can keep allocating
//! while ranges are outstanding. The `arena` and `generation` fields let
//! every resolve detect ranges that outlived a reset or belong elsewhere.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique identity of an [`Arena`](crate::Arena).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArenaId(pub u64);

impl ArenaId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One byte range handed out by an arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArenaRange {
    pub(crate) arena: ArenaId,
    pub(crate) generation: u64,
    pub(crate) block: usize,
    pub(crate) offset: usize,
    pub(crate) len: usize,
    pub(crate) addr: usize,
}

impl ArenaRange {
    /// Arena that produced this range.
    pub fn arena_id(&self) -> ArenaId {
        self.arena
    }

    /// Arena generation (number of resets) when this range was handed out.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Index of the block within the arena's chain.
    pub fn block_index(&self) -> usize {
        self.block
    }

    /// Byte offset within the block.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the range is empty. Arenas never hand out empty ranges.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Address of the first byte.
    pub fn addr(&self) -> usize {
        self.addr
    }

    /// Address one past the last byte.
    pub fn end_addr(&self) -> usize {
        self.addr + self.len
    }

    /// Whether the two ranges share any byte of memory.
    pub fn overlaps(&self, other: &ArenaRange) -> bool {
        self.addr < other.end_addr() && other.addr < self.end_addr()
    }
}

impl fmt::Display for ArenaRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ArenaRange(arena={}, gen={}, block={}, off={}, len={})",
            self.arena, self.generation, self.block, self.offset, self.len
        )
    }
}
