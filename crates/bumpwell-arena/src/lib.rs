//! Bump-pointer memory arenas.
//!
//! An [`Arena`] hands out non-overlapping byte ranges from blocks it owns
//! and gives all of them back at once, on [`Arena::reset`] or when it is
//! destroyed. There is no per-allocation bookkeeping and no individual
//! free. This crate is the only one in the workspace that may contain
//! `unsafe` code, and that code is confined to one private module.
//!
//! # Architecture
//!
//! ```text
//! Arena (cursor bookkeeping, generation, range checks)
//! └── BlockChain (growth policy, block cap)
//!     └── Block[] (fixed-capacity byte buffer + bump cursor)
//!         └── RawBlock (system allocation, MAX_ALIGN-aligned, zeroed)
//!
//! SharedArena = Arc<Mutex<Option<Arena>>>
//! ```
//!
//! # Growth
//!
//! - **Fixed:** one block; a request that does not fit fails with
//!   [`ArenaError::ArenaExhausted`].
//! - **Chained:** a request that does not fit gets a new block of
//!   `max(block_size, size + align - 1)` bytes. Earlier blocks stay where
//!   they are, so every address handed out is stable.
//!
//! # Ranges and resets
//!
//! Allocations are described by [`ArenaRange`] handles. Resolving a range
//! checks that it came from this arena and from the current generation, so
//! a range kept across a reset is reported as [`ArenaError::StaleRange`]
//! rather than aliasing newer data.
//!
//! ```
//! use bumpwell_arena::{Arena, ArenaError};
//!
//! let mut arena = Arena::new(64)?;
//! let a = arena.allocate(10, 1)?;
//! let b = arena.allocate(10, 1)?;
//! assert_eq!((a.offset(), b.offset()), (0, 10));
//! assert_eq!(arena.used(), 20);
//!
//! arena.reset();
//! assert!(matches!(arena.bytes(a), Err(ArenaError::StaleRange { .. })));
//! # Ok::<(), ArenaError>(())
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod arena;
pub(crate) mod block;
pub(crate) mod chain;
pub mod config;
pub mod error;
pub mod range;
mod raw;
pub mod shared;

// Public re-exports for the primary API surface.
pub use arena::{Arena, ArenaStats};
pub use config::{ArenaConfig, Growth};
pub use error::ArenaError;
pub use range::{ArenaId, ArenaRange};
pub use raw::MAX_ALIGN;
pub use shared::{ArenaState, SharedArena};
