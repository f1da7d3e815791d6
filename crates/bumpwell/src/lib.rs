//! Bumpwell: bump-pointer memory arenas.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Bumpwell sub-crates. For most users, adding `bumpwell` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use bumpwell::prelude::*;
//!
//! // One 64-byte block; requests that overflow it chain a new block.
//! let mut arena = Arena::new(64)?;
//! let id = arena.alloc_pod(&42u32)?;
//! let name = arena.alloc_slice_copy(b"bumpwell")?;
//!
//! assert_eq!(arena.read_pod::<u32>(id)?, 42);
//! assert_eq!(arena.bytes(name)?, b"bumpwell");
//!
//! // Everything is reclaimed at once.
//! arena.reset();
//! assert_eq!(arena.used(), 0);
//!
//! // A fixed arena refuses to grow instead.
//! let mut fixed = Arena::with_config(ArenaConfig::fixed(16))?;
//! fixed.allocate(10, 1)?;
//! assert!(matches!(
//!     fixed.allocate(10, 1),
//!     Err(ArenaError::ArenaExhausted { .. })
//! ));
//! # Ok::<(), ArenaError>(())
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `bumpwell-arena` | `Arena`, blocks, ranges, config, `SharedArena` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Arena, blocks, ranges, and configuration (`bumpwell-arena`).
pub use bumpwell_arena as arena;

/// Common imports for typical Bumpwell usage.
///
/// ```rust
/// use bumpwell::prelude::*;
/// ```
pub mod prelude {
    pub use bumpwell_arena::{
        Arena, ArenaConfig, ArenaError, ArenaRange, ArenaStats, Growth, SharedArena, MAX_ALIGN,
    };
}
