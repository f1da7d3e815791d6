//! Workload profiles for benchmarking bumpwell arenas.
//!
//! Provides deterministic allocation request streams:
//!
//! - [`small_objects`]: many 4 to 64 byte requests, like per-node parser data
//! - [`mixed_requests`]: mostly small requests with occasional large buffers
//! - [`run_phase`]: replay a request stream against an arena

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use bumpwell_arena::{Arena, ArenaError, ArenaStats};
use log::debug;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// One allocation request: `(size, align)`.
pub type Request = (usize, usize);

const ALIGNS: [usize; 5] = [1, 2, 4, 8, 16];

/// Generate `count` small-object requests (4 to 64 bytes, any alignment).
pub fn small_objects(count: usize, seed: u64) -> Vec<Request> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| (rng.gen_range(4..=64), ALIGNS[rng.gen_range(0..ALIGNS.len())]))
        .collect()
}

/// Generate `count` requests where roughly one in `large_every` is a
/// buffer between 4 and 16 KiB and the rest are small objects.
pub fn mixed_requests(count: usize, large_every: u32, seed: u64) -> Vec<Request> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let align = ALIGNS[rng.gen_range(0..ALIGNS.len())];
            if large_every > 0 && rng.gen_ratio(1, large_every) {
                (rng.gen_range(4096..=16384), align)
            } else {
                (rng.gen_range(4..=64), align)
            }
        })
        .collect()
}

/// Serve every request in `requests` from `arena` and touch the first byte
/// of each range. Returns the arena's stats after the phase.
pub fn run_phase(arena: &mut Arena, requests: &[Request]) -> Result<ArenaStats, ArenaError> {
    for &(size, align) in requests {
        let range = arena.allocate(size, align)?;
        arena.bytes_mut(range)?[0] = 1;
    }
    let stats = arena.stats();
    debug!(
        "phase served {} requests: {} bytes used, {} padding, {} blocks",
        stats.allocations,
        stats.used_bytes,
        stats.padding_bytes(),
        stats.block_count,
    );
    Ok(stats)
}
