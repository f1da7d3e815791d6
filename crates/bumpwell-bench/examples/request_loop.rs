//! One arena per server loop, reset after every request.
//!
//! Demonstrates: create arena → serve a request's allocations → reset →
//! repeat, with the first block reused across requests. Run with
//! `RUST_LOG=debug` to see chaining and reset events.

use bumpwell_arena::{Arena, ArenaConfig, ArenaError};
use bumpwell_bench::mixed_requests;

fn main() -> Result<(), ArenaError> {
    env_logger::init();

    println!("=== Bumpwell Request Loop Example ===\n");

    let mut arena = Arena::with_config(ArenaConfig::new(16 * 1024).with_block_size(8 * 1024))?;
    let base = arena.allocate(1, 1)?.addr();
    arena.reset();

    for request in 0..5u8 {
        // Each "request" carries a header record plus a batch of buffers.
        let seq = u64::from(request);
        let header = arena.alloc_pod(&[seq, seq * 2, seq * 3])?;
        let mut served = 1usize;
        for (size, align) in mixed_requests(200, 40, seq) {
            let range = arena.allocate(size, align)?;
            arena.bytes_mut(range)?.fill(request);
            served += 1;
        }

        let [id, ..] = arena.read_pod::<[u64; 3]>(header)?;
        let stats = arena.stats();
        println!(
            "request {id}: {served} allocations, {} bytes requested, {} used, {} abandoned, {} blocks",
            stats.requested_bytes, stats.used_bytes, stats.abandoned_bytes, stats.block_count,
        );

        arena.reset();
        let first = arena.allocate(1, 1)?.addr();
        if first != base {
            println!("  first allocation moved: {first:#x} (expected {base:#x})");
        }
        arena.reset();
    }

    let stats = arena.destroy();
    println!(
        "\nDone after {} resets; {} bytes released.",
        stats.generation, stats.capacity_bytes
    );
    Ok(())
}
