//! Per-run random number generation.
//!
//! Every run owns its RNG stream; nothing in the crate touches a
//! process-wide generator once a run has started.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a seeded RNG.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates an RNG from an optional seed, drawing one from entropy if absent.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}
