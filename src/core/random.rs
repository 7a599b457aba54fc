//! Injectable random source for grain synthesis.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform integer source used by the grain stages.
///
/// Draw order is part of the output: a stage that consumes the same sequence
/// in the same order produces the same image.
pub trait RandomSource {
    /// Draw an integer uniformly from `lo..=hi`.
    fn next_int(&mut self, lo: i32, hi: i32) -> i32;
}

impl<R: Rng> RandomSource for R {
    fn next_int(&mut self, lo: i32, hi: i32) -> i32 {
        if lo >= hi {
            return lo;
        }
        self.gen_range(lo..=hi)
    }
}

/// Deterministic source for reproducible output.
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Source seeded from the operating system.
pub fn from_entropy() -> StdRng {
    StdRng::from_entropy()
}
