//! Deterministic seeding for rollout environments.
//!
//! - SeedSequence: expands a root u64 seed into per-episode sub-seeds
//! - RngStream: the reproducible PRNG stream (ChaCha8) used for slip sampling

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Type alias for the default RNG stream used across the crate.
pub type RngStream = ChaCha8Rng;

/// SplitMix64-style expander deriving independent sub-seeds from one root seed.
#[derive(Clone, Debug)]
pub struct SeedSequence {
    state: u128,
}

impl SeedSequence {
    pub fn new(seed: u64) -> Self {
        Self { state: (seed as u128) ^ 0x9E3779B97F4A7C15u128 }
    }

    /// Generate the next sub-seed deterministically.
    pub fn next_subseed(&mut self) -> u64 {
        let mut z = (self.state as u64).wrapping_add(0x9E3779B97F4A7C15);
        self.state = (self.state ^ (z as u128)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }

    pub fn split_n(&mut self, n: usize) -> Vec<u64> {
        (0..n).map(|_| self.next_subseed()).collect()
    }
}

/// Split a root seed into N sub-seeds deterministically.
pub fn split_n(seed: u64, n: usize) -> Vec<u64> { SeedSequence::new(seed).split_n(n) }

pub fn rng_from_seed(seed: u64) -> RngStream { RngStream::seed_from_u64(seed) }
