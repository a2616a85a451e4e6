//! Seeded random source owned by a single check run.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Deterministic pseudo-random source initialized from a 64-bit seed
///
/// Two sources built from the same seed yield the same sequence of draws.
/// A source is owned by exactly one check run and is handed to generators as
/// `&mut dyn RngCore`, so generators never retain it between calls.
#[derive(Debug, Clone)]
pub struct RandomSource {
    seed: u64,
    inner: StdRng,
}

impl RandomSource {
    /// Create a new source from the given seed
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a new source from a freshly drawn, non-deterministic seed
    pub fn from_entropy() -> Self {
        Self::from_seed(fresh_seed())
    }

    /// The seed this source was initialized with
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RngCore for RandomSource {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

/// Draw a new seed from the OS-seeded thread RNG
pub fn fresh_seed() -> u64 {
    rand::random()
}
