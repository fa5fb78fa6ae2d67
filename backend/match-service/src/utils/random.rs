// Injectable randomness for the matching paths.
//
// Production code draws from the thread RNG; tests use a seeded source or
// a mock so tier draws and samples are reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[cfg_attr(test, mockall::automock)]
pub trait RandomSource: Send {
    /// Uniform value in [0, 1).
    fn uniform(&mut self) -> f64;

    /// `k` distinct indices drawn uniformly from `0..n`, in no particular
    /// order. `k` is capped at `n`.
    fn sample_indices(&mut self, n: usize, k: usize) -> Vec<usize>;
}

fn sample_with<R: Rng + ?Sized>(rng: &mut R, n: usize, k: usize) -> Vec<usize> {
    let k = k.min(n);
    if k == 0 {
        return Vec::new();
    }
    rand::seq::index::sample(rng, n, k).into_vec()
}

/// Thread-local RNG, fresh handle per draw.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn uniform(&mut self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }

    fn sample_indices(&mut self, n: usize, k: usize) -> Vec<usize> {
        sample_with(&mut rand::thread_rng(), n, k)
    }
}

/// Deterministic source for reproducible runs.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn sample_indices(&mut self, n: usize, k: usize) -> Vec<usize> {
        sample_with(&mut self.rng, n, k)
    }
}
