//! Injected randomness
//!
//! Quote-number suffixes are drawn from a [`RandomSource`] rather than a
//! global generator, so collision handling can be driven deterministically.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniformly distributed integers
pub trait RandomSource: Send + Sync {
    /// Returns a value in `0..upper`
    ///
    /// # Arguments
    ///
    /// * `upper` - Exclusive upper bound, must be greater than zero
    fn next_below(&self, upper: u32) -> u32;
}

/// `RandomSource` backed by a mutex-guarded `StdRng`
pub struct StdRandom {
    inner: Mutex<StdRng>,
}

impl StdRandom {
    /// Creates a generator seeded from the thread-local entropy source
    pub fn new() -> Self {
        let seed = rand::thread_rng().gen::<[u8; 32]>();
        Self {
            inner: Mutex::new(StdRng::from_seed(seed)),
        }
    }

    /// Creates a reproducible generator from a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for StdRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StdRandom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdRandom").finish_non_exhaustive()
    }
}

impl RandomSource for StdRandom {
    fn next_below(&self, upper: u32) -> u32 {
        // A poisoned lock still holds a usable generator
        let mut rng = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(0..upper.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_stay_below_bound() {
        let random = StdRandom::new();
        for _ in 0..1_000 {
            assert!(random.next_below(10_000) < 10_000);
        }
    }

    #[test]
    fn test_seeded_generators_agree() {
        let a = StdRandom::seeded(42);
        let b = StdRandom::seeded(42);
        let left: Vec<u32> = (0..16).map(|_| a.next_below(10_000)).collect();
        let right: Vec<u32> = (0..16).map(|_| b.next_below(10_000)).collect();
        assert_eq!(left, right);
    }
}
