//! `rand`-backed random source.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::RandomSource;

/// A [`RandomSource`] backed by a `StdRng`.
///
/// Seed it for reproducible simulations, or draw the seed from the OS.
pub struct ThreadRandom {
    rng: Mutex<StdRng>,
}

impl ThreadRandom {
    /// Seeded from operating system entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible sequence for a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }
}

impl Default for ThreadRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for ThreadRandom {
    fn next_f64(&self) -> f64 {
        self.with_rng(|rng| rng.gen::<f64>())
    }

    fn fill_bytes(&self, dest: &mut [u8]) {
        self.with_rng(|rng| rng.fill_bytes(dest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_stay_in_unit_interval() {
        let rng = ThreadRandom::seeded(7);
        for _ in 0..1_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn seeded_sources_repeat() {
        let a = ThreadRandom::seeded(42);
        let b = ThreadRandom::seeded(42);
        for _ in 0..16 {
            assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
    }

    #[test]
    fn helpers_respect_bounds() {
        let rng = ThreadRandom::seeded(3);
        for _ in 0..1_000 {
            assert!(rng.below(6) < 6);
            let j = rng.jitter(0.1);
            assert!((-0.1..0.1).contains(&j));
            let r = rng.range_f64(95.0, 105.0);
            assert!((95.0..105.0).contains(&r));
        }
        assert_eq!(rng.below(0), 0);
    }

    #[test]
    fn fill_bytes_writes_everything() {
        let rng = ThreadRandom::seeded(9);
        let mut buf = [0u8; 64];
        rng.fill_bytes(&mut buf);
        assert!(buf.iter().any(|b| *b != 0));
    }
}
