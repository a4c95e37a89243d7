//! Randomness behind a trait so simulations can be pinned in tests.
//!
//! Every random decision of the network is drawn from a [`RandomSource`]:
//! initial telemetry, status flips, metric and vote jitter, simulated vote
//! latency, node addresses and transaction ids. Production wiring uses
//! [`ThreadRandom`]; tests use the scripted source from `aegis-nullables`.
//!
//! Thresholds applied to the drawn values live in the engines and stay exact
//! regardless of the source.

pub mod thread;

pub use thread::ThreadRandom;

/// Trait for providing uniform randomness.
pub trait RandomSource: Send + Sync {
    /// Uniform value in `[0, 1)`.
    fn next_f64(&self) -> f64;

    /// Fill `dest` with random bytes.
    fn fill_bytes(&self, dest: &mut [u8]);

    /// Uniform value in `[low, high)`.
    fn range_f64(&self, low: f64, high: f64) -> f64 {
        low + self.next_f64() * (high - low)
    }

    /// Uniform integer in `0..n`. Returns 0 when `n == 0`.
    fn below(&self, n: u64) -> u64 {
        if n == 0 {
            return 0;
        }
        ((self.next_f64() * n as f64) as u64).min(n - 1)
    }

    /// Symmetric jitter: uniform value in `[-amplitude, amplitude)`.
    fn jitter(&self, amplitude: f64) -> f64 {
        (self.next_f64() - 0.5) * 2.0 * amplitude
    }
}
