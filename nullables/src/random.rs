//! Nullable random: deterministic random number generation.

use std::sync::Mutex;

use aegis_random::RandomSource;

/// A deterministic random source for testing.
///
/// Returns pre-configured values in order, wrapping around at the end.
/// Byte requests are filled from a counter so generated ids stay unique.
pub struct NullRandom {
    state: Mutex<NullState>,
}

struct NullState {
    values: Vec<f64>,
    index: usize,
    byte_counter: u64,
}

impl NullRandom {
    /// Create with a sequence of values in `[0, 1)`.
    ///
    /// An empty sequence behaves like `constant(0.5)`.
    pub fn new(values: Vec<f64>) -> Self {
        let values = if values.is_empty() { vec![0.5] } else { values };
        Self {
            state: Mutex::new(NullState {
                values,
                index: 0,
                byte_counter: 0,
            }),
        }
    }

    /// Create with a single value that will be returned for every call.
    ///
    /// `0.5` is neutral: symmetric jitter is zero and no 2% status flip fires.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of `next_f64` calls served so far.
    pub fn calls(&self) -> usize {
        self.lock().index
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NullState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RandomSource for NullRandom {
    fn next_f64(&self) -> f64 {
        let mut state = self.lock();
        let value = state.values[state.index % state.values.len()];
        state.index += 1;
        value
    }

    fn fill_bytes(&self, dest: &mut [u8]) {
        let mut state = self.lock();
        for chunk in dest.chunks_mut(8) {
            state.byte_counter += 1;
            let bytes = state.byte_counter.to_be_bytes();
            chunk.copy_from_slice(&bytes[8 - chunk.len()..]);
        }
    }
}
