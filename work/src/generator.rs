//! PoW generation (multi-threaded CPU).

use rayon::prelude::*;

use crate::template::WorkTemplate;
use crate::validator::{meets_difficulty, MAX_DIFFICULTY};
use crate::{WorkError, WorkSolution};

/// Nonces each thread scans per round.
const BATCH_SIZE: u64 = 4096;

/// Searches nonces for a block hash that meets the difficulty target.
#[derive(Clone, Copy, Debug)]
pub struct WorkGenerator {
    /// Highest nonce tried; `None` searches without bound.
    max_nonce: Option<u64>,
}

impl WorkGenerator {
    pub fn new(max_nonce: Option<u64>) -> Self {
        Self { max_nonce }
    }

    /// Find the smallest nonce whose hash meets `difficulty`.
    ///
    /// The nonce space is scanned in rounds of `threads * BATCH_SIZE`
    /// nonces. Each round is split across all cores via rayon and the lowest
    /// hit in the first successful round wins, so the result equals a
    /// sequential search from zero.
    pub fn generate(&self, template: &WorkTemplate, difficulty: u32) -> Result<WorkSolution, WorkError> {
        if difficulty > MAX_DIFFICULTY {
            return Err(WorkError::UnreachableDifficulty(difficulty));
        }
        let limit = self.max_nonce.unwrap_or(u64::MAX);
        let round = BATCH_SIZE * rayon::current_num_threads().max(1) as u64;

        let mut start = 0u64;
        loop {
            let end = start.saturating_add(round - 1).min(limit);
            let hit = (start..=end)
                .into_par_iter()
                .map(|nonce| (nonce, template.hash(nonce)))
                .find_first(|(_, hash)| meets_difficulty(hash, difficulty));
            if let Some((nonce, hash)) = hit {
                return Ok(WorkSolution { nonce, hash });
            }
            if end >= limit {
                return Err(WorkError::NonceSpaceExhausted {
                    max_nonce: limit,
                    difficulty,
                });
            }
            start = end + 1;
        }
    }
}

impl Default for WorkGenerator {
    fn default() -> Self {
        Self::new(None)
    }
}
