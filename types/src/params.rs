//! Network parameters injected into every engine at construction time.
//!
//! The quorum fraction, vote cutoff and eligibility thresholds are protocol
//! constants (see `aegis-consensus`) and deliberately not listed here.

use serde::{Deserialize, Serialize};

use crate::error::AegisError;

/// Tunable parameters of a simulated network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkParams {
    // ── Registry ─────────────────────────────────────────────────────────
    /// Size of the fixed validator pool created at startup.
    pub node_count: usize,

    // ── Consensus ────────────────────────────────────────────────────────
    /// Rounds are skipped while fewer than this many nodes are active.
    pub min_active_nodes: usize,

    /// Transactions with fewer eligible validators than this are deferred.
    pub min_validators: usize,

    /// Upper bound on validators deciding one transaction.
    pub max_validators: usize,

    /// Maximum transactions drained from the pool per consensus cycle.
    pub batch_size: usize,

    /// Lower bound of the simulated per-vote round-trip delay, in milliseconds.
    pub vote_delay_min_ms: u64,

    /// Upper bound of the simulated per-vote round-trip delay, in milliseconds.
    pub vote_delay_max_ms: u64,

    // ── Mining ───────────────────────────────────────────────────────────
    /// Required number of leading zero hex digits in a block hash.
    pub difficulty: u32,

    /// Optional cap on the nonce search. `None` searches without bound.
    pub max_nonce: Option<u64>,
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self {
            node_count: 120,
            min_active_nodes: 3,
            min_validators: 3,
            max_validators: 7,
            batch_size: 10,
            vote_delay_min_ms: 50,
            vote_delay_max_ms: 150,
            difficulty: 4,
            max_nonce: None,
        }
    }
}

impl NetworkParams {
    /// Parameters suited to unit tests: no vote delay and a low difficulty.
    pub fn fast_defaults() -> Self {
        Self {
            vote_delay_min_ms: 0,
            vote_delay_max_ms: 0,
            difficulty: 2,
            ..Self::default()
        }
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), AegisError> {
        if self.node_count == 0 {
            return Err(AegisError::InvalidParams("node_count must be positive".into()));
        }
        if self.min_validators == 0 || self.min_validators > self.max_validators {
            return Err(AegisError::InvalidParams(format!(
                "min_validators ({}) must be in 1..=max_validators ({})",
                self.min_validators, self.max_validators
            )));
        }
        if self.batch_size == 0 {
            return Err(AegisError::InvalidParams("batch_size must be positive".into()));
        }
        if self.vote_delay_min_ms > self.vote_delay_max_ms {
            return Err(AegisError::InvalidParams(
                "vote_delay_min_ms exceeds vote_delay_max_ms".into(),
            ));
        }
        if self.difficulty > 64 {
            return Err(AegisError::InvalidParams(format!(
                "difficulty {} exceeds the 64 hex digits of a block hash",
                self.difficulty
            )));
        }
        Ok(())
    }
}
