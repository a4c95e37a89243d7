//! Per-transaction validator selection.

use std::cmp::Ordering;

use aegis_registry::ValidatorNode;
use aegis_types::{TransactionType, ValidatorType};

use crate::ConsensusError;

/// Who may vote on a transaction type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Eligibility {
    /// Required specialization; `None` admits every type.
    pub validator_type: Option<ValidatorType>,
    /// Reputation must be strictly greater than this.
    pub min_reputation: f64,
}

impl Eligibility {
    /// The eligibility policy table.
    pub fn for_type(tx_type: TransactionType) -> Self {
        let (validator_type, min_reputation) = match tx_type {
            TransactionType::ThreatDetection => (Some(ValidatorType::Security), 80.0),
            TransactionType::VulnerabilityScan => (Some(ValidatorType::Verification), 75.0),
            TransactionType::AccessControl => (Some(ValidatorType::Consensus), 85.0),
            TransactionType::AuditLog => (Some(ValidatorType::Audit), 80.0),
            TransactionType::DataIntegrity => (None, 70.0),
        };
        Self {
            validator_type,
            min_reputation,
        }
    }

    pub fn admits(&self, node: &ValidatorNode) -> bool {
        self.validator_type.map_or(true, |t| node.validator_type == t) && node.reputation() > self.min_reputation
    }
}

/// Outcome of validator selection.
#[derive(Clone, Debug)]
pub enum Selection {
    /// Validators ranked best first.
    Selected(Vec<ValidatorNode>),
    /// Too few eligible candidates this round; retry later.
    Deferred { eligible: usize },
}

/// Picks the validator subset for a transaction from the active pool.
#[derive(Clone, Debug)]
pub struct ValidatorSelector {
    min_validators: usize,
    max_validators: usize,
}

impl ValidatorSelector {
    pub fn new(min_validators: usize, max_validators: usize) -> Result<Self, ConsensusError> {
        if min_validators == 0 || min_validators > max_validators {
            return Err(ConsensusError::InvalidBounds {
                min: min_validators,
                max: max_validators,
            });
        }
        Ok(Self {
            min_validators,
            max_validators,
        })
    }

    /// Eligible nodes ranked by `reputation + security_score`, best first,
    /// truncated to the maximum. Equal scores keep pool order.
    pub fn candidates(&self, active: &[ValidatorNode], tx_type: TransactionType) -> Vec<ValidatorNode> {
        let eligibility = Eligibility::for_type(tx_type);
        let mut candidates: Vec<ValidatorNode> = active
            .iter()
            .filter(|n| n.is_active() && eligibility.admits(n))
            .cloned()
            .collect();
        candidates.sort_by(|a, b| {
            b.selection_score()
                .partial_cmp(&a.selection_score())
                .unwrap_or(Ordering::Equal)
        });
        candidates.truncate(self.max_validators);
        candidates
    }

    pub fn select(&self, active: &[ValidatorNode], tx_type: TransactionType) -> Selection {
        let candidates = self.candidates(active, tx_type);
        if candidates.len() < self.min_validators {
            return Selection::Deferred {
                eligible: candidates.len(),
            };
        }
        Selection::Selected(candidates)
    }
}
