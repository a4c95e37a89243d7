//! One validator's simulated vote.

use serde::{Deserialize, Serialize};

use aegis_registry::ValidatorNode;
use aegis_types::{NodeId, TransactionType, ValidatorType};

/// A vote is positive iff its confidence is strictly above this.
pub const VOTE_THRESHOLD: f64 = 0.6;

/// Bonus for a security validator judging a threat detection.
pub const SPECIALIZATION_BONUS: f64 = 0.1;

/// Amplitude of the random confidence jitter.
pub const JITTER_AMPLITUDE: f64 = 0.1;

/// Reputation at which the reputation bonus is zero.
const REPUTATION_BASELINE: f64 = 70.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub node_id: NodeId,
    pub approve: bool,
    pub confidence: f64,
}

impl Vote {
    /// Cast `validator`'s vote on a transaction of `tx_type`.
    ///
    /// `jitter` is a uniform draw in `[0, 1)`; it maps to a symmetric
    /// adjustment of at most ±[`JITTER_AMPLITUDE`].
    pub fn cast(validator: &ValidatorNode, tx_type: TransactionType, jitter: f64) -> Self {
        let confidence = vote_confidence(validator, tx_type, jitter);
        Self {
            node_id: validator.id.clone(),
            approve: confidence > VOTE_THRESHOLD,
            confidence,
        }
    }
}

/// Confidence in `[0, 1]` that `validator` assigns to a transaction.
pub fn vote_confidence(validator: &ValidatorNode, tx_type: TransactionType, jitter: f64) -> f64 {
    let mut confidence = validator.security_score() / 100.0;
    if tx_type == TransactionType::ThreatDetection && validator.validator_type == ValidatorType::Security {
        confidence += SPECIALIZATION_BONUS;
    }
    confidence += (jitter - 0.5) * 2.0 * JITTER_AMPLITUDE;
    confidence += (validator.reputation() - REPUTATION_BASELINE) / 100.0;
    confidence.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(ty: ValidatorType, rep: f64, sec: f64) -> ValidatorNode {
        ValidatorNode::new(NodeId::new("n"), ty, "r", "p").with_scores(rep, sec)
    }

    #[test]
    fn neutral_jitter_confidence() {
        let n = node(ValidatorType::Audit, 80.0, 50.0);
        let c = vote_confidence(&n, TransactionType::AuditLog, 0.5);
        assert!((c - 0.6).abs() < 1e-12);
    }

    #[test]
    fn cutoff_is_strict() {
        let below = node(ValidatorType::Audit, 70.0, 60.0);
        let above = node(ValidatorType::Audit, 71.0, 60.0);
        assert!(!Vote::cast(&below, TransactionType::AuditLog, 0.45).approve);
        assert!(Vote::cast(&above, TransactionType::AuditLog, 0.5).approve);
    }

    #[test]
    fn specialization_bonus_only_for_security_on_threats() {
        let sec = node(ValidatorType::Security, 70.0, 50.0);
        let audit = node(ValidatorType::Audit, 70.0, 50.0);
        let a = vote_confidence(&sec, TransactionType::ThreatDetection, 0.5);
        let b = vote_confidence(&audit, TransactionType::ThreatDetection, 0.5);
        let c = vote_confidence(&sec, TransactionType::AuditLog, 0.5);
        assert!((a - 0.6).abs() < 1e-12);
        assert!((b - 0.5).abs() < 1e-12);
        assert!((c - 0.5).abs() < 1e-12);
    }

    #[test]
    fn confidence_is_clamped() {
        let strong = node(ValidatorType::Security, 100.0, 100.0);
        assert_eq!(vote_confidence(&strong, TransactionType::ThreatDetection, 0.99), 1.0);
        let weak = node(ValidatorType::Audit, 0.0, 0.0);
        assert_eq!(vote_confidence(&weak, TransactionType::AuditLog, 0.0), 0.0);
    }

    #[test]
    fn high_reputation_votes_yes() {
        let n = node(ValidatorType::Security, 95.0, 95.0);
        let vote = Vote::cast(&n, TransactionType::ThreatDetection, 0.0);
        assert!(vote.approve);
        assert_eq!(vote.confidence, 1.0);
    }
}
