//! Outcome of one voting round.

use serde::{Deserialize, Serialize};

use aegis_types::{Priority, ThreatLevel};

use crate::quorum::{quorum_reached, recommendation, threat_level};
use crate::vote::Vote;

/// Recommendation attached to a transaction whose outcome is unknown.
pub const UNKNOWN_RECOMMENDATION: &str = "Transaction processing failed";

/// Per-transaction decision. Not persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusResult {
    pub is_valid: bool,
    /// Fraction of positive votes.
    pub confidence: f64,
    pub validator_count: usize,
    pub consensus_reached: bool,
    pub threat_level: ThreatLevel,
    pub recommendation: String,
}

impl ConsensusResult {
    /// Tally `votes` for a transaction of `priority`.
    pub fn from_votes(votes: &[Vote], priority: Priority) -> Self {
        let total = votes.len();
        let positive = votes.iter().filter(|v| v.approve).count();
        let reached = quorum_reached(positive, total);
        let confidence = if total == 0 {
            0.0
        } else {
            positive as f64 / total as f64
        };
        Self {
            is_valid: reached,
            confidence,
            validator_count: total,
            consensus_reached: reached,
            threat_level: threat_level(priority, confidence),
            recommendation: recommendation(reached, confidence),
        }
    }

    /// Result reported when no decision was observed in time.
    pub fn unknown() -> Self {
        Self {
            is_valid: false,
            confidence: 0.0,
            validator_count: 0,
            consensus_reached: false,
            threat_level: ThreatLevel::Unknown,
            recommendation: UNKNOWN_RECOMMENDATION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_types::NodeId;

    fn votes(positive: usize, total: usize) -> Vec<Vote> {
        (0..total)
            .map(|i| Vote {
                node_id: NodeId::from_index(i),
                approve: i < positive,
                confidence: if i < positive { 0.9 } else { 0.3 },
            })
            .collect()
    }

    #[test]
    fn five_of_seven_reaches_quorum() {
        let r = ConsensusResult::from_votes(&votes(5, 7), Priority::Medium);
        assert!(r.consensus_reached);
        assert!(r.is_valid);
        assert_eq!(r.validator_count, 7);
        assert!((r.confidence - 5.0 / 7.0).abs() < 1e-12);
        assert_eq!(r.threat_level, ThreatLevel::Minimal);
        assert!(r.recommendation.starts_with("Moderate confidence validation (71%)"));
    }

    #[test]
    fn four_of_seven_is_rejected() {
        let r = ConsensusResult::from_votes(&votes(4, 7), Priority::Critical);
        assert!(!r.consensus_reached);
        assert!(!r.is_valid);
        assert_eq!(r.threat_level, ThreatLevel::High);
        assert!(r.recommendation.starts_with("Transaction rejected by consensus"));
    }

    #[test]
    fn unanimous_is_high_confidence() {
        let r = ConsensusResult::from_votes(&votes(7, 7), Priority::Critical);
        assert_eq!(r.confidence, 1.0);
        assert_eq!(r.threat_level, ThreatLevel::Minimal);
    }

    #[test]
    fn unknown_result_shape() {
        let r = ConsensusResult::unknown();
        assert!(!r.consensus_reached);
        assert_eq!(r.threat_level, ThreatLevel::Unknown);
        assert_eq!(r.recommendation, UNKNOWN_RECOMMENDATION);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["threatLevel"], "UNKNOWN");
        assert_eq!(json["consensusReached"], false);
    }
}
