//! Quorum rule and the labels derived from a vote tally.

use aegis_types::{Priority, ThreatLevel};

/// Quorum: 67% of cast votes, in basis points.
pub const QUORUM_BPS: usize = 6700;
const BPS_DENOMINATOR: usize = 10_000;

/// Positive votes needed out of `total`: `ceil(0.67 * total)`.
///
/// Computed in integers so the ceiling is exact for every `total`.
pub fn required_votes(total: usize) -> usize {
    (total * QUORUM_BPS).div_ceil(BPS_DENOMINATOR)
}

/// Whether `positive` out of `total` votes reach quorum. An empty vote set
/// never does.
pub fn quorum_reached(positive: usize, total: usize) -> bool {
    total > 0 && positive >= required_votes(total)
}

/// Threat label for a decided transaction.
pub fn threat_level(priority: Priority, confidence: f64) -> ThreatLevel {
    match priority {
        Priority::Critical if confidence < 0.8 => ThreatLevel::High,
        Priority::High if confidence < 0.7 => ThreatLevel::Medium,
        _ if confidence < 0.5 => ThreatLevel::Low,
        _ => ThreatLevel::Minimal,
    }
}

/// Operator-facing summary of a decision.
pub fn recommendation(consensus_reached: bool, confidence: f64) -> String {
    let percent = (confidence * 100.0).round() as u32;
    if !consensus_reached {
        return format!(
            "Transaction rejected by consensus. Confidence: {percent}%. Requires further investigation."
        );
    }
    if confidence > 0.9 {
        format!("High confidence validation ({percent}%). Transaction approved and added to blockchain.")
    } else if confidence > 0.7 {
        format!("Moderate confidence validation ({percent}%). Transaction approved with monitoring.")
    } else {
        format!("Low confidence validation ({percent}%). Transaction approved but flagged for review.")
    }
}
