//! The simulated validator node record.

use serde::{Deserialize, Deserializer, Serialize};

use aegis_types::{NodeId, NodeStatus, Timestamp, ValidatorType};

/// Clamp a reputation or security score into `[0, 100]`. NaN maps to 0.
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

fn deserialize_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    f64::deserialize(deserializer).map(clamp_score)
}

/// A simulated validator participant.
///
/// `reputation` and `security_score` are only reachable through clamping
/// setters, and are clamped on deserialization too, so no out-of-range
/// value is ever stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorNode {
    // ── Identity ─────────────────────────────────────────────────────────
    pub id: NodeId,
    /// Display-only network address (`0x` + 40 hex characters).
    pub address: String,
    /// `<region>-<ordinal>` label.
    pub location: String,
    pub region: String,
    pub provider: String,

    // ── Classification ───────────────────────────────────────────────────
    pub validator_type: ValidatorType,

    // ── Health / reputation ──────────────────────────────────────────────
    pub status: NodeStatus,
    #[serde(deserialize_with = "deserialize_score")]
    reputation: f64,
    #[serde(deserialize_with = "deserialize_score")]
    security_score: f64,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub network_latency: f64,
    pub uptime: f64,
    /// Height the node reports as synced to.
    pub block_height: u64,
    pub validated_transactions: u64,
    pub detected_threats: u64,
    pub last_heartbeat: Timestamp,
}

impl ValidatorNode {
    /// A node with neutral telemetry; callers fill in the rest.
    pub fn new(id: NodeId, validator_type: ValidatorType, region: &str, provider: &str) -> Self {
        Self {
            id,
            address: String::new(),
            location: region.to_string(),
            region: region.to_string(),
            provider: provider.to_string(),
            validator_type,
            status: NodeStatus::Active,
            reputation: 0.0,
            security_score: 0.0,
            cpu_usage: 0.0,
            memory_usage: 0.0,
            network_latency: 0.0,
            uptime: 100.0,
            block_height: 0,
            validated_transactions: 0,
            detected_threats: 0,
            last_heartbeat: Timestamp::EPOCH,
        }
    }

    pub fn reputation(&self) -> f64 {
        self.reputation
    }

    pub fn security_score(&self) -> f64 {
        self.security_score
    }

    pub fn set_reputation(&mut self, value: f64) {
        self.reputation = clamp_score(value);
    }

    pub fn set_security_score(&mut self, value: f64) {
        self.security_score = clamp_score(value);
    }

    /// Nudge reputation by `delta`, staying within `[0, 100]`.
    pub fn adjust_reputation(&mut self, delta: f64) {
        self.reputation = clamp_score(self.reputation + delta);
    }

    /// Builder-style reputation/security setter, mainly for tests and fixtures.
    pub fn with_scores(mut self, reputation: f64, security_score: f64) -> Self {
        self.set_reputation(reputation);
        self.set_security_score(security_score);
        self
    }

    pub fn with_status(mut self, status: NodeStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Combined ranking key used by validator selection.
    pub fn selection_score(&self) -> f64 {
        self.reputation + self.security_score
    }

    /// Weight used for block proposer selection.
    pub fn proposer_weight(&self) -> f64 {
        self.reputation * self.security_score
    }
}
