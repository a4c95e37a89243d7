//! The security-event transaction record.

use serde::{Deserialize, Serialize};

use aegis_crypto::hash_transaction;
use aegis_random::RandomSource;
use aegis_types::{NodeId, Priority, Timestamp, TransactionId, TransactionStatus, TransactionType, TxHash};

use crate::TransactionError;

/// Caller-supplied content of a transaction, before id and hash are assigned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    #[serde(default)]
    pub payload: serde_json::Value,
    pub source: String,
    pub priority: Priority,
}

impl TransactionDraft {
    pub fn new(tx_type: TransactionType, payload: serde_json::Value, source: &str, priority: Priority) -> Self {
        Self {
            tx_type,
            payload,
            source: source.to_string(),
            priority,
        }
    }

    /// Critical drafts skip the tick and get an immediate consensus cycle.
    pub fn is_critical(&self) -> bool {
        self.priority == Priority::Critical
    }

    /// Content hash over the immutable fields, in `type, payload, source,
    /// priority` order.
    pub fn content_hash(&self) -> Result<TxHash, TransactionError> {
        let bytes = serde_json::to_vec(self)?;
        Ok(hash_transaction(&bytes))
    }
}

/// A submitted security event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityTransaction {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub payload: serde_json::Value,
    pub timestamp: Timestamp,
    pub source: String,
    pub hash: TxHash,
    pub priority: Priority,
    status: TransactionStatus,
    /// Validators of the deciding vote; filled only on validation.
    #[serde(default)]
    validator_nodes: Vec<NodeId>,
}

impl SecurityTransaction {
    /// Create a `pending` transaction from `draft`.
    pub fn from_draft(
        draft: TransactionDraft,
        id: TransactionId,
        timestamp: Timestamp,
    ) -> Result<Self, TransactionError> {
        let hash = draft.content_hash()?;
        Ok(Self {
            id,
            tx_type: draft.tx_type,
            payload: draft.payload,
            timestamp,
            source: draft.source,
            hash,
            priority: draft.priority,
            status: TransactionStatus::Pending,
            validator_nodes: Vec::new(),
        })
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn validator_nodes(&self) -> &[NodeId] {
        &self.validator_nodes
    }

    /// Mark as validated by `validators`.
    pub fn mark_validated(&mut self, validators: Vec<NodeId>) -> Result<(), TransactionError> {
        self.transition(TransactionStatus::Validated)?;
        self.validator_nodes = validators;
        Ok(())
    }

    pub fn mark_rejected(&mut self) -> Result<(), TransactionError> {
        self.transition(TransactionStatus::Rejected)
    }

    fn transition(&mut self, next: TransactionStatus) -> Result<(), TransactionError> {
        if !self.status.can_transition_to(next) {
            return Err(TransactionError::InvalidTransition {
                id: self.id.clone(),
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}

/// A fresh UUID v4 transaction id drawn from `rng`.
pub fn new_transaction_id(rng: &dyn RandomSource) -> TransactionId {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    let uuid = uuid::Builder::from_random_bytes(bytes).into_uuid();
    TransactionId::new(&uuid.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_nullables::NullRandom;
    use serde_json::json;

    fn draft() -> TransactionDraft {
        TransactionDraft::new(
            TransactionType::ThreatDetection,
            json!({"ip": "10.0.0.8", "signature": "ET-2024"}),
            "ids-sensor",
            Priority::High,
        )
    }

    fn pending() -> SecurityTransaction {
        SecurityTransaction::from_draft(draft(), TransactionId::new("tx-1"), Timestamp::new(42)).unwrap()
    }

    #[test]
    fn only_critical_priority_is_critical() {
        assert!(!draft().is_critical());
        let mut urgent = draft();
        urgent.priority = Priority::Critical;
        assert!(urgent.is_critical());
    }

    #[test]
    fn new_transaction_is_pending() {
        let tx = pending();
        assert_eq!(tx.status(), TransactionStatus::Pending);
        assert!(tx.validator_nodes().is_empty());
        assert_eq!(tx.hash, draft().content_hash().unwrap());
    }

    #[test]
    fn hash_covers_every_content_field() {
        let base = draft().content_hash().unwrap();
        let mut other = draft();
        other.source = "waf".into();
        assert_ne!(other.content_hash().unwrap(), base);
        let mut other = draft();
        other.priority = Priority::Low;
        assert_ne!(other.content_hash().unwrap(), base);
        let mut other = draft();
        other.payload = json!({});
        assert_ne!(other.content_hash().unwrap(), base);
    }

    #[test]
    fn hash_ignores_id_and_timestamp() {
        let a = SecurityTransaction::from_draft(draft(), TransactionId::new("a"), Timestamp::new(1)).unwrap();
        let b = SecurityTransaction::from_draft(draft(), TransactionId::new("b"), Timestamp::new(2)).unwrap();
        assert_eq!(a.hash, b.hash);
    }

    #[test]
    fn validated_is_terminal() {
        let mut tx = pending();
        tx.mark_validated(vec![NodeId::new("node-001")]).unwrap();
        assert_eq!(tx.status(), TransactionStatus::Validated);
        assert_eq!(tx.validator_nodes(), &[NodeId::new("node-001")]);
        assert!(matches!(
            tx.mark_rejected(),
            Err(TransactionError::InvalidTransition { .. })
        ));
        assert!(tx.mark_validated(Vec::new()).is_err());
        assert_eq!(tx.validator_nodes().len(), 1);
    }

    #[test]
    fn rejected_is_terminal() {
        let mut tx = pending();
        tx.mark_rejected().unwrap();
        assert!(tx.mark_validated(vec![NodeId::new("node-001")]).is_err());
        assert_eq!(tx.status(), TransactionStatus::Rejected);
        assert!(tx.validator_nodes().is_empty());
    }

    #[test]
    fn serializes_type_and_camel_case() {
        let mut tx = pending();
        tx.mark_validated(vec![NodeId::new("node-004")]).unwrap();
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["type"], "threat_detection");
        assert_eq!(value["status"], "validated");
        assert_eq!(value["validatorNodes"][0], "node-004");
        assert_eq!(value["hash"].as_str().unwrap().len(), 64);
    }

    #[test]
    fn ids_are_uuid_v4() {
        let rng = NullRandom::constant(0.5);
        let a = new_transaction_id(&rng);
        let b = new_transaction_id(&rng);
        assert_ne!(a, b);
        let parsed = uuid::Uuid::parse_str(a.as_str()).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }
}
