use aegis_types::{TransactionId, TransactionStatus};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("transaction {id} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        id: TransactionId,
        from: TransactionStatus,
        to: TransactionStatus,
    },

    #[error("transaction source must not be empty")]
    EmptySource,

    #[error("payload is {size} bytes, limit is {limit}")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for TransactionError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
