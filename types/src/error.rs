//! Top-level error type shared across crates.

use thiserror::Error;

/// Common error type for the Aegis ledger.
#[derive(Debug, Error)]
pub enum AegisError {
    #[error("invalid digest: {0}")]
    InvalidDigest(String),

    #[error("unknown validator type: {0}")]
    UnknownValidatorType(String),

    #[error("unknown node status: {0}")]
    UnknownNodeStatus(String),

    #[error("unknown transaction type: {0}")]
    UnknownTransactionType(String),

    #[error("unknown priority: {0}")]
    UnknownPriority(String),

    #[error("invalid network parameters: {0}")]
    InvalidParams(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("{0}")]
    Other(String),
}
