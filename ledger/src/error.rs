use thiserror::Error;

use aegis_work::WorkError;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("block {actual} does not follow tip {tip}")]
    IndexMismatch { tip: u64, actual: u64 },

    #[error("block {index} links to {actual}, tip hash is {expected}")]
    PreviousHashMismatch {
        index: u64,
        expected: String,
        actual: String,
    },

    #[error("block {index} stored hash does not match its contents")]
    HashMismatch { index: u64 },

    #[error("block {index} merkle root does not match its transactions")]
    MerkleMismatch { index: u64 },

    #[error("block {index} signature does not match its fields")]
    SignatureMismatch { index: u64 },

    #[error("block {index} fails proof-of-work: {source}")]
    InsufficientWork {
        index: u64,
        #[source]
        source: WorkError,
    },

    #[error("block serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for LedgerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
