//! SHA-256 hashing for blocks and transactions.

use aegis_types::TxHash;
use sha2::{Digest, Sha256};

/// Compute a SHA-256 digest of arbitrary data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn sha256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Hash the serialized immutable fields of a transaction to produce its `TxHash`.
pub fn hash_transaction(content_bytes: &[u8]) -> TxHash {
    TxHash::new(sha256(content_bytes))
}
