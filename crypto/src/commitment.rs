//! Hash commitment over a mined block's core fields.
//!
//! This is a placeholder for real block signing: anyone can recompute it,
//! so it only detects accidental corruption of the committed fields.

use aegis_types::{BlockHash, BlockSignature, Timestamp};

use crate::hash::sha256_multi;

/// Commit to `index ∥ timestamp ∥ previous_hash ∥ hash ∥ nonce`.
pub fn commit_block(
    index: u64,
    timestamp: Timestamp,
    previous_hash: &BlockHash,
    hash: &BlockHash,
    nonce: u64,
) -> BlockSignature {
    let index = index.to_string();
    let timestamp = timestamp.as_millis().to_string();
    let previous = previous_hash.to_hex();
    let hash = hash.to_hex();
    let nonce = nonce.to_string();
    BlockSignature::new(sha256_multi(&[
        index.as_bytes(),
        timestamp.as_bytes(),
        previous.as_bytes(),
        hash.as_bytes(),
        nonce.as_bytes(),
    ]))
}
