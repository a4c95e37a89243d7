//! Merkle root over an ordered batch of transaction hashes.
//!
//! Levels are built bottom-up by hashing adjacent pairs. A trailing odd
//! element is paired with itself. Pair hashes cover the hex renderings of
//! both children, left first, so the root depends on transaction order.

use aegis_types::{MerkleRoot, TxHash};

use crate::hash::sha256_multi;

/// Compute the Merkle root of `hashes`.
///
/// An empty batch yields [`MerkleRoot::ZERO`]; a single hash is its own root.
pub fn merkle_root(hashes: &[TxHash]) -> MerkleRoot {
    let Some(first) = hashes.first() else {
        return MerkleRoot::ZERO;
    };
    if hashes.len() == 1 {
        return MerkleRoot::from(*first);
    }

    let mut level: Vec<[u8; 32]> = hashes.iter().map(|h| *h.as_bytes()).collect();
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| {
                let left = pair[0];
                let right = pair.get(1).copied().unwrap_or(left);
                hash_pair(&left, &right)
            })
            .collect();
    }
    MerkleRoot::new(level[0])
}

fn hash_pair(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let left_hex = TxHash::new(*left).to_hex();
    let right_hex = TxHash::new(*right).to_hex();
    sha256_multi(&[left_hex.as_bytes(), right_hex.as_bytes()])
}
