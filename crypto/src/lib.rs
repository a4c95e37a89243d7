//! Hashing primitives for the Aegis simulated ledger.
//!
//! - **SHA-256** for transaction content hashes, block hashes and Merkle pairs
//! - **Merkle root** over an ordered batch of transaction hashes
//! - **Block commitment**: a hash over a block's core fields standing in for a
//!   real signature. It proves nothing about who produced the block.

pub mod commitment;
pub mod hash;
pub mod merkle;

pub use commitment::commit_block;
pub use hash::{hash_transaction, sha256, sha256_multi};
pub use merkle::merkle_root;
