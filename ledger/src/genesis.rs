//! Genesis block creation.

use aegis_types::{BlockHash, MerkleRoot, Timestamp};

use crate::block::{work_template, SecurityBlock};
use crate::LedgerError;

/// Proposer recorded on the genesis block.
pub const GENESIS_PROPOSER: &str = "genesis";

/// Block 0: no transactions, zero previous hash, nonce 0. Seeded directly,
/// so its hash is exempt from the difficulty target.
pub fn genesis_block(timestamp: Timestamp) -> Result<SecurityBlock, LedgerError> {
    let hash = work_template(0, timestamp, &[], &BlockHash::ZERO)?.hash(0);
    let mut block = SecurityBlock {
        index: 0,
        timestamp,
        data: Vec::new(),
        previous_hash: BlockHash::ZERO,
        hash,
        nonce: 0,
        merkle_root: MerkleRoot::ZERO,
        validator: GENESIS_PROPOSER.to_string(),
        signature: Default::default(),
    };
    block.signature = block.compute_signature();
    Ok(block)
}
