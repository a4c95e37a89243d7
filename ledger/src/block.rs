//! Security blocks and the unmined candidates they are sealed from.

use serde::{Deserialize, Serialize};

use aegis_crypto::{commit_block, merkle_root};
use aegis_transactions::SecurityTransaction;
use aegis_types::{BlockHash, BlockSignature, MerkleRoot, Timestamp, TxHash};
use aegis_work::{WorkSolution, WorkTemplate};

use crate::LedgerError;

/// An immutable batch of validated transactions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityBlock {
    pub index: u64,
    pub timestamp: Timestamp,
    pub data: Vec<SecurityTransaction>,
    pub previous_hash: BlockHash,
    pub hash: BlockHash,
    pub nonce: u64,
    pub merkle_root: MerkleRoot,
    /// Id of the proposer credited with this block.
    pub validator: String,
    pub signature: BlockSignature,
}

impl SecurityBlock {
    /// Recompute the block hash from the stored fields.
    pub fn compute_hash(&self) -> Result<BlockHash, LedgerError> {
        let template = work_template(self.index, self.timestamp, &self.data, &self.previous_hash)?;
        Ok(template.hash(self.nonce))
    }

    /// Recompute the signature commitment from the stored fields.
    pub fn compute_signature(&self) -> BlockSignature {
        commit_block(self.index, self.timestamp, &self.previous_hash, &self.hash, self.nonce)
    }

    /// Recompute the Merkle root of the carried transactions.
    pub fn compute_merkle_root(&self) -> MerkleRoot {
        merkle_root(&transaction_hashes(&self.data))
    }

    pub fn transaction_count(&self) -> usize {
        self.data.len()
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }
}

/// Everything a block needs except its nonce, hash and signature.
#[derive(Clone, Debug)]
pub struct BlockCandidate {
    pub index: u64,
    pub timestamp: Timestamp,
    pub data: Vec<SecurityTransaction>,
    pub previous_hash: BlockHash,
    pub merkle_root: MerkleRoot,
    pub validator: String,
}

impl BlockCandidate {
    /// A candidate following a block with `previous_index` and `previous_hash`.
    pub fn new(
        previous_index: u64,
        previous_hash: BlockHash,
        timestamp: Timestamp,
        data: Vec<SecurityTransaction>,
        validator: String,
    ) -> Self {
        let merkle_root = merkle_root(&transaction_hashes(&data));
        Self {
            index: previous_index + 1,
            timestamp,
            data,
            previous_hash,
            merkle_root,
            validator,
        }
    }

    /// Hasher primed with every field the block hash covers except the nonce.
    pub fn work_template(&self) -> Result<WorkTemplate, LedgerError> {
        work_template(self.index, self.timestamp, &self.data, &self.previous_hash)
    }

    /// Finish the block with a work solution and sign it.
    pub fn seal(self, solution: WorkSolution) -> SecurityBlock {
        let signature = commit_block(
            self.index,
            self.timestamp,
            &self.previous_hash,
            &solution.hash,
            solution.nonce,
        );
        SecurityBlock {
            index: self.index,
            timestamp: self.timestamp,
            data: self.data,
            previous_hash: self.previous_hash,
            hash: solution.hash,
            nonce: solution.nonce,
            merkle_root: self.merkle_root,
            validator: self.validator,
            signature,
        }
    }
}

/// Block hash input: `index ∥ timestamp ∥ json(data) ∥ previous_hash`,
/// followed by the nonce when hashing.
pub(crate) fn work_template(
    index: u64,
    timestamp: Timestamp,
    data: &[SecurityTransaction],
    previous_hash: &BlockHash,
) -> Result<WorkTemplate, LedgerError> {
    let mut prefix = Vec::new();
    prefix.extend_from_slice(index.to_string().as_bytes());
    prefix.extend_from_slice(timestamp.as_millis().to_string().as_bytes());
    serde_json::to_writer(&mut prefix, data)?;
    prefix.extend_from_slice(previous_hash.to_hex().as_bytes());
    Ok(WorkTemplate::new(&prefix))
}

fn transaction_hashes(data: &[SecurityTransaction]) -> Vec<TxHash> {
    data.iter().map(|tx| tx.hash).collect()
}
