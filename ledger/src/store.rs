//! The in-memory chain.

use aegis_transactions::SecurityTransaction;
use aegis_types::{Timestamp, TransactionId};
use aegis_work::validate_work;

use crate::block::{BlockCandidate, SecurityBlock};
use crate::genesis::genesis_block;
use crate::LedgerError;

/// Owns the chain. Block `i` sits at position `i`.
#[derive(Debug)]
pub struct LedgerStore {
    blocks: Vec<SecurityBlock>,
    difficulty: u32,
    total_transactions: usize,
}

impl LedgerStore {
    /// A chain holding only the genesis block.
    pub fn new(genesis_timestamp: Timestamp, difficulty: u32) -> Result<Self, LedgerError> {
        let genesis = genesis_block(genesis_timestamp)?;
        tracing::info!(hash = %genesis.hash, difficulty, "ledger seeded with genesis block");
        Ok(Self {
            blocks: vec![genesis],
            difficulty,
            total_transactions: 0,
        })
    }

    /// Latest block. The chain is never empty.
    pub fn tip(&self) -> &SecurityBlock {
        &self.blocks[self.blocks.len() - 1]
    }

    /// Number of blocks, genesis included.
    pub fn height(&self) -> usize {
        self.blocks.len()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Transactions across all blocks.
    pub fn total_transactions(&self) -> usize {
        self.total_transactions
    }

    pub fn get_block(&self, index: u64) -> Option<&SecurityBlock> {
        usize::try_from(index).ok().and_then(|i| self.blocks.get(i))
    }

    pub fn blocks(&self) -> &[SecurityBlock] {
        &self.blocks
    }

    /// A candidate block extending the current tip.
    pub fn next_candidate(
        &self,
        timestamp: Timestamp,
        data: Vec<SecurityTransaction>,
        validator: String,
    ) -> BlockCandidate {
        let tip = self.tip();
        BlockCandidate::new(tip.index, tip.hash, timestamp, data, validator)
    }

    /// Append a mined block after checking it extends the tip and is
    /// internally consistent.
    pub fn append(&mut self, block: SecurityBlock) -> Result<(), LedgerError> {
        let tip = self.tip();
        if block.index != tip.index + 1 {
            return Err(LedgerError::IndexMismatch {
                tip: tip.index,
                actual: block.index,
            });
        }
        if block.previous_hash != tip.hash {
            return Err(LedgerError::PreviousHashMismatch {
                index: block.index,
                expected: tip.hash.to_hex(),
                actual: block.previous_hash.to_hex(),
            });
        }
        check_block(&block, self.difficulty)?;

        self.total_transactions += block.transaction_count();
        tracing::info!(
            index = block.index,
            hash = %block.hash,
            txs = block.transaction_count(),
            validator = %block.validator,
            "block appended"
        );
        self.blocks.push(block);
        Ok(())
    }

    /// Check every link, hash, Merkle root, signature and work target.
    pub fn verify_chain(&self) -> Result<(), LedgerError> {
        for (position, block) in self.blocks.iter().enumerate() {
            if block.index != position as u64 {
                return Err(LedgerError::IndexMismatch {
                    tip: position.saturating_sub(1) as u64,
                    actual: block.index,
                });
            }
            if block.is_genesis() {
                if block.compute_hash()? != block.hash {
                    return Err(LedgerError::HashMismatch { index: 0 });
                }
                continue;
            }
            let previous = &self.blocks[position - 1];
            if block.previous_hash != previous.hash {
                return Err(LedgerError::PreviousHashMismatch {
                    index: block.index,
                    expected: previous.hash.to_hex(),
                    actual: block.previous_hash.to_hex(),
                });
            }
            check_block(block, self.difficulty)?;
        }
        Ok(())
    }

    /// Find a transaction and the index of the block holding it.
    pub fn find_transaction(&self, id: &TransactionId) -> Option<(u64, &SecurityTransaction)> {
        self.blocks
            .iter()
            .rev()
            .find_map(|b| b.data.iter().find(|tx| &tx.id == id).map(|tx| (b.index, tx)))
    }
}

fn check_block(block: &SecurityBlock, difficulty: u32) -> Result<(), LedgerError> {
    if block.compute_hash()? != block.hash {
        return Err(LedgerError::HashMismatch { index: block.index });
    }
    validate_work(&block.hash, difficulty).map_err(|source| LedgerError::InsufficientWork {
        index: block.index,
        source,
    })?;
    if block.compute_merkle_root() != block.merkle_root {
        return Err(LedgerError::MerkleMismatch { index: block.index });
    }
    if block.compute_signature() != block.signature {
        return Err(LedgerError::SignatureMismatch { index: block.index });
    }
    Ok(())
}
