//! FIFO buffer of pending transactions.
//!
//! A drained transaction stays in the pool as in flight until the consensus
//! cycle either settles it with [`TransactionPool::complete`] or hands it
//! back with [`TransactionPool::requeue_back`]. Lookups and the pending
//! count cover both, so a transaction is visible for its whole pending life.
//!
//! Queue and in-flight set share one lock: no transaction is lost or handed
//! out twice.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use aegis_random::RandomSource;
use aegis_types::{Clock, TransactionId};

use crate::transaction::{new_transaction_id, SecurityTransaction, TransactionDraft};
use crate::validation::validate_draft;
use crate::TransactionError;

#[derive(Debug, Default)]
struct PoolState {
    queue: VecDeque<SecurityTransaction>,
    in_flight: HashMap<TransactionId, SecurityTransaction>,
}

/// Pending transactions, oldest first.
#[derive(Debug, Default)]
pub struct TransactionPool {
    state: Mutex<PoolState>,
}

impl TransactionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `draft`, assign id, hash and timestamp, and append it as
    /// `pending`.
    pub fn submit(
        &self,
        draft: TransactionDraft,
        rng: &dyn RandomSource,
        clock: &dyn Clock,
    ) -> Result<TransactionId, TransactionError> {
        validate_draft(&draft)?;
        let tx = SecurityTransaction::from_draft(draft, new_transaction_id(rng), clock.now())?;
        let id = tx.id.clone();
        tracing::debug!(tx = %id, tx_type = %tx.tx_type, priority = tx.priority.as_str(), "transaction queued");
        self.lock().queue.push_back(tx);
        Ok(id)
    }

    /// Take up to `max` transactions from the front of the queue and mark
    /// them in flight.
    pub fn drain_batch(&self, max: usize) -> Vec<SecurityTransaction> {
        let mut state = self.lock();
        let take = max.min(state.queue.len());
        let batch: Vec<_> = state.queue.drain(..take).collect();
        for tx in &batch {
            state.in_flight.insert(tx.id.clone(), tx.clone());
        }
        batch
    }

    /// Drop a decided transaction from the in-flight set.
    pub fn complete(&self, id: &TransactionId) {
        self.lock().in_flight.remove(id);
    }

    /// Return undecided transactions to the back of the queue, behind
    /// anything submitted since they were drained.
    pub fn requeue_back(&self, txs: Vec<SecurityTransaction>) {
        if txs.is_empty() {
            return;
        }
        let mut state = self.lock();
        for tx in txs {
            state.in_flight.remove(&tx.id);
            state.queue.push_back(tx);
        }
    }

    /// Copy of a queued or in-flight transaction.
    pub fn get(&self, id: &TransactionId) -> Option<SecurityTransaction> {
        let state = self.lock();
        state
            .queue
            .iter()
            .find(|tx| &tx.id == id)
            .or_else(|| state.in_flight.get(id))
            .cloned()
    }

    /// Pending transactions, queued and in flight.
    pub fn len(&self) -> usize {
        let state = self.lock();
        state.queue.len() + state.in_flight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Transactions waiting to be drained.
    pub fn queued(&self) -> usize {
        self.lock().queue.len()
    }

    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
