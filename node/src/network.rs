//! The simulated security network.
//!
//! [`SecurityNetwork`] owns the validator registry, the transaction pool,
//! the ledger and the decision log, and exposes the operations the RPC
//! layer serves. It holds no global state: everything is injected at
//! construction, including the random source and the clock.
//!
//! Locking:
//! - the registry and ledger sit behind `RwLock`s so reads never wait on a
//!   consensus cycle for long;
//! - a whole consensus cycle (drain, vote, mine) runs under `cycle_guard`,
//!   so at most one batch is in flight and blocks are appended one at a time.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{Mutex, RwLock};
use tracing::Instrument;

use aegis_consensus::{ConsensusEngine, ConsensusResult, Selection, ValidatorSelector, REPUTATION_REWARD};
use aegis_ledger::{LedgerStore, SecurityBlock};
use aegis_random::{RandomSource, ThreadRandom};
use aegis_registry::{NodeRegistry, RegistryLayout, RegistrySummary, ValidatorNode};
use aegis_transactions::{SecurityTransaction, TransactionDraft, TransactionPool};
use aegis_types::{
    Clock, NetworkParams, NodeId, NodeStatus, Priority, SystemClock, Timestamp, TransactionId,
    TransactionType,
};

use crate::block_miner::BlockMiner;
use crate::config::NodeConfig;
use crate::events::{EventBus, NetworkEvent};
use crate::metrics::NodeMetrics;
use crate::tracing_spans::{consensus_cycle_span, vote_round_span};
use crate::NodeError;

/// Source recorded on transactions created by [`SecurityNetwork::validate_security_event`].
pub const SECURITY_SCANNER_SOURCE: &str = "security_scanner";

/// Aggregate network snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStatus {
    #[serde(flatten)]
    pub nodes: RegistrySummary,
    /// Blocks in the ledger, genesis included.
    pub total_blocks: usize,
    pub pending_transactions: usize,
    pub last_block_time: Timestamp,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainInfo {
    /// Blocks in the ledger, genesis included.
    pub height: usize,
    pub last_block: SecurityBlock,
    pub difficulty: u32,
    pub pending_transactions: usize,
    pub total_transactions: usize,
}

/// Where a transaction stands, with its decision once it has one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub transaction: SecurityTransaction,
    pub result: Option<ConsensusResult>,
    /// Index of the block holding the transaction, once mined.
    pub block_index: Option<u64>,
}

/// Counts from one consensus cycle that drained a batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub drained: usize,
    pub validated: usize,
    pub rejected: usize,
    pub deferred: usize,
    /// Index of the block mined from the validated transactions.
    pub block_index: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Nothing was pending.
    Idle,
    /// Too few active nodes; the pool was left untouched.
    InsufficientNodes { active: usize },
    Processed(CycleReport),
}

enum Verdict {
    Deferred,
    Validated,
    Rejected,
}

pub struct SecurityNetwork {
    params: NetworkParams,
    validation_wait: Duration,
    registry: RwLock<NodeRegistry>,
    pool: TransactionPool,
    ledger: RwLock<LedgerStore>,
    decisions: RwLock<HashMap<TransactionId, (SecurityTransaction, ConsensusResult)>>,
    selector: ValidatorSelector,
    engine: ConsensusEngine,
    miner: BlockMiner,
    cycle_guard: Mutex<()>,
    events: EventBus,
    metrics: Arc<NodeMetrics>,
    rng: Arc<dyn RandomSource>,
    clock: Arc<dyn Clock>,
    stopping: AtomicBool,
}

impl SecurityNetwork {
    /// A network of `params.node_count` freshly initialized nodes and a
    /// ledger holding only the genesis block.
    pub fn new(
        params: NetworkParams,
        layout: &RegistryLayout,
        validation_wait: Duration,
        rng: Arc<dyn RandomSource>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, NodeError> {
        params.validate()?;
        let registry = NodeRegistry::initialize(params.node_count, layout, rng.as_ref(), clock.as_ref())?;
        Self::with_registry(params, registry, validation_wait, rng, clock)
    }

    /// Wire a network around a prepared registry.
    pub fn with_registry(
        params: NetworkParams,
        registry: NodeRegistry,
        validation_wait: Duration,
        rng: Arc<dyn RandomSource>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, NodeError> {
        params.validate()?;
        let ledger = LedgerStore::new(clock.now(), params.difficulty)?;
        let selector = ValidatorSelector::new(params.min_validators, params.max_validators)?;
        let engine = ConsensusEngine::new(rng.clone(), params.vote_delay_min_ms, params.vote_delay_max_ms);
        let metrics = Arc::new(NodeMetrics::new()?);
        let miner = BlockMiner::new(params.max_nonce, clock.clone(), metrics.clone());

        metrics.chain_height.set(ledger.height() as i64);
        metrics.active_nodes.set(registry.active_count() as i64);

        Ok(Self {
            params,
            validation_wait,
            registry: RwLock::new(registry),
            pool: TransactionPool::new(),
            ledger: RwLock::new(ledger),
            decisions: RwLock::new(HashMap::new()),
            selector,
            engine,
            miner,
            cycle_guard: Mutex::new(()),
            events: EventBus::new(),
            metrics,
            rng,
            clock,
            stopping: AtomicBool::new(false),
        })
    }

    /// Build from node configuration with the system clock and a seeded or
    /// entropy-backed random source.
    pub fn from_config(config: &NodeConfig) -> Result<Self, NodeError> {
        config.validate()?;
        let rng: Arc<dyn RandomSource> = match config.rng_seed {
            Some(seed) => Arc::new(ThreadRandom::seeded(seed)),
            None => Arc::new(ThreadRandom::new()),
        };
        Self::new(
            config.network_params(),
            &config.layout(),
            config.validation_wait(),
            rng,
            Arc::new(SystemClock),
        )
    }

    pub fn params(&self) -> &NetworkParams {
        &self.params
    }

    pub fn metrics(&self) -> &Arc<NodeMetrics> {
        &self.metrics
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<NetworkEvent> {
        self.events.subscribe()
    }

    // ── Submission ──────────────────────────────────────────────────────

    /// Queue a security event. A `critical` transaction triggers a
    /// consensus cycle before this returns.
    pub async fn submit_security_transaction(
        &self,
        tx_type: TransactionType,
        payload: serde_json::Value,
        source: &str,
        priority: Priority,
    ) -> Result<TransactionId, NodeError> {
        self.submit_draft(TransactionDraft::new(tx_type, payload, source, priority))
            .await
    }

    /// Queue a prepared draft. See [`submit_security_transaction`](Self::submit_security_transaction).
    pub async fn submit_draft(&self, draft: TransactionDraft) -> Result<TransactionId, NodeError> {
        let critical = draft.is_critical();
        let id = self.pool.submit(draft, self.rng.as_ref(), self.clock.as_ref())?;
        self.metrics.transactions_submitted.inc();
        self.metrics.pending_transactions.set(self.pool.len() as i64);
        self.events.emit(NetworkEvent::TransactionSubmitted { id: id.clone() });

        if critical && !self.is_stopping() {
            tracing::info!(tx = %id, "critical transaction, running consensus immediately");
            // The transaction is queued either way; a failed cycle is
            // reported but does not undo the submission.
            if let Err(e) = self.run_consensus_cycle().await {
                tracing::error!(tx = %id, error = %e, "immediate consensus cycle failed");
            }
        }
        Ok(id)
    }

    /// Submit `payload` as a high-priority threat detection and wait up to
    /// the validation window for its decision.
    ///
    /// Returns [`ConsensusResult::unknown`] when no decision arrives in time.
    pub async fn validate_security_event(&self, payload: serde_json::Value) -> Result<ConsensusResult, NodeError> {
        let mut rx = self.events.subscribe();
        let id = self
            .submit_draft(TransactionDraft::new(
                TransactionType::ThreatDetection,
                payload,
                SECURITY_SCANNER_SOURCE,
                Priority::High,
            ))
            .await?;

        let wait_for_decision = async {
            loop {
                match rx.recv().await {
                    Ok(NetworkEvent::TransactionDecided { id: decided, result }) if decided == id => {
                        return Some(result);
                    }
                    Ok(_) | Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => return None,
                }
            }
        };

        if let Ok(Some(result)) = tokio::time::timeout(self.validation_wait, wait_for_decision).await {
            return Ok(result);
        }
        // A lagging receiver may have skipped the event.
        match self.decisions.read().await.get(&id) {
            Some((_, result)) => Ok(result.clone()),
            None => {
                tracing::debug!(tx = %id, "no decision within the validation window");
                Ok(ConsensusResult::unknown())
            }
        }
    }

    // ── Reads ───────────────────────────────────────────────────────────

    pub async fn get_network_status(&self) -> NetworkStatus {
        let nodes = self.registry.read().await.summary();
        let ledger = self.ledger.read().await;
        NetworkStatus {
            nodes,
            total_blocks: ledger.height(),
            pending_transactions: self.pool.len(),
            last_block_time: ledger.tip().timestamp,
        }
    }

    pub async fn get_node_details(&self, id: &NodeId) -> Option<ValidatorNode> {
        self.registry.read().await.get(id).cloned()
    }

    pub async fn get_all_nodes(&self) -> Vec<ValidatorNode> {
        self.registry.read().await.all().to_vec()
    }

    pub async fn get_nodes_by_region(&self) -> BTreeMap<String, Vec<ValidatorNode>> {
        self.registry.read().await.group_by_region()
    }

    pub async fn get_blockchain_info(&self) -> BlockchainInfo {
        let ledger = self.ledger.read().await;
        BlockchainInfo {
            height: ledger.height(),
            last_block: ledger.tip().clone(),
            difficulty: ledger.difficulty(),
            pending_transactions: self.pool.len(),
            total_transactions: ledger.total_transactions(),
        }
    }

    /// Look a transaction up in the pool, then in the decision log.
    pub async fn get_transaction(&self, id: &TransactionId) -> Option<TransactionRecord> {
        if let Some(transaction) = self.pool.get(id) {
            return Some(TransactionRecord {
                transaction,
                result: None,
                block_index: None,
            });
        }
        let (transaction, result) = self.decisions.read().await.get(id).cloned()?;
        let block_index = self.ledger.read().await.find_transaction(id).map(|(index, _)| index);
        Some(TransactionRecord {
            transaction,
            result: Some(result),
            block_index,
        })
    }

    pub async fn get_block(&self, index: u64) -> Option<SecurityBlock> {
        self.ledger.read().await.get_block(index).cloned()
    }

    /// Re-check every block of the ledger.
    pub async fn verify_chain(&self) -> Result<(), NodeError> {
        self.ledger.read().await.verify_chain()?;
        Ok(())
    }

    pub fn pending_count(&self) -> usize {
        self.pool.len()
    }

    // ── Operator hooks ──────────────────────────────────────────────────

    /// Returns `false` for an unknown id.
    pub async fn set_node_status(&self, id: &NodeId, status: NodeStatus) -> bool {
        let mut registry = self.registry.write().await;
        let changed = registry.set_status(id, status);
        self.metrics.active_nodes.set(registry.active_count() as i64);
        changed
    }

    /// Returns `false` for an unknown id.
    pub async fn set_node_scores(&self, id: &NodeId, reputation: f64, security_score: f64) -> bool {
        self.registry.write().await.set_scores(id, reputation, security_score)
    }

    // ── Simulation ──────────────────────────────────────────────────────

    /// One round of simulated node health fluctuation.
    pub async fn tick_once(&self) {
        let mut registry = self.registry.write().await;
        registry.tick(self.rng.as_ref(), self.clock.as_ref());
        self.metrics.active_nodes.set(registry.active_count() as i64);
    }

    /// Decide up to `batch_size` transactions, oldest first, and mine the
    /// validated ones into one block.
    ///
    /// Transactions without enough eligible validators are set aside and
    /// draining continues past them, so they never hold back decidable
    /// ones. At the end of the cycle they go to the back of the pool and
    /// stay pending. Rejected transactions are final.
    pub async fn run_consensus_cycle(&self) -> Result<CycleOutcome, NodeError> {
        let _cycle = self.cycle_guard.lock().await;

        if self.pool.queued() == 0 {
            return Ok(CycleOutcome::Idle);
        }
        let active = self.registry.read().await.active_count();
        if active < self.params.min_active_nodes {
            tracing::warn!(active, required = self.params.min_active_nodes, "too few active nodes, skipping consensus");
            return Ok(CycleOutcome::InsufficientNodes { active });
        }

        let span = consensus_cycle_span(self.pool.queued(), active);
        let result = self.process_batch().instrument(span).await;
        self.metrics.pending_transactions.set(self.pool.len() as i64);
        result.map(CycleOutcome::Processed)
    }

    async fn process_batch(&self) -> Result<CycleReport, NodeError> {
        let mut report = CycleReport::default();
        let mut deferred = Vec::new();
        let mut validated = Vec::new();

        // Deferred transactions are held here rather than in the queue, so
        // each drain only sees transactions not yet handed out this cycle.
        loop {
            let remaining = self.params.batch_size - (report.validated + report.rejected);
            let chunk = self.pool.drain_batch(remaining);
            if chunk.is_empty() {
                break;
            }
            report.drained += chunk.len();

            let mut chunk = chunk.into_iter();
            while let Some(mut tx) = chunk.next() {
                match self.decide(&mut tx).await {
                    Ok(Verdict::Deferred) => deferred.push(tx),
                    Ok(Verdict::Validated) => {
                        report.validated += 1;
                        validated.push(tx);
                    }
                    Ok(Verdict::Rejected) => report.rejected += 1,
                    Err(e) => {
                        deferred.push(tx);
                        deferred.extend(chunk);
                        self.pool.requeue_back(deferred);
                        return Err(e);
                    }
                }
            }
            if report.validated + report.rejected >= self.params.batch_size {
                break;
            }
        }

        report.deferred = deferred.len();
        self.pool.requeue_back(deferred);
        self.metrics.consensus_cycles.inc();

        if !validated.is_empty() {
            let proposers = self.registry.read().await.list_active();
            let block = self.miner.mine(&self.ledger, &proposers, validated).await?;
            tracing::info!(
                index = block.index,
                hash = %block.hash,
                txs = block.transaction_count(),
                validator = %block.validator,
                "block mined"
            );
            self.events.emit(NetworkEvent::BlockMined {
                index: block.index,
                hash: block.hash,
                transactions: block.transaction_count(),
                validator: block.validator.clone(),
            });
            report.block_index = Some(block.index);
        }
        Ok(report)
    }

    /// Select validators for `tx` and run its vote. A decided transaction
    /// is recorded in the decision log and leaves the pool.
    async fn decide(&self, tx: &mut SecurityTransaction) -> Result<Verdict, NodeError> {
        // Re-read each time so rewards from earlier transactions count.
        let active = self.registry.read().await.list_active();
        let validators = match self.selector.select(&active, tx.tx_type) {
            Selection::Selected(validators) => validators,
            Selection::Deferred { eligible } => {
                tracing::debug!(tx = %tx.id, tx_type = %tx.tx_type, eligible, "deferring transaction");
                self.metrics.transactions_deferred.inc();
                self.events.emit(NetworkEvent::TransactionDeferred {
                    id: tx.id.clone(),
                    eligible,
                });
                return Ok(Verdict::Deferred);
            }
        };

        let span = vote_round_span(tx.id.as_str(), tx.tx_type.as_str(), validators.len());
        let decision = self.engine.run_round(&*tx, &validators).instrument(span).await?;

        let verdict = if decision.result.consensus_reached {
            let voters = decision.validators();
            tx.mark_validated(voters.clone())?;
            self.registry.write().await.record_validation(
                &voters,
                REPUTATION_REWARD,
                tx.tx_type == TransactionType::ThreatDetection,
            );
            self.metrics.transactions_validated.inc();
            Verdict::Validated
        } else {
            tx.mark_rejected()?;
            self.metrics.transactions_rejected.inc();
            Verdict::Rejected
        };

        tracing::info!(
            tx = %tx.id,
            status = ?tx.status(),
            confidence = decision.result.confidence,
            threat_level = %decision.result.threat_level,
            "transaction decided"
        );
        self.events.emit(NetworkEvent::TransactionDecided {
            id: tx.id.clone(),
            result: decision.result.clone(),
        });
        // Logged before leaving the pool so lookups always find it.
        self.decisions
            .write()
            .await
            .insert(tx.id.clone(), (tx.clone(), decision.result));
        self.pool.complete(&tx.id);
        Ok(verdict)
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    /// Refuse new ticks and fast-path cycles. A cycle already running
    /// completes.
    pub fn begin_shutdown(&self) {
        self.stopping.store(true, Ordering::SeqCst);
    }

    pub fn is_stopping(&self) -> bool {
        self.stopping.load(Ordering::SeqCst)
    }
}
