//! Seals validated transactions into blocks.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;
use tracing::Instrument;

use aegis_consensus::ProposerSelector;
use aegis_ledger::{LedgerStore, SecurityBlock};
use aegis_registry::ValidatorNode;
use aegis_transactions::SecurityTransaction;
use aegis_types::Clock;
use aegis_work::WorkGenerator;

use crate::metrics::NodeMetrics;
use crate::tracing_spans::block_mine_span;
use crate::NodeError;

/// Builds the next block, runs its proof-of-work off the async runtime and
/// appends it to the ledger.
pub struct BlockMiner {
    generator: WorkGenerator,
    proposer: ProposerSelector,
    clock: Arc<dyn Clock>,
    metrics: Arc<NodeMetrics>,
}

impl BlockMiner {
    pub fn new(max_nonce: Option<u64>, clock: Arc<dyn Clock>, metrics: Arc<NodeMetrics>) -> Self {
        Self {
            generator: WorkGenerator::new(max_nonce),
            proposer: ProposerSelector,
            clock,
            metrics,
        }
    }

    /// Mine one block carrying `transactions`, credited to the strongest
    /// active node in `nodes`, and append it.
    ///
    /// The ledger is only read while the candidate is built and locked for
    /// writing at append time, so readers are not blocked by the search.
    /// Callers must serialize calls; a tip that moves during the search
    /// makes the append fail.
    pub async fn mine(
        &self,
        ledger: &RwLock<LedgerStore>,
        nodes: &[ValidatorNode],
        transactions: Vec<SecurityTransaction>,
    ) -> Result<SecurityBlock, NodeError> {
        let validator = self.proposer.proposer_id(nodes);
        let (candidate, difficulty) = {
            let store = ledger.read().await;
            (
                store.next_candidate(self.clock.now(), transactions, validator),
                store.difficulty(),
            )
        };
        let span = block_mine_span(candidate.index, candidate.data.len());

        async move {
            let template = candidate.work_template()?;
            let generator = self.generator;
            let started = Instant::now();
            let solution = tokio::task::spawn_blocking(move || generator.generate(&template, difficulty))
                .await
                .map_err(|e| NodeError::Task(e.to_string()))??;
            let elapsed = started.elapsed();
            self.metrics.pow_time_ms.observe(elapsed.as_secs_f64() * 1_000.0);
            tracing::debug!(nonce = solution.nonce, elapsed_ms = elapsed.as_millis() as u64, "work found");

            let block = candidate.seal(solution);
            let mut store = ledger.write().await;
            store.append(block.clone())?;
            self.metrics.blocks_mined.inc();
            self.metrics.chain_height.set(store.height() as i64);
            Ok::<_, NodeError>(block)
        }
        .instrument(span)
        .await
    }
}
