//! Prometheus metrics for the Aegis node.
//!
//! Exposes counters, gauges, and a histogram covering transaction intake,
//! consensus cycles and block mining.  The [`NodeMetrics`] struct owns a
//! dedicated [`Registry`] that the RPC `/metrics` endpoint encodes into the
//! Prometheus text exposition format.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Encoder, Histogram, HistogramOpts, IntCounter, IntGauge,
    Opts, Registry, TextEncoder,
};

use crate::NodeError;

/// Central collection of all node-level Prometheus metrics.
pub struct NodeMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Transactions accepted into the pool.
    pub transactions_submitted: IntCounter,
    /// Transactions that reached quorum.
    pub transactions_validated: IntCounter,
    /// Transactions that failed quorum.
    pub transactions_rejected: IntCounter,
    /// Deferrals for lack of eligible validators. A transaction deferred
    /// on several cycles counts once per cycle.
    pub transactions_deferred: IntCounter,
    pub blocks_mined: IntCounter,
    /// Consensus cycles that drained at least one transaction.
    pub consensus_cycles: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Blocks in the ledger, genesis included.
    pub chain_height: IntGauge,
    pub pending_transactions: IntGauge,
    pub active_nodes: IntGauge,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Wall time of the proof-of-work search, in milliseconds.
    pub pow_time_ms: Histogram,
}

impl NodeMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Result<Self, NodeError> {
        let registry = Registry::new();

        let transactions_submitted = register_int_counter_with_registry!(
            Opts::new("aegis_transactions_submitted_total", "Transactions accepted into the pool"),
            registry
        )?;
        let transactions_validated = register_int_counter_with_registry!(
            Opts::new("aegis_transactions_validated_total", "Transactions validated by consensus"),
            registry
        )?;
        let transactions_rejected = register_int_counter_with_registry!(
            Opts::new("aegis_transactions_rejected_total", "Transactions rejected by consensus"),
            registry
        )?;
        let transactions_deferred = register_int_counter_with_registry!(
            Opts::new(
                "aegis_transactions_deferred_total",
                "Transactions deferred for lack of eligible validators"
            ),
            registry
        )?;
        let blocks_mined = register_int_counter_with_registry!(
            Opts::new("aegis_blocks_mined_total", "Blocks mined and appended to the ledger"),
            registry
        )?;
        let consensus_cycles = register_int_counter_with_registry!(
            Opts::new("aegis_consensus_cycles_total", "Consensus cycles that processed a batch"),
            registry
        )?;

        let chain_height = register_int_gauge_with_registry!(
            Opts::new("aegis_chain_height", "Blocks in the ledger including genesis"),
            registry
        )?;
        let pending_transactions = register_int_gauge_with_registry!(
            Opts::new("aegis_pending_transactions", "Transactions waiting in the pool"),
            registry
        )?;
        let active_nodes = register_int_gauge_with_registry!(
            Opts::new("aegis_active_nodes", "Validator nodes currently active"),
            registry
        )?;

        // 1 ms to ~16 s.
        let pow_time_ms = register_histogram_with_registry!(
            HistogramOpts::new("aegis_pow_time_ms", "Proof-of-work search time in milliseconds")
                .buckets(prometheus::exponential_buckets(1.0, 2.0, 15)?),
            registry
        )?;

        Ok(Self {
            registry,
            transactions_submitted,
            transactions_validated,
            transactions_rejected,
            transactions_deferred,
            blocks_mined,
            consensus_cycles,
            chain_height,
            pending_transactions,
            active_nodes,
            pow_time_ms,
        })
    }

    /// Encode every metric in the Prometheus text exposition format.
    pub fn encode_text(&self) -> Result<String, NodeError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| NodeError::Task(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_every_metric() {
        let metrics = NodeMetrics::new().unwrap();
        metrics.transactions_submitted.inc();
        metrics.chain_height.set(3);
        metrics.pow_time_ms.observe(12.0);
        let families = metrics.registry.gather();
        assert_eq!(families.len(), 10);
    }

    #[test]
    fn encodes_text_exposition() {
        let metrics = NodeMetrics::new().unwrap();
        metrics.blocks_mined.inc_by(2);
        let text = metrics.encode_text().unwrap();
        assert!(text.contains("aegis_blocks_mined_total 2"));
        assert!(text.contains("# TYPE aegis_pow_time_ms histogram"));
    }

    #[test]
    fn registries_are_independent() {
        let a = NodeMetrics::new().unwrap();
        let b = NodeMetrics::new().unwrap();
        a.consensus_cycles.inc();
        assert_eq!(b.consensus_cycles.get(), 0);
    }
}
