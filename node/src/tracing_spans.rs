//! Pre-built [`tracing::Span`] constructors for common Aegis node operations.
//!
//! Using consistent span names and field sets across the codebase makes it
//! easy to filter, search, and correlate traces.

use tracing::{info_span, Span};

/// Span covering one consensus cycle: drain, vote, and mine.
pub fn consensus_cycle_span(pending: usize, active_nodes: usize) -> Span {
    info_span!("consensus_cycle", pending = %pending, active_nodes = %active_nodes)
}

/// Span covering the voting round of a single transaction.
pub fn vote_round_span(tx_id: &str, tx_type: &str, validators: usize) -> Span {
    info_span!("vote_round", tx = %tx_id, tx_type = %tx_type, validators = %validators)
}

/// Span covering proposer selection, proof-of-work and append of one block.
pub fn block_mine_span(index: u64, txs: usize) -> Span {
    info_span!("block_mine", index = %index, txs = %txs)
}

/// Span covering a single request handled by the RPC server.
pub fn rpc_span(action: &str) -> Span {
    info_span!("rpc", action = %action)
}
