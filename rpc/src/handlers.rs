//! RPC request handlers.
//!
//! One handler per network operation. Bodies and responses are JSON with
//! camelCase field names, matching the serialized network types.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use aegis_consensus::ConsensusResult;
use aegis_node::tracing_spans::rpc_span;
use aegis_node::{BlockchainInfo, NetworkStatus, SecurityNetwork, TransactionRecord};
use aegis_transactions::TransactionDraft;
use aegis_types::{NodeId, TransactionId};

use crate::error::RpcError;

/// Shared state handed to every handler.
pub struct RpcState {
    pub network: Arc<SecurityNetwork>,
    pub metrics_enabled: bool,
}

pub type SharedState = State<Arc<RpcState>>;

// ── Transaction ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTransactionResponse {
    pub transaction_id: TransactionId,
}

// ── Chain ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyChainResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ── Handlers ─────────────────────────────────────────────────────────────

pub async fn get_network_status(State(state): SharedState) -> Json<NetworkStatus> {
    Json(
        state
            .network
            .get_network_status()
            .instrument(rpc_span("get_network_status"))
            .await,
    )
}

pub async fn get_all_nodes(State(state): SharedState) -> impl IntoResponse {
    Json(state.network.get_all_nodes().instrument(rpc_span("get_all_nodes")).await)
}

pub async fn get_node_details(
    State(state): SharedState,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, RpcError> {
    let node = state
        .network
        .get_node_details(&NodeId::new(&id))
        .instrument(rpc_span("get_node_details"))
        .await
        .ok_or(RpcError::NodeNotFound(id))?;
    Ok(Json(node))
}

pub async fn get_nodes_by_region(State(state): SharedState) -> impl IntoResponse {
    let groups: BTreeMap<_, _> = state
        .network
        .get_nodes_by_region()
        .instrument(rpc_span("get_nodes_by_region"))
        .await;
    Json(groups)
}

pub async fn get_blockchain_info(State(state): SharedState) -> Json<BlockchainInfo> {
    Json(
        state
            .network
            .get_blockchain_info()
            .instrument(rpc_span("get_blockchain_info"))
            .await,
    )
}

pub async fn get_block(
    State(state): SharedState,
    Path(index): Path<String>,
) -> Result<impl IntoResponse, RpcError> {
    let parsed: u64 = index
        .parse()
        .map_err(|_| RpcError::InvalidRequest(format!("block index must be a non-negative integer: {index}")))?;
    let block = state
        .network
        .get_block(parsed)
        .instrument(rpc_span("get_block"))
        .await
        .ok_or(RpcError::BlockNotFound(index))?;
    Ok(Json(block))
}

pub async fn get_transaction(
    State(state): SharedState,
    Path(id): Path<String>,
) -> Result<Json<TransactionRecord>, RpcError> {
    let record = state
        .network
        .get_transaction(&TransactionId::new(&id))
        .instrument(rpc_span("get_transaction"))
        .await
        .ok_or(RpcError::TransactionNotFound(id))?;
    Ok(Json(record))
}

pub async fn submit_security_transaction(
    State(state): SharedState,
    body: Result<Json<TransactionDraft>, JsonRejection>,
) -> Result<Json<SubmitTransactionResponse>, RpcError> {
    let Json(draft) = body.map_err(|e| RpcError::InvalidRequest(e.body_text()))?;
    let transaction_id = state
        .network
        .submit_draft(draft)
        .instrument(rpc_span("submit_security_transaction"))
        .await?;
    Ok(Json(SubmitTransactionResponse { transaction_id }))
}

/// The whole request body is the event payload.
pub async fn validate_security_event(
    State(state): SharedState,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<ConsensusResult>, RpcError> {
    let Json(payload) = body.map_err(|e| RpcError::InvalidRequest(e.body_text()))?;
    let result = state
        .network
        .validate_security_event(payload)
        .instrument(rpc_span("validate_security_event"))
        .await?;
    Ok(Json(result))
}

pub async fn verify_chain(State(state): SharedState) -> Json<VerifyChainResponse> {
    let outcome = state.network.verify_chain().instrument(rpc_span("verify_chain")).await;
    Json(VerifyChainResponse {
        valid: outcome.is_ok(),
        error: outcome.err().map(|e| e.to_string()),
    })
}

/// Prometheus text exposition.
pub async fn metrics(State(state): SharedState) -> Result<impl IntoResponse, RpcError> {
    if !state.metrics_enabled {
        return Err(RpcError::MetricsDisabled);
    }
    let network = &state.network;
    network.metrics().pending_transactions.set(network.pending_count() as i64);
    let body = network.metrics().encode_text()?;
    Ok(([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}
