//! Axum-based RPC server.

use std::sync::Arc;

use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};

use aegis_node::SecurityNetwork;

use crate::error::RpcError;
use crate::handlers::{self, RpcState};

pub struct RpcServer {
    host: String,
    port: u16,
    state: Arc<RpcState>,
}

impl RpcServer {
    pub fn new(host: &str, port: u16, network: Arc<SecurityNetwork>, metrics_enabled: bool) -> Self {
        Self {
            host: host.to_string(),
            port,
            state: Arc::new(RpcState {
                network,
                metrics_enabled,
            }),
        }
    }

    /// Every route, with permissive CORS for browser dashboards.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any);

        Router::new()
            .route("/network-status", get(handlers::get_network_status))
            .route("/nodes", get(handlers::get_all_nodes))
            .route("/nodes/by-region", get(handlers::get_nodes_by_region))
            .route("/nodes/:id", get(handlers::get_node_details))
            .route("/blockchain-info", get(handlers::get_blockchain_info))
            .route("/blocks/:index", get(handlers::get_block))
            .route("/transactions", post(handlers::submit_security_transaction))
            .route("/transactions/:id", get(handlers::get_transaction))
            .route("/validate-security-event", post(handlers::validate_security_event))
            .route("/verify-chain", get(handlers::verify_chain))
            .route("/metrics", get(handlers::metrics))
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// Bind and serve until `shutdown_rx` fires. In-flight requests finish
    /// before this returns.
    pub async fn start(self, mut shutdown_rx: broadcast::Receiver<()>) -> Result<(), RpcError> {
        let app = self.router();
        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| RpcError::Server(format!("failed to bind {addr}: {e}")))?;

        tracing::info!(%addr, "RPC server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                tracing::info!("RPC server shutting down");
            })
            .await
            .map_err(|e| RpcError::Server(e.to_string()))
    }
}
