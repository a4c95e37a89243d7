//! RPC error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use aegis_node::NodeError;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("block not found: {0}")]
    BlockNotFound(String),

    #[error("transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("metrics are disabled")]
    MetricsDisabled,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("node error: {0}")]
    Node(#[from] NodeError),

    #[error("server error: {0}")]
    Server(String),
}

impl RpcError {
    pub fn status(&self) -> StatusCode {
        match self {
            RpcError::NodeNotFound(_)
            | RpcError::BlockNotFound(_)
            | RpcError::TransactionNotFound(_)
            | RpcError::MetricsDisabled => StatusCode::NOT_FOUND,
            RpcError::InvalidRequest(_) | RpcError::Node(NodeError::Transaction(_)) => StatusCode::BAD_REQUEST,
            RpcError::Node(_) | RpcError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "rpc request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_transactions::TransactionError;

    #[test]
    fn maps_errors_to_status_codes() {
        assert_eq!(RpcError::NodeNotFound("n".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(RpcError::MetricsDisabled.status(), StatusCode::NOT_FOUND);
        assert_eq!(RpcError::InvalidRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            RpcError::Node(NodeError::Transaction(TransactionError::EmptySource)).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RpcError::Node(NodeError::ShutdownTimeout).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
