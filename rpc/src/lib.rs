//! JSON-over-HTTP server for the Aegis node.
//!
//! Provides endpoints for:
//! - Network status and validator node details
//! - Blockchain info, block and transaction lookups
//! - Security transaction submission and event validation
//! - Chain verification
//! - Prometheus metrics

pub mod error;
pub mod handlers;
pub mod server;

pub use error::RpcError;
pub use handlers::RpcState;
pub use server::RpcServer;
