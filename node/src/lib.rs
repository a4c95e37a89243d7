//! Aegis node: runs the simulated security network.
//!
//! The node is the central coordinator that:
//! - Initializes the validator registry and the genesis ledger
//! - Accepts security-event transactions into the pool
//! - Runs consensus cycles on a recurring tick, and immediately for
//!   critical transactions
//! - Mines validated transactions into proof-of-work blocks
//! - Publishes events and Prometheus metrics for observers

pub mod block_miner;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod metrics;
pub mod network;
pub mod network_monitor;
pub mod node;
pub mod shutdown;
pub mod tracing_spans;

pub use block_miner::BlockMiner;
pub use config::NodeConfig;
pub use error::NodeError;
pub use events::{EventBus, NetworkEvent};
pub use logging::{init_logging, LogFormat};
pub use metrics::NodeMetrics;
pub use network::{
    BlockchainInfo, CycleOutcome, CycleReport, NetworkStatus, SecurityNetwork, TransactionRecord,
    SECURITY_SCANNER_SOURCE,
};
pub use network_monitor::NetworkMonitor;
pub use node::AegisNode;
pub use shutdown::ShutdownController;
