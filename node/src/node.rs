//! Node lifecycle: owns the network and its background tasks.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::NodeConfig;
use crate::network::SecurityNetwork;
use crate::network_monitor::NetworkMonitor;
use crate::shutdown::ShutdownController;
use crate::NodeError;

/// How long `stop` waits for background tasks to finish.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// A running Aegis node.
pub struct AegisNode {
    config: NodeConfig,
    network: Arc<SecurityNetwork>,
    shutdown: ShutdownController,
    task_handles: Vec<JoinHandle<()>>,
}

impl AegisNode {
    /// Build the network described by `config`. Nothing runs until
    /// [`start`](Self::start).
    pub fn new(config: NodeConfig) -> Result<Self, NodeError> {
        let network = Arc::new(SecurityNetwork::from_config(&config)?);
        Ok(Self::with_network(config, network))
    }

    /// Wrap an already built network.
    pub fn with_network(config: NodeConfig, network: Arc<SecurityNetwork>) -> Self {
        Self {
            config,
            network,
            shutdown: ShutdownController::new(),
            task_handles: Vec::new(),
        }
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn network(&self) -> &Arc<SecurityNetwork> {
        &self.network
    }

    /// Shared with servers that should stop together with the node.
    pub fn shutdown_controller(&self) -> &ShutdownController {
        &self.shutdown
    }

    pub fn is_running(&self) -> bool {
        !self.task_handles.is_empty()
    }

    /// Spawn the network monitor.
    pub fn start(&mut self) -> Result<(), NodeError> {
        if self.is_running() {
            return Err(NodeError::AlreadyRunning);
        }
        let monitor = NetworkMonitor::new(self.network.clone(), self.config.tick_interval());
        self.task_handles.push(monitor.spawn(self.shutdown.subscribe()));
        tracing::info!(
            nodes = self.config.node_count,
            tick_secs = self.config.tick_interval_secs,
            difficulty = self.config.difficulty,
            "Aegis node started"
        );
        Ok(())
    }

    /// Have `stop` wait for `handle` as well.
    pub fn track(&mut self, handle: JoinHandle<()>) {
        self.task_handles.push(handle);
    }

    /// Stop ticking, signal every task and wait for them. A consensus cycle
    /// already in flight finishes first.
    pub async fn stop(&mut self) -> Result<(), NodeError> {
        tracing::info!("Aegis node stopping");
        self.network.begin_shutdown();
        self.shutdown.shutdown();

        let handles: Vec<_> = self.task_handles.drain(..).collect();
        let wait_all = async {
            for handle in handles {
                if let Err(e) = handle.await {
                    tracing::warn!(error = %e, "background task ended abnormally");
                }
            }
        };

        if tokio::time::timeout(SHUTDOWN_TIMEOUT, wait_all).await.is_err() {
            tracing::warn!("shutdown timeout ({:?}), some tasks may still be running", SHUTDOWN_TIMEOUT);
            return Err(NodeError::ShutdownTimeout);
        }

        tracing::info!("Aegis node stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> NodeConfig {
        NodeConfig {
            node_count: 12,
            difficulty: 1,
            vote_delay_min_ms: 0,
            vote_delay_max_ms: 0,
            rng_seed: Some(7),
            ..NodeConfig::default()
        }
    }

    #[tokio::test]
    async fn start_and_stop() {
        let mut node = AegisNode::new(config()).unwrap();
        assert!(!node.is_running());
        node.start().unwrap();
        assert!(node.is_running());
        assert!(matches!(node.start(), Err(NodeError::AlreadyRunning)));

        node.stop().await.unwrap();
        assert!(!node.is_running());
        assert!(node.network().is_stopping());
    }

    #[tokio::test]
    async fn stop_waits_for_tracked_tasks() {
        let mut node = AegisNode::new(config()).unwrap();
        let mut rx = node.shutdown_controller().subscribe();
        let (done_tx, done_rx) = tokio::sync::oneshot::channel();
        node.track(tokio::spawn(async move {
            let _ = rx.recv().await;
            let _ = done_tx.send(());
        }));
        node.stop().await.unwrap();
        assert!(done_rx.await.is_ok());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let bad = NodeConfig {
            batch_size: 0,
            ..config()
        };
        assert!(AegisNode::new(bad).is_err());
    }

    #[tokio::test]
    async fn seeded_nodes_are_reproducible() {
        let a = AegisNode::new(config()).unwrap();
        let b = AegisNode::new(config()).unwrap();
        let (na, nb) = (a.network().get_all_nodes().await, b.network().get_all_nodes().await);
        assert_eq!(na.len(), 12);
        for (x, y) in na.iter().zip(&nb) {
            assert_eq!(x.address, y.address);
            assert_eq!(x.reputation(), y.reputation());
            assert_eq!(x.status, y.status);
        }
    }
}
