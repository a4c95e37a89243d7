//! The recurring network tick.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::network::{CycleOutcome, SecurityNetwork};
use crate::NodeError;

/// Drives a [`SecurityNetwork`]: every interval it jitters node health and
/// then runs one consensus cycle.
pub struct NetworkMonitor {
    network: Arc<SecurityNetwork>,
    interval: Duration,
}

impl NetworkMonitor {
    pub fn new(network: Arc<SecurityNetwork>, interval: Duration) -> Self {
        Self { network, interval }
    }

    /// One monitor tick.
    pub async fn tick(&self) -> Result<CycleOutcome, NodeError> {
        self.network.tick_once().await;
        self.network.run_consensus_cycle().await
    }

    /// Run ticks until `shutdown_rx` fires or the network starts stopping.
    /// The first tick happens one full interval after spawning.
    pub fn spawn(self, mut shutdown_rx: broadcast::Receiver<()>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + self.interval, self.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.recv() => {
                        tracing::info!("network monitor shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        if self.network.is_stopping() {
                            tracing::info!("network stopping, monitor exits");
                            break;
                        }
                        match self.tick().await {
                            Ok(CycleOutcome::Processed(report)) => tracing::debug!(
                                drained = report.drained,
                                validated = report.validated,
                                rejected = report.rejected,
                                deferred = report.deferred,
                                "monitor tick"
                            ),
                            Ok(_) => {}
                            Err(e) => tracing::error!(error = %e, "consensus cycle failed"),
                        }
                    }
                }
            }
        })
    }
}
