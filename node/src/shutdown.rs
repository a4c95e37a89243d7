//! Process-wide stop signal.
//!
//! The monitor loop and the RPC server each hold a receiver from
//! [`ShutdownController::subscribe`]. The controller fires once, either on
//! an OS signal or when [`AegisNode::stop`](crate::AegisNode::stop) asks it to.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::signal;
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct ShutdownController {
    notify: broadcast::Sender<()>,
    fired: Arc<AtomicBool>,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (notify, _) = broadcast::channel(1);
        Self {
            notify,
            fired: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.notify.subscribe()
    }

    /// Notify every subscriber. Only the first call sends.
    pub fn shutdown(&self) {
        if self.fired.swap(true, Ordering::SeqCst) {
            return;
        }
        let receivers = self.notify.send(()).unwrap_or(0);
        tracing::debug!(receivers, "shutdown broadcast");
    }

    pub fn is_shutting_down(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Block until SIGINT or SIGTERM (SIGINT only off unix), then fire.
    pub async fn wait_for_signal(&self) {
        let name = tokio::select! {
            _ = signal::ctrl_c() => "SIGINT",
            _ = sigterm() => "SIGTERM",
        };
        tracing::info!(signal = name, "stop requested");
        self.shutdown();
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
async fn sigterm() {
    use signal::unix::{signal as unix_signal, SignalKind};

    match unix_signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            tracing::warn!(error = %e, "SIGTERM handler unavailable, listening for SIGINT only");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn sigterm() {
    std::future::pending::<()>().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_clone_reaches_every_receiver() {
        let controller = ShutdownController::new();
        let mut monitor = controller.subscribe();
        let mut rpc = controller.clone().subscribe();
        assert!(!controller.is_shutting_down());

        controller.clone().shutdown();

        assert!(monitor.recv().await.is_ok());
        assert!(rpc.recv().await.is_ok());
        assert!(controller.is_shutting_down());
    }

    #[tokio::test]
    async fn fires_only_once() {
        let controller = ShutdownController::new();
        let mut rx = controller.subscribe();
        controller.shutdown();
        controller.shutdown();

        assert!(rx.recv().await.is_ok());
        assert!(matches!(rx.try_recv(), Err(broadcast::error::TryRecvError::Empty)));
    }

    #[test]
    fn shutdown_without_subscribers_is_harmless() {
        let controller = ShutdownController::default();
        controller.shutdown();
        assert!(controller.is_shutting_down());
    }
}
