//! SessionReaper - Background sweep that drops idle chat sessions.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `interval` | 1h | Time between sweeps |
//!
//! The idle threshold itself belongs to the orchestrator.
//!
//! ## Graceful Shutdown
//!
//! The loop exits as soon as the shutdown channel flips to `true`.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;
use tracing::{debug, warn};

use super::orchestrator::ChatOrchestrator;

/// Periodically reaps idle sessions.
pub struct SessionReaper {
    orchestrator: Arc<ChatOrchestrator>,
    interval: Duration,
}

impl SessionReaper {
    pub fn new(orchestrator: Arc<ChatOrchestrator>, interval: Duration) -> Self {
        Self {
            orchestrator,
            interval,
        }
    }

    /// Run the sweep loop until shutdown signal is received.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.interval);
        // First tick completes immediately.
        interval.tick().await;

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        debug!("Session reaper stopping");
                        return;
                    }
                }

                _ = interval.tick() => {
                    self.sweep().await;
                }
            }
        }
    }

    /// Run exactly one sweep. Returns the number of sessions removed.
    pub async fn sweep(&self) -> usize {
        match self.orchestrator.reap_idle_sessions().await {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "Idle session sweep failed");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockChatGateway;
    use crate::adapters::storage::{InMemoryProductCatalog, InMemorySessionStore};
    use crate::application::chat::ChatOrchestratorConfig;
    use crate::domain::foundation::SessionId;
    use crate::ports::{GatewayError, SessionStore};
    use serde_json::Map;

    fn orchestrator(store: Arc<InMemorySessionStore>, idle: Duration) -> Arc<ChatOrchestrator> {
        Arc::new(ChatOrchestrator::with_config(
            store,
            Arc::new(MockChatGateway::failing(GatewayError::NotConfigured)),
            Arc::new(InMemoryProductCatalog::default()),
            ChatOrchestratorConfig::default().with_idle_timeout(idle),
        ))
    }

    #[tokio::test]
    async fn run_sweeps_until_shutdown() {
        let store = Arc::new(InMemorySessionStore::new());
        let orchestrator = orchestrator(store.clone(), Duration::ZERO);
        orchestrator
            .initialize(SessionId::new("idle").unwrap(), Map::new(), None)
            .await
            .unwrap();

        let reaper = SessionReaper::new(orchestrator, Duration::from_millis(10));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move { reaper.run(shutdown_rx).await });

        tokio::time::sleep(Duration::from_millis(60)).await;
        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();

        assert_eq!(store.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn run_stops_when_sender_is_dropped() {
        let store = Arc::new(InMemorySessionStore::new());
        let reaper = SessionReaper::new(
            orchestrator(store, Duration::from_secs(3600)),
            Duration::from_secs(3600),
        );
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move { reaper.run(shutdown_rx).await });

        drop(shutdown_tx);

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("reaper did not stop")
            .unwrap();
    }

    #[tokio::test]
    async fn sweep_keeps_active_sessions() {
        let store = Arc::new(InMemorySessionStore::new());
        let orchestrator = orchestrator(store.clone(), Duration::from_secs(3600));
        orchestrator
            .initialize(SessionId::new("fresh").unwrap(), Map::new(), None)
            .await
            .unwrap();

        let reaper = SessionReaper::new(orchestrator, Duration::from_secs(3600));

        assert_eq!(reaper.sweep().await, 0);
        assert_eq!(store.len().await.unwrap(), 1);
    }
}
