//! Shared state for the development server.
//!
//! Tracks the last build outcome and the connected live-reload clients,
//! using parking_lot locks that are never held across an await.

use crate::dev::DevEvent;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Events buffered per client before it is considered stalled.
const CLIENT_BUFFER: usize = 100;

/// Build status tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStatus {
    /// No build has been performed yet
    NotStarted,
    /// Build is currently in progress
    InProgress { started_at: Instant },
    /// Build completed; warnings are non-fatal in development
    Success { duration_ms: u64, warnings: usize },
    /// Build failed with error
    Failed { error: String },
}

impl BuildStatus {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, BuildStatus::InProgress { .. })
    }

    /// Get error message if failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            BuildStatus::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// Live-reload clients, keyed by connection id.
pub type ClientRegistry = Arc<RwLock<HashMap<usize, mpsc::Sender<String>>>>;

/// Shared development server state.
pub struct DevServerState {
    status: RwLock<BuildStatus>,
    clients: ClientRegistry,
    next_client_id: RwLock<usize>,
    /// Directory served over HTTP (the staging directory)
    out_dir: PathBuf,
}

impl DevServerState {
    pub fn new(out_dir: PathBuf) -> Self {
        Self {
            status: RwLock::new(BuildStatus::NotStarted),
            clients: Arc::new(RwLock::new(HashMap::new())),
            next_client_id: RwLock::new(0),
            out_dir,
        }
    }

    pub fn start_build(&self) {
        *self.status.write() = BuildStatus::InProgress {
            started_at: Instant::now(),
        };
    }

    pub fn complete_build(&self, duration_ms: u64, warnings: usize) {
        *self.status.write() = BuildStatus::Success {
            duration_ms,
            warnings,
        };
    }

    pub fn fail_build(&self, error: String) {
        *self.status.write() = BuildStatus::Failed { error };
    }

    pub fn status(&self) -> BuildStatus {
        self.status.read().clone()
    }

    /// Register a new SSE client.
    pub fn register_client(&self) -> (usize, mpsc::Receiver<String>) {
        let id = {
            let mut next_id = self.next_client_id.write();
            let id = *next_id;
            *next_id += 1;
            id
        };

        let (tx, rx) = mpsc::channel(CLIENT_BUFFER);
        self.clients.write().insert(id, tx);

        (id, rx)
    }

    pub fn unregister_client(&self, id: usize) {
        self.clients.write().remove(&id);
    }

    /// Send an event to every connected client without waiting.
    ///
    /// Clients that left, or that stopped reading and filled their buffer,
    /// are dropped; a dropped client's stream ends and its page reconnects.
    pub fn broadcast(&self, event: &DevEvent) {
        let json = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(e) => {
                tracing::debug!(error = %e, "Failed to serialize dev event");
                return;
            }
        };

        let clients = self.clients.read().clone();

        let mut failed_ids = Vec::new();
        for (id, tx) in clients {
            match tx.try_send(json.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    tracing::debug!(client = id, "Dropping stalled live-reload client");
                    failed_ids.push(id);
                }
                Err(TrySendError::Closed(_)) => failed_ids.push(id),
            }
        }

        for id in failed_ids {
            self.unregister_client(id);
        }
    }

    /// Drop every client sender so their event streams end.
    ///
    /// Open SSE responses would otherwise keep graceful shutdown waiting.
    pub fn disconnect_all(&self) {
        self.clients.write().clear();
    }

    pub fn client_count(&self) -> usize {
        self.clients.read().len()
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

/// Shared state handle.
pub type SharedState = Arc<DevServerState>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_status_predicates() {
        let status = BuildStatus::InProgress {
            started_at: Instant::now(),
        };
        assert!(status.is_in_progress());
        assert!(status.error().is_none());

        let status = BuildStatus::Failed {
            error: "Test error".to_string(),
        };
        assert!(!status.is_in_progress());
        assert_eq!(status.error(), Some("Test error"));
    }

    #[test]
    fn test_build_lifecycle() {
        let state = DevServerState::new(PathBuf::from("_build/_dev"));
        assert_eq!(state.status(), BuildStatus::NotStarted);

        state.start_build();
        assert!(state.status().is_in_progress());

        state.complete_build(150, 2);
        assert_eq!(
            state.status(),
            BuildStatus::Success {
                duration_ms: 150,
                warnings: 2
            }
        );

        state.fail_build("boom".to_string());
        assert_eq!(state.status().error(), Some("boom"));
        assert_eq!(state.out_dir(), Path::new("_build/_dev"));
    }

    #[tokio::test]
    async fn test_client_registration() {
        let state = Arc::new(DevServerState::new(PathBuf::from("_build/_dev")));

        let (id1, _rx1) = state.register_client();
        let (id2, _rx2) = state.register_client();

        assert_eq!(state.client_count(), 2);
        assert_ne!(id1, id2);

        state.unregister_client(id1);
        assert_eq!(state.client_count(), 1);
    }

    #[tokio::test]
    async fn test_broadcast_prunes_closed_clients() {
        let state = DevServerState::new(PathBuf::from("_build/_dev"));
        let (_id1, mut rx1) = state.register_client();
        let (_id2, rx2) = state.register_client();
        drop(rx2);

        state.broadcast(&DevEvent::BuildCompleted { duration_ms: 12 });

        let msg = rx1.recv().await.unwrap();
        assert!(msg.contains("BuildCompleted"));
        assert_eq!(state.client_count(), 1);
    }

    #[tokio::test]
    async fn test_broadcast_does_not_wait_for_stalled_client() {
        let state = DevServerState::new(PathBuf::from("_build/_dev"));
        let (_stalled, _never_read) = state.register_client();
        let (_live, mut live_rx) = state.register_client();

        for i in 0..=CLIENT_BUFFER as u64 {
            state.broadcast(&DevEvent::BuildCompleted { duration_ms: i });
            // keep the live client drained
            assert!(live_rx.recv().await.is_some());
        }

        // The stalled client overflowed and was pruned; the live one stays
        assert_eq!(state.client_count(), 1);
        state.broadcast(&DevEvent::BuildStarted);
        assert!(live_rx.recv().await.unwrap().contains("BuildStarted"));
    }

    #[tokio::test]
    async fn test_disconnect_all_ends_streams() {
        let state = DevServerState::new(PathBuf::from("_build/_dev"));
        let (_id, mut rx) = state.register_client();

        state.disconnect_all();
        assert_eq!(state.client_count(), 0);
        assert!(rx.recv().await.is_none());
    }
}
