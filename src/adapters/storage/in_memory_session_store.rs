//! In-Memory Session Store Adapter
//!
//! Process-local registry of chat sessions. The map is guarded by an async
//! `RwLock`; each session lives behind its own `Mutex` so a long turn on one
//! session never blocks lookups for another.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::domain::chat::ChatSession;
use crate::domain::foundation::{SessionId, Timestamp};
use crate::ports::{SessionHandle, SessionStore, SessionStoreError};

/// In-memory storage for chat sessions
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, SessionHandle>>>,
}

impl InMemorySessionStore {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all sessions (useful for tests)
    pub async fn clear(&self) {
        self.sessions.write().await.clear();
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: ChatSession) -> Result<bool, SessionStoreError> {
        let id = session.id().clone();
        let handle = Arc::new(Mutex::new(session));
        let previous = self.sessions.write().await.insert(id, handle);
        Ok(previous.is_some())
    }

    async fn get(&self, id: &SessionId) -> Result<Option<SessionHandle>, SessionStoreError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn remove(&self, id: &SessionId) -> Result<bool, SessionStoreError> {
        Ok(self.sessions.write().await.remove(id).is_some())
    }

    async fn remove_idle(&self, cutoff: Timestamp) -> Result<Vec<SessionId>, SessionStoreError> {
        let snapshot: Vec<(SessionId, SessionHandle)> = self
            .sessions
            .read()
            .await
            .iter()
            .map(|(id, handle)| (id.clone(), Arc::clone(handle)))
            .collect();

        // Guards stay held until removal so no turn can start on a session
        // that is about to disappear. Busy sessions are skipped.
        let mut stale = Vec::new();
        for (id, handle) in &snapshot {
            let Ok(guard) = handle.try_lock() else {
                continue;
            };
            if guard.is_idle_since(&cutoff) {
                stale.push((id, handle, guard));
            }
        }

        if stale.is_empty() {
            return Ok(Vec::new());
        }

        let mut sessions = self.sessions.write().await;
        let mut removed = Vec::with_capacity(stale.len());
        for (id, handle, _guard) in stale {
            // Skip entries replaced by a re-initialize since the snapshot.
            let unchanged = sessions
                .get(id)
                .is_some_and(|current| Arc::ptr_eq(current, handle));
            if unchanged {
                sessions.remove(id);
                removed.push(id.clone());
            }
        }

        Ok(removed)
    }

    async fn len(&self) -> Result<usize, SessionStoreError> {
        Ok(self.sessions.read().await.len())
    }
}
