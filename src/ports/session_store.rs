//! Session Store Port - Process-wide registry of live chat sessions.
//!
//! Sessions are handed out as shared handles guarded by an async mutex. A
//! turn holds the session's mutex for its whole duration, so concurrent turns
//! on one session are serialized while different sessions run in parallel.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::chat::ChatSession;
use crate::domain::foundation::{SessionId, Timestamp};

/// Shared, lockable handle to one session.
pub type SessionHandle = Arc<Mutex<ChatSession>>;

/// Errors from a session store backend.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SessionStoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Port for the session registry.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores `session` under its id, replacing any existing entry.
    ///
    /// Returns `true` when an existing session was overwritten.
    async fn insert(&self, session: ChatSession) -> Result<bool, SessionStoreError>;

    /// Returns the handle for `id`, if the session exists.
    async fn get(&self, id: &SessionId) -> Result<Option<SessionHandle>, SessionStoreError>;

    /// Removes the session. Returns `true` if it existed.
    async fn remove(&self, id: &SessionId) -> Result<bool, SessionStoreError>;

    /// Removes every session whose last activity is before `cutoff`.
    ///
    /// Sessions locked by an in-flight turn are skipped.
    async fn remove_idle(&self, cutoff: Timestamp) -> Result<Vec<SessionId>, SessionStoreError>;

    /// Number of live sessions.
    async fn len(&self) -> Result<usize, SessionStoreError>;
}
