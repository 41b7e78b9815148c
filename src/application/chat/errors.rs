//! Caller-visible chat errors.

use crate::domain::foundation::{ErrorCode, SessionId, ValidationError};
use crate::ports::SessionStoreError;

/// Errors surfaced by the chat orchestrator.
///
/// Model and catalog failures never appear here; they are recovered inside
/// the turn.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ChatError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Invalid session id: {0}")]
    InvalidSessionId(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] SessionStoreError),
}

impl ChatError {
    /// Stable code for API responses.
    pub fn code(&self) -> ErrorCode {
        match self {
            ChatError::SessionNotFound(_) => ErrorCode::SessionNotFound,
            ChatError::InvalidSessionId(_) => ErrorCode::ValidationFailed,
            ChatError::Store(_) => ErrorCode::InternalError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_not_found_names_the_session() {
        let err = ChatError::SessionNotFound(SessionId::new("abc").unwrap());
        assert_eq!(err.to_string(), "Session not found: abc");
        assert_eq!(err.code(), ErrorCode::SessionNotFound);
    }

    #[test]
    fn blank_session_id_converts_to_invalid_session_id() {
        let err: ChatError = SessionId::new("  ").unwrap_err().into();
        assert!(matches!(err, ChatError::InvalidSessionId(_)));
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }
}
