//! Chat Gateway Port - Interface for the remote chat-completion model.
//!
//! The orchestrator talks to the language model only through this port. A
//! failure is an ordinary `Err` value: the caller decides whether to fall
//! back to rule-based replies, and the gateway itself never retries.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoGateway;
//!
//! #[async_trait]
//! impl ChatGateway for EchoGateway {
//!     async fn call(&self, turns: &[ChatTurn]) -> Result<String, GatewayError> {
//!         Ok(turns.last().map(|t| t.content.clone()).unwrap_or_default())
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::chat::{Turn, TurnRole};

/// Port for the remote chat-completion model.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Sends `turns` verbatim and returns the assistant text.
    async fn call(&self, turns: &[ChatTurn]) -> Result<String, GatewayError>;
}

/// Role of a turn on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions that steer the model.
    System,
    /// Customer input.
    User,
    /// Model (or fallback) output.
    Assistant,
}

impl From<TurnRole> for ChatRole {
    fn from(role: TurnRole) -> Self {
        match role {
            TurnRole::User => ChatRole::User,
            TurnRole::Assistant => ChatRole::Assistant,
        }
    }
}

/// One message sent to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    /// Creates a turn.
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a system turn.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    /// Creates a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    /// Creates an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}

impl From<&Turn> for ChatTurn {
    fn from(turn: &Turn) -> Self {
        Self::new(turn.role.into(), turn.content.clone())
    }
}

/// Gateway failures. All of them are recoverable by falling back.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// Endpoint or credential missing; no request was attempted.
    #[error("chat gateway is not configured")]
    NotConfigured,

    /// Connection-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u64,
    },

    /// The model endpoint answered with a non-success status.
    #[error("model endpoint returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for logging.
        body: String,
    },

    /// The body carried neither `choices[0].message.content` nor `content`.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),
}

impl GatewayError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates an unexpected-format error.
    pub fn unexpected_format(message: impl Into<String>) -> Self {
        Self::UnexpectedFormat(message.into())
    }
}
