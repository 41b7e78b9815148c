//! Mock Chat Gateway for testing.
//!
//! Returns queued replies in order, then falls back to a fixed outcome.
//! Every call is recorded so tests can inspect the turns that were sent.
//!
//! # Example
//!
//! ```ignore
//! let gateway = MockChatGateway::new()
//!     .with_reply("Hello from the model")
//!     .with_error(GatewayError::Timeout { timeout_secs: 20 });
//!
//! assert_eq!(gateway.call(&turns).await?, "Hello from the model");
//! assert!(gateway.call(&turns).await.is_err());
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{ChatGateway, ChatTurn, GatewayError};

type Outcome = Result<String, GatewayError>;

/// Scriptable gateway.
#[derive(Debug, Clone)]
pub struct MockChatGateway {
    /// Outcomes consumed in order.
    queued: Arc<Mutex<VecDeque<Outcome>>>,
    /// Outcome once the queue is drained.
    fallback: Outcome,
    /// Simulated latency per call.
    delay: Duration,
    /// Turns sent on each call.
    calls: Arc<Mutex<Vec<Vec<ChatTurn>>>>,
}

impl Default for MockChatGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChatGateway {
    /// Creates a gateway that answers "Mock response" to everything.
    pub fn new() -> Self {
        Self {
            queued: Arc::new(Mutex::new(VecDeque::new())),
            fallback: Ok("Mock response".to_string()),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Creates a gateway whose every call fails with `error`.
    pub fn failing(error: GatewayError) -> Self {
        Self {
            fallback: Err(error),
            ..Self::new()
        }
    }

    /// Queues a successful reply.
    pub fn with_reply(self, content: impl Into<String>) -> Self {
        lock(&self.queued).push_back(Ok(content.into()));
        self
    }

    /// Queues a failure.
    pub fn with_error(self, error: GatewayError) -> Self {
        lock(&self.queued).push_back(Err(error));
        self
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of calls made.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Turns sent on every call, oldest first.
    pub fn calls(&self) -> Vec<Vec<ChatTurn>> {
        lock(&self.calls).clone()
    }

    /// Turns sent on the most recent call.
    pub fn last_call(&self) -> Option<Vec<ChatTurn>> {
        lock(&self.calls).last().cloned()
    }

    fn next_outcome(&self) -> Outcome {
        lock(&self.queued)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl ChatGateway for MockChatGateway {
    async fn call(&self, turns: &[ChatTurn]) -> Result<String, GatewayError> {
        lock(&self.calls).push(turns.to_vec());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        self.next_outcome()
    }
}
