//! Chat engine configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Session and recommendation tuning
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Products appended to each rule-based reply
    #[serde(default = "default_batch_size")]
    pub recommendation_batch_size: usize,

    /// Seconds without activity before a session is reaped
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Seconds between reaper sweeps
    #[serde(default = "default_reap_interval")]
    pub reap_interval_secs: u64,
}

impl ChatConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn reap_interval(&self) -> Duration {
        Duration::from_secs(self.reap_interval_secs)
    }

    /// Validate chat configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.recommendation_batch_size == 0 {
            return Err(ValidationError::InvalidBatchSize);
        }
        if self.reap_interval_secs == 0 {
            return Err(ValidationError::InvalidReapInterval);
        }
        Ok(())
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            recommendation_batch_size: default_batch_size(),
            idle_timeout_secs: default_idle_timeout(),
            reap_interval_secs: default_reap_interval(),
        }
    }
}

fn default_batch_size() -> usize {
    2
}

fn default_idle_timeout() -> u64 {
    3600
}

fn default_reap_interval() -> u64 {
    3600
}
