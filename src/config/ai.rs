//! Chat-completion model configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Remote chat model configuration
///
/// An empty endpoint or key is valid: the chat engine then answers every
/// turn with rule-based replies.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Full URL of the chat completions endpoint
    #[serde(default)]
    pub endpoint: String,

    /// API key, sent as both bearer token and `api-key` header
    #[serde(default = "empty_secret")]
    pub api_key: Secret<String>,

    /// Model or deployment name
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Ceiling on generated tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if both endpoint and key are set
    pub fn is_configured(&self) -> bool {
        !self.endpoint.trim().is_empty() && !self.api_key.expose_secret().trim().is_empty()
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let endpoint = self.endpoint.trim();
        if !endpoint.is_empty()
            && !endpoint.starts_with("http://")
            && !endpoint.starts_with("https://")
        {
            return Err(ValidationError::InvalidAiEndpoint);
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        if self.max_tokens == 0 {
            return Err(ValidationError::InvalidMaxTokens);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: empty_secret(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout(),
        }
    }
}

fn empty_secret() -> Secret<String> {
    Secret::new(String::new())
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    500
}

fn default_timeout() -> u64 {
    20
}
