//! HTTP Chat Gateway - ChatGateway over an OpenAI-compatible completions endpoint.
//!
//! Works against both OpenAI-style and Azure-style deployments: the key is
//! sent as `Authorization: Bearer <key>` and as `api-key: <key>`, and the
//! reply is read from `choices[0].message.content` or from a flat `content`.
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpGatewayConfig::new(endpoint, api_key)
//!     .with_model("gpt-4o-mini")
//!     .with_timeout(Duration::from_secs(20));
//!
//! let gateway = HttpChatGateway::new(config)?;
//! ```
//!
//! A gateway with an empty endpoint or key is valid to construct; every call
//! then fails fast with `GatewayError::NotConfigured`.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::ports::{ChatGateway, ChatTurn, GatewayError};

/// Configuration for the HTTP gateway.
#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    /// Full URL of the chat completions endpoint.
    pub endpoint: String,
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model or deployment name sent with each request.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Ceiling on generated tokens.
    pub max_tokens: u32,
    /// Request timeout.
    pub timeout: Duration,
}

impl HttpGatewayConfig {
    /// Creates a configuration with default model parameters.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 500,
            timeout: Duration::from_secs(20),
        }
    }

    /// Creates a configuration from an already-wrapped secret.
    pub fn with_secret(endpoint: impl Into<String>, api_key: Secret<String>) -> Self {
        let mut config = Self::new(endpoint, String::new());
        config.api_key = api_key;
        config
    }

    /// Sets the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the token ceiling.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether both endpoint and key are present.
    pub fn is_configured(&self) -> bool {
        !self.endpoint.trim().is_empty() && !self.api_key().trim().is_empty()
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Chat gateway backed by a single HTTP POST per call.
pub struct HttpChatGateway {
    config: HttpGatewayConfig,
    client: Client,
}

impl HttpChatGateway {
    /// Creates a gateway with its own HTTP client.
    pub fn new(config: HttpGatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Whether calls will reach the network.
    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    fn map_transport_error(&self, error: reqwest::Error) -> GatewayError {
        if error.is_timeout() {
            GatewayError::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else if error.is_connect() {
            GatewayError::network(format!("Connection failed: {}", error))
        } else {
            GatewayError::network(error.to_string())
        }
    }
}

#[async_trait]
impl ChatGateway for HttpChatGateway {
    async fn call(&self, turns: &[ChatTurn]) -> Result<String, GatewayError> {
        if !self.config.is_configured() {
            return Err(GatewayError::NotConfigured);
        }

        let request = CompletionRequest {
            messages: turns,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            model: &self.config.model,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("api-key", self.config.api_key())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = serde_json::from_str(&body)
            .map_err(|e| GatewayError::unexpected_format(format!("Invalid JSON: {}", e)))?;

        extract_content(&payload)
    }
}

/// Reads the assistant text from either supported response shape.
///
/// Blank content counts as a malformed reply.
fn extract_content(payload: &Value) -> Result<String, GatewayError> {
    let content = payload
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .or_else(|| payload.get("content").and_then(Value::as_str));

    match content {
        Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
        Some(_) => Err(GatewayError::unexpected_format("empty content")),
        None => Err(GatewayError::unexpected_format(
            "missing choices[0].message.content and content",
        )),
    }
}

// ----- Wire Types -----

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    messages: &'a [ChatTurn],
    max_tokens: u32,
    temperature: f32,
    model: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::json;
    use tokio::net::TcpListener;

    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/chat", addr)
    }

    fn turns() -> Vec<ChatTurn> {
        vec![ChatTurn::system("be brief"), ChatTurn::user("hello")]
    }

    #[test]
    fn config_builder_works() {
        let config = HttpGatewayConfig::new("https://example.test/chat", "key")
            .with_model("custom")
            .with_temperature(0.2)
            .with_max_tokens(64)
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.model, "custom");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.max_tokens, 64);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.api_key(), "key");
        assert!(config.is_configured());
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = HttpGatewayConfig::new("https://example.test", "key");
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 500);
        assert_eq!(config.timeout, Duration::from_secs(20));
    }

    #[test]
    fn blank_endpoint_or_key_is_unconfigured() {
        assert!(!HttpGatewayConfig::new("", "key").is_configured());
        assert!(!HttpGatewayConfig::new("https://example.test", "  ").is_configured());
    }

    #[test]
    fn extract_content_reads_choices_shape() {
        let payload = json!({"choices": [{"message": {"role": "assistant", "content": "Hi!"}}]});
        assert_eq!(extract_content(&payload).unwrap(), "Hi!");
    }

    #[test]
    fn extract_content_reads_flat_shape() {
        let payload = json!({"content": "Flat reply"});
        assert_eq!(extract_content(&payload).unwrap(), "Flat reply");
    }

    #[test]
    fn extract_content_rejects_other_shapes() {
        let payload = json!({"choices": []});
        assert!(matches!(
            extract_content(&payload),
            Err(GatewayError::UnexpectedFormat(_))
        ));

        let blank = json!({"content": "   "});
        assert!(matches!(
            extract_content(&blank),
            Err(GatewayError::UnexpectedFormat(_))
        ));
    }

    #[test]
    fn request_serializes_wire_contract() {
        let turns = turns();
        let request = CompletionRequest {
            messages: &turns,
            max_tokens: 500,
            temperature: 0.7,
            model: "m",
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hello");
        assert_eq!(value["max_tokens"], 500);
        assert_eq!(value["model"], "m");
    }

    #[tokio::test]
    async fn unconfigured_gateway_fails_without_io() {
        let gateway = HttpChatGateway::new(HttpGatewayConfig::new("", "")).unwrap();
        let result = gateway.call(&turns()).await;
        assert_eq!(result, Err(GatewayError::NotConfigured));
    }

    #[tokio::test]
    async fn successful_call_sends_both_auth_headers() {
        let router = Router::new().route(
            "/chat",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let bearer = headers.get("authorization").and_then(|v| v.to_str().ok());
                let api_key = headers.get("api-key").and_then(|v| v.to_str().ok());
                assert_eq!(bearer, Some("Bearer secret"));
                assert_eq!(api_key, Some("secret"));
                assert_eq!(body["messages"].as_array().map(Vec::len), Some(2));
                Json(json!({"choices": [{"message": {"content": "model says hi"}}]}))
            }),
        );
        let endpoint = serve(router).await;

        let gateway = HttpChatGateway::new(HttpGatewayConfig::new(endpoint, "secret")).unwrap();
        let reply = gateway.call(&turns()).await.unwrap();

        assert_eq!(reply, "model says hi");
    }

    #[tokio::test]
    async fn non_success_status_maps_to_status_error() {
        let router = Router::new().route(
            "/chat",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "overloaded") }),
        );
        let endpoint = serve(router).await;

        let gateway = HttpChatGateway::new(HttpGatewayConfig::new(endpoint, "secret")).unwrap();
        let result = gateway.call(&turns()).await;

        assert_eq!(
            result,
            Err(GatewayError::Status {
                status: 503,
                body: "overloaded".to_string()
            })
        );
    }

    #[tokio::test]
    async fn slow_endpoint_maps_to_timeout() {
        let router = Router::new().route(
            "/chat",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(json!({"content": "too late"}))
            }),
        );
        let endpoint = serve(router).await;

        let config =
            HttpGatewayConfig::new(endpoint, "secret").with_timeout(Duration::from_millis(100));
        let gateway = HttpChatGateway::new(config).unwrap();
        let result = gateway.call(&turns()).await;

        assert!(matches!(result, Err(GatewayError::Timeout { .. })));
    }
}
