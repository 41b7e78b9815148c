//! Chat gateway adapters.
//!
//! - `HttpChatGateway` - OpenAI/Azure-compatible completions endpoint
//! - `MockChatGateway` - scriptable gateway for tests

mod http_gateway;
mod mock_gateway;

pub use http_gateway::{HttpChatGateway, HttpGatewayConfig};
pub use mock_gateway::MockChatGateway;
