//! HTTP adapters - REST API implementations.
//!
//! Each area has its own adapter module with DTOs, handlers and routes:
//! - `chat` - conversation lifecycle (`/api/chat/*`)
//! - `catalog` - product lookup (`/api/database/products`)
//! - `leads` - customer intake and conversation log (`/api/database/*`)
//! - `health` - banner and liveness probe

pub mod catalog;
pub mod chat;
pub mod health;
pub mod leads;

mod error;
mod router;
mod state;

pub use error::ErrorResponse;
pub use router::api_router;
pub use state::AppState;

#[cfg(test)]
pub(crate) mod test_support;
