//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `ai` - chat-completion gateway (HTTP and mock)
//! - `storage` - in-memory stores for sessions, products and leads
//! - `postgres` - PostgreSQL catalog and lead repository
//! - `http` - axum REST API

pub mod ai;
pub mod http;
pub mod postgres;
pub mod storage;
