//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ChatGateway` - remote chat-completion model
//! - `ProductCatalog` - insurance product lookup
//! - `SessionStore` - live chat session registry
//! - `LeadRepository` - customer intake and conversation log persistence

mod chat_gateway;
mod lead_repository;
mod product_catalog;
mod session_store;

pub use chat_gateway::{ChatGateway, ChatRole, ChatTurn, GatewayError};
pub use lead_repository::{LeadRepository, LeadRepositoryError};
pub use product_catalog::{CatalogError, ProductCatalog};
pub use session_store::{SessionHandle, SessionStore, SessionStoreError};
