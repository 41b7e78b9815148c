//! In-memory storage adapters.
//!
//! Back the session registry, and stand in for the database during tests
//! and local development.

mod in_memory_lead_repository;
mod in_memory_product_catalog;
mod in_memory_session_store;

pub use in_memory_lead_repository::InMemoryLeadRepository;
pub use in_memory_product_catalog::InMemoryProductCatalog;
pub use in_memory_session_store::InMemorySessionStore;
