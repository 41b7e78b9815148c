//! PostgreSQL adapters.
//!
//! Runtime-checked `sqlx` queries against the schema in `migrations/`.

mod lead_repository;
mod product_catalog;

pub use lead_repository::PostgresLeadRepository;
pub use product_catalog::PostgresProductCatalog;
