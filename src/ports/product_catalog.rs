//! Product Catalog Port - Read access to insurance products.

use async_trait::async_trait;

use crate::domain::catalog::{Product, ProductQuery};

/// Errors from a catalog backend.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(String),
}

/// Port for querying the product catalog.
///
/// Implementations return active products of `query.category` whose age band
/// contains `query.age` (when given) and whose target gender is `all` or
/// equals `query.gender` (when given), sorted by ascending premium.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Fetches matching products, cheapest first.
    async fn get_products(&self, query: &ProductQuery) -> Result<Vec<Product>, CatalogError>;
}
