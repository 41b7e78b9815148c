//! CatalogService - Product lookup for the products endpoint.

use std::sync::Arc;

use tracing::info;

use crate::domain::catalog::{InsuranceCategory, Product, ProductQuery};
use crate::ports::{CatalogError, ProductCatalog};

/// Application service for catalog queries.
pub struct CatalogService {
    catalog: Arc<dyn ProductCatalog>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        Self { catalog }
    }

    /// Finds products for a form-level product type (`car`, `term`, ...).
    pub async fn find_products(
        &self,
        product_type: &str,
        age: Option<u32>,
        gender: Option<String>,
    ) -> Result<Vec<Product>, CatalogError> {
        let category = InsuranceCategory::from_form_value(product_type);
        let query = ProductQuery::new(category.product_type())
            .with_age(age)
            .with_gender(gender);

        let products = self.catalog.get_products(&query).await?;
        info!(
            product_type = %query.category,
            count = products.len(),
            "Retrieved products"
        );
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryProductCatalog;

    #[tokio::test]
    async fn maps_form_values_to_catalog_types() {
        let service = CatalogService::new(Arc::new(InMemoryProductCatalog::with_demo_products()));

        let products = service.find_products("term", Some(30), None).await.unwrap();

        assert!(!products.is_empty());
        assert!(products.iter().all(|p| p.product_type == "term_life"));
        assert!(products
            .windows(2)
            .all(|w| w[0].premium_amount <= w[1].premium_amount));
    }

    #[tokio::test]
    async fn unknown_type_finds_nothing() {
        let service = CatalogService::new(Arc::new(InMemoryProductCatalog::with_demo_products()));

        let products = service.find_products("pet", None, None).await.unwrap();

        assert!(products.is_empty());
    }
}
