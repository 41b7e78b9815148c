//! In-Memory Product Catalog Adapter
//!
//! Holds products in memory and applies the catalog filter itself. Used for
//! tests and for running without a database.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::catalog::{Product, ProductQuery, GENDER_ALL};
use crate::domain::foundation::ProductId;
use crate::ports::{CatalogError, ProductCatalog};

/// In-memory product catalog
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductCatalog {
    products: Arc<RwLock<Vec<Product>>>,
}

impl InMemoryProductCatalog {
    /// Create a catalog holding `products`
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(RwLock::new(products)),
        }
    }

    /// Create a catalog preloaded with a small demo product range
    pub fn with_demo_products() -> Self {
        Self::new(demo_products())
    }

    /// Add a product
    pub async fn insert(&self, product: Product) {
        self.products.write().await.push(product);
    }

    /// Number of products held, active or not
    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    /// Whether the catalog holds no products
    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

#[async_trait]
impl ProductCatalog for InMemoryProductCatalog {
    async fn get_products(&self, query: &ProductQuery) -> Result<Vec<Product>, CatalogError> {
        let mut matching: Vec<Product> = self
            .products
            .read()
            .await
            .iter()
            .filter(|product| product.matches(query))
            .cloned()
            .collect();

        matching.sort_by(|a, b| a.premium_amount.total_cmp(&b.premium_amount));
        Ok(matching)
    }
}

fn demo_product(
    id: i64,
    name: &str,
    product_type: &str,
    ages: (u32, u32),
    premium_amount: f64,
    coverage_details: &str,
    provider_name: &str,
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        product_type: product_type.to_string(),
        target_gender: GENDER_ALL.to_string(),
        min_age: ages.0,
        max_age: ages.1,
        premium_amount,
        coverage_details: Some(coverage_details.to_string()),
        provider_name: Some(provider_name.to_string()),
        is_active: true,
    }
}

#[rustfmt::skip]
fn demo_products() -> Vec<Product> {
    vec![
        demo_product(1, "Drive Secure Comprehensive", "auto", (18, 75), 12_500.0, "Own damage and third-party liability", "Shield General"),
        demo_product(2, "Third Party Basic", "auto", (18, 80), 4_200.0, "Mandatory third-party cover", "Shield General"),
        demo_product(3, "Zero Depreciation Plus", "auto", (21, 65), 18_900.0, "Full claim without depreciation", "Orbit Insurance"),
        demo_product(4, "Family Health Floater", "health", (18, 65), 22_000.0, "Covers ₹10,00,000 for the family", "CarePlus Health"),
        demo_product(5, "Individual Health Essential", "health", (18, 60), 9_800.0, "Covers ₹5,00,000 with cashless hospitals", "CarePlus Health"),
        demo_product(6, "Senior Health Guard", "health", (55, 80), 31_500.0, "Pre-existing conditions after 1 year", "Orbit Insurance"),
        demo_product(7, "Term Protect 1 Crore", "term_life", (18, 60), 14_000.0, "₹1,00,00,000 life cover to age 70", "Lifeline Assurance"),
        demo_product(8, "Term Smart 50 Lakh", "term_life", (18, 55), 7_600.0, "₹50,00,000 life cover for 30 years", "Shield Life"),
        demo_product(9, "Home Shield Owner", "home", (21, 80), 6_500.0, "Structure and contents", "Shield General"),
        demo_product(10, "Renter Contents Cover", "home", (18, 80), 2_400.0, "Contents and liability for tenants", "Orbit Insurance"),
        demo_product(11, "Wealth Builder ULIP", "investment", (18, 60), 60_000.0, "Market-linked returns with life cover", "Lifeline Assurance"),
        demo_product(12, "Guaranteed Savings Plan", "investment", (18, 65), 48_000.0, "Guaranteed maturity benefit", "Shield Life"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, product_type: &str, gender: &str, premium: f64, active: bool) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Plan {}", id),
            product_type: product_type.to_string(),
            target_gender: gender.to_string(),
            min_age: 18,
            max_age: 60,
            premium_amount: premium,
            coverage_details: None,
            provider_name: None,
            is_active: active,
        }
    }

    fn ids(products: &[Product]) -> Vec<i64> {
        products.iter().map(|p| p.id.value()).collect()
    }

    #[tokio::test]
    async fn filters_by_category_and_sorts_by_premium() {
        let catalog = InMemoryProductCatalog::new(vec![
            product(1, "health", "all", 900.0, true),
            product(2, "auto", "all", 100.0, true),
            product(3, "health", "all", 300.0, true),
        ]);

        let found = catalog
            .get_products(&ProductQuery::new("health"))
            .await
            .unwrap();

        assert_eq!(ids(&found), vec![3, 1]);
    }

    #[tokio::test]
    async fn excludes_inactive_products() {
        let catalog = InMemoryProductCatalog::new(vec![
            product(1, "health", "all", 100.0, false),
            product(2, "health", "all", 200.0, true),
        ]);

        let found = catalog
            .get_products(&ProductQuery::new("health"))
            .await
            .unwrap();

        assert_eq!(ids(&found), vec![2]);
    }

    #[tokio::test]
    async fn applies_age_and_gender_filters() {
        let catalog = InMemoryProductCatalog::new(vec![
            product(1, "term_life", "male", 100.0, true),
            product(2, "term_life", "female", 200.0, true),
            product(3, "term_life", "all", 300.0, true),
        ]);

        let query = ProductQuery::new("term_life")
            .with_age(Some(30))
            .with_gender(Some("Female".to_string()));
        let found = catalog.get_products(&query).await.unwrap();
        assert_eq!(ids(&found), vec![2, 3]);

        let too_old = ProductQuery::new("term_life").with_age(Some(70));
        assert!(catalog.get_products(&too_old).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn demo_catalog_covers_every_category() {
        let catalog = InMemoryProductCatalog::with_demo_products();

        for category in ["auto", "health", "term_life", "home", "investment"] {
            let found = catalog
                .get_products(&ProductQuery::new(category))
                .await
                .unwrap();
            assert!(!found.is_empty(), "no demo products for {}", category);
        }
    }

    #[tokio::test]
    async fn insert_adds_products() {
        let catalog = InMemoryProductCatalog::default();
        assert!(catalog.is_empty().await);

        catalog.insert(product(1, "home", "all", 10.0, true)).await;

        assert_eq!(catalog.len().await, 1);
    }
}
