//! PostgreSQL implementation of ProductCatalog.
//!
//! Reads the `insurance_products` table (see `migrations/0001_init.sql`).
//! Filtering and ordering happen in SQL; optional filters bind as NULL.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::catalog::{Product, ProductQuery};
use crate::domain::foundation::ProductId;
use crate::ports::{CatalogError, ProductCatalog};

/// PostgreSQL implementation of ProductCatalog.
#[derive(Clone)]
pub struct PostgresProductCatalog {
    pool: PgPool,
}

impl PostgresProductCatalog {
    /// Creates a new PostgresProductCatalog.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductCatalog for PostgresProductCatalog {
    async fn get_products(&self, query: &ProductQuery) -> Result<Vec<Product>, CatalogError> {
        let age = query
            .age
            .map(|age| i32::try_from(age).unwrap_or(i32::MAX));

        let rows = sqlx::query(
            r#"
            SELECT product_id, product_name, product_type, target_gender,
                   min_age, max_age, premium_amount::float8 AS premium_amount,
                   description, provider_name, is_active
            FROM insurance_products
            WHERE is_active = TRUE
              AND product_type = $1
              AND ($2::int IS NULL OR (min_age <= $2 AND max_age >= $2))
              AND ($3::text IS NULL OR LOWER(target_gender) = 'all' OR LOWER(target_gender) = $3)
            ORDER BY premium_amount ASC
            "#,
        )
        .bind(&query.category)
        .bind(age)
        .bind(query.gender.as_deref())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CatalogError::Database(format!("Failed to fetch products: {}", e)))?;

        rows.iter().map(row_to_product).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, CatalogError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| CatalogError::Database(format!("Failed to get {}: {}", name, e)))
}

fn age_column(row: &PgRow, name: &str) -> Result<u32, CatalogError> {
    let value: i32 = column(row, name)?;
    u32::try_from(value)
        .map_err(|_| CatalogError::Database(format!("Negative {}: {}", name, value)))
}

fn row_to_product(row: &PgRow) -> Result<Product, CatalogError> {
    Ok(Product {
        id: ProductId::new(column(row, "product_id")?),
        name: column(row, "product_name")?,
        product_type: column(row, "product_type")?,
        target_gender: column(row, "target_gender")?,
        min_age: age_column(row, "min_age")?,
        max_age: age_column(row, "max_age")?,
        premium_amount: column(row, "premium_amount")?,
        coverage_details: column(row, "description")?,
        provider_name: column(row, "provider_name")?,
        is_active: column(row, "is_active")?,
    })
}
