//! HTTP DTOs for catalog endpoints.
//!
//! Product fields use the catalog's column names.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::Product;

/// Product search filter. `productType` takes form values (`car`, `term`, ...).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilterRequest {
    pub product_type: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductResponse {
    pub product_id: i64,
    pub product_name: String,
    pub product_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    pub premium_amount: f64,
    pub min_age: u32,
    pub max_age: u32,
    pub target_gender: String,
    pub is_active: bool,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id.value(),
            product_name: product.name.clone(),
            product_type: product.product_type.clone(),
            description: product.coverage_details.clone(),
            provider_name: product.provider_name.clone(),
            premium_amount: product.premium_amount,
            min_age: product.min_age,
            max_age: product.max_age,
            target_gender: product.target_gender.clone(),
            is_active: product.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductResponse>,
    pub count: usize,
}

impl From<Vec<Product>> for ProductListResponse {
    fn from(products: Vec<Product>) -> Self {
        let products: Vec<ProductResponse> = products.iter().map(ProductResponse::from).collect();
        Self {
            count: products.len(),
            products,
        }
    }
}
