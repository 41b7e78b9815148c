//! Product record and catalog query.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ProductId;

/// Target gender value meaning "available to everyone".
pub const GENDER_ALL: &str = "all";

/// An insurance plan offered by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub target_gender: String,
    pub min_age: u32,
    pub max_age: u32,
    /// Annual premium.
    pub premium_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    pub is_active: bool,
}

impl Product {
    /// Whether this product satisfies the query's category, age and gender filters.
    pub fn matches(&self, query: &ProductQuery) -> bool {
        if !self.is_active || self.product_type != query.category {
            return false;
        }
        if let Some(age) = query.age {
            if age < self.min_age || age > self.max_age {
                return false;
            }
        }
        if let Some(gender) = query.gender.as_deref() {
            let target = self.target_gender.to_lowercase();
            if target != GENDER_ALL && target != gender {
                return false;
            }
        }
        true
    }
}

/// Filter passed to the catalog port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    /// Catalog product type (already mapped from the form value).
    pub category: String,
    pub age: Option<u32>,
    /// Lower-cased gender.
    pub gender: Option<String>,
}

impl ProductQuery {
    /// Creates a query for a catalog product type.
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            age: None,
            gender: None,
        }
    }

    /// Restricts results to products whose age band contains `age`.
    pub fn with_age(mut self, age: Option<u32>) -> Self {
        self.age = age;
        self
    }

    /// Restricts results to products for `gender` or for everyone.
    pub fn with_gender(mut self, gender: Option<String>) -> Self {
        self.gender = gender.map(|g| g.trim().to_lowercase()).filter(|g| !g.is_empty());
        self
    }
}
