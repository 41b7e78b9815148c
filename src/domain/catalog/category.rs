//! Insurance category mapping between intake form values and catalog types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Insurance line a lead is interested in.
///
/// Intake forms use loose labels (`car`, `term`); the catalog stores
/// canonical product types (`auto`, `term_life`). Unknown labels pass through
/// lower-cased so new catalog types work without a code change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum InsuranceCategory {
    Auto,
    TermLife,
    Home,
    Health,
    Investment,
    Other(String),
}

impl InsuranceCategory {
    /// Maps a form value (e.g. `"car"`, `"term"`) to a category.
    pub fn from_form_value(value: &str) -> Self {
        let normalized = value.trim().to_lowercase();
        match normalized.as_str() {
            "car" | "auto" | "motor" | "vehicle" => InsuranceCategory::Auto,
            "term" | "life" | "term_life" | "term-life" => InsuranceCategory::TermLife,
            "home" | "property" => InsuranceCategory::Home,
            "health" | "medical" => InsuranceCategory::Health,
            "investment" | "savings" => InsuranceCategory::Investment,
            _ => InsuranceCategory::Other(normalized),
        }
    }

    /// Product type string stored in the catalog.
    pub fn product_type(&self) -> &str {
        match self {
            InsuranceCategory::Auto => "auto",
            InsuranceCategory::TermLife => "term_life",
            InsuranceCategory::Home => "home",
            InsuranceCategory::Health => "health",
            InsuranceCategory::Investment => "investment",
            InsuranceCategory::Other(raw) => raw,
        }
    }

    /// Human-facing label used in replies ("auto insurance", "term life insurance").
    pub fn label(&self) -> &str {
        match self {
            InsuranceCategory::Auto => "auto",
            InsuranceCategory::TermLife => "term life",
            InsuranceCategory::Home => "home",
            InsuranceCategory::Health => "health",
            InsuranceCategory::Investment => "investment",
            InsuranceCategory::Other(raw) => raw,
        }
    }
}

impl fmt::Display for InsuranceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.product_type())
    }
}

impl From<String> for InsuranceCategory {
    fn from(value: String) -> Self {
        Self::from_form_value(&value)
    }
}

impl From<InsuranceCategory> for String {
    fn from(category: InsuranceCategory) -> Self {
        category.product_type().to_string()
    }
}
