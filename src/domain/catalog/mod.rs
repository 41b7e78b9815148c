//! Product catalog vocabulary.
//!
//! Products are read-only reference data. The chat engine filters, sorts and
//! paginates them but never mutates them.

mod category;
mod product;

pub use category::InsuranceCategory;
pub use product::{Product, ProductQuery, GENDER_ALL};
