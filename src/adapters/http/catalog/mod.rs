//! HTTP adapter for product catalog endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{ProductFilterRequest, ProductListResponse, ProductResponse};
pub use routes::catalog_router;
