//! HTTP handlers for catalog endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::adapters::http::error::ErrorResponse;
use crate::adapters::http::state::AppState;
use crate::domain::foundation::ErrorCode;
use crate::ports::CatalogError;

use super::dto::{ProductFilterRequest, ProductListResponse};

/// POST /api/database/products - Search active products
pub async fn find_products(
    State(state): State<AppState>,
    Json(req): Json<ProductFilterRequest>,
) -> Response {
    let age = req.age.filter(|age| *age > 0);

    match state
        .catalog
        .find_products(&req.product_type, age, req.gender)
        .await
    {
        Ok(products) => {
            (StatusCode::OK, Json(ProductListResponse::from(products))).into_response()
        }
        Err(e) => handle_catalog_error(e),
    }
}

fn handle_catalog_error(err: CatalogError) -> Response {
    error!(error = %err, "Product lookup failed");
    let code = match err {
        CatalogError::Unavailable(_) => ErrorCode::CatalogUnavailable,
        CatalogError::Database(_) => ErrorCode::DatabaseError,
    };
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(
            code,
            format!("Error retrieving products: {}", err),
        )),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_errors_map_to_500() {
        let response = handle_catalog_error(CatalogError::Unavailable("offline".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
