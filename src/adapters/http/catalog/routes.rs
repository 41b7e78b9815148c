//! Route configuration for catalog endpoints.

use axum::routing::post;
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::find_products;

/// Creates the catalog router.
///
/// Routes:
/// - `POST /api/database/products` - Search products by type, age and gender
pub fn catalog_router() -> Router<AppState> {
    Router::new().route("/api/database/products", post(find_products))
}

#[cfg(test)]
mod tests {
    use crate::adapters::http::test_support::TestApp;
    use axum::http::StatusCode;
    use serde_json::json;

    fn names(body: &serde_json::Value) -> Vec<String> {
        body["products"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["product_name"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn maps_form_type_and_sorts_by_premium() {
        let app = TestApp::new();

        let (status, body) = app
            .post("/api/database/products", json!({"productType": "car"}))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 3);
        assert_eq!(
            names(&body),
            vec![
                "Third Party Basic",
                "Drive Secure Comprehensive",
                "Zero Depreciation Plus"
            ]
        );
        assert_eq!(body["products"][0]["product_type"], "auto");
    }

    #[tokio::test]
    async fn age_filter_excludes_out_of_band_products() {
        let app = TestApp::new();

        let (_, body) = app
            .post(
                "/api/database/products",
                json!({"productType": "health", "age": 70, "gender": "Female"}),
            )
            .await;

        assert_eq!(names(&body), vec!["Senior Health Guard"]);
    }

    #[tokio::test]
    async fn unknown_type_returns_empty_list() {
        let app = TestApp::new();

        let (status, body) = app
            .post("/api/database/products", json!({"productType": "pet"}))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);
    }
}
