//! Route configuration for lead endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{get_customer, store_conversation, store_customer};

/// Creates the leads router.
///
/// Routes:
/// - `POST /api/database/customer` - Store a customer
/// - `GET /api/database/customer/:id` - Load a customer
/// - `POST /api/database/conversation` - Log one exchange
pub fn leads_router() -> Router<AppState> {
    Router::new()
        .route("/api/database/customer", post(store_customer))
        .route("/api/database/customer/:id", get(get_customer))
        .route("/api/database/conversation", post(store_conversation))
}
