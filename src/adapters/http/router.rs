//! Top-level API router.

use axum::Router;

use super::catalog::catalog_router;
use super::chat::chat_router;
use super::health::health_router;
use super::leads::leads_router;
use super::state::AppState;

/// Builds the complete API router.
///
/// Routes:
/// - `GET /` and `GET /api/health`
/// - `POST /api/chat/initialize`, `POST /api/chat/message`
/// - `GET|DELETE /api/chat/session/:id`
/// - `POST /api/database/products`
/// - `POST /api/database/customer`, `GET /api/database/customer/:id`
/// - `POST /api/database/conversation`
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(health_router())
        .merge(chat_router())
        .merge(catalog_router())
        .merge(leads_router())
        .with_state(state)
}
