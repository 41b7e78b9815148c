//! Route configuration for chat endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{end_session, get_session, initialize_chat, send_message};

/// Creates the chat router.
///
/// Routes:
/// - `POST /api/chat/initialize` - Start a conversation
/// - `POST /api/chat/message` - Reply to a user message
/// - `GET /api/chat/session/:id` - Session snapshot
/// - `DELETE /api/chat/session/:id` - End a session
pub fn chat_router() -> Router<AppState> {
    Router::new()
        .route("/api/chat/initialize", post(initialize_chat))
        .route("/api/chat/message", post(send_message))
        .route("/api/chat/session/:id", get(get_session).delete(end_session))
}
