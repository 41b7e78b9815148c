//! HTTP handlers for chat endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::adapters::http::error::ErrorResponse;
use crate::adapters::http::state::AppState;
use crate::application::ChatError;
use crate::domain::foundation::{CustomerId, ErrorCode, SessionId};

use super::dto::{
    ChatContextSummary, ChatMessageRequest, ChatMessageResponse, EndSessionResponse,
    InitializeChatRequest, InitializeChatResponse, SessionSnapshotResponse,
};

/// POST /api/chat/initialize - Start (or restart) a conversation
pub async fn initialize_chat(
    State(state): State<AppState>,
    Json(req): Json<InitializeChatRequest>,
) -> Response {
    let session_id = match SessionId::new(req.session_id) {
        Ok(id) => id,
        Err(e) => return handle_chat_error(e.into()),
    };

    match state
        .chat
        .initialize(session_id, req.form_data, req.customer_id.map(CustomerId::new))
        .await
    {
        Ok(initialized) => {
            let response = InitializeChatResponse {
                success: true,
                session_id: initialized.session.id().to_string(),
                message: initialized.message,
                context: ChatContextSummary::from(initialized.session.context()),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_chat_error(e),
    }
}

/// POST /api/chat/message - Reply to one user message
pub async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<ChatMessageRequest>,
) -> Response {
    let session_id = match SessionId::new(req.session_id) {
        Ok(id) => id,
        Err(e) => return handle_chat_error(e.into()),
    };

    match state
        .chat
        .handle_message(&session_id, &req.message, req.form_data.as_ref())
        .await
    {
        Ok(reply) => {
            let response = ChatMessageResponse {
                success: true,
                response: reply,
                session_id: session_id.to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_chat_error(e),
    }
}

/// GET /api/chat/session/:id - Snapshot of a live session
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match session_id.parse::<SessionId>() {
        Ok(id) => id,
        Err(e) => return handle_chat_error(e.into()),
    };

    match state.chat.get_session(&session_id).await {
        Ok(Some(session)) => {
            (StatusCode::OK, Json(SessionSnapshotResponse::from(&session))).into_response()
        }
        Ok(None) => handle_chat_error(ChatError::SessionNotFound(session_id)),
        Err(e) => handle_chat_error(e),
    }
}

/// DELETE /api/chat/session/:id - End a session
pub async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match session_id.parse::<SessionId>() {
        Ok(id) => id,
        Err(e) => return handle_chat_error(e.into()),
    };

    match state.chat.end_session(&session_id).await {
        Ok(true) => {
            let response = EndSessionResponse {
                success: true,
                message: "Session ended".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(false) => handle_chat_error(ChatError::SessionNotFound(session_id)),
        Err(e) => handle_chat_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_chat_error(error: ChatError) -> Response {
    match error {
        ChatError::SessionNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found(
                ErrorCode::SessionNotFound,
                "Session",
                id.as_str(),
            )),
        )
            .into_response(),
        ChatError::InvalidSessionId(e) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::validation(e.to_string())),
        )
            .into_response(),
        ChatError::Store(e) => {
            error!(error = %e, "Session store failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal(e.to_string())),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ValidationError;
    use crate::ports::SessionStoreError;

    #[test]
    fn session_not_found_maps_to_404() {
        let error = ChatError::SessionNotFound(SessionId::new("gone").unwrap());
        assert_eq!(handle_chat_error(error).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_session_id_maps_to_400() {
        let error = ChatError::InvalidSessionId(ValidationError::empty_field("session_id"));
        assert_eq!(handle_chat_error(error).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_failure_maps_to_500() {
        let error = ChatError::Store(SessionStoreError::Unavailable("down".to_string()));
        assert_eq!(
            handle_chat_error(error).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
