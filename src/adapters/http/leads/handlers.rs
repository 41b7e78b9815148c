//! HTTP handlers for lead endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::adapters::http::error::ErrorResponse;
use crate::adapters::http::state::AppState;
use crate::application::LeadError;
use crate::domain::foundation::CustomerId;
use crate::domain::lead::ConversationEntry;

use super::dto::{
    CommandResponse, ConversationRequest, CustomerEnvelope, CustomerRequest, StoreCustomerResponse,
};

/// POST /api/database/customer - Store a quote-form submission
pub async fn store_customer(
    State(state): State<AppState>,
    Json(req): Json<CustomerRequest>,
) -> Response {
    match state.leads.register_customer(req.customer_data).await {
        Ok(record) => {
            let response = StoreCustomerResponse {
                success: true,
                customer_id: record.customer_id.value(),
                message: "Customer data stored successfully".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_lead_error(e),
    }
}

/// GET /api/database/customer/:id - Load a stored customer
pub async fn get_customer(State(state): State<AppState>, Path(customer_id): Path<i64>) -> Response {
    match state.leads.get_customer(CustomerId::new(customer_id)).await {
        Ok(record) => {
            let response = CustomerEnvelope {
                customer: record.into(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_lead_error(e),
    }
}

/// POST /api/database/conversation - Append one exchange to the log
pub async fn store_conversation(
    State(state): State<AppState>,
    Json(req): Json<ConversationRequest>,
) -> Response {
    let entry = match ConversationEntry::try_from(req) {
        Ok(entry) => entry,
        Err(e) => return handle_lead_error(e.into()),
    };

    match state.leads.record_conversation(entry).await {
        Ok(()) => {
            let response = CommandResponse {
                success: true,
                message: "Conversation stored successfully".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_lead_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_lead_error(err: LeadError) -> Response {
    let code = err.code();
    match err {
        LeadError::Validation(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(
                ErrorResponse::new(code, e.to_string()).with_details(json!({"field": e.field()})),
            ),
        )
            .into_response(),
        LeadError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found(code, "Customer", &id.to_string())),
        )
            .into_response(),
        LeadError::Database(msg) => {
            error!(error = %msg, "Lead store failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(code, msg)),
            )
                .into_response()
        }
    }
}
