//! HTTP DTOs for chat endpoints.
//!
//! Field names follow the web client's camelCase convention.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::adapters::http::catalog::ProductResponse;
use crate::domain::chat::{ChatSession, IntakeFields, Turn, TurnRole, CATEGORY_FIELD_ALIASES};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to start a conversation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeChatRequest {
    pub session_id: String,
    pub form_data: Map<String, Value>,
    #[serde(default)]
    pub customer_id: Option<i64>,
}

/// One user message, optionally with updated form fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageRequest {
    pub session_id: String,
    pub message: String,
    #[serde(default)]
    pub form_data: Option<Map<String, Value>>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Short summary of who the conversation is with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatContextSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance_type: Option<String>,
    pub customer_name: String,
}

impl From<&IntakeFields> for ChatContextSummary {
    fn from(context: &IntakeFields) -> Self {
        Self {
            insurance_type: context.probe_text(CATEGORY_FIELD_ALIASES),
            customer_name: context.name().unwrap_or_else(|| "there".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeChatResponse {
    pub success: bool,
    pub session_id: String,
    pub message: String,
    pub context: ChatContextSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageResponse {
    pub success: bool,
    pub response: String,
    pub session_id: String,
}

/// One history entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResponse {
    pub role: TurnRole,
    pub content: String,
    pub timestamp: String,
}

impl From<&Turn> for TurnResponse {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role,
            content: turn.content.clone(),
            timestamp: turn.timestamp.to_rfc3339(),
        }
    }
}

/// Read-only view of a live session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshotResponse {
    pub session_id: String,
    pub context: IntakeFields,
    pub history: Vec<TurnResponse>,
    pub product_recommendations: Vec<ProductResponse>,
    pub suggested_product_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
    pub created_at: String,
    pub last_activity: String,
}

impl From<&ChatSession> for SessionSnapshotResponse {
    fn from(session: &ChatSession) -> Self {
        Self {
            session_id: session.id().to_string(),
            context: session.context().clone(),
            history: session.history().iter().map(TurnResponse::from).collect(),
            product_recommendations: session
                .product_recommendations()
                .iter()
                .map(ProductResponse::from)
                .collect(),
            suggested_product_index: session.suggested_product_index(),
            customer_id: session.customer_id().map(|id| id.value()),
            created_at: session.created_at().to_rfc3339(),
            last_activity: session.last_activity().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndSessionResponse {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use serde_json::json;

    #[test]
    fn initialize_request_accepts_camel_case() {
        let req: InitializeChatRequest = serde_json::from_value(json!({
            "sessionId": "s1",
            "formData": {"name": "Asha"},
            "customerId": 7
        }))
        .unwrap();
        assert_eq!(req.session_id, "s1");
        assert_eq!(req.form_data["name"], "Asha");
        assert_eq!(req.customer_id, Some(7));
    }

    #[test]
    fn message_request_form_data_is_optional() {
        let req: ChatMessageRequest =
            serde_json::from_value(json!({"sessionId": "s1", "message": "hi"})).unwrap();
        assert!(req.form_data.is_none());
    }

    #[test]
    fn context_summary_defaults_name() {
        let fields = IntakeFields::from_map(
            json!({"insuranceType": "car"}).as_object().cloned().unwrap(),
        );
        let summary = ChatContextSummary::from(&fields);
        assert_eq!(summary.insurance_type.as_deref(), Some("car"));
        assert_eq!(summary.customer_name, "there");
    }

    #[test]
    fn snapshot_serializes_history_in_order() {
        let mut session = ChatSession::new(SessionId::new("s1").unwrap(), Map::new(), None);
        session.push_assistant("Hello");
        session.push_user("Hi");

        let json = serde_json::to_value(SessionSnapshotResponse::from(&session)).unwrap();
        assert_eq!(json["sessionId"], "s1");
        assert_eq!(json["history"][0]["role"], "assistant");
        assert_eq!(json["history"][1]["content"], "Hi");
        assert!(json.get("customerId").is_none());
    }
}
