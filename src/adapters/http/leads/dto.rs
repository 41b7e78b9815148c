//! HTTP DTOs for lead endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CustomerId, SessionId, ValidationError};
use crate::domain::lead::{ConversationEntry, CustomerData, CustomerRecord};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Quote-form submission wrapper.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    pub customer_data: CustomerData,
}

/// One exchange to append to a customer's log.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationRequest {
    pub customer_id: i64,
    pub session_id: String,
    pub message: String,
    pub response: String,
    #[serde(default = "default_message_type")]
    pub message_type: String,
}

fn default_message_type() -> String {
    "user".to_string()
}

impl TryFrom<ConversationRequest> for ConversationEntry {
    type Error = ValidationError;

    fn try_from(req: ConversationRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            customer_id: CustomerId::new(req.customer_id),
            session_id: SessionId::new(req.session_id)?,
            message: req.message,
            response: req.response,
            message_type: req.message_type,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreCustomerResponse {
    pub success: bool,
    pub customer_id: i64,
    pub message: String,
}

/// A stored customer with its submission fields inlined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerView {
    pub customer_id: i64,
    #[serde(flatten)]
    pub data: CustomerData,
    pub created_at: String,
}

impl From<CustomerRecord> for CustomerView {
    fn from(record: CustomerRecord) -> Self {
        Self {
            customer_id: record.customer_id.value(),
            created_at: record.created_at.to_rfc3339(),
            data: record.data,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerEnvelope {
    pub customer: CustomerView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    pub message: String,
}
