//! LeadService - Customer intake and conversation logging.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{CustomerId, ErrorCode, ValidationError};
use crate::domain::lead::{ConversationEntry, CustomerData, CustomerRecord};
use crate::ports::{LeadRepository, LeadRepositoryError};

/// Errors from lead operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LeadError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Customer not found: {0}")]
    NotFound(CustomerId),

    #[error("Database error: {0}")]
    Database(String),
}

impl LeadError {
    /// Stable code for API responses.
    pub fn code(&self) -> ErrorCode {
        match self {
            LeadError::Validation(_) => ErrorCode::ValidationFailed,
            LeadError::NotFound(_) => ErrorCode::CustomerNotFound,
            LeadError::Database(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<LeadRepositoryError> for LeadError {
    fn from(err: LeadRepositoryError) -> Self {
        LeadError::Database(err.to_string())
    }
}

/// Application service for leads.
pub struct LeadService {
    repository: Arc<dyn LeadRepository>,
}

impl LeadService {
    pub fn new(repository: Arc<dyn LeadRepository>) -> Self {
        Self { repository }
    }

    /// Validates, normalizes, and stores a quote-form submission.
    pub async fn register_customer(&self, data: CustomerData) -> Result<CustomerRecord, LeadError> {
        let data = data.normalized()?;
        let record = self.repository.store_customer(data).await?;

        info!(
            customer_id = %record.customer_id,
            insurance_type = %record.data.insurance_type,
            "Customer stored"
        );
        Ok(record)
    }

    /// Loads a customer or fails with `NotFound`.
    pub async fn get_customer(&self, id: CustomerId) -> Result<CustomerRecord, LeadError> {
        self.repository
            .get_customer(id)
            .await?
            .ok_or(LeadError::NotFound(id))
    }

    /// Appends one exchange to the conversation log.
    pub async fn record_conversation(&self, entry: ConversationEntry) -> Result<(), LeadError> {
        if entry.message.trim().is_empty() {
            return Err(ValidationError::empty_field("message").into());
        }
        self.repository.record_conversation(entry).await?;
        Ok(())
    }

    /// Probes the backing store.
    pub async fn health_check(&self) -> Result<(), LeadError> {
        self.repository.ping().await?;
        Ok(())
    }
}
