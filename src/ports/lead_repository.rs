//! Lead Repository Port - Persistence for customer intake and chat logs.

use async_trait::async_trait;

use crate::domain::foundation::CustomerId;
use crate::domain::lead::{ConversationEntry, CustomerData, CustomerRecord};

/// Errors from a lead storage backend.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LeadRepositoryError {
    #[error("database error: {0}")]
    Database(String),

    #[error("lead store unavailable: {0}")]
    Unavailable(String),
}

/// Port for storing leads.
#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// Persists a validated customer and returns the stored record.
    async fn store_customer(
        &self,
        data: CustomerData,
    ) -> Result<CustomerRecord, LeadRepositoryError>;

    /// Loads a customer by id.
    async fn get_customer(
        &self,
        id: CustomerId,
    ) -> Result<Option<CustomerRecord>, LeadRepositoryError>;

    /// Appends one exchange to the conversation log.
    async fn record_conversation(
        &self,
        entry: ConversationEntry,
    ) -> Result<(), LeadRepositoryError>;

    /// Cheap connectivity probe for health checks.
    async fn ping(&self) -> Result<(), LeadRepositoryError>;
}
