//! In-Memory Lead Repository Adapter
//!
//! Stores customers and conversation logs in memory.
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{CustomerId, Timestamp};
use crate::domain::lead::{ConversationEntry, CustomerData, CustomerRecord};
use crate::ports::{LeadRepository, LeadRepositoryError};

/// In-memory storage for leads
#[derive(Debug, Clone)]
pub struct InMemoryLeadRepository {
    customers: Arc<RwLock<HashMap<CustomerId, CustomerRecord>>>,
    conversations: Arc<RwLock<Vec<ConversationEntry>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryLeadRepository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self {
            customers: Arc::new(RwLock::new(HashMap::new())),
            conversations: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Get the number of stored customers
    pub async fn customer_count(&self) -> usize {
        self.customers.read().await.len()
    }

    /// Get the conversation log for a customer, oldest first
    pub async fn conversations_for(&self, customer_id: CustomerId) -> Vec<ConversationEntry> {
        self.conversations
            .read()
            .await
            .iter()
            .filter(|entry| entry.customer_id == customer_id)
            .cloned()
            .collect()
    }
}

impl Default for InMemoryLeadRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LeadRepository for InMemoryLeadRepository {
    async fn store_customer(
        &self,
        data: CustomerData,
    ) -> Result<CustomerRecord, LeadRepositoryError> {
        let customer_id = CustomerId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let record = CustomerRecord {
            customer_id,
            data,
            created_at: Timestamp::now(),
        };

        self.customers
            .write()
            .await
            .insert(customer_id, record.clone());
        Ok(record)
    }

    async fn get_customer(
        &self,
        id: CustomerId,
    ) -> Result<Option<CustomerRecord>, LeadRepositoryError> {
        Ok(self.customers.read().await.get(&id).cloned())
    }

    async fn record_conversation(
        &self,
        entry: ConversationEntry,
    ) -> Result<(), LeadRepositoryError> {
        self.conversations.write().await.push(entry);
        Ok(())
    }

    async fn ping(&self) -> Result<(), LeadRepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;

    fn customer(name: &str) -> CustomerData {
        CustomerData {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "9876543210".to_string(),
            age: Some(34),
            gender: Some("female".to_string()),
            zip_code: "560001".to_string(),
            insurance_type: "health".to_string(),
            vehicle_number: None,
            vehicle_model: None,
            vehicle_year: None,
            medical_history: None,
            coverage_amount: Some(500_000.0),
            monthly_investment: None,
            investment_goal: None,
            current_provider: None,
        }
    }

    #[tokio::test]
    async fn store_assigns_sequential_ids() {
        let repo = InMemoryLeadRepository::new();

        let first = repo.store_customer(customer("Asha")).await.unwrap();
        let second = repo.store_customer(customer("Ravi")).await.unwrap();

        assert_eq!(first.customer_id.value(), 1);
        assert_eq!(second.customer_id.value(), 2);
        assert_eq!(repo.customer_count().await, 2);
    }

    #[tokio::test]
    async fn get_customer_returns_stored_record() {
        let repo = InMemoryLeadRepository::new();
        let stored = repo.store_customer(customer("Asha")).await.unwrap();

        let loaded = repo.get_customer(stored.customer_id).await.unwrap();

        assert_eq!(loaded, Some(stored));
        assert!(repo
            .get_customer(CustomerId::new(99))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn conversations_are_kept_per_customer() {
        let repo = InMemoryLeadRepository::new();
        let entry = |customer_id: i64, message: &str| ConversationEntry {
            customer_id: CustomerId::new(customer_id),
            session_id: SessionId::new("s1").unwrap(),
            message: message.to_string(),
            response: "ok".to_string(),
            message_type: "user".to_string(),
        };

        repo.record_conversation(entry(1, "first")).await.unwrap();
        repo.record_conversation(entry(2, "other")).await.unwrap();
        repo.record_conversation(entry(1, "second")).await.unwrap();

        let log = repo.conversations_for(CustomerId::new(1)).await;
        let messages: Vec<&str> = log.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }
}
