//! Chat session aggregate.
//!
//! A session owns the merged intake context, the append-only turn history,
//! and the cached recommendation list with its read cursor.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::catalog::Product;
use crate::domain::foundation::{CustomerId, SessionId, Timestamp};

use super::fields::{is_discriminating_field, IntakeFields};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl TurnRole {
    /// Wire name used by chat-completion APIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }
}

/// One entry of the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
    pub timestamp: Timestamp,
}

impl Turn {
    /// Creates a user turn stamped now.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
            timestamp: Timestamp::now(),
        }
    }

    /// Creates an assistant turn stamped now.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
            timestamp: Timestamp::now(),
        }
    }
}

/// Outcome of merging a form patch into a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormMerge {
    /// Context keys whose value changed.
    pub changed_keys: Vec<String>,
    /// Whether any changed key affects product selection.
    pub requires_refresh: bool,
}

/// Conversation state for one lead.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    id: SessionId,
    form_data: IntakeFields,
    context: IntakeFields,
    history: Vec<Turn>,
    product_recommendations: Vec<Product>,
    suggested_product_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    customer_id: Option<CustomerId>,
    created_at: Timestamp,
}

impl ChatSession {
    /// Starts a session from the intake form.
    ///
    /// The context begins as the non-empty subset of the form.
    pub fn new(
        id: SessionId,
        form_data: Map<String, Value>,
        customer_id: Option<CustomerId>,
    ) -> Self {
        let context = IntakeFields::non_empty_from(&form_data);
        Self {
            id,
            form_data: IntakeFields::from_map(form_data),
            context,
            history: Vec::new(),
            product_recommendations: Vec::new(),
            suggested_product_index: 0,
            customer_id,
            created_at: Timestamp::now(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn form_data(&self) -> &IntakeFields {
        &self.form_data
    }

    pub fn context(&self) -> &IntakeFields {
        &self.context
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn product_recommendations(&self) -> &[Product] {
        &self.product_recommendations
    }

    pub fn suggested_product_index(&self) -> usize {
        self.suggested_product_index
    }

    pub fn customer_id(&self) -> Option<CustomerId> {
        self.customer_id
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Products not yet shown.
    pub fn remaining_recommendations(&self) -> usize {
        self.product_recommendations
            .len()
            .saturating_sub(self.suggested_product_index)
    }

    /// Time of the most recent turn, or creation time for an empty history.
    pub fn last_activity(&self) -> Timestamp {
        self.history
            .last()
            .map(|turn| turn.timestamp)
            .unwrap_or(self.created_at)
    }

    /// Whether the session has been quiet since before `cutoff`.
    pub fn is_idle_since(&self, cutoff: &Timestamp) -> bool {
        self.last_activity().is_before(cutoff)
    }

    /// Merges a form patch into both the form data and the context.
    pub fn merge_form_data(&mut self, patch: &Map<String, Value>) -> FormMerge {
        self.form_data.merge(patch);
        let changed_keys = self.context.merge(patch);
        let requires_refresh = changed_keys.iter().any(|key| is_discriminating_field(key));
        FormMerge {
            changed_keys,
            requires_refresh,
        }
    }

    /// Appends a user turn.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.history.push(Turn::user(content));
    }

    /// Appends an assistant turn.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.history.push(Turn::assistant(content));
    }

    /// Replaces the cached recommendations wholesale and rewinds the cursor.
    pub fn replace_recommendations(&mut self, products: Vec<Product>) {
        self.product_recommendations = products;
        self.suggested_product_index = 0;
    }

    /// Takes the next `max(1, count)` unseen products, clipped to what is left.
    ///
    /// The cursor advances by the number returned; an exhausted list yields
    /// empty batches rather than wrapping around.
    pub fn next_batch(&mut self, count: usize) -> Vec<Product> {
        let len = self.product_recommendations.len();
        let start = self.suggested_product_index.min(len);
        let end = (start + count.max(1)).min(len);
        let batch = self.product_recommendations[start..end].to_vec();
        self.suggested_product_index = end;
        batch
    }
}
