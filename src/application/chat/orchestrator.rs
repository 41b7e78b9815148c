//! ChatOrchestrator - Runs the conversation lifecycle for lead chats.
//!
//! Each turn tries the remote model first and falls back to rule-based
//! replies on any gateway failure, so a reply is always produced. Catalog
//! matches are spliced onto every reply in non-repeating batches.
//!
//! A turn holds the session's lock from lookup to the final history append,
//! so two messages for the same session are processed one after the other.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, info, warn};

use crate::domain::chat::synthesizer::{self, GreetingInput, ReplyInput};
use crate::domain::chat::{build_system_prompt, ChatSession, SpliceOptions};
use crate::domain::foundation::{CustomerId, SessionId, Timestamp};
use crate::ports::{ChatGateway, ChatTurn, ProductCatalog, SessionStore};

use super::errors::ChatError;
use super::recommendations::RecommendationSelector;

/// Sent after the system prompt when asking the model for the opening message.
const GREETING_REQUEST: &str =
    "Greet me by name and briefly explain how you can help me choose a plan.";

/// Tunables for the orchestrator.
#[derive(Debug, Clone)]
pub struct ChatOrchestratorConfig {
    /// Products appended to a rule-based reply.
    pub recommendation_batch_size: usize,
    /// Quiet period after which a session may be reaped.
    pub idle_timeout: Duration,
}

impl Default for ChatOrchestratorConfig {
    fn default() -> Self {
        Self {
            recommendation_batch_size: 2,
            idle_timeout: Duration::from_secs(3600),
        }
    }
}

impl ChatOrchestratorConfig {
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.recommendation_batch_size = size;
        self
    }

    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }
}

/// Result of starting a conversation.
#[derive(Debug, Clone)]
pub struct InitializedChat {
    /// The opening assistant message.
    pub message: String,
    /// The session as stored.
    pub session: ChatSession,
}

/// Coordinates sessions, the model gateway, and recommendations.
pub struct ChatOrchestrator {
    sessions: Arc<dyn SessionStore>,
    gateway: Arc<dyn ChatGateway>,
    selector: RecommendationSelector,
    config: ChatOrchestratorConfig,
}

impl ChatOrchestrator {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        gateway: Arc<dyn ChatGateway>,
        catalog: Arc<dyn ProductCatalog>,
    ) -> Self {
        Self::with_config(sessions, gateway, catalog, ChatOrchestratorConfig::default())
    }

    pub fn with_config(
        sessions: Arc<dyn SessionStore>,
        gateway: Arc<dyn ChatGateway>,
        catalog: Arc<dyn ProductCatalog>,
        config: ChatOrchestratorConfig,
    ) -> Self {
        Self {
            sessions,
            gateway,
            selector: RecommendationSelector::new(catalog),
            config,
        }
    }

    /// Starts (or restarts) a conversation and returns the opening message.
    ///
    /// An existing session with the same id is replaced.
    pub async fn initialize(
        &self,
        session_id: SessionId,
        form_data: Map<String, Value>,
        customer_id: Option<CustomerId>,
    ) -> Result<InitializedChat, ChatError> {
        let mut session = ChatSession::new(session_id, form_data, customer_id);
        self.selector.refresh(&mut session, true).await;

        let turns = [
            ChatTurn::system(build_system_prompt(
                session.context(),
                session.product_recommendations(),
            )),
            ChatTurn::user(GREETING_REQUEST),
        ];

        let base = match self.gateway.call(&turns).await {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    session_id = %session.id(),
                    error = %e,
                    "Model unavailable for greeting, using rule-based greeting"
                );
                synthesizer::greeting(&GreetingInput::from_context(session.context()))
            }
        };

        let message = self
            .selector
            .annotate(&mut session, &base, SpliceOptions::with_follow_up(1));
        session.push_assistant(message.clone());

        let snapshot = session.clone();
        if self.sessions.insert(session).await? {
            warn!(
                session_id = %snapshot.id(),
                "Session re-initialized, previous conversation discarded"
            );
        }

        info!(
            session_id = %snapshot.id(),
            recommendations = snapshot.product_recommendations().len(),
            "Chat session initialized"
        );

        Ok(InitializedChat {
            message,
            session: snapshot,
        })
    }

    /// Processes one user message and returns the assistant reply.
    ///
    /// Fails only when the session does not exist (or the store is down);
    /// model and catalog failures are absorbed.
    pub async fn handle_message(
        &self,
        session_id: &SessionId,
        message: &str,
        form_data_patch: Option<&Map<String, Value>>,
    ) -> Result<String, ChatError> {
        let mut session = self.lock_live_session(session_id).await?;

        let mut force_refresh = false;
        if let Some(patch) = form_data_patch.filter(|patch| !patch.is_empty()) {
            let merge = session.merge_form_data(patch);
            if merge.requires_refresh {
                debug!(
                    session_id = %session_id,
                    changed = ?merge.changed_keys,
                    "Discriminating fields changed, refreshing recommendations"
                );
            }
            force_refresh = merge.requires_refresh;
        }

        self.selector.refresh(&mut session, force_refresh).await;
        session.push_user(message);

        let mut turns = Vec::with_capacity(session.history().len() + 1);
        turns.push(ChatTurn::system(build_system_prompt(
            session.context(),
            session.product_recommendations(),
        )));
        turns.extend(session.history().iter().map(ChatTurn::from));

        let (base, options) = match self.gateway.call(&turns).await {
            Ok(text) => (text, SpliceOptions::with_follow_up(1)),
            Err(e) => {
                warn!(
                    session_id = %session_id,
                    error = %e,
                    "Model unavailable, using rule-based reply"
                );
                let prior = session
                    .history()
                    .split_last()
                    .map(|(_, prior)| prior)
                    .unwrap_or_default();
                let reply = synthesizer::reply(&ReplyInput {
                    message,
                    context: session.context(),
                    history: prior,
                });
                (
                    reply,
                    SpliceOptions::with_follow_up(self.config.recommendation_batch_size),
                )
            }
        };

        let reply = self.selector.annotate(&mut session, &base, options);
        session.push_assistant(reply.clone());

        info!(
            session_id = %session_id,
            turns = session.history().len(),
            remaining_recommendations = session.remaining_recommendations(),
            "Chat message processed"
        );

        Ok(reply)
    }

    /// Locks the session currently registered under `session_id`.
    ///
    /// The registry is checked again once the lock is held: a session ended
    /// or reaped while this call waited is reported as not found, and one
    /// replaced by a re-initialize is swapped for its replacement.
    async fn lock_live_session(
        &self,
        session_id: &SessionId,
    ) -> Result<OwnedMutexGuard<ChatSession>, ChatError> {
        let not_found = || ChatError::SessionNotFound(session_id.clone());
        let mut handle = self.sessions.get(session_id).await?.ok_or_else(not_found)?;

        loop {
            let guard = Arc::clone(&handle).lock_owned().await;
            match self.sessions.get(session_id).await? {
                Some(current) if Arc::ptr_eq(&current, &handle) => return Ok(guard),
                Some(current) => handle = current,
                None => return Err(not_found()),
            }
        }
    }

    /// Snapshot of a session, if it exists.
    pub async fn get_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<ChatSession>, ChatError> {
        match self.sessions.get(session_id).await? {
            Some(handle) => Ok(Some(handle.lock().await.clone())),
            None => Ok(None),
        }
    }

    /// Removes a session. Returns whether it existed.
    pub async fn end_session(&self, session_id: &SessionId) -> Result<bool, ChatError> {
        let removed = self.sessions.remove(session_id).await?;
        if removed {
            info!(session_id = %session_id, "Chat session ended");
        }
        Ok(removed)
    }

    /// Removes sessions idle for longer than the configured timeout.
    pub async fn reap_idle_sessions(&self) -> Result<usize, ChatError> {
        let cutoff = Timestamp::now().minus_secs(self.config.idle_timeout.as_secs());
        let removed = self.sessions.remove_idle(cutoff).await?;

        if !removed.is_empty() {
            info!(count = removed.len(), "Reaped idle chat sessions");
        }
        Ok(removed.len())
    }

    /// Number of live sessions.
    pub async fn active_sessions(&self) -> Result<usize, ChatError> {
        Ok(self.sessions.len().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockChatGateway;
    use crate::adapters::storage::{InMemoryProductCatalog, InMemorySessionStore};
    use crate::domain::catalog::{Product, ProductQuery};
    use crate::domain::chat::TurnRole;
    use crate::domain::foundation::ProductId;
    use crate::ports::{CatalogError, ChatRole, GatewayError};
    use async_trait::async_trait;
    use serde_json::json;

    struct FailingCatalog;

    #[async_trait]
    impl ProductCatalog for FailingCatalog {
        async fn get_products(&self, _query: &ProductQuery) -> Result<Vec<Product>, CatalogError> {
            Err(CatalogError::Unavailable("connection refused".to_string()))
        }
    }

    fn product(id: i64, product_type: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Plan {}", id),
            product_type: product_type.to_string(),
            target_gender: "all".to_string(),
            min_age: 18,
            max_age: 70,
            premium_amount: 1000.0 * id as f64,
            coverage_details: None,
            provider_name: None,
            is_active: true,
        }
    }

    fn form(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    fn sid(raw: &str) -> SessionId {
        SessionId::new(raw).unwrap()
    }

    fn product_lines(message: &str) -> Vec<&str> {
        message.lines().filter(|line| line.starts_with("- ")).collect()
    }

    struct Harness {
        store: Arc<InMemorySessionStore>,
        gateway: MockChatGateway,
        orchestrator: ChatOrchestrator,
    }

    fn harness(gateway: MockChatGateway, catalog: Arc<dyn ProductCatalog>) -> Harness {
        let store = Arc::new(InMemorySessionStore::new());
        let orchestrator =
            ChatOrchestrator::new(store.clone(), Arc::new(gateway.clone()), catalog);
        Harness {
            store,
            gateway,
            orchestrator,
        }
    }

    fn offline() -> MockChatGateway {
        MockChatGateway::failing(GatewayError::NotConfigured)
    }

    fn health_catalog(count: i64) -> Arc<dyn ProductCatalog> {
        Arc::new(InMemoryProductCatalog::new(
            (1..=count).map(|id| product(id, "health")).collect(),
        ))
    }

    #[tokio::test]
    async fn initialize_without_model_uses_health_greeting() {
        let h = harness(offline(), health_catalog(0));

        let chat = h
            .orchestrator
            .initialize(
                sid("s1"),
                form(json!({"name": "Asha", "insuranceType": "health", "zipCode": "110001"})),
                None,
            )
            .await
            .unwrap();

        assert!(chat.message.contains("Asha"));
        assert!(chat.message.contains("110001"));
        assert!(chat.message.contains("health"));
        assert_eq!(chat.session.history().len(), 1);
        assert_eq!(chat.session.history()[0].role, TurnRole::Assistant);
        assert_eq!(chat.session.history()[0].content, chat.message);
    }

    #[tokio::test]
    async fn initialize_appends_exactly_one_recommendation() {
        let h = harness(offline(), health_catalog(4));

        let chat = h
            .orchestrator
            .initialize(sid("s1"), form(json!({"insuranceType": "health"})), None)
            .await
            .unwrap();

        assert_eq!(product_lines(&chat.message), vec!["- Plan 1: ₹1,000/year"]);
        assert_eq!(chat.session.suggested_product_index(), 1);
        assert_eq!(chat.session.product_recommendations().len(), 4);
    }

    #[tokio::test]
    async fn initialize_prefers_model_greeting() {
        let gateway = MockChatGateway::new().with_reply("Namaste Asha, welcome!");
        let h = harness(gateway, health_catalog(2));

        let chat = h
            .orchestrator
            .initialize(
                sid("s1"),
                form(json!({"name": "Asha", "insuranceType": "health"})),
                None,
            )
            .await
            .unwrap();

        assert!(chat.message.starts_with("Namaste Asha, welcome!"));
        assert_eq!(product_lines(&chat.message).len(), 1);

        let sent = h.gateway.last_call().unwrap();
        assert_eq!(sent[0].role, ChatRole::System);
        assert!(sent[0].content.contains("Plan 1"));
        assert!(sent[0].content.contains("Asha"));
    }

    #[tokio::test]
    async fn initialize_twice_overwrites_session() {
        let h = harness(offline(), health_catalog(0));
        h.orchestrator
            .initialize(sid("s1"), form(json!({"name": "First"})), None)
            .await
            .unwrap();
        h.orchestrator
            .handle_message(&sid("s1"), "hello", None)
            .await
            .unwrap();

        h.orchestrator
            .initialize(sid("s1"), form(json!({"name": "Second"})), None)
            .await
            .unwrap();

        let session = h.orchestrator.get_session(&sid("s1")).await.unwrap().unwrap();
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.context().name().as_deref(), Some("Second"));
        assert_eq!(h.store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unknown_session_is_rejected_without_side_effects() {
        let h = harness(offline(), health_catalog(3));

        let result = h
            .orchestrator
            .handle_message(&sid("unknown-session"), "hi", None)
            .await;

        assert!(matches!(
            result,
            Err(ChatError::SessionNotFound(id)) if id.as_str() == "unknown-session"
        ));
        assert_eq!(h.store.len().await.unwrap(), 0);
        assert_eq!(h.gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn fallback_turns_walk_the_list_in_batches() {
        let h = harness(offline(), health_catalog(0));
        let mut session = ChatSession::new(sid("s1"), form(json!({"name": "Asha"})), None);
        session.replace_recommendations((1..=5).map(|id| product(id, "health")).collect());
        h.store.insert(session).await.unwrap();

        let first = h
            .orchestrator
            .handle_message(&sid("s1"), "hello", None)
            .await
            .unwrap();
        let second = h
            .orchestrator
            .handle_message(&sid("s1"), "hello again", None)
            .await
            .unwrap();
        let third = h
            .orchestrator
            .handle_message(&sid("s1"), "anything else", None)
            .await
            .unwrap();
        let fourth = h
            .orchestrator
            .handle_message(&sid("s1"), "more?", None)
            .await
            .unwrap();

        assert_eq!(
            product_lines(&first),
            vec!["- Plan 1: ₹1,000/year", "- Plan 2: ₹2,000/year"]
        );
        assert_eq!(
            product_lines(&second),
            vec!["- Plan 3: ₹3,000/year", "- Plan 4: ₹4,000/year"]
        );
        assert_eq!(product_lines(&third), vec!["- Plan 5: ₹5,000/year"]);
        assert!(product_lines(&fourth).is_empty());
    }

    #[tokio::test]
    async fn model_reply_gets_single_recommendation() {
        let gateway = MockChatGateway::new();
        let h = harness(gateway, health_catalog(5));
        h.orchestrator
            .initialize(sid("s1"), form(json!({"insuranceType": "health"})), None)
            .await
            .unwrap();

        let reply = h
            .orchestrator
            .handle_message(&sid("s1"), "what do you suggest?", None)
            .await
            .unwrap();

        assert!(reply.starts_with("Mock response"));
        assert_eq!(product_lines(&reply), vec!["- Plan 2: ₹2,000/year"]);
    }

    #[tokio::test]
    async fn model_receives_full_history_behind_fresh_prompt() {
        let gateway = MockChatGateway::new();
        let h = harness(gateway, health_catalog(0));
        h.orchestrator
            .initialize(sid("s1"), form(json!({"name": "Asha"})), None)
            .await
            .unwrap();
        h.orchestrator
            .handle_message(&sid("s1"), "first question", None)
            .await
            .unwrap();

        let patch = form(json!({"city": "Pune"}));
        h.orchestrator
            .handle_message(&sid("s1"), "second question", Some(&patch))
            .await
            .unwrap();

        let sent = h.gateway.last_call().unwrap();
        let roles: Vec<ChatRole> = sent.iter().map(|turn| turn.role).collect();
        assert_eq!(
            roles,
            vec![
                ChatRole::System,
                ChatRole::Assistant,
                ChatRole::User,
                ChatRole::Assistant,
                ChatRole::User
            ]
        );
        assert!(sent[0].content.contains("Pune"));
        assert_eq!(sent[4].content, "second question");
    }

    #[tokio::test]
    async fn category_change_forces_refresh_and_resets_cursor() {
        let catalog = Arc::new(InMemoryProductCatalog::new(vec![
            product(1, "health"),
            product(2, "health"),
            product(3, "auto"),
            product(4, "auto"),
        ]));
        let h = harness(offline(), catalog);
        h.orchestrator
            .initialize(sid("s1"), form(json!({"insuranceType": "health"})), None)
            .await
            .unwrap();

        let patch = form(json!({"insuranceType": "car"}));
        let reply = h
            .orchestrator
            .handle_message(&sid("s1"), "hello", Some(&patch))
            .await
            .unwrap();

        assert_eq!(
            product_lines(&reply),
            vec!["- Plan 3: ₹3,000/year", "- Plan 4: ₹4,000/year"]
        );
        let session = h.orchestrator.get_session(&sid("s1")).await.unwrap().unwrap();
        assert_eq!(session.suggested_product_index(), 2);
    }

    #[tokio::test]
    async fn non_discriminating_patch_keeps_cursor() {
        let h = harness(offline(), health_catalog(5));
        h.orchestrator
            .initialize(sid("s1"), form(json!({"insuranceType": "health"})), None)
            .await
            .unwrap();

        let patch = form(json!({"name": "Asha", "insuranceType": ""}));
        let reply = h
            .orchestrator
            .handle_message(&sid("s1"), "hello", Some(&patch))
            .await
            .unwrap();

        assert_eq!(
            product_lines(&reply),
            vec!["- Plan 2: ₹2,000/year", "- Plan 3: ₹3,000/year"]
        );
    }

    #[tokio::test]
    async fn catalog_outage_degrades_to_plain_replies() {
        let h = harness(offline(), Arc::new(FailingCatalog));

        let chat = h
            .orchestrator
            .initialize(
                sid("s1"),
                form(json!({"name": "Asha", "insuranceType": "health"})),
                None,
            )
            .await
            .unwrap();
        let reply = h
            .orchestrator
            .handle_message(&sid("s1"), "how much does it cost?", None)
            .await
            .unwrap();

        assert!(product_lines(&chat.message).is_empty());
        assert!(product_lines(&reply).is_empty());
        assert!(reply.contains("Asha"));
    }

    #[tokio::test]
    async fn turns_are_recorded_in_order() {
        let h = harness(offline(), health_catalog(0));
        h.orchestrator
            .initialize(sid("s1"), form(json!({})), None)
            .await
            .unwrap();

        let reply = h
            .orchestrator
            .handle_message(&sid("s1"), "hello", None)
            .await
            .unwrap();

        let session = h.orchestrator.get_session(&sid("s1")).await.unwrap().unwrap();
        let roles: Vec<TurnRole> = session.history().iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![TurnRole::Assistant, TurnRole::User, TurnRole::Assistant]
        );
        assert_eq!(session.history()[1].content, "hello");
        assert_eq!(session.history()[2].content, reply);
    }

    #[tokio::test]
    async fn concurrent_turns_on_one_session_are_serialized() {
        let gateway = MockChatGateway::new().with_delay(Duration::from_millis(20));
        let h = harness(gateway, health_catalog(0));
        h.orchestrator
            .initialize(sid("s1"), form(json!({})), None)
            .await
            .unwrap();
        let orchestrator = Arc::new(h.orchestrator);

        let tasks: Vec<_> = (0..5)
            .map(|i| {
                let orchestrator = orchestrator.clone();
                tokio::spawn(async move {
                    orchestrator
                        .handle_message(&sid("s1"), &format!("message {}", i), None)
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let session = orchestrator.get_session(&sid("s1")).await.unwrap().unwrap();
        assert_eq!(session.history().len(), 11);
        for pair in session.history()[1..].chunks(2) {
            assert_eq!(pair[0].role, TurnRole::User);
            assert_eq!(pair[1].role, TurnRole::Assistant);
        }
    }

    #[tokio::test]
    async fn turn_waiting_on_a_session_that_is_removed_reports_not_found() {
        let h = harness(offline(), health_catalog(0));
        h.orchestrator
            .initialize(sid("s1"), form(json!({})), None)
            .await
            .unwrap();
        let handle = h.store.get(&sid("s1")).await.unwrap().unwrap();
        let held = handle.lock().await;

        let orchestrator = Arc::new(h.orchestrator);
        let turn = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.handle_message(&sid("s1"), "hi", None).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(h.store.remove(&sid("s1")).await.unwrap());
        drop(held);

        let result = turn.await.unwrap();
        assert!(matches!(result, Err(ChatError::SessionNotFound(_))));
        assert_eq!(handle.lock().await.history().len(), 1);
    }

    #[tokio::test]
    async fn turn_waiting_on_a_replaced_session_lands_on_the_replacement() {
        let h = harness(offline(), health_catalog(0));
        h.orchestrator
            .initialize(sid("s1"), form(json!({"name": "First"})), None)
            .await
            .unwrap();
        let handle = h.store.get(&sid("s1")).await.unwrap().unwrap();
        let held = handle.lock().await;

        let orchestrator = Arc::new(h.orchestrator);
        let turn = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.handle_message(&sid("s1"), "hi", None).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        orchestrator
            .initialize(sid("s1"), form(json!({"name": "Second"})), None)
            .await
            .unwrap();
        drop(held);

        turn.await.unwrap().unwrap();
        let session = orchestrator.get_session(&sid("s1")).await.unwrap().unwrap();
        assert_eq!(session.context().name().as_deref(), Some("Second"));
        assert_eq!(session.history().len(), 3);
        assert_eq!(handle.lock().await.history().len(), 1);
    }

    #[tokio::test]
    async fn end_session_removes_it() {
        let h = harness(offline(), health_catalog(0));
        h.orchestrator
            .initialize(sid("s1"), form(json!({})), None)
            .await
            .unwrap();

        assert!(h.orchestrator.end_session(&sid("s1")).await.unwrap());
        assert!(!h.orchestrator.end_session(&sid("s1")).await.unwrap());
        assert!(h.orchestrator.get_session(&sid("s1")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reaper_removes_sessions_past_idle_timeout() {
        let store = Arc::new(InMemorySessionStore::new());
        let orchestrator = ChatOrchestrator::with_config(
            store.clone(),
            Arc::new(offline()),
            health_catalog(0),
            ChatOrchestratorConfig::default().with_idle_timeout(Duration::ZERO),
        );
        orchestrator
            .initialize(sid("s1"), form(json!({})), None)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(orchestrator.reap_idle_sessions().await.unwrap(), 1);
        assert_eq!(orchestrator.active_sessions().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn reaper_keeps_recent_sessions() {
        let h = harness(offline(), health_catalog(0));
        h.orchestrator
            .initialize(sid("s1"), form(json!({})), None)
            .await
            .unwrap();

        assert_eq!(h.orchestrator.reap_idle_sessions().await.unwrap(), 0);
        assert_eq!(h.orchestrator.active_sessions().await.unwrap(), 1);
    }
}
