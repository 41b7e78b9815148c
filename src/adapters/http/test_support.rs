//! Router fixtures for handler tests.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use crate::adapters::ai::MockChatGateway;
use crate::adapters::storage::{
    InMemoryLeadRepository, InMemoryProductCatalog, InMemorySessionStore,
};
use crate::application::{CatalogService, ChatOrchestrator, LeadService};
use crate::ports::GatewayError;

use super::{api_router, AppState};

/// In-memory wiring with a model gateway that is never configured.
pub(crate) struct TestApp {
    pub router: Router,
    pub leads: Arc<InMemoryLeadRepository>,
}

impl TestApp {
    pub(crate) fn new() -> Self {
        Self::with_gateway(MockChatGateway::failing(GatewayError::NotConfigured))
    }

    pub(crate) fn with_gateway(gateway: MockChatGateway) -> Self {
        let catalog = Arc::new(InMemoryProductCatalog::with_demo_products());
        let leads = Arc::new(InMemoryLeadRepository::new());
        let chat = Arc::new(ChatOrchestrator::new(
            Arc::new(InMemorySessionStore::new()),
            Arc::new(gateway),
            catalog.clone(),
        ));
        let state = AppState::new(
            chat,
            Arc::new(CatalogService::new(catalog)),
            Arc::new(LeadService::new(leads.clone())),
        );

        Self {
            router: api_router(state),
            leads,
        }
    }

    /// Sends a request and decodes the JSON body (`Value::Null` when empty).
    pub(crate) async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub(crate) async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request(Method::POST, uri, body)).await
    }

    pub(crate) async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(empty_request(Method::GET, uri)).await
    }

    pub(crate) async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(empty_request(Method::DELETE, uri)).await
    }
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}
