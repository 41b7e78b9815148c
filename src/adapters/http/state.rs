//! Shared application state for all routers.

use std::sync::Arc;

use crate::application::{CatalogService, ChatOrchestrator, LeadService};

/// Services reachable from every handler.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatOrchestrator>,
    pub catalog: Arc<CatalogService>,
    pub leads: Arc<LeadService>,
}

impl AppState {
    pub fn new(
        chat: Arc<ChatOrchestrator>,
        catalog: Arc<CatalogService>,
        leads: Arc<LeadService>,
    ) -> Self {
        Self {
            chat,
            catalog,
            leads,
        }
    }
}
