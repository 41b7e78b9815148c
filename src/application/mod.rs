//! Application layer - Use-case services.
//!
//! Services orchestrate domain types and ports; they hold no transport
//! concerns and are shared by the HTTP adapters.

pub mod catalog;
pub mod chat;
pub mod leads;

pub use catalog::CatalogService;
pub use chat::{ChatError, ChatOrchestrator, ChatOrchestratorConfig, SessionReaper};
pub use leads::{LeadError, LeadService};
