//! Chat application services.
//!
//! - `ChatOrchestrator` - session lifecycle and per-turn reply generation
//! - `RecommendationSelector` - catalog refresh and batch splicing
//! - `SessionReaper` - background removal of idle sessions

mod errors;
mod orchestrator;
mod reaper;
mod recommendations;

pub use errors::ChatError;
pub use orchestrator::{ChatOrchestrator, ChatOrchestratorConfig, InitializedChat};
pub use reaper::SessionReaper;
pub use recommendations::RecommendationSelector;
