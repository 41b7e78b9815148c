//! Service banner and liveness probe.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::foundation::Timestamp;

use super::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerResponse {
    pub message: String,
    pub status: String,
    pub version: String,
}

/// Liveness report. Always served with 200; `status` carries the verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub active_sessions: usize,
    pub timestamp: String,
}

/// Creates the health router.
///
/// Routes:
/// - `GET /` - Service banner
/// - `GET /api/health` - Liveness and lead store probe
pub fn health_router() -> Router<AppState> {
    Router::new()
        .route("/", get(banner))
        .route("/api/health", get(health_check))
}

async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "PolicyPal insurance assistant API".to_string(),
        status: "running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let active_sessions = state.chat.active_sessions().await.unwrap_or_default();

    let response = match state.leads.health_check().await {
        Ok(()) => HealthResponse {
            status: "healthy".to_string(),
            database: "connected".to_string(),
            error: None,
            active_sessions,
            timestamp: Timestamp::now().to_rfc3339(),
        },
        Err(e) => {
            warn!(error = %e, "Health check failed");
            HealthResponse {
                status: "unhealthy".to_string(),
                database: "disconnected".to_string(),
                error: Some(e.to_string()),
                active_sessions,
                timestamp: Timestamp::now().to_rfc3339(),
            }
        }
    };

    (StatusCode::OK, Json(response))
}
