//! Health and liveness endpoint handlers.
//!
//! Chaos nodes typically run under an orchestrator; these endpoints give it
//! something to probe without touching the routing path.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use super::AppState;

/// Returns the node identity and uptime as JSON.
pub async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "service": state.engine.service_name(),
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

/// Liveness probe -- always returns 200 OK while the process is responsive.
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}
