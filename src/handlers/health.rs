use crate::core::state::AppState;
use crate::utils::time::unix_now;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: i64,
    pub sessions: usize,
}

/// Health check handler; reports "degraded" when the store cannot be read
///
/// GET /health
pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (status, label) = match state.users.count() {
        Ok(_) => (StatusCode::OK, "ok"),
        Err(e) => {
            error!(error = %e, "Health check could not read the user store");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded")
        }
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            timestamp: unix_now(),
            sessions: state.sessions.len(),
        }),
    )
}
