//! Health check endpoint.

use axum::Json;
use axum::extract::State;
use chrono::{SecondsFormat, Utc};

use crate::AppState;
use crate::models::HealthResponse;

/// `GET /api/health`: liveness, uptime and environment.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime: state.started_at.elapsed().as_secs_f64(),
        environment: state.config.environment.to_string(),
    })
}
