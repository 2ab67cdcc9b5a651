//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
  pub status: &'static str,
  pub version: &'static str,
  pub timestamp: String,
  pub uptime_secs: u64,
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
  Json(HealthResponse {
    status: "ok",
    version: env!("CARGO_PKG_VERSION"),
    timestamp: Utc::now().to_rfc3339(),
    uptime_secs: state.started.elapsed().as_secs(),
  })
}
