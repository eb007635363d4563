//! Health check endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use detector_common::HealthResponse;

use crate::state::AppState;

pub const SERVICE_NAME: &str = "AI Detector Proxy";
pub const ANALYSIS_MODE: &str = "Full paragraph analysis";

/// GET /api/health - Static status, never touches the upstream.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        service: SERVICE_NAME.to_string(),
        mode: ANALYSIS_MODE.to_string(),
        api_configured: !state.config.watson.api_key.is_empty(),
    })
}
