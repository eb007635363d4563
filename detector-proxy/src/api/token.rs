//! IAM token endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use detector_common::TokenRequest;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::state::AppState;

/// POST /api/token - Exchange an API key for a bearer token.
///
/// The body is optional; without a usable `apikey` the configured key is used.
pub async fn token(
    State(state): State<Arc<AppState>>,
    request: Option<Json<TokenRequest>>,
) -> Result<Json<Value>> {
    tracing::info!("Token request received");

    let override_key = request
        .and_then(|Json(req)| req.apikey)
        .filter(|key| !key.is_empty());
    let api_key = override_key
        .as_deref()
        .unwrap_or(&state.config.watson.api_key);

    match state.upstream.request_token(api_key).await {
        Ok(body) => {
            tracing::info!("Token generated successfully");
            Ok(Json(body))
        }
        Err(e) => {
            tracing::error!(
                status = ?e.status(),
                body = ?e.body(),
                "Token generation failed: {}",
                e
            );
            Err(Error::TokenFailed(e))
        }
    }
}
