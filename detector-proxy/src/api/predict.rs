//! Text classification endpoint.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use detector_common::{PredictRequest, PredictResponse};

use crate::analysis;
use crate::error::{Error, Result};
use crate::state::AppState;
use crate::upstream::UpstreamError;

const MISSING_FIELDS: &str = "Token and text are required";

/// POST /api/predict - Classify a paragraph as AI-generated or human-written.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    request: std::result::Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>> {
    tracing::info!("Prediction request received");

    let Json(request) = request.map_err(|rejection| {
        tracing::warn!("Rejected prediction body: {}", rejection.body_text());
        match rejection {
            // Well-formed JSON whose fields are not strings
            JsonRejection::JsonDataError(_) => Error::InvalidRequest(MISSING_FIELDS.to_string()),
            other => Error::InvalidRequest(other.body_text()),
        }
    })?;

    let (token, text) = match (request.token, request.text) {
        (Some(token), Some(text)) if !token.is_empty() && !text.is_empty() => (token, text),
        _ => {
            tracing::warn!("Prediction request missing token or text");
            return Err(Error::InvalidRequest(MISSING_FIELDS.to_string()));
        }
    };

    tracing::info!(text_length = analysis::text_length(&text), "Analyzing full paragraph");

    let response = state
        .upstream
        .score(&token, &text)
        .await
        .map_err(prediction_failed)?;

    let prediction = analysis::extract(&response)
        .map_err(|e| prediction_failed(UpstreamError::InvalidResponse(e.to_string())))?;

    let result = analysis::analyze(&prediction, &text);

    tracing::info!(
        "Analysis complete: {} ({:.1}% AI)",
        result.overall.classification,
        prediction.ai_probability * 100.0
    );

    Ok(Json(result))
}

fn prediction_failed(e: UpstreamError) -> Error {
    tracing::error!(
        status = ?e.status(),
        body = ?e.body(),
        "Prediction failed: {}",
        e
    );
    Error::PredictionFailed(e)
}
