//! HTTP API exposed to the browser client.

pub mod health;
pub mod predict;
pub mod token;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the API router, mounted under `/api`.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/token", post(token::token))
        .route("/predict", post(predict::predict))
        .route("/health", get(health::health))
}
