//! Error types for the detector proxy.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use detector_common::{ErrorResponse, PredictErrorResponse, TokenErrorResponse, UpstreamStatus};
use serde_json::Value;

use crate::upstream::{UpstreamError, INVALID_RESPONSE, NETWORK_ERROR};

/// Details reported when the identity service gives no reason of its own.
const DEFAULT_TOKEN_DETAILS: &str = "Invalid API key";

/// Errors surfaced by the HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Token generation failed")]
    TokenFailed(#[source] UpstreamError),

    #[error("Prediction failed")]
    PredictionFailed(#[source] UpstreamError),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let message = self.to_string();

        match self {
            Error::InvalidRequest(_) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse { error: message }),
            )
                .into_response(),
            Error::TokenFailed(upstream) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(TokenErrorResponse {
                    error: message,
                    details: token_details(&upstream),
                }),
            )
                .into_response(),
            Error::PredictionFailed(upstream) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(PredictErrorResponse {
                    error: message,
                    details: prediction_details(&upstream),
                    status: prediction_status(&upstream),
                }),
            )
                .into_response(),
        }
    }
}

/// `null`, `false`, `0` and `""` carry no usable detail.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// The identity service's own `error` field, if it sent one.
fn token_details(err: &UpstreamError) -> Value {
    err.body()
        .and_then(|body| body.get("error"))
        .filter(|detail| !is_blank(detail))
        .cloned()
        .unwrap_or_else(|| Value::from(DEFAULT_TOKEN_DETAILS))
}

fn prediction_details(err: &UpstreamError) -> Value {
    match err {
        UpstreamError::Status { status, body } if is_blank(body) => {
            Value::from(format!("Request failed with status code {}", status))
        }
        UpstreamError::Status { body, .. } => body.clone(),
        UpstreamError::Transport(message) | UpstreamError::InvalidResponse(message) => {
            Value::from(message.as_str())
        }
    }
}

fn prediction_status(err: &UpstreamError) -> UpstreamStatus {
    match err {
        UpstreamError::Status { status, .. } => UpstreamStatus::Code(*status),
        UpstreamError::Transport(_) => UpstreamStatus::Reason(NETWORK_ERROR.to_string()),
        UpstreamError::InvalidResponse(_) => UpstreamStatus::Reason(INVALID_RESPONSE.to_string()),
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::json;

    async fn render(err: Error) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_invalid_request_is_400() {
        let (status, body) =
            render(Error::InvalidRequest("Token and text are required".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Token and text are required"}));
    }

    #[tokio::test]
    async fn test_token_failure_uses_upstream_error_field() {
        let err = Error::TokenFailed(UpstreamError::Status {
            status: 400,
            body: json!({"errorCode": "BXNIM0415E", "error": "Provided API key could not be found"}),
        });
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], json!("Token generation failed"));
        assert_eq!(body["details"], json!("Provided API key could not be found"));
    }

    #[tokio::test]
    async fn test_token_failure_with_blank_upstream_reason() {
        for blank in [json!(""), json!(null), json!(false), json!(0)] {
            let err = Error::TokenFailed(UpstreamError::Status {
                status: 400,
                body: json!({"errorCode": "BXNIM0415E", "error": blank}),
            });
            let (_, body) = render(err).await;
            assert_eq!(body["details"], json!("Invalid API key"));
        }
    }

    #[tokio::test]
    async fn test_prediction_failure_with_blank_body() {
        let err = Error::PredictionFailed(UpstreamError::Status {
            status: 502,
            body: json!(""),
        });
        let (_, body) = render(err).await;
        assert_eq!(body["status"], json!(502));
        assert_eq!(body["details"], json!("Request failed with status code 502"));
    }

    #[tokio::test]
    async fn test_token_failure_without_upstream_reason() {
        let err = Error::TokenFailed(UpstreamError::Transport("connection refused".into()));
        let (_, body) = render(err).await;
        assert_eq!(body["details"], json!("Invalid API key"));
    }

    #[tokio::test]
    async fn test_prediction_failure_with_status() {
        let err = Error::PredictionFailed(UpstreamError::Status {
            status: 401,
            body: json!({"errors": [{"code": "authentication_token_expired"}]}),
        });
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], json!("Prediction failed"));
        assert_eq!(body["status"], json!(401));
        assert_eq!(body["details"]["errors"][0]["code"], json!("authentication_token_expired"));
    }

    #[tokio::test]
    async fn test_prediction_failure_without_response() {
        let err = Error::PredictionFailed(UpstreamError::Transport(
            "timeout of 30000ms exceeded".into(),
        ));
        let (_, body) = render(err).await;
        assert_eq!(body["status"], json!("Network Error"));
        assert_eq!(body["details"], json!("timeout of 30000ms exceeded"));
    }

    #[tokio::test]
    async fn test_prediction_failure_invalid_body() {
        let err = Error::PredictionFailed(UpstreamError::InvalidResponse(
            "response contains no predictions".into(),
        ));
        let (_, body) = render(err).await;
        assert_eq!(body["status"], json!("Invalid Response"));
    }
}
