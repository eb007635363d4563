//! Upstream service abstraction.
//!
//! This module defines the `InferenceService` trait that hides the identity
//! and scoring endpoints behind a common interface, so handlers can be
//! exercised without a live Watson deployment.

mod watson;

pub use watson::WatsonClient;

use async_trait::async_trait;
use detector_common::ScoringResponse;
use serde_json::Value;

/// Reason reported when the upstream never answered.
pub const NETWORK_ERROR: &str = "Network Error";
/// Reason reported when the upstream answered with an unusable body.
pub const INVALID_RESPONSE: &str = "Invalid Response";

/// Failure talking to an upstream service.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The upstream answered with a non-success status.
    #[error("upstream returned status {status}")]
    Status { status: u16, body: Value },

    /// The request never produced a response (connect error, timeout, ...).
    #[error("{0}")]
    Transport(String),

    /// The upstream answered 2xx but the body could not be interpreted.
    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),
}

impl UpstreamError {
    /// HTTP status of the upstream response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Upstream error body, when there was one.
    pub fn body(&self) -> Option<&Value> {
        match self {
            UpstreamError::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// The two Watson operations the proxy relays.
#[async_trait]
pub trait InferenceService: Send + Sync {
    /// Exchange an API key for a bearer token; returns the identity
    /// service's JSON body untouched.
    async fn request_token(&self, api_key: &str) -> Result<Value, UpstreamError>;

    /// Score one paragraph with the deployed classifier.
    async fn score(&self, token: &str, text: &str) -> Result<ScoringResponse, UpstreamError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_accessors() {
        let err = UpstreamError::Status {
            status: 401,
            body: json!({"errorCode": "BXNIM0415E"}),
        };
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.body(), Some(&json!({"errorCode": "BXNIM0415E"})));
        assert_eq!(err.to_string(), "upstream returned status 401");
    }

    #[test]
    fn test_transport_has_no_status() {
        let err = UpstreamError::Transport("connection refused".to_string());
        assert_eq!(err.status(), None);
        assert!(err.body().is_none());
        assert_eq!(err.to_string(), "connection refused");
    }
}
