//! Watson ML implementation of the upstream service.

use std::time::Duration;

use async_trait::async_trait;
use detector_common::{ScoringRequest, ScoringResponse};
use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use serde_json::Value;

use super::{InferenceService, UpstreamError};
use crate::config::WatsonConfig;

/// Grant type for exchanging an IBM Cloud API key.
const APIKEY_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// Watson ML client.
///
/// Talks to the IAM token endpoint and to one scoring endpoint.
pub struct WatsonClient {
    http_client: Client,
    token_url: String,
    scoring_url: String,
    token_timeout: Duration,
    predict_timeout: Duration,
}

impl WatsonClient {
    pub fn new(config: &WatsonConfig) -> Self {
        Self {
            http_client: Client::new(),
            token_url: config.token_url.clone(),
            scoring_url: config.scoring_url.clone(),
            token_timeout: config.token_timeout,
            predict_timeout: config.predict_timeout,
        }
    }
}

#[async_trait]
impl InferenceService for WatsonClient {
    async fn request_token(&self, api_key: &str) -> Result<Value, UpstreamError> {
        tracing::debug!("Requesting IAM token from {}", self.token_url);

        let response = self
            .http_client
            .post(&self.token_url)
            .header(ACCEPT, "application/json")
            .form(&[("grant_type", APIKEY_GRANT_TYPE), ("apikey", api_key)])
            .timeout(self.token_timeout)
            .send()
            .await
            .map_err(|e| transport_error(e, self.token_timeout))?;

        let response = ensure_success(response).await?;

        response
            .json()
            .await
            .map_err(|e| UpstreamError::InvalidResponse(e.to_string()))
    }

    async fn score(&self, token: &str, text: &str) -> Result<ScoringResponse, UpstreamError> {
        let request = ScoringRequest::single_text(text);

        tracing::debug!("Sending scoring request to {}", self.scoring_url);

        let response = self
            .http_client
            .post(&self.scoring_url)
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .json(&request)
            .timeout(self.predict_timeout)
            .send()
            .await
            .map_err(|e| transport_error(e, self.predict_timeout))?;

        let response = ensure_success(response).await?;

        response
            .json()
            .await
            .map_err(|e| UpstreamError::InvalidResponse(e.to_string()))
    }
}

/// Turn a non-2xx response into `UpstreamError::Status`, keeping its body.
async fn ensure_success(response: Response) -> Result<Response, UpstreamError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    Err(UpstreamError::Status {
        status: status.as_u16(),
        body: parse_body(status.as_u16(), text),
    })
}

/// Error bodies are JSON when the upstream behaves, raw text otherwise.
/// An empty body is replaced by a message naming the status.
fn parse_body(status: u16, text: String) -> Value {
    if text.trim().is_empty() {
        return Value::String(format!("Request failed with status code {}", status));
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

fn transport_error(err: reqwest::Error, timeout: Duration) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Transport(format!("timeout of {}ms exceeded", timeout.as_millis()))
    } else {
        UpstreamError::Transport(err.to_string())
    }
}
