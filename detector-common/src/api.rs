//! Browser-facing JSON contract of the proxy.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/token`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenRequest {
    /// Overrides the configured API key when present and non-empty.
    #[serde(default)]
    pub apikey: Option<String>,
}

/// Body of `POST /api/predict`.
///
/// Both fields are optional at the wire level so that a missing field is a
/// 400 from the handler rather than a deserialization rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Final label of a classified paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "AI Generated")]
    AiGenerated,
    #[serde(rename = "Human Written")]
    HumanWritten,
}

impl Classification {
    pub fn is_ai(self) -> bool {
        matches!(self, Classification::AiGenerated)
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::AiGenerated => write!(f, "AI Generated"),
            Classification::HumanWritten => write!(f, "Human Written"),
        }
    }
}

/// Successful response of `POST /api/predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
    pub overall: OverallResult,
    pub statistics: Statistics,
    pub text_info: TextInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallResult {
    #[serde(rename = "isAI")]
    pub is_ai: bool,
    pub ai_probability: f64,
    pub human_probability: f64,
    pub confidence: f64,
    pub classification: Classification,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_sentences: usize,
    pub analyzed_sentences: usize,
    pub ai_sentences: usize,
    pub human_sentences: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextInfo {
    /// Length in UTF-16 code units, matching the browser's `String.length`.
    pub original_length: usize,
    pub word_count: usize,
    pub sentence_count: usize,
}

/// Response of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub service: String,
    pub mode: String,
    pub api_configured: bool,
}

/// Body of a 400 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of a failed token exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenErrorResponse {
    pub error: String,
    pub details: Value,
}

/// Body of a failed prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictErrorResponse {
    pub error: String,
    pub details: Value,
    pub status: UpstreamStatus,
}

/// Upstream status reported to the browser: the HTTP code when the upstream
/// answered, otherwise a short description of what went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UpstreamStatus {
    Code(u16),
    Reason(String),
}
