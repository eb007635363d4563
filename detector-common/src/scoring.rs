//! Watson ML scoring payloads (the upstream wire format).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Column names of the single-row table sent for scoring.
pub const SCORING_FIELDS: [&str; 4] = ["sr.no", "text", "source", "label_name"];

/// Body of a scoring request: a list of input tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringRequest {
    pub input_data: Vec<InputData>,
}

/// One input table: column names plus rows of values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputData {
    pub fields: Vec<String>,
    pub values: Vec<Vec<Value>>,
}

impl ScoringRequest {
    /// Build the one-row table used to classify a whole paragraph.
    pub fn single_text(text: &str) -> Self {
        Self {
            input_data: vec![InputData {
                fields: SCORING_FIELDS.iter().map(|f| f.to_string()).collect(),
                values: vec![vec![
                    Value::from(1),
                    Value::from(text),
                    Value::from("user"),
                    Value::from("unknown"),
                ]],
            }],
        }
    }
}

/// Body of a successful scoring response.
///
/// Rows are kept as raw JSON values because each row mixes a label with a
/// probability vector; interpretation happens in the proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(default)]
    pub fields: Option<Vec<String>>,
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}
