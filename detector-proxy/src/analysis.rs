//! Interpretation of scoring responses.
//!
//! The classifier answers with `predictions[0].values[0] = [label, [ai, human]]`.
//! Label `0` means AI-generated; any other label means human-written.

use detector_common::{
    Classification, OverallResult, PredictResponse, ScoringResponse, Statistics, TextInfo,
};
use serde_json::Value;

/// The whole paragraph is scored as a single unit.
const ANALYZED_SENTENCES: usize = 1;

/// Label and probabilities read from the first prediction row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPrediction {
    pub label: i64,
    pub ai_probability: f64,
    pub human_probability: f64,
}

impl RawPrediction {
    pub fn classification(&self) -> Classification {
        if self.label == 0 {
            Classification::AiGenerated
        } else {
            Classification::HumanWritten
        }
    }
}

/// Why a scoring response could not be interpreted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractError {
    #[error("response contains no predictions")]
    NoPredictions,
    #[error("first prediction contains no rows")]
    NoRows,
    #[error("prediction row has no label")]
    MissingLabel,
    #[error("prediction label is not an integer: {0}")]
    InvalidLabel(Value),
    #[error("prediction row has no probability vector")]
    MissingProbabilities,
    #[error("probability vector must hold two numbers, got {0}")]
    InvalidProbabilities(Value),
}

/// Read the label and probability pair from `predictions[0].values[0]`.
pub fn extract(response: &ScoringResponse) -> Result<RawPrediction, ExtractError> {
    let prediction = response
        .predictions
        .first()
        .ok_or(ExtractError::NoPredictions)?;
    let row = prediction.values.first().ok_or(ExtractError::NoRows)?;

    let label = match row.first() {
        None => return Err(ExtractError::MissingLabel),
        Some(value) => parse_label(value).ok_or_else(|| ExtractError::InvalidLabel(value.clone()))?,
    };

    let (ai_probability, human_probability) = match row.get(1) {
        None => return Err(ExtractError::MissingProbabilities),
        Some(value) => parse_probabilities(value)
            .ok_or_else(|| ExtractError::InvalidProbabilities(value.clone()))?,
    };

    Ok(RawPrediction {
        label,
        ai_probability,
        human_probability,
    })
}

/// Labels arrive as integers, occasionally as whole floats (`0.0`).
fn parse_label(value: &Value) -> Option<i64> {
    if let Some(label) = value.as_i64() {
        return Some(label);
    }
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && f.is_finite())
        .map(|f| f as i64)
}

fn parse_probabilities(value: &Value) -> Option<(f64, f64)> {
    match value.as_array()?.as_slice() {
        [ai, human, ..] => Some((ai.as_f64()?, human.as_f64()?)),
        _ => None,
    }
}

/// Distance of the AI probability from the 0.5 boundary, scaled to [0, 1].
pub fn confidence(ai_probability: f64) -> f64 {
    (ai_probability - 0.5).abs() * 2.0
}

/// Count fragments between runs of `.`, `!` or `?` that contain more than
/// whitespace.
pub fn sentence_count(text: &str) -> usize {
    text.split(['.', '!', '?'])
        .filter(|fragment| !fragment.trim().is_empty())
        .count()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Length in UTF-16 code units.
pub fn text_length(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Build the browser-facing result for one scored paragraph.
pub fn analyze(prediction: &RawPrediction, text: &str) -> PredictResponse {
    let classification = prediction.classification();
    let is_ai = classification.is_ai();
    let sentences = sentence_count(text);

    PredictResponse {
        overall: OverallResult {
            is_ai,
            ai_probability: prediction.ai_probability,
            human_probability: prediction.human_probability,
            confidence: confidence(prediction.ai_probability),
            classification,
        },
        statistics: Statistics {
            total_sentences: sentences,
            analyzed_sentences: ANALYZED_SENTENCES,
            ai_sentences: usize::from(is_ai),
            human_sentences: usize::from(!is_ai),
        },
        text_info: TextInfo {
            original_length: text_length(text),
            word_count: word_count(text),
            sentence_count: sentences,
        },
    }
}
