//! AI Detector Common Types
//!
//! Shared types for the detector proxy: the JSON contract exposed to the
//! browser and the scoring payloads exchanged with Watson ML.

pub mod api;
pub mod scoring;

pub use api::{
    Classification, ErrorResponse, HealthResponse, OverallResult, PredictErrorResponse,
    PredictRequest, PredictResponse, Statistics, TextInfo, TokenErrorResponse, TokenRequest,
    UpstreamStatus,
};
pub use scoring::{InputData, Prediction, ScoringRequest, ScoringResponse, SCORING_FIELDS};
