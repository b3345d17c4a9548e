//! Request and response bodies.

use serde::{Deserialize, Serialize};

use crate::ml::label::Label;

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerResponse {
    pub message: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub classifier: String,
    pub vocabulary_size: usize,
    pub rules: usize,
}

/// Body of `POST /api/predict`. A missing review counts as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub review: String,
}

/// Successful prediction: the review echoed back with its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub review: String,
    pub sentiment: Label,
}
