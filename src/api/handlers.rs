//! HTTP handlers and shared state.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use crate::api::errors::ApiError;
use crate::api::models::{BannerResponse, HealthResponse, PredictRequest, PredictResponse};
use crate::sentiment::engine::DecisionEngine;

/// Message served on `GET /`.
pub const BANNER_MESSAGE: &str = "🚀 Sentiment Analysis API is running successfully!";

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<DecisionEngine>,
}

impl AppState {
    pub fn new(engine: DecisionEngine) -> Self {
        AppState {
            engine: Arc::new(engine),
        }
    }
}

/// `GET /`
pub async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: BANNER_MESSAGE.to_string(),
    })
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let artifacts = state.engine.artifacts();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        classifier: artifacts.classifier().name().to_string(),
        vocabulary_size: artifacts.vectorizer().vocabulary_size(),
        rules: state.engine.rules().len(),
    })
}

/// `POST /api/predict`
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let sentiment = state.engine.classify(&request.review)?;
    Ok(Json(PredictResponse {
        review: request.review,
        sentiment,
    }))
}
