//! API errors mapped to HTTP status codes.
//!
//! Every [`ApiError`] renders as a JSON body `{"error": "message"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::PolarityError;

/// Error returned by the HTTP handlers.
///
/// - `BadRequest` → 400
/// - `Internal` → 500
#[derive(Debug)]
pub enum ApiError {
    /// The request was malformed or the review was empty (400).
    BadRequest(String),
    /// Anything the caller could not have caused (500).
    Internal(String),
}

impl From<PolarityError> for ApiError {
    fn from(err: PolarityError) -> Self {
        match err {
            PolarityError::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => {
                tracing::error!(error = %other, "classification failed");
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}
