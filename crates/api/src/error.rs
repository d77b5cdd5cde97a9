//! API Error Responses

use ad_copy::AdCopyError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use input_validator::ValidationError;
use price_model::PredictionError;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Errors returned to API clients
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body is not a well-formed request (includes unknown categorical levels)
    #[error("Invalid request: {0}")]
    BadRequest(String),
    /// Numeric fields outside their allowed ranges
    #[error("Input validation failed")]
    Validation(Vec<ValidationError>),
    /// The estimator could not price the input
    #[error("Prediction failed: {0}")]
    Prediction(#[from] PredictionError),
    /// No API key configured for ad copy
    #[error("Ad copy generation is not configured")]
    AdCopyDisabled,
    /// Upstream LLM failure
    #[error("Failed to generate description: {0}")]
    AdCopy(#[from] AdCopyError),
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ValidationError>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::AdCopyDisabled => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::AdCopy(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!("Request failed: {}", self);
        }

        let error = self.to_string();
        let details = match self {
            ApiError::Validation(errors) => errors,
            _ => Vec::new(),
        };

        (status, Json(ErrorBody { error, details })).into_response()
    }
}
