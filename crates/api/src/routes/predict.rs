//! Prediction Route

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{DateTime, Utc};
use feature_encoder::RawInput;
use metrics::counter;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;

/// Response for the predict endpoint
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub id: Uuid,
    pub price: f64,
    pub formatted: String,
    pub estimator: &'static str,
    pub latency_us: u64,
    pub estimated_at: DateTime<Utc>,
}

/// Validate an input and price it
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RawInput>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Json(input) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    if let Err(errors) = state.validator.validate(&input).into_result() {
        counter!("price_validation_failures_total").increment(1);
        return Err(ApiError::Validation(errors));
    }

    let estimate = state.estimator.estimate(&input)?;
    let formatted = state.currency.format(estimate.price);
    info!(
        "Estimated {} {} at {} ({})",
        input.brand,
        input.carbody,
        formatted,
        state.estimator.name()
    );

    Ok(Json(PredictionResponse {
        id: Uuid::new_v4(),
        price: estimate.price,
        formatted,
        estimator: state.estimator.name(),
        latency_us: estimate.latency_us,
        estimated_at: Utc::now(),
    }))
}
