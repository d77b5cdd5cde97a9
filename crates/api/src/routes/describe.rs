//! Ad Copy Route

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use feature_encoder::RawInput;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;

/// A priced car to describe
#[derive(Debug, Deserialize)]
pub struct DescribeRequest {
    pub input: RawInput,
    pub price: f64,
}

/// Generated ad description
#[derive(Debug, Serialize)]
pub struct DescribeResponse {
    pub description: String,
}

/// Generate a classified-ad description for a priced car
pub async fn describe(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DescribeRequest>, JsonRejection>,
) -> Result<Json<DescribeResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let client = state.ad_copy.as_ref().ok_or(ApiError::AdCopyDisabled)?;

    state
        .validator
        .validate(&request.input)
        .into_result()
        .map_err(ApiError::Validation)?;

    let formatted = state.currency.format(request.price);
    let description = client.generate(&request.input, &formatted).await?;

    Ok(Json(DescribeResponse { description }))
}
