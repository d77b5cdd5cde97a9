//! Form Metadata Route

use axum::{extract::State, Json};
use feature_encoder::{field_descriptors, FieldDescriptor};
use price_model::CurrencyFormat;
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

/// Everything a client needs to render the input form
#[derive(Debug, Serialize)]
pub struct FormResponse {
    pub fields: Vec<FieldDescriptor>,
    pub currency: CurrencyFormat,
}

/// Get the input fields with their levels, bounds and defaults
pub async fn get_form(State(state): State<Arc<AppState>>) -> Json<FormResponse> {
    Json(FormResponse {
        fields: field_descriptors(),
        currency: state.currency.clone(),
    })
}
