//! Validation Error Types

use serde::Serialize;
use thiserror::Error;

/// Errors during input validation
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    /// Value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// NaN or infinite value
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
}

/// A configured range that can never accept a value
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field} range [{min}, {max}] is invalid: bounds must be finite with min <= max")]
pub struct RangeConfigError {
    pub field: &'static str,
    pub min: f64,
    pub max: f64,
}
