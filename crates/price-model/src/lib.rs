//! Car Price Model
//!
//! Loads the trained model artifact (`model` + `columns`) and runs
//! encode-then-predict for a raw car specification.

mod artifact;
mod currency;
mod engine;
mod model;

pub use artifact::ModelArtifact;
pub use currency::CurrencyFormat;
pub use engine::{PriceEngine, PriceEstimate, PriceEstimator};
pub use model::{ForestModel, LinearModel, RegressionTree, Regressor, TreeNode};

use feature_encoder::SchemaError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors loading a model artifact
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Failed to read model artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed model artifact: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Model artifact must be a JSON object")]
    NotAnObject,
    #[error("Model artifact is missing the '{0}' field")]
    MissingField(&'static str),
    #[error("Invalid training columns: {0}")]
    Schema(#[from] SchemaError),
}

/// Errors during prediction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("Invalid input shape: expected {expected} features, got {actual}")]
    InvalidInputShape { expected: usize, actual: usize },
    #[error("Malformed model: {0}")]
    MalformedModel(String),
    #[error("Model produced a non-finite price: {0}")]
    NonFinite(f64),
}
