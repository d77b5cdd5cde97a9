//! Encode-then-Predict Engine

use crate::artifact::ModelArtifact;
use crate::{ArtifactError, PredictionError};
use feature_encoder::{encode, EncodedVector, RawInput, TrainingSchema};
use metrics::{counter, histogram};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Estimated price for one input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceEstimate {
    /// Predicted price
    pub price: f64,
    /// Time spent encoding and predicting (microseconds)
    pub latency_us: u64,
}

/// Anything that can price a raw car specification
pub trait PriceEstimator: Send + Sync {
    /// Short name reported alongside estimates
    fn name(&self) -> &'static str;

    /// Estimate the price of one input
    fn estimate(&self, input: &RawInput) -> Result<PriceEstimate, PredictionError>;
}

/// Trained-model estimator.
///
/// Built once at startup from the model artifact and shared read-only; every
/// prediction encodes against the artifact's own training columns.
#[derive(Debug, Clone)]
pub struct PriceEngine {
    artifact: ModelArtifact,
}

impl PriceEngine {
    /// Create an engine from a loaded artifact
    pub fn new(artifact: ModelArtifact) -> Self {
        info!(
            "Creating price engine: {} model over {} columns",
            artifact.model.kind(),
            artifact.columns.len()
        );
        Self { artifact }
    }

    /// Load the artifact at `path` and build an engine
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        ModelArtifact::load(path).map(Self::new)
    }

    /// Training columns the model expects
    pub fn schema(&self) -> &TrainingSchema {
        &self.artifact.columns
    }

    /// Encode an input against the training columns
    pub fn encode(&self, input: &RawInput) -> EncodedVector {
        encode(input, &self.artifact.columns)
    }

    /// Encode an input and run the model on it
    pub fn predict(&self, input: &RawInput) -> Result<PriceEstimate, PredictionError> {
        let start = Instant::now();

        let features = self.encode(input);
        let result = self.artifact.model.predict(features.values());
        let elapsed = start.elapsed();

        match result {
            Ok(price) => {
                counter!("price_predictions_total").increment(1);
                histogram!("price_prediction_latency_seconds").record(elapsed.as_secs_f64());
                debug!("Predicted price {:.2} in {}us", price, elapsed.as_micros());
                Ok(PriceEstimate {
                    price,
                    latency_us: elapsed.as_micros() as u64,
                })
            }
            Err(e) => {
                counter!("price_prediction_failures_total").increment(1);
                warn!("Prediction failed: {}", e);
                Err(e)
            }
        }
    }
}

impl PriceEstimator for PriceEngine {
    fn name(&self) -> &'static str {
        "model"
    }

    fn estimate(&self, input: &RawInput) -> Result<PriceEstimate, PredictionError> {
        self.predict(input)
    }
}
