//! Model Artifact Loading

use crate::model::Regressor;
use crate::ArtifactError;
use feature_encoder::TrainingSchema;
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

/// Trained model together with the training columns it expects
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    pub model: Regressor,
    pub columns: TrainingSchema,
}

impl ModelArtifact {
    /// Load an artifact from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        info!("Loading model artifact from {}", path.display());

        let text = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse an artifact from JSON text
    pub fn from_json(text: &str) -> Result<Self, ArtifactError> {
        let raw: Value = serde_json::from_str(text)?;
        let mut fields = match raw {
            Value::Object(fields) => fields,
            _ => return Err(ArtifactError::NotAnObject),
        };

        let model = fields
            .remove("model")
            .ok_or(ArtifactError::MissingField("model"))?;
        let columns = fields
            .remove("columns")
            .ok_or(ArtifactError::MissingField("columns"))?;

        let model: Regressor = serde_json::from_value(model)?;
        let columns: Vec<String> = serde_json::from_value(columns)?;
        let columns = TrainingSchema::new(columns)?;

        let artifact = Self { model, columns };
        artifact.log_summary();
        Ok(artifact)
    }

    fn log_summary(&self) {
        info!(
            "Model artifact: {} model, {} training columns",
            self.model.kind(),
            self.columns.len()
        );

        if self.model.min_features() > self.columns.len() {
            warn!(
                "Model reads {} features but the schema has {} columns; predictions will fail",
                self.model.min_features(),
                self.columns.len()
            );
        }

        let coverage = self.columns.coverage();
        if !coverage.unreachable.is_empty() {
            warn!(
                "{} training column(s) cannot be produced by any input and will always be 0: {:?}",
                coverage.unreachable.len(),
                coverage.unreachable
            );
        }
        if !coverage.untrained_levels.is_empty() {
            info!(
                "{} input level(s) have no training column: {:?}",
                coverage.untrained_levels.len(),
                coverage.untrained_levels
            );
        }
    }
}
