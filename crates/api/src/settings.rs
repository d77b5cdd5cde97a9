//! Application Configuration
//!
//! Layered from an optional config file and `CARPRICE_*` environment
//! variables (nested keys separated by `__`, e.g.
//! `CARPRICE_SERVER__BIND_ADDR`). Every section has defaults, so an empty
//! configuration is valid.

use crate::rate_limit::RateLimitConfig;
use ad_copy::AdCopyConfig;
use fallback::HeuristicConfig;
use input_validator::ValidationConfig;
use price_model::CurrencyFormat;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file read when no path is given
pub const DEFAULT_CONFIG_PATH: &str = "car-price.toml";

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

/// Which estimator serves predictions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimatorKind {
    /// Trained model artifact
    #[default]
    Model,
    /// Rule-based fallback, no artifact needed
    Heuristic,
}

/// Price model settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub estimator: EstimatorKind,
    /// JSON artifact with `model` and `columns`
    pub artifact_path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            estimator: EstimatorKind::Model,
            artifact_path: PathBuf::from("car_price_model.json"),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub currency: CurrencyFormat,
    pub validation: ValidationConfig,
    pub heuristic: HeuristicConfig,
    pub rate_limit: RateLimitConfig,
    pub ad_copy: AdCopyConfig,
}

impl AppConfig {
    /// Load configuration from `path` (or the default file, if present)
    /// overlaid with environment variables
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));

        config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix("CARPRICE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
