//! Car Price Estimator API Server
//!
//! REST API serving price estimates, form metadata, and ad copy for the
//! car price estimator front end.

use ad_copy::{AdCopyClient, AdCopyError};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use fallback::HeuristicEstimator;
use input_validator::{RangeConfigError, Validator};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use price_model::{ArtifactError, CurrencyFormat, PriceEngine, PriceEstimator};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tower_governor::GovernorLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

pub mod error;
pub mod rate_limit;
pub mod routes;
pub mod settings;

pub use error::ApiError;
pub use rate_limit::RateLimitConfig;
pub use settings::{AppConfig, EstimatorKind, LogFormat, ServerConfig};

/// Errors that stop the server from starting
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to load model artifact: {0}")]
    Artifact(#[from] ArtifactError),
    #[error("Invalid validation settings: {0}")]
    Validation(#[from] RangeConfigError),
    #[error("Failed to configure ad copy client: {0}")]
    AdCopy(#[from] AdCopyError),
    #[error("Failed to install metrics recorder: {0}")]
    Metrics(String),
}

/// Application state shared read-only across handlers
pub struct AppState {
    /// Estimator serving predictions
    pub estimator: Arc<dyn PriceEstimator>,
    /// Training column count, when a trained model is loaded
    pub schema_columns: Option<usize>,
    /// Numeric range validator
    pub validator: Validator,
    /// Price display format
    pub currency: CurrencyFormat,
    /// Ad copy client, absent when no API key is configured
    pub ad_copy: Option<AdCopyClient>,
    /// Prometheus handle for `/metrics`
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create state around an estimator with default settings
    pub fn new(estimator: Arc<dyn PriceEstimator>) -> Self {
        Self {
            estimator,
            schema_columns: None,
            validator: Validator::default(),
            currency: CurrencyFormat::default(),
            ad_copy: None,
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }

    /// Build state from configuration, loading the model artifact if the
    /// trained estimator is selected
    pub fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        config.validation.check()?;

        let mut state = match config.model.estimator {
            EstimatorKind::Model => {
                let engine = PriceEngine::from_path(&config.model.artifact_path)?;
                let columns = engine.schema().len();
                let mut state = Self::new(Arc::new(engine));
                state.schema_columns = Some(columns);
                state
            }
            EstimatorKind::Heuristic => {
                warn!("Serving heuristic estimates; no trained model is loaded");
                Self::new(Arc::new(HeuristicEstimator::new(config.heuristic.clone())))
            }
        };

        state.validator = Validator::new(config.validation.clone());
        state.currency = config.currency.clone();
        state.ad_copy = match AdCopyClient::new(config.ad_copy.clone()) {
            Ok(client) => Some(client),
            Err(AdCopyError::MissingApiKey) => {
                info!("No ad copy API key configured; describe endpoint disabled");
                None
            }
            Err(e) => return Err(e.into()),
        };

        Ok(state)
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub estimator: &'static str,
    pub schema_columns: Option<usize>,
    pub ad_copy_enabled: bool,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>, limits: &RateLimitConfig) -> Router {
    let mut describe: Router<Arc<AppState>> =
        Router::new().route("/api/v1/describe", post(routes::describe::describe));
    if limits.enabled {
        match rate_limit::create_governor_config(limits) {
            Some(config) => describe = describe.layer(GovernorLayer { config }),
            None => warn!("Invalid rate limit settings {:?}; describe is unthrottled", limits),
        }
    }

    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/form", get(routes::form::get_form))
        .route("/api/v1/predict", post(routes::predict::predict))
        .route("/metrics", get(metrics_handler))
        .merge(describe)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        estimator: state.estimator.name(),
        schema_columns: state.schema_columns,
        ad_copy_enabled: state.ad_copy.is_some(),
    })
}

/// Prometheus exposition
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Initialize logging
pub fn init_logging(server: &ServerConfig) {
    let level = server.log_level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    let result = match server.log_format {
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
    };
    if result.is_err() {
        warn!("Tracing subscriber already installed");
    }
}

/// Run the server
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| StartupError::Metrics(e.to_string()))?;

    let mut state = AppState::from_config(&config)?;
    state.metrics = Some(handle);
    let app = create_router(Arc::new(state), &config.rate_limit);

    info!("Starting API server on {}", config.server.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
