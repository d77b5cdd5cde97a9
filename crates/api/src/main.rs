//! Car Price Estimator - Main Entry Point

use api::{init_logging, run_server, AppConfig};
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())?;
    init_logging(&config.server);

    info!("=== Car Price Estimator v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Estimator: {:?}", config.model.estimator);

    run_server(config).await
}
