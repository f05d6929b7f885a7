//! toge-api HTTP server
//!
//! Reads configuration from TOML (`TOGE_CONFIG` or
//! `~/.config/toge-api/config.toml`) and serves the REST API.

use tracing::info;

use toge_api::server::{init_tracing, run};
use toge_api::{resolve_config_path, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = resolve_config_path(None);
    let config = AppConfig::load(&config_path)?;

    init_tracing(&config.logging);
    info!("Configuration loaded from {}", config_path.display());

    run(config).await
}
