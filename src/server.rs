//! Server runtime
//!
//! Wires configuration, database, optional migrations, metrics and the HTTP
//! router together and serves until SIGINT/SIGTERM.

use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{info, warn};

use crate::config::{AppConfig, LoggingConfig};
use crate::infrastructure::database::migrator::MigrationRunner;
use crate::infrastructure::init_database;
use crate::infrastructure::server::shutdown_signal;
use crate::interfaces::http::{create_api_router, ApiContext};

/// Initialize tracing (logging) from the application config.
///
/// `RUST_LOG` wins over `logging.level`. Call once at process startup.
pub fn init_tracing(config: &LoggingConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level));

    match config.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

/// Install the global Prometheus recorder.
///
/// The recorder can only be installed once per process, so the handle is
/// cached. `None` when installation failed; `/metrics` is then not mounted.
pub fn install_metrics() -> Option<PrometheusHandle> {
    static PROM_HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

    PROM_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("📊 Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!("Prometheus recorder unavailable, /metrics disabled: {}", e);
                None
            }
        })
        .clone()
}

/// Run the HTTP server until a shutdown signal arrives.
pub async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting toge-api...");

    let metrics = install_metrics();

    // ── Database ───────────────────────────────────────────
    let db = init_database(&config.database).await?;

    if config.database.auto_migrate {
        info!("Running database migrations...");
        let applied = MigrationRunner::with_defaults(db.clone()).up().await?;
        info!(count = applied.len(), "Migrations completed");
    } else {
        info!("Automatic migrations disabled; run `toge-migrate up` to apply them");
    }

    // ── REST API ───────────────────────────────────────────
    let jwt_config = config.security.jwt_config();
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    let router = create_api_router(ApiContext {
        db: db.clone(),
        jwt_config,
        cookie_name: config.security.cookie_name.clone(),
        cookie_secure: config.security.cookie_secure,
        metrics,
    });

    let addr = config.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // ── Cleanup ────────────────────────────────────────────
    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("✅ Database connection closed");
    }

    info!("👋 toge-api shutdown complete");
    Ok(())
}
