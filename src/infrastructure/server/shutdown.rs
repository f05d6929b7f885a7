//! Graceful shutdown handling
//!
//! Resolves once SIGTERM or SIGINT arrives so axum can stop accepting new
//! connections and drain in-flight requests.

use tracing::{error, info};

/// Wait for SIGTERM or SIGINT (Ctrl+C)
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("📡 Received SIGINT signal (Ctrl+C)"),
        _ = terminate => info!("📡 Received SIGTERM signal"),
    }

    info!("🛑 Shutting down, draining in-flight requests");
}
