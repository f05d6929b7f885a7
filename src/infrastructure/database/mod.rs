pub mod entities;
pub mod migrator;
pub mod query;
pub mod repositories;
pub mod resource;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite://./toge.db?mode=rwc")
    pub url: String,
    /// Pool size
    pub max_connections: u32,
    /// Run pending migrations when the server starts
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://./toge.db?mode=rwc".to_string(),
            max_connections: 10,
            auto_migrate: false,
        }
    }
}

impl DatabaseConfig {
    /// Create config for SQLite
    pub fn sqlite(path: &str) -> Self {
        Self {
            url: format!("sqlite://{}?mode=rwc", path),
            ..Default::default()
        }
    }
}

/// Initialize database connection
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, sea_orm::DbErr> {
    info!("Connecting to database: {}", config.url);

    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    info!("Database connected successfully");
    Ok(db)
}

#[cfg(test)]
pub(crate) mod test_support {
    use sea_orm::{Database, DatabaseConnection};

    use super::migrator::MigrationRunner;

    /// Fresh, empty in-memory SQLite database
    pub async fn memory_db() -> DatabaseConnection {
        Database::connect("sqlite::memory:").await.unwrap()
    }

    /// In-memory database with the full schema applied
    pub async fn migrated_db() -> DatabaseConnection {
        let db = memory_db().await;
        MigrationRunner::with_defaults(db.clone()).up().await.unwrap();
        db
    }
}
