//! toge-migrate: database migration CLI
//!
//! ```sh
//! # Apply every pending migration
//! toge-migrate up
//!
//! # Roll back one version
//! toge-migrate down m20240101_000007_create_space
//!
//! # Show applied and pending migrations
//! toge-migrate status
//!
//! # Drop everything and migrate from scratch (asks first)
//! toge-migrate reset
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use toge_api::infrastructure::database::migrator::{format_status, MigrationRunner};
use toge_api::server::init_tracing;
use toge_api::{init_database, resolve_config_path, AppConfig};

/// Schema migrations for toge-api.
#[derive(Parser, Debug)]
#[command(
    name = "toge-migrate",
    version,
    about = "Apply, roll back and inspect toge-api database migrations",
    long_about = "Apply, roll back and inspect toge-api database migrations.\n\n\
                  Default config: ~/.config/toge-api/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "TOGE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the database URL from the config file.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply all pending migrations in order.
    Up,
    /// Roll back a single applied migration.
    Down {
        /// Version to roll back, e.g. m20240101_000007_create_space
        version: String,
    },
    /// Print applied migrations and the pending ones.
    Status,
    /// Roll back everything, then re-apply all migrations. Destroys data.
    Reset {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} (y/N): ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = resolve_config_path(cli.config.as_deref());
    let mut config = AppConfig::load(&config_path)?;
    init_tracing(&config.logging);
    info!("Configuration loaded from {}", config_path.display());

    if let Some(url) = cli.database_url {
        info!("CLI override: database url");
        config.database.url = url;
    }

    let db = init_database(&config.database).await?;
    let runner = MigrationRunner::with_defaults(db.clone());

    let result = match cli.command {
        Command::Up => runner.up().await.map(|applied| {
            if applied.is_empty() {
                println!("Nothing to apply, database is up to date");
            }
            for version in applied {
                println!("Applied {}", version);
            }
        }),
        Command::Down { version } => runner
            .down(&version)
            .await
            .map(|()| println!("Rolled back {}", version)),
        Command::Status => match runner.status().await {
            Ok(records) => runner.pending().await.map(|pending| {
                print!("{}", format_status(&records, &pending));
            }),
            Err(e) => Err(e),
        },
        Command::Reset { yes } => {
            if !yes && !confirm("This drops every migrated table and all of its data. Continue?")? {
                println!("Reset cancelled");
                return Ok(());
            }
            runner.reset().await.map(|applied| {
                println!("Database reset, {} migrations applied", applied.len());
            })
        }
    };

    db.close().await?;

    if let Err(e) = result {
        error!("Migration command failed: {}", e);
        return Err(e.into());
    }
    Ok(())
}
