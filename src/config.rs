//! Configuration module
//!
//! Settings come from a TOML file (default `~/.config/toge-api/config.toml`).
//! A missing file yields defaults; `DATABASE_URL` and `JWT_SECRET` from the
//! environment override whatever the file says.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::DatabaseConfig;

/// Environment variable naming an alternative config file
pub const CONFIG_ENV: &str = "TOGE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    /// Name of the session cookie set on login
    pub cookie_name: String,
    /// Mark the session cookie `Secure` (HTTPS only)
    pub cookie_secure: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_hours: 24,
            cookie_name: "token".to_string(),
            cookie_secure: false,
        }
    }
}

impl SecurityConfig {
    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig::new(self.jwt_secret.clone(), self.jwt_expiration_hours)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// `~/.config/toge-api/config.toml`, or `./config.toml` when no config
/// directory can be determined
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("toge-api").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

/// Explicit path first, then `TOGE_CONFIG`, then the default location
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
        .unwrap_or_else(default_config_path)
}

impl AppConfig {
    /// Read `path`, falling back to defaults when it does not exist, then
    /// apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let raw = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, raw).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var("DATABASE_URL").ok(),
            std::env::var("JWT_SECRET").ok(),
        );
    }

    fn apply_overrides(&mut self, database_url: Option<String>, jwt_secret: Option<String>) {
        if let Some(url) = database_url.filter(|v| !v.is_empty()) {
            self.database.url = url;
        }
        if let Some(secret) = jwt_secret.filter(|v| !v.is_empty()) {
            self.security.jwt_secret = secret;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.max_connections, 10);
        assert!(!config.database.auto_migrate);
        assert_eq!(config.security.jwt_expiration_hours, 24);
        assert_eq!(config.security.cookie_name, "token");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let raw = r#"
            [server]
            port = 3000

            [database]
            url = "sqlite::memory:"
            auto_migrate = true

            [logging]
            format = "json"
        "#;
        let config = AppConfig::parse(raw).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.address(), "0.0.0.0:3000");
        assert_eq!(config.database.url, "sqlite::memory:");
        assert!(config.database.auto_migrate);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn environment_values_win_over_file() {
        let mut config = AppConfig::default();
        config.apply_overrides(Some("sqlite://./other.db".into()), Some("s3cret".into()));
        assert_eq!(config.database.url, "sqlite://./other.db");
        assert_eq!(config.security.jwt_secret, "s3cret");

        let mut config = AppConfig::default();
        config.apply_overrides(Some(String::new()), None);
        assert_eq!(config.database.url, DatabaseConfig::default().url);
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        assert!(AppConfig::parse("[server\nport = ").is_err());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = std::env::temp_dir().join(format!("toge-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.toml");

        let mut config = AppConfig::default();
        config.server.port = 9999;
        config.security.cookie_secure = true;
        config.save(&path).unwrap();

        let loaded = AppConfig::from_file(&path).unwrap();
        assert_eq!(loaded.server.port, 9999);
        assert!(loaded.security.cookie_secure);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let path = std::env::temp_dir().join("toge-config-does-not-exist.toml");
        assert!(AppConfig::load(&path).is_ok());
    }
}
