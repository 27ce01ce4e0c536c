//! Configuration module for Agora.

use serde::Deserialize;
use std::path::Path;

use crate::{AgoraError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins. Empty means permissive (development mode).
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/agora.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Session configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Absolute session lifetime in seconds.
    #[serde(default = "default_session_duration")]
    pub duration_secs: u64,
    /// Idle timeout in seconds.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

fn default_session_duration() -> u64 {
    86400 // 24 hours
}

fn default_idle_timeout() -> u64 {
    1800 // 30 minutes
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_session_duration(),
            idle_timeout_secs: default_idle_timeout(),
        }
    }
}

/// Administrator bootstrap configuration.
///
/// At startup an admin-role account is created from these values if none
/// exists yet, so admin rights never depend on registration order.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Username for the bootstrap admin account.
    #[serde(default = "default_admin_username")]
    pub username: String,
    /// Password for the bootstrap admin account.
    #[serde(default = "default_admin_password")]
    pub password: String,
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "changeme".to_string()
}

impl AdminConfig {
    /// Whether the password is still the shipped default.
    pub fn has_default_password(&self) -> bool {
        self.password == default_admin_password()
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: default_admin_username(),
            password: default_admin_password(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/agora.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Session configuration.
    #[serde(default)]
    pub session: SessionConfig,
    /// Administrator bootstrap.
    #[serde(default)]
    pub admin: AdminConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(AgoraError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| AgoraError::Validation(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `AGORA_ADMIN_PASSWORD`: Override the bootstrap admin password
    pub fn apply_env_overrides(&mut self) {
        if let Ok(password) = std::env::var("AGORA_ADMIN_PASSWORD") {
            if !password.is_empty() {
                self.admin.password = password;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.admin.username.trim().is_empty() {
            return Err(AgoraError::Validation(
                "admin.username must not be empty".to_string(),
            ));
        }
        if self.admin.password.is_empty() {
            return Err(AgoraError::Validation(
                "admin.password must not be empty. \
                 Set it in config.toml or via AGORA_ADMIN_PASSWORD environment variable."
                    .to_string(),
            ));
        }
        Ok(())
    }
}
