//! Configuration module
//!
//! `AppConfig` is read from a TOML file and then patched with environment
//! overrides. Every section has defaults, so an empty or partial file works.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::shared::InfraError;

/// Default location: `~/.config/agrowatch/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("agrowatch")
        .join("config.toml")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Seconds granted to in-flight requests after a shutdown signal.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout: u64,
    /// Development mode: permissive CORS when no origins are configured.
    #[serde(default)]
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_timeout: default_shutdown_timeout(),
            debug: false,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Table holding sensor readings written by the ingestion process.
    #[serde(default = "default_readings_table")]
    pub readings_table: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            readings_table: default_readings_table(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Empty list: no cross-origin access, or any origin in debug mode.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_limit")]
    pub default_limit: u64,
    #[serde(default = "default_channel_id")]
    pub channel_id: String,
    #[serde(default = "default_channel_name")]
    pub channel_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            channel_id: default_channel_id(),
            channel_name: default_channel_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `text` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_shutdown_timeout() -> u64 {
    30
}
fn default_database_url() -> String {
    "sqlite://./agrowatch.db?mode=rwc".to_string()
}
fn default_readings_table() -> String {
    "sensor_readings".to_string()
}
fn default_allowed_origins() -> Vec<String> {
    [
        "https://agrigrowthiot.netlify.app",
        "http://localhost:5173",
        "http://localhost:8000",
        "http://localhost:3000",
    ]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}
fn default_limit() -> u64 {
    100
}
fn default_channel_id() -> String {
    "mongodb_channel".to_string()
}
fn default_channel_name() -> String {
    "MongoDB Sensor Data".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "text".to_string()
}

impl AppConfig {
    /// Load from `path`, falling back to defaults when the file does not
    /// exist, then apply environment overrides and validate.
    pub fn load(path: &Path) -> Result<Self, InfraError> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| InfraError::Config(format!("{}: {}", path.display(), e)))?;
            Self::from_toml(&raw)?
        } else {
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, InfraError> {
        toml::from_str(raw).map_err(|e| InfraError::Config(e.to_string()))
    }

    /// Apply `DATABASE_URL`, `READINGS_TABLE`, `FRONTEND_URL`, `PORT` and
    /// `APP_ENV` on top of the file values.
    pub fn apply_env_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(table) = var("READINGS_TABLE") {
            self.database.readings_table = table;
        }
        if let Some(origin) = var("FRONTEND_URL") {
            if !self.cors.allowed_origins.contains(&origin) {
                self.cors.allowed_origins.push(origin);
            }
        }
        if let Some(port) = var("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(env) = var("APP_ENV") {
            self.server.debug = env.eq_ignore_ascii_case("development");
        }
    }

    pub fn validate(&self) -> Result<(), InfraError> {
        if !(4..=31).contains(&self.security.bcrypt_cost) {
            return Err(InfraError::Config(format!(
                "security.bcrypt_cost must be between 4 and 31, got {}",
                self.security.bcrypt_cost
            )));
        }
        if self.telemetry.default_limit == 0 {
            return Err(InfraError::Config(
                "telemetry.default_limit must be positive".into(),
            ));
        }
        if self.cors.allowed_origins.iter().any(|o| o.trim() == "*") {
            return Err(InfraError::Config(
                "cors.allowed_origins cannot contain '*' because credentials are allowed; \
                 list origins explicitly or enable server.debug with an empty list"
                    .into(),
            ));
        }
        let table = &self.database.readings_table;
        if table.is_empty() || !table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(InfraError::Config(format!(
                "database.readings_table must be a plain identifier, got '{}'",
                table
            )));
        }
        Ok(())
    }
}
