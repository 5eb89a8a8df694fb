//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Upper bound for establishing one connection
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Upper bound for waiting on a pooled connection
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime_secs")]
    pub max_lifetime_secs: u64,
    /// Pooled acquisition attempts before falling back to a direct connection
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Backoff unit, multiplied by the attempt number
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl DatabaseConfig {
    /// Config with defaults for everything but the URL
    #[must_use]
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout_secs(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
            idle_timeout_secs: default_idle_timeout_secs(),
            max_lifetime_secs: default_max_lifetime_secs(),
            retry_attempts: default_retry_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Log output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of the pretty format
    #[serde(default)]
    pub json: bool,
}

// Default value functions
fn default_app_name() -> String {
    "chat-store".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_acquire_timeout_secs() -> u64 {
    10
}

fn default_idle_timeout_secs() -> u64 {
    300
}

fn default_max_lifetime_secs() -> u64 {
    1800
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    100
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    ///
    /// # Errors
    /// Returns an error if required variables are missing or malformed
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = match lookup("APP_ENV") {
            Some(value) => Environment::parse(&value)
                .ok_or(ConfigError::InvalidValue("APP_ENV", value))?,
            None => default_env(),
        };

        let config = Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env,
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", default_min_connections)?,
                connect_timeout_secs: parse_or(
                    &lookup,
                    "DATABASE_CONNECT_TIMEOUT_SECS",
                    default_connect_timeout_secs,
                )?,
                acquire_timeout_secs: parse_or(
                    &lookup,
                    "DATABASE_ACQUIRE_TIMEOUT_SECS",
                    default_acquire_timeout_secs,
                )?,
                idle_timeout_secs: parse_or(&lookup, "DATABASE_IDLE_TIMEOUT_SECS", default_idle_timeout_secs)?,
                max_lifetime_secs: parse_or(&lookup, "DATABASE_MAX_LIFETIME_SECS", default_max_lifetime_secs)?,
                retry_attempts: parse_or(&lookup, "DATABASE_RETRY_ATTEMPTS", default_retry_attempts)?,
                retry_backoff_ms: parse_or(&lookup, "DATABASE_RETRY_BACKOFF_MS", default_retry_backoff_ms)?,
            },
            logging: LoggingConfig {
                json: parse_or(&lookup, "LOG_JSON", || false)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let db = &self.database;
        if db.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "DATABASE_MAX_CONNECTIONS",
                "must be at least 1".to_string(),
            ));
        }
        if db.min_connections > db.max_connections {
            return Err(ConfigError::InvalidValue(
                "DATABASE_MIN_CONNECTIONS",
                format!("{} exceeds the maximum of {}", db.min_connections, db.max_connections),
            ));
        }
        if db.retry_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "DATABASE_RETRY_ATTEMPTS",
                "must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_or<F, T, D>(lookup: &F, key: &'static str, default: D) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    D: FnOnce() -> T,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default()),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
