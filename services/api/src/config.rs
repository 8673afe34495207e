//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub mongodb_uri: String,
    pub mongodb_db_name: String,
    pub log_level: Level,
    pub openai_api_key: String,
    pub llm_model: String,
    pub llm_timeout: Duration,
    pub admin_password: String,
    pub session_expire_hours: i64,
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Database Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let mongodb_uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let mongodb_db_name =
            std::env::var("MONGODB_DB_NAME").unwrap_or_else(|_| "feedback_db".to_string());

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load Analysis Model Settings ---
        let openai_api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
        let llm_model =
            std::env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let llm_timeout_str =
            std::env::var("LLM_TIMEOUT").unwrap_or_else(|_| "30".to_string());
        let llm_timeout_secs = llm_timeout_str.parse::<u64>().map_err(|_| {
            ConfigError::InvalidValue(
                "LLM_TIMEOUT".to_string(),
                format!("'{}' is not a number of seconds", llm_timeout_str),
            )
        })?;
        let llm_timeout = Duration::from_secs(llm_timeout_secs);

        // --- Load Admin Session Settings ---
        let admin_password =
            std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
        let session_expire_hours_str =
            std::env::var("SESSION_EXPIRE_HOURS").unwrap_or_else(|_| "24".to_string());
        let session_expire_hours = session_expire_hours_str.parse::<i64>().map_err(|_| {
            ConfigError::InvalidValue(
                "SESSION_EXPIRE_HOURS".to_string(),
                format!("'{}' is not a number of hours", session_expire_hours_str),
            )
        })?;

        let cors_origins_str = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:8000,http://127.0.0.1:8000".to_string());
        let cors_origins = parse_cors_origins(&cors_origins_str);

        Ok(Self {
            bind_address,
            mongodb_uri,
            mongodb_db_name,
            log_level,
            openai_api_key,
            llm_model,
            llm_timeout,
            admin_password,
            session_expire_hours,
            cors_origins,
        })
    }
}

/// Splits the comma-separated origin list, trimming entries and dropping
/// empty ones.
pub fn parse_cors_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
