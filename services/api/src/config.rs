//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

const DEFAULT_PORT: &str = "3000";
const DEFAULT_GENERATOR_URL: &str = "http://localhost:5000";
const DEFAULT_IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

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
    pub database_url: String,
    pub log_level: Level,
    /// Base URL of the case-study generator; `/generate` is appended.
    pub generator_url: String,
    /// `None` leaves the generator call unbounded.
    pub generator_timeout: Option<Duration>,
    pub firebase_api_key: String,
    pub identity_toolkit_url: String,
    pub cors_origin: String,
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
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let required = |key: &str| lookup(key).ok_or_else(|| ConfigError::MissingVar(key.to_string()));

        // --- Load Server and Database Settings ---
        // BIND_ADDRESS wins; otherwise listen on all interfaces at PORT.
        let bind_address_str = match lookup("BIND_ADDRESS") {
            Some(address) => address,
            None => format!("0.0.0.0:{}", var_or("PORT", DEFAULT_PORT)),
        };
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = required("DATABASE_URL")?;

        let log_level_str = var_or("RUST_LOG", "INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load Generator Settings ---
        let generator_url = var_or("GENERATOR_URL", DEFAULT_GENERATOR_URL)
            .trim_end_matches('/')
            .to_string();

        let generator_timeout = match lookup("GENERATOR_TIMEOUT_SECS") {
            None => None,
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|e| {
                    ConfigError::InvalidValue("GENERATOR_TIMEOUT_SECS".to_string(), e.to_string())
                })?;
                Some(Duration::from_secs(secs))
            }
        };

        // --- Load Identity Provider Settings ---
        let firebase_api_key = required("FIREBASE_API_KEY")?;
        let identity_toolkit_url = var_or("IDENTITY_TOOLKIT_URL", DEFAULT_IDENTITY_TOOLKIT_URL)
            .trim_end_matches('/')
            .to_string();

        let cors_origin = var_or("CORS_ORIGIN", DEFAULT_CORS_ORIGIN);

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            generator_url,
            generator_timeout,
            firebase_api_key,
            identity_toolkit_url,
            cors_origin,
        })
    }
}
