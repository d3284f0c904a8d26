//! Configuration module for the portfolio data layer.
//!
//! All configuration is loaded from environment variables with sensible defaults.
//! Nothing here is global: the loaded [`Config`] is handed to whoever needs it.

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Default base URL of the table API (the local data service).
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/rest/v1";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the table API, including the `/rest/v1` prefix
    pub api_url: String,
    /// Credential sent as `apikey` and bearer token (also required by the local service)
    pub api_key: Option<String>,
    /// Per-request timeout for the API client
    pub request_timeout: Duration,
    /// Path to SQLite database file of the local data service
    pub db_path: PathBuf,
    /// Address to bind the local data service to
    pub bind_addr: SocketAddr,
    /// Whether the local service exposes the `available_technology` collection
    pub catalog_enabled: bool,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Settings the API Access Layer is constructed from.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A malformed environment value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub variable: &'static str,
    pub value: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid {} value: {:?}", self.variable, self.value)
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_url = env::var("PORTFOLIO_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let api_key = env::var("PORTFOLIO_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        let timeout_raw =
            env::var("PORTFOLIO_REQUEST_TIMEOUT_SECS").unwrap_or_else(|_| "10".to_string());
        let request_timeout = timeout_raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError {
                variable: "PORTFOLIO_REQUEST_TIMEOUT_SECS",
                value: timeout_raw.clone(),
            })?;

        let db_path = env::var("PORTFOLIO_DB_PATH")
            .unwrap_or_else(|_| "./data/portfolio.sqlite".to_string())
            .into();

        let bind_raw =
            env::var("PORTFOLIO_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError {
            variable: "PORTFOLIO_BIND_ADDR",
            value: bind_raw.clone(),
        })?;

        let catalog_raw =
            env::var("PORTFOLIO_CATALOG_ENABLED").unwrap_or_else(|_| "true".to_string());
        let catalog_enabled = parse_flag(&catalog_raw).ok_or_else(|| ConfigError {
            variable: "PORTFOLIO_CATALOG_ENABLED",
            value: catalog_raw.clone(),
        })?;

        let log_level = env::var("PORTFOLIO_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            api_url,
            api_key,
            request_timeout,
            db_path,
            bind_addr,
            catalog_enabled,
            log_level,
        })
    }

    /// Client settings derived from this configuration.
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(self.api_url.clone(), self.api_key.clone()).with_timeout(self.request_timeout)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 7] = [
        "PORTFOLIO_API_URL",
        "PORTFOLIO_API_KEY",
        "PORTFOLIO_REQUEST_TIMEOUT_SECS",
        "PORTFOLIO_DB_PATH",
        "PORTFOLIO_BIND_ADDR",
        "PORTFOLIO_CATALOG_ENABLED",
        "PORTFOLIO_LOG_LEVEL",
    ];

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        for var in VARS {
            env::remove_var(var);
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.api_key.is_none());
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.db_path, PathBuf::from("./data/portfolio.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert!(config.catalog_enabled);
        assert_eq!(config.log_level, "info");

        let api = config.api_config();
        assert_eq!(api.base_url, DEFAULT_API_URL);
        assert!(api.api_key.is_none());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
