//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_DATA_PATH` - Storage file (default: data/storage.json)
//! - `CATALOG_URL` - Product source (default: <https://dummyjson.com/products>)
//! - `CATALOG_CACHE_TTL_SECS` - Product cache lifetime (default: 300)
//! - `CATALOG_TIMEOUT_SECS` - Product request timeout (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default product source.
pub const DEFAULT_CATALOG_URL: &str = "https://dummyjson.com/products";

/// Default storage file, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "data/storage.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// JSON file backing the key-value store
    pub data_path: PathBuf,
    /// Product catalog configuration
    pub catalog: CatalogConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<SecretString>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
}

/// Product catalog configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Endpoint returning `{"products": [...]}`
    pub url: Url,
    /// How long a successful fetch is reused
    pub cache_ttl: Duration,
    /// Per-request timeout
    pub timeout: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set but cannot
    /// be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        Ok(Self {
            host: env.parse_or("STOREFRONT_HOST", IpAddr::from([127, 0, 0, 1]))?,
            port: env.parse_or("STOREFRONT_PORT", 3000)?,
            data_path: env
                .get("STOREFRONT_DATA_PATH")
                .map_or_else(|| PathBuf::from(DEFAULT_DATA_PATH), PathBuf::from),
            catalog: CatalogConfig::from_env(&env)?,
            sentry_dsn: env.get("SENTRY_DSN").map(SecretString::from),
            sentry_environment: env.get("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.parse_or("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: env.parse_or("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CatalogConfig {
    fn from_env(env: &Env<'_>) -> Result<Self, ConfigError> {
        let url = match env.get("CATALOG_URL") {
            Some(raw) => parse_catalog_url("CATALOG_URL", &raw)?,
            None => parse_catalog_url("CATALOG_URL", DEFAULT_CATALOG_URL)?,
        };

        Ok(Self {
            url,
            cache_ttl: Duration::from_secs(env.parse_or("CATALOG_CACHE_TTL_SECS", 300)?),
            timeout: Duration::from_secs(env.parse_or("CATALOG_TIMEOUT_SECS", 10)?),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional variable; blank values count as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}

/// Parse an absolute http(s) URL.
fn parse_catalog_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{other}'"),
        )),
    }
}
