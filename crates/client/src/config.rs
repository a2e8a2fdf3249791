//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `SHOPFRONT_API_URL` - Base URL of the REST API (default: `http://localhost:5000`)
//! - `SHOPFRONT_REQUEST_TIMEOUT_SECS` - Per-request deadline (default: 30)
//! - `SHOPFRONT_CONNECT_TIMEOUT_SECS` - Connection deadline (default: 10)
//! - `SHOPFRONT_REFRESH_RETRIES` - Extra refresh attempts after a transport failure (default: 2)
//! - `SHOPFRONT_REFRESH_BACKOFF_MS` - Base delay between refresh attempts (default: 200)
//! - `SHOPFRONT_USER_AGENT` - User agent sent with every request

use std::time::Duration;

use thiserror::Error;

/// Base URL used when `SHOPFRONT_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_REFRESH_RETRIES: u32 = 2;
const DEFAULT_REFRESH_BACKOFF_MS: u64 = 200;

/// Upper bound on refresh retries; a refresh token must not be hammered.
pub const MAX_REFRESH_RETRIES: u32 = 5;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid base URL {0}: {1}")]
    InvalidBaseUrl(String, String),
}

/// API client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the REST API, without a trailing slash
    pub base_url: String,
    /// Deadline for a single HTTP exchange
    pub request_timeout: Duration,
    /// Deadline for establishing a connection
    pub connect_timeout: Duration,
    /// How many times a refresh is re-attempted after a transport failure
    pub refresh_retries: u32,
    /// Base delay for exponential backoff between refresh attempts
    pub refresh_backoff: Duration,
    /// User agent header value
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            refresh_retries: DEFAULT_REFRESH_RETRIES,
            refresh_backoff: Duration::from_millis(DEFAULT_REFRESH_BACKOFF_MS),
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed, or
    /// if the base URL is not an absolute `http`/`https` URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = normalize_base_url(
            &lookup("SHOPFRONT_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        )?;
        let request_timeout = Duration::from_secs(parse_or_default(
            &lookup,
            "SHOPFRONT_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?);
        let connect_timeout = Duration::from_secs(parse_or_default(
            &lookup,
            "SHOPFRONT_CONNECT_TIMEOUT_SECS",
            DEFAULT_CONNECT_TIMEOUT_SECS,
        )?);
        let refresh_retries =
            parse_or_default(&lookup, "SHOPFRONT_REFRESH_RETRIES", DEFAULT_REFRESH_RETRIES)?;
        if refresh_retries > MAX_REFRESH_RETRIES {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPFRONT_REFRESH_RETRIES".to_string(),
                format!("must be at most {MAX_REFRESH_RETRIES}"),
            ));
        }
        let refresh_backoff = Duration::from_millis(parse_or_default(
            &lookup,
            "SHOPFRONT_REFRESH_BACKOFF_MS",
            DEFAULT_REFRESH_BACKOFF_MS,
        )?);

        for (key, timeout) in [
            ("SHOPFRONT_REQUEST_TIMEOUT_SECS", request_timeout),
            ("SHOPFRONT_CONNECT_TIMEOUT_SECS", connect_timeout),
        ] {
            if timeout.is_zero() {
                return Err(ConfigError::InvalidEnvVar(
                    key.to_string(),
                    "must be greater than zero".to_string(),
                ));
            }
        }

        Ok(Self {
            base_url,
            request_timeout,
            connect_timeout,
            refresh_retries,
            refresh_backoff,
            user_agent: lookup("SHOPFRONT_USER_AGENT").unwrap_or_else(default_user_agent),
        })
    }

    /// Join an API path onto the base URL.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

/// Validate a base URL and strip trailing slashes.
///
/// # Errors
///
/// Returns `ConfigError::InvalidBaseUrl` when the value is not an absolute
/// `http`/`https` URL with a host.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| ConfigError::InvalidBaseUrl(raw.to_string(), e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl(
            raw.to_string(),
            format!("unsupported scheme '{}'", parsed.scheme()),
        ));
    }
    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidBaseUrl(
            raw.to_string(),
            "missing host".to_string(),
        ));
    }

    Ok(trimmed.to_string())
}

fn default_user_agent() -> String {
    format!("shopfront-client/{}", env!("CARGO_PKG_VERSION"))
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}
