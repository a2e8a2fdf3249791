//! Subcommand implementations.
//!
//! Every command writes its result to the given writer as plain text and
//! leaves diagnostics to `tracing`.

pub mod admin;
pub mod session;
pub mod shop;

use std::path::PathBuf;
use std::sync::Arc;

use directories::ProjectDirs;
use shopfront_client::{ApiClient, ApiError, ClientConfig, ConfigError, FileCredentialStore, StoreError};
use thiserror::Error;

/// Overrides where the CLI keeps the session between runs.
pub const CREDENTIALS_PATH_ENV: &str = "SHOPFRONT_CREDENTIALS_PATH";

/// Errors that end a CLI run.
#[derive(Debug, Error)]
pub enum CliError {
    /// The API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Environment configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The saved session could not be loaded.
    #[error("Credential store error: {0}")]
    Store(#[from] StoreError),

    /// No platform config directory and no explicit credentials path.
    #[error("No configuration directory found; set {CREDENTIALS_PATH_ENV}")]
    NoConfigDir,

    /// The command needs a session.
    #[error("Not signed in. Run `sf-cli login` first")]
    NotSignedIn,

    /// An argument could not be understood.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Writing to stdout failed.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Where the session file lives.
///
/// # Errors
///
/// Returns `CliError::NoConfigDir` if neither the environment override nor
/// a platform config directory is available.
pub fn credentials_path() -> Result<PathBuf, CliError> {
    if let Ok(path) = std::env::var(CREDENTIALS_PATH_ENV)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }
    ProjectDirs::from("", "", "shopfront")
        .map(|dirs| dirs.config_dir().join("credentials.json"))
        .ok_or(CliError::NoConfigDir)
}

/// Build a client that keeps its session in the credentials file.
///
/// # Errors
///
/// Returns `CliError` if the configuration is invalid or the session file
/// cannot be read.
pub fn connect() -> Result<ApiClient, CliError> {
    let config = ClientConfig::from_env()?;
    let store = FileCredentialStore::open(credentials_path()?)?;
    tracing::debug!(base_url = %config.base_url, path = %store.path().display(), "Connecting");

    Ok(ApiClient::builder()
        .config(config)
        .credential_store(Arc::new(store))
        .build()?)
}

/// Fail early when a command needs a session and none is stored.
fn require_session(client: &ApiClient) -> Result<(), CliError> {
    if client.is_authenticated() {
        Ok(())
    } else {
        Err(CliError::NotSignedIn)
    }
}
