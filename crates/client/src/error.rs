//! Error type returned by every client operation.

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur when talking to the Shopfront API.
///
/// Every variant renders a human-readable message. Callers that need to
/// branch on the failure look at [`ApiError::status`] rather than matching
/// message text.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, connect, reset, timeout).
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status after any refresh and retry.
    #[error("{message}")]
    Status {
        /// Final HTTP status.
        status: StatusCode,
        /// Server-provided message, or the status line when none was readable.
        message: String,
    },

    /// A success response carried a body that is not the expected JSON.
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// The request could not be assembled (bad header, unserializable body).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The client could not be configured.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ApiError {
    /// Build a `Status` error from a non-success response.
    ///
    /// The message is the body's `message` field, then its `error` field.
    /// A JSON body with neither gives `HTTP <code>`; a body that is not JSON
    /// gives the status reason phrase.
    #[must_use]
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let message = match serde_json::from_slice::<serde_json::Value>(body) {
            Ok(value) => ["message", "error"]
                .iter()
                .find_map(|key| value.get(key).and_then(|v| v.as_str()))
                .filter(|msg| !msg.is_empty())
                .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_owned),
            Err(_) => status
                .canonical_reason()
                .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_owned),
        };
        Self::Status { status, message }
    }

    /// HTTP status of the final response, when there was one.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the request ultimately failed authorization.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Whether the request hit its deadline.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// The human-readable message without the variant prefix.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            Self::Decode(msg) | Self::InvalidRequest(msg) => msg.clone(),
            Self::Transport(e) => e.to_string(),
            Self::Config(e) => e.to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
