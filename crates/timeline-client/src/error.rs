//! Client error types.

use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed before a response arrived (connect, timeout, body).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from server.
        message: String,
    },

    /// Authentication failed (401).
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Authenticated but not permitted (403).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_)) || matches!(self, Error::Api { status: 404, .. })
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Auth(_)) || matches!(self, Error::Api { status: 401, .. })
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Api { status, .. } if *status >= 500)
    }

    /// Check if the request never got a response (unreachable, timed out).
    pub fn is_network_error(&self) -> bool {
        match self {
            Error::Http(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            _ => false,
        }
    }

    /// HTTP status carried by the error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Auth(_) => Some(401),
            Error::Forbidden(_) => Some(403),
            Error::NotFound(_) => Some(404),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error body returned by the server: `{ "message": "..." }`.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
}
