//! Error types for the workflow backend client.

use thiserror::Error;

/// Message shown for every failed read; the dashboard does not distinguish causes.
pub const GENERIC_ERROR_MESSAGE: &str = "Error loading workflow";

/// Workflow backend client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Backend answered with a non-2xx status
    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not the expected JSON shape
    #[error("Malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// Transport failure (connect, timeout, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP client could not be constructed
    #[error("Client configuration error: {0}")]
    Config(String),
}

/// Result type alias using [`ClientError`].
pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// Create a status error from a response code and body.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Returns true for transport-level failures.
    pub fn is_network_error(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_connect() || e.is_timeout() || e.is_request())
    }

    /// Returns true when the backend answered with a 5xx status.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status >= 500)
    }

    /// Message for the dashboard. All failures collapse to the same text.
    pub fn user_message(&self) -> &'static str {
        GENERIC_ERROR_MESSAGE
    }
}
