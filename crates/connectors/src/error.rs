//! Error types for connectors

use thiserror::Error;

/// Errors that can occur during a polling cycle
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// Failed to initialize connector (e.g., HTTP client creation failed)
    #[error("failed to initialize connector: {0}")]
    Init(String),

    /// HTTP request failed (connection, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Source API answered with a non-success status
    #[error("API request to {url} failed with status {status}")]
    Api { status: u16, url: String },

    /// JSON parsing failed
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// API rate limited
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Pagination did not terminate within the configured page budget
    #[error("pagination exceeded {max_pages} pages without an empty page")]
    PageLimitExceeded { max_pages: u32 },

    /// Record is missing its event time field
    #[error("record has no '{field}' timestamp")]
    MissingTimestamp { field: &'static str },

    /// Timestamp could not be parsed
    #[error("invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },

    /// Credential reference could not be resolved
    #[error("credential '{0}' could not be resolved")]
    CredentialNotFound(String),

    /// Checkpoint store read/write/delete failed
    #[error("checkpoint store error for '{key}': {message}")]
    Checkpoint { key: String, message: String },

    /// Event sink rejected an event
    #[error("event sink '{sink}' failed: {message}")]
    Sink { sink: &'static str, message: String },

    /// Another cycle for the same input is still running
    #[error("a cycle for '{0}' is already in progress")]
    CycleInProgress(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ConnectorError {
    /// Create a checkpoint store error
    pub fn checkpoint(key: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Checkpoint {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Create an event sink error
    pub fn sink(sink: &'static str, message: impl std::fmt::Display) -> Self {
        Self::Sink {
            sink,
            message: message.to_string(),
        }
    }

    /// Create an invalid timestamp error
    pub fn invalid_timestamp(value: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::InvalidTimestamp {
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}
