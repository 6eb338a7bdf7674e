//! Folio Shield error types.
//!
//! Errors fall into the three classes the service distinguishes at its
//! boundary:
//!
//! - **Client input**: malformed payloads, unknown enum values, bad query
//!   parameters. Surfaced as 4xx with the message.
//! - **Internal**: store or serialization failures. Surfaced as a generic 5xx;
//!   the detail stays in the server log.
//! - **Upstream**: the inference API failed. Never surfaced; the chat
//!   responder falls back to its keyword table.

use thiserror::Error;

/// Folio Shield errors.
#[derive(Error, Debug)]
pub enum ShieldError {
    /// Request payload or parameters were invalid.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Event store could not be accessed.
    #[error("Store error: {0}")]
    Store(String),

    /// Network communication error.
    #[error("Network error: {0}")]
    Network(String),

    /// Upstream inference service error.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Server-side error.
    #[error("Server error: {0}")]
    Server(String),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShieldError {
    /// Whether the error was caused by the caller rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ShieldError::InvalidInput(_) | ShieldError::Json(_))
    }
}

/// Result type alias for Folio Shield operations
pub type Result<T> = std::result::Result<T, ShieldError>;

impl From<reqwest::Error> for ShieldError {
    fn from(err: reqwest::Error) -> Self {
        ShieldError::Network(err.to_string())
    }
}

impl From<toml::de::Error> for ShieldError {
    fn from(err: toml::de::Error) -> Self {
        ShieldError::Config(err.to_string())
    }
}
