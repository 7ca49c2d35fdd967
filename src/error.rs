//! Error types for the Kushki client

use thiserror::Error;

/// Result type alias for Kushki operations
pub type Result<T> = std::result::Result<T, KushkiError>;

/// Failure code for requests that never reached a usable response
pub const TRANSPORT_ERROR_CODE: &str = "TRANSPORT_ERROR";
/// Failure code for requests that exceeded the configured timeout
pub const TIMEOUT_CODE: &str = "TIMEOUT";
/// Failure code for responses that could not be mapped to a token or a decline
pub const INVALID_RESPONSE_CODE: &str = "INVALID_RESPONSE";
/// Failure code for requests rejected before they were sent
pub const INVALID_REQUEST_CODE: &str = "INVALID_REQUEST";
/// Failure code for client misconfiguration
pub const CONFIGURATION_ERROR_CODE: &str = "CONFIGURATION_ERROR";
/// Failure code for local IO failures, such as an unreadable config file
pub const IO_ERROR_CODE: &str = "IO_ERROR";

/// Main error type for Kushki operations
#[derive(Error, Debug)]
pub enum KushkiError {
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response that is neither a token nor a well-formed decline
    #[error("Invalid response (status {status}): {message}")]
    InvalidResponse { status: u16, message: String },

    /// Request rejected before sending
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl KushkiError {
    /// Create an invalid response error
    pub fn invalid_response(status: u16, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Failure code reported in [`crate::Transaction::Failed`]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Http(e) if e.is_timeout() => TIMEOUT_CODE,
            Self::Http(e) if e.is_decode() => INVALID_RESPONSE_CODE,
            Self::Http(_) => TRANSPORT_ERROR_CODE,
            Self::InvalidResponse { .. } => INVALID_RESPONSE_CODE,
            Self::InvalidRequest { .. } => INVALID_REQUEST_CODE,
            // Raised only while loading a config file
            Self::Json(_) | Self::Config { .. } => CONFIGURATION_ERROR_CODE,
            Self::Io(_) => IO_ERROR_CODE,
        }
    }
}
