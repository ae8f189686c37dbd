//! Error types for the Cloudant client.

use serde::Deserialize;
use thiserror::Error;

/// Client errors
#[derive(Debug, Error)]
pub enum CloudantError {
    /// The payload is not well-formed JSON or lacks its identifying field.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Document update conflict: {0}")]
    Conflict(String),

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Request failed with status {status}: {error} ({reason})")]
    RequestFailed {
        status: u16,
        error: String,
        reason: String,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, CloudantError>;

impl From<config::ConfigError> for CloudantError {
    fn from(err: config::ConfigError) -> Self {
        CloudantError::ConfigError(err.to_string())
    }
}

/// Error body returned by the server, e.g. `{"error":"not_found","reason":"missing"}`
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    reason: String,
}

impl CloudantError {
    /// Map a non-success HTTP status and its body onto an error variant.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
        let detail = if parsed.reason.is_empty() {
            parsed.error.clone()
        } else {
            format!("{}: {}", parsed.error, parsed.reason)
        };

        match status {
            401 | 403 => CloudantError::Unauthorized(detail),
            404 => CloudantError::NotFound(detail),
            409 => CloudantError::Conflict(detail),
            412 => CloudantError::PreconditionFailed(detail),
            _ => CloudantError::RequestFailed {
                status,
                error: parsed.error,
                reason: parsed.reason,
            },
        }
    }

    /// True for a 404 from the server.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CloudantError::NotFound(_))
    }
}
