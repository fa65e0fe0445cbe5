//! Error taxonomy for remote resource calls.

use thiserror::Error;

/// Errors that can occur while calling a resource.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received (connect failure, timeout, reset).
    #[error("Request to '{url}' failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The response body was not the expected JSON shape.
    #[error("Failed to decode response from '{url}': {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The record could not be serialized for sending.
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Rejected client-side before anything was sent.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The task running the request was shut down before it finished.
    #[error("Request was cancelled before it completed")]
    Cancelled,
}

impl ApiError {
    /// HTTP status of the failure, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short machine-readable classification.
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Network { .. } => "network_failure",
            ApiError::Http { .. } => "http_error",
            ApiError::Decode { .. } => "decode_error",
            ApiError::Encode(_) => "encode_error",
            ApiError::Validation(_) => "validation_failure",
            ApiError::Cancelled => "cancelled",
        }
    }
}
