//! Error types and response handling for the resource server.

use std::net::SocketAddr;

use axum::http::header::HeaderName;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors returned by resource handlers.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The request was understood but violates a resource rule.
    #[error("{message}")]
    BadRequest {
        message: String,
        entity_name: &'static str,
        error_key: &'static str,
    },

    /// No record with the requested id.
    #[error("Not Found")]
    NotFound,

    /// Response could not be assembled.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResourceError {
    pub fn bad_request(message: &str, entity_name: &'static str, error_key: &'static str) -> Self {
        ResourceError::BadRequest {
            message: message.to_string(),
            entity_name,
            error_key,
        }
    }

    /// Map error variant to HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ResourceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ResourceError::NotFound => StatusCode::NOT_FOUND,
            ResourceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short key used in the `errorKey` field and error header.
    pub fn error_key(&self) -> &'static str {
        match self {
            ResourceError::BadRequest { error_key, .. } => *error_key,
            ResourceError::NotFound => "notfound",
            ResourceError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for ResourceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let entity_name = match &self {
            ResourceError::BadRequest { entity_name, .. } => Some(*entity_name),
            _ => None,
        };
        let body = serde_json::json!({
            "title": self.to_string(),
            "status": status.as_u16(),
            "entityName": entity_name,
            "errorKey": self.error_key(),
        });

        let mut response = (status, Json(body)).into_response();
        if let Ok(value) = HeaderValue::from_str(&format!("error.{}", self.error_key())) {
            response
                .headers_mut()
                .insert(HeaderName::from_static("x-classroll-error"), value);
        }
        response
    }
}

/// Errors starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid bind address '{addr}': {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("try_bind() must be called before run()")]
    NotBound,

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}
