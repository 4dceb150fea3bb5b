use axum::http::StatusCode;
use serde::Serialize;
use uuid::Uuid;

/// Domain errors for station operations.
#[derive(Debug, thiserror::Error)]
pub enum RadioError {
    #[error("track not found: {0}")]
    NotFound(Uuid),
    #[error("invalid range: from={from} to={to} length={len}")]
    InvalidRange { from: usize, to: usize, len: usize },
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("playlist is empty")]
    EmptyPlaylist,
    #[error("storage failure: {0}")]
    Storage(String),
}

impl RadioError {
    pub fn status(&self) -> StatusCode {
        match self {
            RadioError::NotFound(_) => StatusCode::NOT_FOUND,
            RadioError::InvalidRange { .. } => StatusCode::BAD_REQUEST,
            RadioError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            RadioError::EmptyPlaylist => StatusCode::BAD_REQUEST,
            RadioError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Structured JSON error response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Unix timestamp in milliseconds.
    pub timestamp: u64,
    /// HTTP status code.
    pub status: u16,
    /// HTTP status reason phrase (e.g. "Bad Request").
    pub error: String,
    /// Human-readable error message.
    pub message: String,
    /// The request path that caused the error.
    pub path: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            timestamp: super::now_ms(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message: message.into(),
            path: path.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, path)
    }

    pub fn not_found(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message, path)
    }

    pub fn internal(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message, path)
    }

    pub fn from_radio(err: &RadioError, path: impl Into<String>) -> Self {
        Self::new(err.status(), err.to_string(), path)
    }
}
