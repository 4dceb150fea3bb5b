pub mod control;
pub mod ingest;
pub mod playlist;
pub mod station;
pub mod status;
pub mod stream;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use crate::common::{ApiError, RadioError};

/// JSON error body for a failed domain operation.
pub fn radio_error(err: &RadioError, path: &str) -> Response {
    (
        err.status(),
        Json(serde_json::to_value(ApiError::from_radio(err, path)).unwrap_or_default()),
    )
        .into_response()
}

pub fn bad_request(message: &str, path: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::to_value(ApiError::bad_request(message, path)).unwrap_or_default()),
    )
        .into_response()
}

pub fn not_found(message: &str, path: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::to_value(ApiError::not_found(message, path)).unwrap_or_default()),
    )
        .into_response()
}

pub fn internal(message: &str, path: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::to_value(ApiError::internal(message, path)).unwrap_or_default()),
    )
        .into_response()
}
