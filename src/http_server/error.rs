//! Defines the custom `ApiError` type for the HTTP server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::{
    engine::watch_registry::WatchError,
    models::{IdentifierError, RecordParseError},
    persistence::PersistenceError,
};

/// Failure of an API handler, rendered as `{"error": "..."}` with a matching status.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or wrong bearer token, or no API key configured.
    Unauthorized,

    /// No watch exists for the requested identifier.
    NotFound(String),

    /// Unparseable date or inverted date range.
    BadRequest(String),

    /// Watch request that failed validation.
    UnprocessableEntity(String),

    /// Storage failure; the detail is logged, not returned.
    InternalServerError(String),
}

/// Invalid ranges are the caller's fault; everything else is ours.
impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::InvalidInput(message) => ApiError::BadRequest(message),
            _ => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<WatchError> for ApiError {
    fn from(err: WatchError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

impl From<IdentifierError> for ApiError {
    fn from(err: IdentifierError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

impl From<RecordParseError> for ApiError {
    fn from(err: RecordParseError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ApiError::Unauthorized =>
                (StatusCode::UNAUTHORIZED, json!({ "error": "Unauthorized" })),
            ApiError::InternalServerError(err) => {
                tracing::error!(error = %err, "Request failed with an internal error.");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "Internal server error" }))
            }
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "error": message })),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
            ApiError::UnprocessableEntity(message) =>
                (StatusCode::UNPROCESSABLE_ENTITY, json!({ "error": message })),
        };

        (status, Json(body)).into_response()
    }
}
