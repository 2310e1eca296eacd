//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and JSON error responses so
//! every endpoint fails the same way.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use muster_core::errors::MusterError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps domain-specific `MusterError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
#[derive(Debug)]
pub struct AppError(pub MusterError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            MusterError::NotFound(_) => StatusCode::NOT_FOUND,
            MusterError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            MusterError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            MusterError::Forbidden(_) => StatusCode::FORBIDDEN,
            MusterError::Conflict(_) => StatusCode::CONFLICT,
            MusterError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
            MusterError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            MusterError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Get the error message and format as JSON
        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}

/// Allows using `?` with functions that return `Result<T, MusterError>`
/// in handlers that return `Result<T, AppError>`.
impl From<MusterError> for AppError {
    fn from(err: MusterError) -> Self {
        AppError(err)
    }
}

/// Allows using `?` with functions that return `Result<T, eyre::Report>`.
/// The report is wrapped in a `MusterError::Database` variant.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(MusterError::Database(err))
    }
}

/// Maps a MusterError to an HTTP response directly.
pub fn map_error(err: MusterError) -> Response {
    AppError(err).into_response()
}
