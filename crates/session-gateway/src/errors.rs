//! Session Gateway error types.
//!
//! All errors map to appropriate HTTP status codes via the `IntoResponse`
//! impl. Signing failures are logged server-side with their real cause and
//! returned to clients with a generic message; validation and not-found
//! errors are expected and returned verbatim.

use crate::models::MeetingStatus;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Session Gateway error type.
///
/// Maps to appropriate HTTP status codes:
/// - Validation: 400 Bad Request
/// - Forbidden: 403 Forbidden
/// - NotFound: 404 Not Found
/// - Conflict, IllegalTransition: 409 Conflict
/// - Signing, Internal: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum SgError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Illegal transition: {from} -> {to}")]
    IllegalTransition {
        from: MeetingStatus,
        to: MeetingStatus,
    },

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Internal server error")]
    Internal,
}

impl SgError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            SgError::Validation(_) => 400,
            SgError::Forbidden(_) => 403,
            SgError::NotFound(_) => 404,
            SgError::Conflict(_) | SgError::IllegalTransition { .. } => 409,
            SgError::Signing(_) | SgError::Internal => 500,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for SgError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            SgError::Validation(reason) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", reason.clone())
            }
            SgError::Forbidden(reason) => (StatusCode::FORBIDDEN, "FORBIDDEN", reason.clone()),
            SgError::NotFound(resource) => (StatusCode::NOT_FOUND, "NOT_FOUND", resource.clone()),
            SgError::Conflict(reason) => (StatusCode::CONFLICT, "CONFLICT", reason.clone()),
            SgError::IllegalTransition { from, to } => (
                StatusCode::CONFLICT,
                "ILLEGAL_TRANSITION",
                format!("Cannot transition meeting from {} to {}", from, to),
            ),
            SgError::Signing(err) => {
                // Log actual error server-side, return generic message to client
                tracing::error!(target: "sg.auth", error = %err, "Token signing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SIGNING_ERROR",
                    "Failed to generate access token".to_string(),
                )
            }
            SgError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(error_response)).into_response()
    }
}
