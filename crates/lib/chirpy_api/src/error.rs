//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chirpy_core::auth::{AuthError, FailureClass};
use thiserror::Error;
use tracing::{debug, error};

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// The one message every rejected credential gets.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.as_str()),
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "unauthorized", UNAUTHORIZED_MESSAGE)
            }
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error",
            ),
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

/// Collapse internal auth failures into the few statuses a caller may see.
/// The detailed reason is logged and never echoed.
impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e.class() {
            FailureClass::CredentialInvalid | FailureClass::NotFound => {
                debug!(reason = %e, "credential rejected");
                AppError::Unauthorized
            }
            FailureClass::Storage => {
                error!(error = %e, "storage failure during auth");
                AppError::Internal(e.to_string())
            }
            FailureClass::Hashing => {
                error!(error = %e, "credential check could not run");
                AppError::Internal(e.to_string())
            }
            FailureClass::Validation => match e {
                AuthError::Validation(msg) => AppError::Validation(msg),
                other => AppError::Validation(other.to_string()),
            },
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::from(AuthError::Storage(e))
    }
}
