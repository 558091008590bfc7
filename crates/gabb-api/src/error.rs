//! Maps domain errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use gabb_auth::AuthError;
use gabb_core::error::{AppError, ErrorKind};

/// Body of error responses that carry a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Human-readable message.
    pub message: String,
}

/// An [`AppError`] on its way out as an HTTP response.
///
/// Authentication failures are a bare `401` so a client cannot tell an
/// expired token from a reused or wrong-scope one.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// `400` with a message body.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(AppError::validation(message))
    }

    /// Bare `401`.
    pub fn unauthorized() -> Self {
        Self(AppError::authentication("Unauthorized"))
    }

    /// Bare `403`.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self(AppError::authorization(message))
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        match err.kind {
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED.into_response(),
            ErrorKind::Authorization => StatusCode::FORBIDDEN.into_response(),
            ErrorKind::NotFound => StatusCode::NOT_FOUND.into_response(),
            ErrorKind::Validation | ErrorKind::Serialization => {
                with_message(StatusCode::BAD_REQUEST, err.message)
            }
            _ if err.is_infrastructure() => {
                tracing::warn!(error = %err, "Dependency unavailable");
                with_message(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service temporarily unavailable".to_string(),
                )
            }
            _ => {
                tracing::error!(error = %err, "Internal server error");
                with_message(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

fn with_message(status: StatusCode, message: String) -> Response {
    (status, Json(ApiErrorResponse { message })).into_response()
}
