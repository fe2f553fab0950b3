//! Domain error types for the Atrium server.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use actix_web::{HttpResponse, ResponseError};
use std::fmt;

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Internal failure (e.g. key-hash generation collision); retryable by the caller
    #[error("Internal error: {0}")]
    Internal(String),

    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Credential missing, invalid, expired, or revoked - identity unresolved
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Identity resolved but insufficient role/scope, or token mismatch
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Uniqueness violation or invalid state transition
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Resource existed but is no longer usable (expired invite)
    #[error("Gone: {0}")]
    Gone(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_code, response_message) = match self {
            AppError::Database(err_str) => {
                tracing::error!("Database error: {}", err_str);
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "An internal database error occurred".to_string(),
                )
            }
            AppError::Internal(err_str) => {
                tracing::error!("Internal error: {}", err_str);
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::NotFound(_) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                self.to_string(),
            ),
            AppError::InvalidInput(_) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "INVALID_INPUT",
                self.to_string(),
            ),
            AppError::Unauthorized(_) => (
                actix_web::http::StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                self.to_string(),
            ),
            AppError::Forbidden(_) => (
                actix_web::http::StatusCode::FORBIDDEN,
                "FORBIDDEN",
                self.to_string(),
            ),
            AppError::Conflict(_) => (
                actix_web::http::StatusCode::CONFLICT,
                "CONFLICT",
                self.to_string(),
            ),
            AppError::Gone(_) => (
                actix_web::http::StatusCode::GONE,
                "GONE",
                self.to_string(),
            ),
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: error_code.to_string(),
            message: response_message,
        })
    }
}

/// Error response body matching OpenAPI schema.
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

// Conversion implementations for common error types

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        // Constraint violations are the store-level backstop for check-then-insert
        // races (duplicate slug/email/hash, second pending invite). Surface them
        // as conflicts rather than opaque 500s.
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Conflict("Resource already exists".to_string())
            }
            Some(sea_orm::SqlErr::ForeignKeyConstraintViolation(_)) => {
                AppError::InvalidInput("Referenced resource does not exist".to_string())
            }
            _ => AppError::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidInput(format!("Invalid UUID: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_status_codes() {
        let cases = [
            (
                AppError::NotFound("Organization".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::Unauthorized("Invalid API key".to_string()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                AppError::Forbidden("Requires org role: admin".to_string()),
                StatusCode::FORBIDDEN,
            ),
            (
                AppError::Conflict("Pending invite already exists".to_string()),
                StatusCode::CONFLICT,
            ),
            (AppError::Gone("Invite expired".to_string()), StatusCode::GONE),
            (
                AppError::InvalidInput("Unknown role".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Database("connection refused".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Internal("key generation collision".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.error_response().status(), expected);
        }
    }

    #[test]
    fn test_internal_detail_is_masked() {
        let err = AppError::Database("password=hunter2 connection refused".to_string());
        let resp = err.error_response();
        // Body must not echo internal detail
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
