/// Unified error types for the account service
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the account service
#[derive(Error, Debug)]
pub enum AccountError {
    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),

    /// No matching account
    #[error("{0}")]
    NotFound(String),

    /// Password did not match the stored hash
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, forged or expired bearer token
    #[error("{0}")]
    Unauthenticated(String),

    /// Conflict errors (e.g., duplicate username)
    #[error("{0}")]
    Conflict(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration errors
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AccountError {
    /// Whether this error comes from the storage or runtime layer rather than the caller
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AccountError::Database(_)
                | AccountError::Migration(_)
                | AccountError::Internal(_)
                | AccountError::Io(_)
        )
    }

    /// Replace the message of an internal error with an operation-specific one.
    ///
    /// Caller-facing errors pass through untouched.
    pub fn masked(self, message: &str) -> Self {
        if self.is_internal() {
            tracing::error!("{}: {}", message, self);
            AccountError::Internal(message.to_string())
        } else {
            self
        }
    }
}

impl From<validator::ValidationErrors> for AccountError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AccountError::Validation(errors.to_string())
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Convert AccountError to HTTP response
impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            AccountError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "InvalidRequest",
                self.to_string(),
            ),
            AccountError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound", self.to_string()),
            AccountError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "InvalidCredentials",
                self.to_string(),
            ),
            AccountError::Unauthenticated(_) => (
                StatusCode::UNAUTHORIZED,
                "AuthenticationRequired",
                self.to_string(),
            ),
            AccountError::Conflict(_) => (StatusCode::CONFLICT, "Conflict", self.to_string()),
            // Masked errors already carry a safe, operation-specific message
            AccountError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "InternalServerError",
                message,
            ),
            AccountError::Database(_) | AccountError::Migration(_) | AccountError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "InternalServerError",
                "Internal server error".to_string(), // Don't leak details
            ),
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for account service operations
pub type AccountResult<T> = Result<T, AccountError>;
