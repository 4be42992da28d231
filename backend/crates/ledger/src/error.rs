//! Ledger Error Types
//!
//! Render through `kernel::error::AppError` the same way `AuthError` does.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type LedgerResult<T> = Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Input failed shape validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Principal may not touch this record
    #[error("{0}")]
    Forbidden(String),

    /// Record does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Duplicate or still-referenced record
    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            LedgerError::Validation(_) => StatusCode::BAD_REQUEST,
            LedgerError::Forbidden(_) => StatusCode::FORBIDDEN,
            LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
            LedgerError::Conflict(_) => StatusCode::CONFLICT,
            LedgerError::Database(_) | LedgerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::Validation(_) => ErrorKind::BadRequest,
            LedgerError::Forbidden(_) => ErrorKind::Forbidden,
            LedgerError::NotFound(_) => ErrorKind::NotFound,
            LedgerError::Conflict(_) => ErrorKind::Conflict,
            LedgerError::Database(_) | LedgerError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError; server faults get a generic message
    pub fn to_app_error(&self) -> AppError {
        match self {
            LedgerError::Database(_) | LedgerError::Internal(_) => {
                AppError::internal("Internal server error")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            LedgerError::Database(e) => {
                tracing::error!(error = %e, "Ledger database error");
            }
            LedgerError::Internal(msg) => {
                tracing::error!(message = %msg, "Ledger internal error");
            }
            LedgerError::Forbidden(msg) => {
                tracing::warn!(reason = %msg, "Ledger access denied");
            }
            _ => {
                tracing::debug!(error = %self, "Ledger error");
            }
        }
    }
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            LedgerError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            LedgerError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            LedgerError::NotFound("Category").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            LedgerError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_not_found_message() {
        let app = LedgerError::NotFound("Transaction").to_app_error();
        assert_eq!(app.status_code(), 404);
        assert_eq!(app.message(), "Transaction not found");
    }

    #[test]
    fn test_database_error_is_not_leaked() {
        let app = LedgerError::Database(sqlx::Error::PoolTimedOut).to_app_error();
        assert_eq!(app.status_code(), 500);
        assert_eq!(app.message(), "Internal server error");
    }
}
