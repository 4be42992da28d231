//! Auth Error Types
//!
//! Auth-specific variants that render through the unified
//! `kernel::error::AppError` system.
//!
//! The three token failures (`NoTokenProvided`, `InvalidOrExpiredToken`,
//! `AuthenticationFailed`) render the exact same response. Which one
//! occurred is only visible in the logs.

use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Response body message shared by every token failure
pub const NOT_AUTHORIZED_MESSAGE: &str = "Not authorized, please log in";

/// Header telling the client that a login is required
pub const AUTH_REQUIRED_HEADER: &str = "X-Auth-Required";

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Input failed shape validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Username or email already registered
    #[error("User with this username or email already exists")]
    AlreadyExists,

    /// Unknown identity or wrong password (deliberately indistinguishable)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No token on the request
    #[error("No token provided")]
    NoTokenProvided,

    /// Bad signature, expired, or malformed token
    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,

    /// Unexpected failure while authenticating
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// User not found
    #[error("User not found")]
    UserNotFound,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::AlreadyExists => StatusCode::CONFLICT,
            AuthError::InvalidCredentials
            | AuthError::NoTokenProvided
            | AuthError::InvalidOrExpiredToken
            | AuthError::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::AlreadyExists => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::NoTokenProvided
            | AuthError::InvalidOrExpiredToken
            | AuthError::AuthenticationFailed(_) => ErrorKind::Unauthorized,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// True for the failures the auth gate produces
    pub fn is_token_failure(&self) -> bool {
        matches!(
            self,
            AuthError::NoTokenProvided
                | AuthError::InvalidOrExpiredToken
                | AuthError::AuthenticationFailed(_)
        )
    }

    /// Convert to AppError
    ///
    /// Server faults collapse to a generic message so database details
    /// never reach the client.
    pub fn to_app_error(&self) -> AppError {
        match self {
            _ if self.is_token_failure() => {
                AppError::unauthorized(NOT_AUTHORIZED_MESSAGE).with_action("Log in to continue")
            }
            AuthError::AlreadyExists => {
                AppError::new(self.kind(), self.to_string()).with_action("Log in instead")
            }
            AuthError::Database(_) | AuthError::Internal(_) => {
                AppError::internal("Internal server error")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        let mut response = self.to_app_error().into_response();
        if self.is_token_failure() {
            response
                .headers_mut()
                .insert(AUTH_REQUIRED_HEADER, HeaderValue::from_static("true"));
        }
        response
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AuthError {
    fn from(err: tokio::task::JoinError) -> Self {
        AuthError::Internal(format!("background task failed: {err}"))
    }
}
