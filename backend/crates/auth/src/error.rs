//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::PasswordHashError;
use platform::storage::StorageError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// No session, or the session cookie does not verify
    #[error("Session not found or invalid")]
    SessionInvalid,

    /// Signed in, but the role may not use this route
    #[error("Administrator access required")]
    Forbidden,

    #[error("Session store error: {0}")]
    Storage(#[from] StorageError),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] PasswordHashError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials | AuthError::SessionInvalid => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::Storage(_) | AuthError::PasswordHash(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials | AuthError::SessionInvalid => ErrorKind::Unauthorized,
            AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::Storage(_) | AuthError::PasswordHash(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let app = AppError::new(self.kind(), self.to_string());
        match self {
            AuthError::SessionInvalid => app.with_action("Sign in again"),
            _ => app,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Storage(e) => {
                tracing::error!(error = %e, "Auth session store error");
            }
            AuthError::PasswordHash(e) => {
                tracing::error!(error = %e, "Auth password hashing error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::Forbidden => {
                tracing::warn!("Non-admin session on admin route");
            }
            AuthError::SessionInvalid => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
