//! News Error Types
//!
//! Two layers:
//! - [`NewsApiError`] - what went wrong talking to the remote news service.
//!   The data-fetch handle swallows these into fallback data and keeps only
//!   the message.
//! - [`NewsError`] - what the HTTP surface of this crate reports, mapped
//!   onto the unified `kernel::error::AppError`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::storage::StorageError;
use thiserror::Error;

/// News-specific result type alias
pub type NewsResult<T> = Result<T, NewsError>;

/// Remote news service failures
///
/// Display strings are user-facing and shown verbatim on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NewsApiError {
    #[error("Bad request - please check your parameters")]
    BadRequest,

    #[error("Invalid API key or unauthorized access")]
    Unauthorized,

    #[error("Rate limit exceeded - too many requests")]
    RateLimited,

    #[error("NewsAPI server error - please try again later")]
    ServerError,

    #[error("NewsAPI {endpoint} request failed with status {status}")]
    UnexpectedStatus { endpoint: String, status: u16 },

    #[error("Request timeout - NewsAPI is taking too long to respond")]
    Timeout,

    #[error("Invalid response format from NewsAPI")]
    InvalidResponse,

    #[error("Failed to reach NewsAPI: {0}")]
    Transport(String),
}

impl NewsApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NewsApiError::RateLimited => ErrorKind::TooManyRequests,
            NewsApiError::Timeout => ErrorKind::GatewayTimeout,
            NewsApiError::Transport(_) => ErrorKind::ServiceUnavailable,
            NewsApiError::BadRequest
            | NewsApiError::Unauthorized
            | NewsApiError::ServerError
            | NewsApiError::UnexpectedStatus { .. }
            | NewsApiError::InvalidResponse => ErrorKind::BadGateway,
        }
    }
}

/// News-specific error variants
#[derive(Debug, Error)]
pub enum NewsError {
    /// Positional id outside the current result page
    #[error("Article {0} not found")]
    ArticleNotFound(usize),

    /// Rate table rejected by validation
    #[error("Invalid payout rates: {0}")]
    InvalidRates(String),

    /// Malformed query parameter
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// No author in the ledger matched a bulk operation
    #[error("No payout records matched the selection")]
    NoAuthorsSelected,

    #[error("Remote news service error: {0}")]
    Upstream(#[from] NewsApiError),

    #[error("Local store error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl NewsError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            NewsError::ArticleNotFound(_) => ErrorKind::NotFound,
            NewsError::InvalidRates(_) => ErrorKind::UnprocessableEntity,
            NewsError::InvalidQuery(_) | NewsError::NoAuthorsSelected => ErrorKind::BadRequest,
            NewsError::Upstream(e) => e.kind(),
            NewsError::Storage(_) | NewsError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            NewsError::Storage(e) => {
                tracing::error!(error = %e, "News local store error");
            }
            NewsError::Internal(msg) => {
                tracing::error!(message = %msg, "News internal error");
            }
            NewsError::Upstream(e) => {
                tracing::warn!(error = %e, "News upstream degraded");
            }
            _ => {
                tracing::debug!(error = %self, "News error");
            }
        }
    }
}

impl From<NewsError> for AppError {
    fn from(err: NewsError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        let app = AppError::new(kind, message);
        match kind {
            ErrorKind::UnprocessableEntity => {
                app.with_action("Use finite, non-negative amounts for every tier")
            }
            _ => app,
        }
    }
}

impl IntoResponse for NewsError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}
