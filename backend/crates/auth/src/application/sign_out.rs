//! Sign Out Use Case
//!
//! Removes the session record behind a cookie token.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::parse_token;
use crate::domain::repository::SessionRepository;
use crate::error::AuthResult;

/// Sign out use case
pub struct SignOutUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> SignOutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Returns whether a record was removed
    pub async fn execute(&self, session_token: &str) -> AuthResult<bool> {
        let session_id = parse_token(&self.config.session_secret, session_token)?;
        let removed = self.session_repo.delete(session_id).await?;

        tracing::info!(session_id = %session_id, removed, "User signed out");
        Ok(removed)
    }
}
