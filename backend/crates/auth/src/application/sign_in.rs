//! Sign In Use Case
//!
//! Checks credentials against the directory and stores a session record.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::SessionId;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::directory::CredentialDirectory;
use crate::application::token::issue_token;
use crate::domain::repository::SessionRepository;
use crate::domain::session::SessionRecord;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
pub struct SignInOutput {
    /// Session token for cookie
    pub session_token: String,
    pub record: SessionRecord,
}

/// Sign in use case
pub struct SignInUseCase<S>
where
    S: SessionRepository,
{
    directory: Arc<CredentialDirectory>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> SignInUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(
        directory: Arc<CredentialDirectory>,
        session_repo: Arc<S>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            directory,
            session_repo,
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput, now: DateTime<Utc>) -> AuthResult<SignInOutput> {
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;
        let password =
            ClearTextPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        let role = self
            .directory
            .authenticate(&email, &password)
            .ok_or(AuthError::InvalidCredentials)?;

        let session_id = SessionId::new();
        let record = SessionRecord::signed_in(email, role, now);
        self.session_repo.save(session_id, &record).await?;

        tracing::info!(
            email = %record.email,
            role = %role,
            session_id = %session_id,
            "User signed in"
        );

        Ok(SignInOutput {
            session_token: issue_token(&self.config.session_secret, session_id),
            record,
        })
    }
}
