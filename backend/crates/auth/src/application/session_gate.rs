//! Session Gate
//!
//! Settles a request's [`GateState`] from its cookie token. Anything short
//! of a verified token pointing at a well-formed record with the
//! authentication flag set is `Unauthenticated`.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::parse_token;
use crate::domain::repository::SessionRepository;
use crate::domain::session::GateState;

pub struct SessionGate<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> SessionGate<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    pub async fn resolve(&self, session_token: Option<&str>) -> GateState {
        let Some(token) = session_token else {
            tracing::debug!("No session cookie");
            return GateState::Unauthenticated;
        };

        let session_id = match parse_token(&self.config.session_secret, token) {
            Ok(id) => id,
            Err(_) => {
                tracing::debug!("Session cookie failed verification");
                return GateState::Unauthenticated;
            }
        };

        match self.session_repo.find(session_id).await {
            Ok(record) => GateState::from_record(record),
            Err(e) => {
                tracing::warn!(error = %e, session_id = %session_id, "Unreadable session record");
                GateState::Unauthenticated
            }
        }
    }
}
