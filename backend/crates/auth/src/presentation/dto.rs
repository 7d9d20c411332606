//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::session::{GateState, SessionRecord};

/// Sign in request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Sign in response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub success: bool,
    pub user: SessionRecord,
}

/// Session status response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    /// `authenticated` or `unauthenticated`
    pub state: &'static str,
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionRecord>,
}

impl From<GateState> for SessionStatusResponse {
    fn from(state: GateState) -> Self {
        Self {
            state: state.code(),
            authenticated: state.is_authenticated(),
            user: state.into_session(),
        }
    }
}
