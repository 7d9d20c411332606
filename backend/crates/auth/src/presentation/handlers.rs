//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use chrono::Utc;
use platform::cookie::{extract_cookie, header_value};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::directory::CredentialDirectory;
use crate::application::{SessionGate, SignInInput, SignInUseCase, SignOutUseCase};
use crate::domain::repository::SessionRepository;
use crate::error::AuthResult;
use crate::presentation::dto::{SessionStatusResponse, SignInRequest, SignInResponse};
use crate::presentation::middleware::AuthMiddlewareState;

/// Shared state for auth handlers
pub struct AuthAppState<S>
where
    S: SessionRepository + Send + Sync + 'static,
{
    pub session_repo: Arc<S>,
    pub directory: Arc<CredentialDirectory>,
    pub config: Arc<AuthConfig>,
}

impl<S> Clone for AuthAppState<S>
where
    S: SessionRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            session_repo: Arc::clone(&self.session_repo),
            directory: Arc::clone(&self.directory),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S> AuthAppState<S>
where
    S: SessionRepository + Send + Sync + 'static,
{
    pub fn new(
        session_repo: Arc<S>,
        directory: Arc<CredentialDirectory>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            session_repo,
            directory,
            config,
        }
    }

    /// State for `require_session` / `require_admin`
    pub fn middleware_state(&self) -> AuthMiddlewareState<S> {
        AuthMiddlewareState {
            session_repo: Arc::clone(&self.session_repo),
            config: Arc::clone(&self.config),
        }
    }

    fn session_token(&self, headers: &HeaderMap) -> Option<String> {
        extract_cookie(headers, &self.config.session_cookie_name)
    }
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /api/auth/signin
pub async fn sign_in<S>(
    State(state): State<AuthAppState<S>>,
    Json(req): Json<SignInRequest>,
) -> AuthResult<impl IntoResponse>
where
    S: SessionRepository + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(
        state.directory.clone(),
        state.session_repo.clone(),
        state.config.clone(),
    );

    let input = SignInInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input, Utc::now()).await?;
    let cookie = state.config.cookie().build_set_cookie(&output.session_token);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, header_value(&cookie))],
        Json(SignInResponse {
            success: true,
            user: output.record,
        }),
    ))
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /api/auth/signout
pub async fn sign_out<S>(
    State(state): State<AuthAppState<S>>,
    headers: HeaderMap,
) -> impl IntoResponse
where
    S: SessionRepository + Send + Sync + 'static,
{
    if let Some(token) = state.session_token(&headers) {
        let use_case = SignOutUseCase::new(state.session_repo.clone(), state.config.clone());
        // The cookie is cleared either way
        if let Err(e) = use_case.execute(&token).await {
            tracing::debug!(error = %e, "Sign out without a live session");
        }
    }

    let cookie = state.config.cookie().build_delete_cookie();

    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, header_value(&cookie))])
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /api/auth/status
pub async fn session_status<S>(
    State(state): State<AuthAppState<S>>,
    headers: HeaderMap,
) -> Json<SessionStatusResponse>
where
    S: SessionRepository + Send + Sync + 'static,
{
    let token = state.session_token(&headers);
    let gate = SessionGate::new(state.session_repo.clone(), state.config.clone());

    Json(gate.resolve(token.as_deref()).await.into())
}
