//! Auth Middleware
//!
//! Middleware for requiring a session (and optionally the admin role) on
//! protected routes. The settled [`SessionRecord`] is handed to downstream
//! handlers through request extensions.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::SessionGate;
use crate::application::config::AuthConfig;
use crate::domain::repository::SessionRepository;
use crate::domain::session::{GateState, SessionRecord};
use crate::error::AuthError;

/// Middleware state
pub struct AuthMiddlewareState<S>
where
    S: SessionRepository + Send + Sync + 'static,
{
    pub session_repo: Arc<S>,
    pub config: Arc<AuthConfig>,
}

impl<S> Clone for AuthMiddlewareState<S>
where
    S: SessionRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            session_repo: Arc::clone(&self.session_repo),
            config: Arc::clone(&self.config),
        }
    }
}

async fn settle<S>(state: &AuthMiddlewareState<S>, token: Option<String>) -> GateState
where
    S: SessionRepository + Send + Sync + 'static,
{
    let gate = SessionGate::new(state.session_repo.clone(), state.config.clone());
    gate.resolve(token.as_deref()).await
}

fn unauthenticated() -> Response {
    let mut response = AuthError::SessionInvalid.into_response();
    response
        .headers_mut()
        .insert("x-auth-required", axum::http::HeaderValue::from_static("true"));
    response
}

/// Middleware that requires an authenticated session
pub async fn require_session<S>(
    State(state): State<AuthMiddlewareState<S>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    S: SessionRepository + Send + Sync + 'static,
{
    let token = platform::cookie::extract_cookie(req.headers(), &state.config.session_cookie_name);
    let record = settle(&state, token)
        .await
        .into_session()
        .ok_or_else(unauthenticated)?;

    req.extensions_mut().insert(record);
    Ok(next.run(req).await)
}

/// Middleware that requires an authenticated admin session
pub async fn require_admin<S>(
    State(state): State<AuthMiddlewareState<S>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    S: SessionRepository + Send + Sync + 'static,
{
    let token = platform::cookie::extract_cookie(req.headers(), &state.config.session_cookie_name);
    let record: SessionRecord = settle(&state, token)
        .await
        .into_session()
        .ok_or_else(unauthenticated)?;

    if !record.role.is_admin() {
        tracing::warn!(email = %record.email, role = %record.role, "Admin route refused");
        return Err(AuthError::Forbidden.into_response());
    }

    req.extensions_mut().insert(record);
    Ok(next.run(req).await)
}
