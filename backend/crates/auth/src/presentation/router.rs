//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};

use crate::domain::repository::SessionRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router for any session repository
pub fn auth_router<S>(state: AuthAppState<S>) -> Router
where
    S: SessionRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/signin", post(handlers::sign_in::<S>))
        .route("/signout", post(handlers::sign_out::<S>))
        .route("/status", get(handlers::session_status::<S>))
        .with_state(state)
}
