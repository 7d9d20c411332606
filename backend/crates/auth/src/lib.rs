//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Session record, gate state, roles, repository trait
//! - `application/` - Credential directory, sign-in/out, session gate
//! - `infra/` - Local store session repository
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Sign-in against a fixed directory of mock accounts (admin, manager)
//! - Server-side session records with HMAC-signed cookie tokens
//! - Three-state gate: unknown, authenticated, unauthenticated
//! - Role gate for admin-only routes
//!
//! ## Security Model
//! - Directory passwords kept as Argon2id hashes built at startup
//! - Session records carry no expiry; sign-out is the only way out

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::directory::CredentialDirectory;
pub use application::session_gate::SessionGate;
pub use domain::session::{GateState, SessionRecord};
pub use domain::value_object::role::Role;
pub use error::{AuthError, AuthResult};
pub use infra::local_store::LocalSessionStore;
pub use presentation::handlers::AuthAppState;
pub use presentation::middleware::{AuthMiddlewareState, require_admin, require_session};
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[cfg(test)]
mod tests;
