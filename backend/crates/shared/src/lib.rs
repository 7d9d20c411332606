//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of vocabulary shared by the
//! news and auth crates:
//! - Common error types and result aliases
//! - Typed ID wrappers
//!
//! Only things with the same meaning in every crate belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
