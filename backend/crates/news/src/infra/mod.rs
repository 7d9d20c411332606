//! Infrastructure Layer
//!
//! Remote client, response cache and local-store persistence.

pub mod cache;
pub mod newsapi;
pub mod rate_store;
