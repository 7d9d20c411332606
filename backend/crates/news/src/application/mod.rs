//! Application Layer - Use Cases
//!
//! Orchestrates domain logic and infrastructure: the data-fetch handle,
//! the metrics pipeline, catalog browsing and the payout ledger.

pub mod articles;
pub mod catalog;
pub mod config;
pub mod fetch;
pub mod metrics;
pub mod payouts;
