//! Domain Layer
//!
//! Articles, queries, payouts and the source trait. No I/O.

pub mod article;
pub mod fallback;
pub mod payout;
pub mod query;
pub mod source;
