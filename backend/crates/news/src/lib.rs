//! News Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Articles, queries, payout rules, the source trait
//! - `application/` - Data-fetch handle, metrics, browsing, payout ledger
//! - `infra/` - NewsAPI client, response cache, rate persistence
//! - `presentation/` - HTTP handlers
//!
//! ## Data Flow
//! - Every page load goes through a `FeedHandle`: cache first, then the
//!   rate-limited remote client, then fallback data on any failure
//! - Synthetic engagement numbers are derived from a hash of the article,
//!   so metrics and payouts are reproducible across reloads

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::NewsConfig;
pub use application::fetch::{FeedHandle, FetchState, NewsFeed};
pub use domain::source::ArticleSource;
pub use error::{NewsApiError, NewsError, NewsResult};
pub use infra::cache::ResponseCache;
pub use infra::newsapi::NewsApiClient;
pub use infra::rate_store::PayoutRateStore;
pub use presentation::handlers::NewsAppState;
pub use presentation::router::{news_router, payouts_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[cfg(test)]
mod tests;
