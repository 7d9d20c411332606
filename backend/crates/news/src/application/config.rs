//! Application Configuration
//!
//! Configuration for the news application layer.

use std::time::Duration;

use platform::rate_limit::RateLimitConfig;

use crate::domain::query::NewsQuery;

/// News application configuration
#[derive(Debug, Clone)]
pub struct NewsConfig {
    /// Remote service base URL, without trailing slash
    pub base_url: String,
    /// Remote service API key
    pub api_key: String,
    /// User-Agent sent with every request
    pub user_agent: String,
    /// Per-request timeout of the HTTP client
    pub request_timeout: Duration,
    /// Timeout raced against every fetch started by a feed handle
    pub fetch_timeout: Duration,
    /// Minimum spacing between outbound calls
    pub min_call_interval: Duration,
    /// Cache freshness window
    pub cache_ttl: Duration,
    /// Page size for `everything` when the query names none
    pub everything_page_size: u32,
    /// Page size for `top-headlines` when the query names none
    pub headlines_page_size: u32,
    /// Rows per page on the article list
    pub articles_per_page: usize,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://newsapi.org/v2".to_string(),
            api_key: String::new(),
            user_agent: "NewsApp/1.0".to_string(),
            request_timeout: Duration::from_secs(8),
            fetch_timeout: Duration::from_secs(10),
            min_call_interval: Duration::from_secs(1),
            cache_ttl: Duration::from_secs(5 * 60),
            everything_page_size: 20,
            headlines_page_size: 5,
            articles_per_page: 20,
        }
    }
}

impl NewsConfig {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Create config for development (no key; every page shows fallback data)
    pub fn development() -> Self {
        Self::default()
    }

    pub fn rate_limit(&self) -> RateLimitConfig {
        RateLimitConfig {
            min_interval: self.min_call_interval,
        }
    }

    pub fn cache_ttl_ms(&self) -> i64 {
        self.cache_ttl.as_millis() as i64
    }

    /// Dashboard: four US top headlines
    pub fn dashboard_query(&self) -> NewsQuery {
        NewsQuery::headlines("us").with_page_size(4)
    }

    /// Article list, analytics and payouts: a large technology page
    pub fn catalog_query(&self) -> NewsQuery {
        NewsQuery::search("technology")
            .with_page_size(100)
            .with_sort_by("publishedAt")
    }
}
