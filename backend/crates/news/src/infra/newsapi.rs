//! NewsAPI Client
//!
//! HTTP client for the two NewsAPI endpoints. Every call:
//! - waits on the shared [`MinIntervalLimiter`] first
//! - carries the `NewsApp/1.0` user agent
//! - gives up after the configured request timeout
//! - maps failures onto [`NewsApiError`]

use std::sync::Arc;

use platform::rate_limit::MinIntervalLimiter;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::application::config::NewsConfig;
use crate::domain::article::RawArticle;
use crate::domain::query::{Endpoint, NewsQuery};
use crate::domain::source::ArticleSource;
use crate::error::NewsApiError;

/// Success body of both endpoints
#[derive(Debug, Deserialize)]
struct ArticlesEnvelope {
    articles: Vec<RawArticle>,
}

/// NewsAPI client
#[derive(Debug, Clone)]
pub struct NewsApiClient {
    http: Client,
    base_url: String,
    api_key: String,
    everything_page_size: u32,
    headlines_page_size: u32,
    limiter: Arc<MinIntervalLimiter>,
}

impl NewsApiClient {
    pub fn new(config: &NewsConfig, limiter: Arc<MinIntervalLimiter>) -> Result<Self, NewsApiError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| NewsApiError::Transport(format!("invalid base URL {base_url}: {e}")))?;

        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| NewsApiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
            everything_page_size: config.everything_page_size,
            headlines_page_size: config.headlines_page_size,
            limiter,
        })
    }

    /// Full request URL, API key included
    pub fn request_url(&self, endpoint: Endpoint, query: &NewsQuery) -> Result<Url, NewsApiError> {
        let default_page_size = match endpoint {
            Endpoint::Everything => self.everything_page_size,
            Endpoint::TopHeadlines => self.headlines_page_size,
        };
        let pairs = query_pairs(endpoint, query, &self.api_key, default_page_size);

        Url::parse_with_params(&format!("{}/{}", self.base_url, endpoint.path()), &pairs)
            .map_err(|e| NewsApiError::Transport(e.to_string()))
    }

    async fn send(&self, endpoint: Endpoint, query: &NewsQuery) -> Result<Vec<RawArticle>, NewsApiError> {
        let url = self.request_url(endpoint, query)?;

        let response = self.http.get(url).send().await.map_err(map_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(endpoint, status.as_u16()));
        }

        let body = response.bytes().await.map_err(map_transport)?;
        parse_articles(&body)
    }
}

impl ArticleSource for NewsApiClient {
    async fn fetch(
        &self,
        endpoint: Endpoint,
        query: &NewsQuery,
    ) -> Result<Vec<RawArticle>, NewsApiError> {
        self.limiter.acquire().await;

        tracing::debug!(endpoint = %endpoint, "Calling NewsAPI");

        let result = self.send(endpoint, query).await;
        match &result {
            Ok(articles) => {
                tracing::debug!(endpoint = %endpoint, count = articles.len(), "NewsAPI responded");
            }
            Err(e) => {
                tracing::warn!(endpoint = %endpoint, error = %e, "NewsAPI request failed");
            }
        }
        result
    }
}

/// Query string pairs for an endpoint
///
/// Fields that do not apply to the endpoint are ignored; absent fields are
/// omitted.
pub fn query_pairs(
    endpoint: Endpoint,
    query: &NewsQuery,
    api_key: &str,
    default_page_size: u32,
) -> Vec<(&'static str, String)> {
    let mut pairs = vec![
        ("apiKey", api_key.to_string()),
        (
            "pageSize",
            query.page_size.unwrap_or(default_page_size).to_string(),
        ),
    ];

    let optional = match endpoint {
        Endpoint::Everything => vec![
            ("q", &query.q),
            ("from", &query.from),
            ("to", &query.to),
            ("sortBy", &query.sort_by),
        ],
        Endpoint::TopHeadlines => vec![("country", &query.country), ("category", &query.category)],
    };

    pairs.extend(
        optional
            .into_iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| (name, v.clone()))),
    );
    pairs
}

/// Error for a non-success status
pub fn classify_status(endpoint: Endpoint, status: u16) -> NewsApiError {
    match status {
        400 => NewsApiError::BadRequest,
        401 => NewsApiError::Unauthorized,
        429 => NewsApiError::RateLimited,
        500 => NewsApiError::ServerError,
        other => NewsApiError::UnexpectedStatus {
            endpoint: endpoint.path().to_string(),
            status: other,
        },
    }
}

/// Articles from a response body; anything without an `articles` array is rejected
pub fn parse_articles(body: &[u8]) -> Result<Vec<RawArticle>, NewsApiError> {
    serde_json::from_slice::<ArticlesEnvelope>(body)
        .map(|envelope| envelope.articles)
        .map_err(|e| {
            tracing::debug!(error = %e, "Unparseable NewsAPI body");
            NewsApiError::InvalidResponse
        })
}

fn map_transport(err: reqwest::Error) -> NewsApiError {
    if err.is_timeout() {
        NewsApiError::Timeout
    } else if err.is_decode() {
        NewsApiError::InvalidResponse
    } else {
        // The URL carries the API key
        NewsApiError::Transport(err.without_url().to_string())
    }
}
