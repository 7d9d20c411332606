//! Remote Queries
//!
//! What to ask the remote service for, and the key under which the answer
//! is cached.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Remote endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
pub enum Endpoint {
    #[display("everything")]
    Everything,
    #[display("top-headlines")]
    TopHeadlines,
}

impl Endpoint {
    /// Path segment below the service base URL
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Everything => "everything",
            Endpoint::TopHeadlines => "top-headlines",
        }
    }
}

/// Query parameters
///
/// Which fields apply depends on the endpoint: `q`, `from`, `to`, `sort_by`
/// for everything; `country`, `category` for top headlines. `page_size`
/// applies to both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl NewsQuery {
    pub fn search(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Default::default()
        }
    }

    pub fn headlines(country: impl Into<String>) -> Self {
        Self {
            country: Some(country.into()),
            ..Default::default()
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn with_sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = Some(sort_by.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_range(mut self, from: Option<String>, to: Option<String>) -> Self {
        self.from = from;
        self.to = to;
        self
    }
}

/// Cache identity of a request: endpoint plus serialized parameters
///
/// Two value-equal queries always produce the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{_0}")]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(endpoint: Endpoint, query: &NewsQuery) -> Self {
        // Field order is fixed by the struct, so equal queries serialize equally
        let params = serde_json::to_string(query).unwrap_or_default();
        Self(format!("{}:{}", endpoint.path(), params))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_equal_queries_share_a_key() {
        let a = NewsQuery::search("technology").with_page_size(100);
        let b = NewsQuery {
            page_size: Some(100),
            q: Some("technology".to_string()),
            ..Default::default()
        };
        assert_eq!(
            CacheKey::new(Endpoint::Everything, &a),
            CacheKey::new(Endpoint::Everything, &b)
        );
    }

    #[test]
    fn test_endpoint_is_part_of_the_key() {
        let query = NewsQuery::default();
        assert_ne!(
            CacheKey::new(Endpoint::Everything, &query),
            CacheKey::new(Endpoint::TopHeadlines, &query)
        );
    }

    #[test]
    fn test_key_format() {
        let key = CacheKey::new(Endpoint::TopHeadlines, &NewsQuery::headlines("us"));
        assert_eq!(key.as_str(), r#"top-headlines:{"country":"us"}"#);
    }
}
