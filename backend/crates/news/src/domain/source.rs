//! Article Source Trait
//!
//! Interface to whatever produces raw articles. The HTTP client lives in
//! the infrastructure layer; tests script their own sources.

use crate::domain::article::RawArticle;
use crate::domain::query::{Endpoint, NewsQuery};
use crate::error::NewsApiError;

/// Article source trait
#[trait_variant::make(ArticleSource: Send)]
pub trait LocalArticleSource {
    /// Fetch one result page
    async fn fetch(
        &self,
        endpoint: Endpoint,
        query: &NewsQuery,
    ) -> Result<Vec<RawArticle>, NewsApiError>;
}
