//! Load Catalog Use Case
//!
//! Loads a result page through a fresh feed handle and decorates it.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::application::config::NewsConfig;
use crate::application::fetch::NewsFeed;
use crate::domain::article::{Article, RawArticle, decorate_all};
use crate::domain::fallback::sample_articles;
use crate::domain::query::{Endpoint, NewsQuery};
use crate::domain::source::ArticleSource;

/// Output DTO for a catalog load
#[derive(Debug, Clone)]
pub struct CatalogOutput {
    pub articles: Vec<Article>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub using_fallback: bool,
}

/// Load Catalog Use Case
pub struct LoadCatalogUseCase<S>
where
    S: ArticleSource + Send + Sync + 'static,
{
    feed: Arc<NewsFeed<S>>,
    config: Arc<NewsConfig>,
}

impl<S> LoadCatalogUseCase<S>
where
    S: ArticleSource + Send + Sync + 'static,
{
    pub fn new(feed: Arc<NewsFeed<S>>, config: Arc<NewsConfig>) -> Self {
        Self { feed, config }
    }

    pub async fn execute(
        &self,
        endpoint: Endpoint,
        query: &NewsQuery,
        fallback: Vec<RawArticle>,
        today: NaiveDate,
    ) -> CatalogOutput {
        let handle = self.feed.handle();
        let state = handle.load(endpoint, query, fallback).await;

        CatalogOutput {
            articles: decorate_all(&state.data, today),
            is_loading: state.is_loading,
            error: state.error,
            using_fallback: state.using_fallback,
        }
    }

    /// Top headlines shown on the dashboard
    pub async fn headlines(&self, today: NaiveDate) -> CatalogOutput {
        self.execute(
            Endpoint::TopHeadlines,
            &self.config.dashboard_query(),
            sample_articles(),
            today,
        )
        .await
    }

    /// The catalog behind the article list, analytics and payouts
    pub async fn catalog(&self, today: NaiveDate) -> CatalogOutput {
        self.execute(
            Endpoint::Everything,
            &self.config.catalog_query(),
            sample_articles(),
            today,
        )
        .await
    }
}
