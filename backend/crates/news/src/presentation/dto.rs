//! API DTOs (Data Transfer Objects)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::application::articles::{Page, SortField, SortOrder};
use crate::application::metrics::{AuthorStats, Kpis, SourceShare, TrendBucket};
use crate::application::payouts::PayoutSummary;
use crate::domain::article::Article;
use crate::domain::payout::{PaymentStatus, PayoutRates, PayoutRecord};

/// Where the data came from
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedStatus {
    pub using_fallback: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_articles: usize,
    pub recent_additions: usize,
    pub top_authors: usize,
}

/// Response for GET /api/dashboard
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub recent_articles: Vec<Article>,
    pub metrics: DashboardMetrics,
    pub trends: Vec<TrendBucket>,
    pub author_performance: Vec<AuthorStats>,
    pub feed: FeedStatus,
}

/// Query for GET /api/articles
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleListParams {
    pub search: Option<String>,
    /// Comma separated author names
    pub authors: Option<String>,
    /// Comma separated content classes (`news`, `blog`)
    pub types: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub sort: Option<SortField>,
    pub order: Option<SortOrder>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// Response for GET /api/articles
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleListResponse {
    #[serde(flatten)]
    pub page: Page<Article>,
    pub available_authors: Vec<String>,
    pub feed: FeedStatus,
}

/// Compact card for an article suggested next to a detail view
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedArticle {
    pub id: usize,
    pub title: String,
    pub author: String,
    pub published_date: NaiveDate,
    pub image_url: Option<String>,
    pub read_time_minutes: u32,
}

impl From<&Article> for RelatedArticle {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id,
            title: article.title.clone(),
            author: article.author.clone(),
            published_date: article.published_date,
            image_url: article.image_url.clone(),
            read_time_minutes: article.read_time_minutes,
        }
    }
}

/// Response for GET /api/articles/{id}
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDetailResponse {
    #[serde(flatten)]
    pub article: Article,
    pub related: Vec<RelatedArticle>,
}

/// Response for GET /api/analytics
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub kpis: Kpis,
    pub sources: Vec<SourceShare>,
    pub trends: Vec<TrendBucket>,
    pub authors: Vec<AuthorStats>,
    pub feed: FeedStatus,
}

/// Query for GET /api/payouts and the payout downloads
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutListParams {
    pub search: Option<String>,
    pub status: Option<PaymentStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Export only: comma separated column keys
    pub fields: Option<String>,
}

/// Response for GET /api/payouts
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutListResponse {
    pub rates: PayoutRates,
    pub records: Vec<PayoutRecord>,
    pub summary: PayoutSummary,
    pub feed: FeedStatus,
}

/// Request for POST /api/payouts/status
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub authors: Vec<String>,
    pub status: PaymentStatus,
}

/// Response for POST /api/payouts/status
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdateResponse {
    pub updated: usize,
}

/// Split a comma separated list, dropping blanks
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
