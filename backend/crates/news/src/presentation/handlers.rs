//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderName, header};
use axum::response::IntoResponse;
use chrono::{DateTime, Local, NaiveDate, Utc};
use tokio::sync::{RwLock, RwLockWriteGuard};

use crate::application::articles::{
    ArticleFilter, RELATED_ARTICLES, available_authors, find_article, paginate, query_articles,
    related_articles,
};
use crate::application::catalog::{CatalogOutput, LoadCatalogUseCase};
use crate::application::config::NewsConfig;
use crate::application::fetch::NewsFeed;
use crate::application::metrics::{
    author_ranking, kpis, publication_trends, sources_breakdown,
};
use crate::application::payouts::{
    DEFAULT_EXPORT_FIELDS, ExportField, PayoutFilter, PayoutLedger, export_csv, invoices,
    render_invoices, report_text, summarize,
};
use crate::domain::article::{Article, ContentClass};
use crate::domain::payout::{PayoutRates, PayoutRecord};
use crate::domain::source::ArticleSource;
use crate::error::{NewsError, NewsResult};
use crate::infra::rate_store::PayoutRateStore;
use crate::presentation::dto::{
    AnalyticsResponse, ArticleDetailResponse, ArticleListParams, ArticleListResponse,
    DashboardMetrics, DashboardResponse, FeedStatus, PayoutListParams, PayoutListResponse,
    RelatedArticle, StatusUpdateRequest, StatusUpdateResponse, split_list,
};

/// Days in the trend series
pub const TREND_DAYS: u32 = 7;
/// Sources shown on the analytics page
pub const TOP_SOURCES: usize = 6;
/// Authors shown on the dashboard
pub const DASHBOARD_AUTHORS: usize = 5;
/// Authors shown on the analytics page
pub const ANALYTICS_AUTHORS: usize = 6;

/// Shared state for news handlers
pub struct NewsAppState<S>
where
    S: ArticleSource + Send + Sync + 'static,
{
    pub feed: Arc<NewsFeed<S>>,
    pub config: Arc<NewsConfig>,
    pub rate_store: PayoutRateStore,
    /// Built on the first payouts request
    pub ledger: Arc<RwLock<Option<PayoutLedger>>>,
}

impl<S> Clone for NewsAppState<S>
where
    S: ArticleSource + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            feed: Arc::clone(&self.feed),
            config: Arc::clone(&self.config),
            rate_store: self.rate_store.clone(),
            ledger: Arc::clone(&self.ledger),
        }
    }
}

impl<S> NewsAppState<S>
where
    S: ArticleSource + Send + Sync + 'static,
{
    pub fn new(feed: Arc<NewsFeed<S>>, config: Arc<NewsConfig>, rate_store: PayoutRateStore) -> Self {
        Self {
            feed,
            config,
            rate_store,
            ledger: Arc::new(RwLock::new(None)),
        }
    }

    fn catalog_use_case(&self) -> LoadCatalogUseCase<S> {
        LoadCatalogUseCase::new(self.feed.clone(), self.config.clone())
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn feed_status(output: &CatalogOutput) -> FeedStatus {
    FeedStatus {
        using_fallback: output.using_fallback,
        error: output.error.clone(),
    }
}

/// GET /api/dashboard
pub async fn dashboard<S>(State(state): State<NewsAppState<S>>) -> NewsResult<Json<DashboardResponse>>
where
    S: ArticleSource + Send + Sync + 'static,
{
    let today = today();
    let use_case = state.catalog_use_case();

    let headlines = use_case.headlines(today).await;
    let catalog = use_case.catalog(today).await;

    let articles = &catalog.articles;
    let metrics = DashboardMetrics {
        total_articles: articles.len(),
        recent_additions: articles.iter().filter(|a| a.published_date == today).count(),
        top_authors: kpis(articles).active_authors,
    };

    Ok(Json(DashboardResponse {
        recent_articles: headlines.articles.clone(),
        metrics,
        trends: publication_trends(articles, today, TREND_DAYS),
        author_performance: author_ranking(articles, DASHBOARD_AUTHORS),
        feed: feed_status(&headlines),
    }))
}

/// GET /api/articles
pub async fn list_articles<S>(
    State(state): State<NewsAppState<S>>,
    Query(params): Query<ArticleListParams>,
) -> NewsResult<Json<ArticleListResponse>>
where
    S: ArticleSource + Send + Sync + 'static,
{
    let content_classes = split_list(params.types.as_deref())
        .iter()
        .map(|t| t.parse::<ContentClass>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(NewsError::InvalidQuery)?;

    let filter = ArticleFilter {
        search: params.search.clone(),
        authors: split_list(params.authors.as_deref()),
        content_classes,
        from: params.from,
        to: params.to,
    };

    let output = state.catalog_use_case().catalog(today()).await;

    let selected: Vec<Article> = query_articles(
        &output.articles,
        &filter,
        params.sort.unwrap_or_default(),
        params.order.unwrap_or_default(),
    )
    .into_iter()
    .cloned()
    .collect();

    let page = paginate(
        &selected,
        params.page.unwrap_or(1),
        params.per_page.unwrap_or(state.config.articles_per_page),
    );

    Ok(Json(ArticleListResponse {
        page,
        available_authors: available_authors(&output.articles),
        feed: feed_status(&output),
    }))
}

/// GET /api/articles/{id}
pub async fn get_article<S>(
    State(state): State<NewsAppState<S>>,
    Path(id): Path<usize>,
) -> NewsResult<Json<ArticleDetailResponse>>
where
    S: ArticleSource + Send + Sync + 'static,
{
    let output = state.catalog_use_case().catalog(today()).await;
    let article = find_article(&output.articles, id)
        .cloned()
        .ok_or(NewsError::ArticleNotFound(id))?;

    let related = related_articles(&output.articles, id, RELATED_ARTICLES)
        .into_iter()
        .map(RelatedArticle::from)
        .collect();

    Ok(Json(ArticleDetailResponse { article, related }))
}

/// GET /api/analytics
pub async fn analytics<S>(State(state): State<NewsAppState<S>>) -> NewsResult<Json<AnalyticsResponse>>
where
    S: ArticleSource + Send + Sync + 'static,
{
    let today = today();
    let output = state.catalog_use_case().catalog(today).await;
    let articles = &output.articles;

    Ok(Json(AnalyticsResponse {
        kpis: kpis(articles),
        sources: sources_breakdown(articles, TOP_SOURCES),
        trends: publication_trends(articles, today, TREND_DAYS),
        authors: author_ranking(articles, ANALYTICS_AUTHORS),
        feed: feed_status(&output),
    }))
}

/// Bring the ledger in line with the current catalog
async fn synced_ledger<S>(
    state: &NewsAppState<S>,
    now: DateTime<Utc>,
) -> (RwLockWriteGuard<'_, Option<PayoutLedger>>, FeedStatus)
where
    S: ArticleSource + Send + Sync + 'static,
{
    let output = state.catalog_use_case().catalog(today()).await;
    let mut guard = state.ledger.write().await;

    match guard.as_mut() {
        Some(ledger) => ledger.refresh(&output.articles, now),
        None => {
            let ledger = PayoutLedger::build(&output.articles, state.rate_store.load(), now);
            tracing::info!(authors = ledger.len(), "Payout ledger built");
            *guard = Some(ledger);
        }
    }

    (guard, feed_status(&output))
}

fn payout_filter(params: &PayoutListParams) -> PayoutFilter {
    PayoutFilter {
        search: params.search.clone(),
        status: params.status,
        from: params.from,
        to: params.to,
    }
}

/// GET /api/payouts
pub async fn list_payouts<S>(
    State(state): State<NewsAppState<S>>,
    Query(params): Query<PayoutListParams>,
) -> NewsResult<Json<PayoutListResponse>>
where
    S: ArticleSource + Send + Sync + 'static,
{
    let (guard, feed) = synced_ledger(&state, Utc::now()).await;
    let ledger = guard
        .as_ref()
        .ok_or_else(|| NewsError::Internal("payout ledger missing".to_string()))?;

    let records: Vec<PayoutRecord> = ledger
        .filter(&payout_filter(&params))
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(PayoutListResponse {
        rates: *ledger.rates(),
        summary: summarize(&records),
        records,
        feed,
    }))
}

/// PUT /api/payouts/rates
pub async fn update_rates<S>(
    State(state): State<NewsAppState<S>>,
    Json(rates): Json<PayoutRates>,
) -> NewsResult<Json<PayoutRates>>
where
    S: ArticleSource + Send + Sync + 'static,
{
    rates.validate().map_err(NewsError::InvalidRates)?;
    state.rate_store.save(&rates)?;

    let mut guard = state.ledger.write().await;
    if let Some(ledger) = guard.as_mut() {
        ledger.apply_rates(rates, Utc::now());
        tracing::info!(authors = ledger.len(), "Payout totals recomputed");
    }

    Ok(Json(rates))
}

/// POST /api/payouts/status
pub async fn update_status<S>(
    State(state): State<NewsAppState<S>>,
    Json(req): Json<StatusUpdateRequest>,
) -> NewsResult<Json<StatusUpdateResponse>>
where
    S: ArticleSource + Send + Sync + 'static,
{
    if req.authors.is_empty() {
        return Err(NewsError::NoAuthorsSelected);
    }

    let now = Utc::now();
    let (mut guard, _) = synced_ledger(&state, now).await;
    let ledger = guard
        .as_mut()
        .ok_or_else(|| NewsError::Internal("payout ledger missing".to_string()))?;

    let updated = ledger.update_status(&req.authors, req.status, today(), now);
    tracing::info!(status = %req.status, updated, "Bulk payment status update");

    Ok(Json(StatusUpdateResponse { updated }))
}

/// GET /api/payouts/export
pub async fn export_payouts<S>(
    State(state): State<NewsAppState<S>>,
    Query(params): Query<PayoutListParams>,
) -> NewsResult<impl IntoResponse>
where
    S: ArticleSource + Send + Sync + 'static,
{
    let fields = match params.fields.as_deref() {
        Some(raw) => split_list(Some(raw))
            .iter()
            .map(|f| f.parse::<ExportField>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(NewsError::InvalidQuery)?,
        None => DEFAULT_EXPORT_FIELDS.to_vec(),
    };
    if fields.is_empty() {
        return Err(NewsError::InvalidQuery("no export fields selected".to_string()));
    }

    let (guard, _) = synced_ledger(&state, Utc::now()).await;
    let ledger = guard
        .as_ref()
        .ok_or_else(|| NewsError::Internal("payout ledger missing".to_string()))?;

    let csv = export_csv(ledger.filter(&payout_filter(&params)), &fields);
    Ok(download("text/csv", format!("payout-report-{}.csv", today()), csv))
}

/// GET /api/payouts/report
pub async fn payout_report<S>(
    State(state): State<NewsAppState<S>>,
    Query(params): Query<PayoutListParams>,
) -> NewsResult<impl IntoResponse>
where
    S: ArticleSource + Send + Sync + 'static,
{
    let (guard, _) = synced_ledger(&state, Utc::now()).await;
    let ledger = guard
        .as_ref()
        .ok_or_else(|| NewsError::Internal("payout ledger missing".to_string()))?;

    let today = today();
    let report = report_text(ledger.filter(&payout_filter(&params)), ledger.rates(), today);
    Ok(download("text/plain", format!("payout-report-{today}.txt"), report))
}

/// GET /api/payouts/invoices
pub async fn payout_invoices<S>(
    State(state): State<NewsAppState<S>>,
    Query(params): Query<PayoutListParams>,
) -> NewsResult<impl IntoResponse>
where
    S: ArticleSource + Send + Sync + 'static,
{
    let (guard, _) = synced_ledger(&state, Utc::now()).await;
    let ledger = guard
        .as_ref()
        .ok_or_else(|| NewsError::Internal("payout ledger missing".to_string()))?;

    let today = today();
    let invoices = invoices(ledger.filter(&payout_filter(&params)), today);
    tracing::info!(count = invoices.len(), "Invoices generated");

    Ok(download(
        "text/plain",
        format!("invoices-{today}.txt"),
        render_invoices(&invoices),
    ))
}

/// UTF-8 attachment response
fn download(
    mime: &str,
    filename: String,
    body: String,
) -> ([(HeaderName, String); 2], String) {
    (
        [
            (header::CONTENT_TYPE, format!("{mime}; charset=utf-8")),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
}
