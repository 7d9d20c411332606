//! Scenario tests for the news crate
//!
//! Feed handles run against a scripted in-memory source; the routers are
//! driven with `tower::ServiceExt::oneshot`.

#[cfg(test)]
mod support {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::application::config::NewsConfig;
    use crate::application::fetch::NewsFeed;
    use crate::domain::article::{RawArticle, RawSource};
    use crate::domain::query::{Endpoint, NewsQuery};
    use crate::domain::source::ArticleSource;
    use crate::error::NewsApiError;
    use crate::infra::cache::ResponseCache;

    /// Source that answers every call the same way
    pub struct ScriptedSource {
        calls: AtomicUsize,
        delay: Duration,
        response: Result<Vec<RawArticle>, NewsApiError>,
    }

    impl ScriptedSource {
        pub fn ok(articles: Vec<RawArticle>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
                response: Ok(articles),
            }
        }

        pub fn failing(error: NewsApiError) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
                response: Err(error),
            }
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ArticleSource for ScriptedSource {
        async fn fetch(
            &self,
            _endpoint: Endpoint,
            _query: &NewsQuery,
        ) -> Result<Vec<RawArticle>, NewsApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.response.clone()
        }
    }

    pub fn feed_with(
        source: ScriptedSource,
        cache_ttl: Duration,
        fetch_timeout: Duration,
    ) -> (Arc<NewsFeed<ScriptedSource>>, Arc<ScriptedSource>) {
        let config = NewsConfig {
            fetch_timeout,
            ..Default::default()
        };
        let source = Arc::new(source);
        let cache = Arc::new(ResponseCache::new(cache_ttl));
        let feed = Arc::new(NewsFeed::new(source.clone(), cache, &config));
        (feed, source)
    }

    pub fn feed(source: ScriptedSource) -> (Arc<NewsFeed<ScriptedSource>>, Arc<ScriptedSource>) {
        feed_with(source, Duration::from_secs(300), Duration::from_secs(10))
    }

    pub fn raw(author: &str, title: &str, published_at: &str, source: &str) -> RawArticle {
        RawArticle {
            source: Some(RawSource {
                id: None,
                name: Some(source.to_string()),
            }),
            author: Some(author.to_string()),
            title: Some(title.to_string()),
            description: Some(format!("About {title}")),
            url: Some(format!("https://example.com/{}", title.replace(' ', "-"))),
            url_to_image: None,
            published_at: Some(published_at.to_string()),
            content: Some("x".repeat(1200)),
        }
    }

    pub fn live_articles() -> Vec<RawArticle> {
        vec![
            raw("Ana Lima", "Rust in the kernel", "2024-03-10T08:00:00Z", "Wired"),
            raw("Bo Chen", "Async traits land", "2024-03-09T08:00:00Z", "The Verge"),
            raw("Ana Lima", "GPU prices fall", "2024-03-08T08:00:00Z", "Wired"),
        ]
    }

    pub fn fallback() -> Vec<RawArticle> {
        vec![raw("Fallback Writer", "Offline", "2024-01-01T00:00:00Z", "NewsHub")]
    }

    pub fn query() -> NewsQuery {
        NewsQuery::search("technology").with_page_size(100)
    }
}

#[cfg(test)]
mod fetch_tests {
    use super::support::*;
    use crate::domain::query::{Endpoint, NewsQuery};
    use crate::error::NewsApiError;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_success_replaces_fallback() {
        let (feed, source) = feed(ScriptedSource::ok(live_articles()));
        let handle = feed.handle();

        let state = handle.load(Endpoint::Everything, &query(), fallback()).await;

        assert_eq!(state.data, live_articles());
        assert!(!state.is_loading);
        assert!(!state.using_fallback);
        assert_eq!(state.error, None);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_value_equal_queries_hit_the_cache() {
        let (feed, source) = feed(ScriptedSource::ok(live_articles()));

        let first = feed.handle();
        first.load(Endpoint::Everything, &query(), fallback()).await;

        // A separate consumer with an equal but distinct query value
        let second = feed.handle();
        let equal = NewsQuery {
            page_size: Some(100),
            q: Some("technology".to_string()),
            ..Default::default()
        };
        let state = second.load(Endpoint::Everything, &equal, fallback()).await;

        assert_eq!(state.data, live_articles());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_same_key_does_not_rerun_on_one_handle() {
        let (feed, source) = feed_with(
            ScriptedSource::ok(live_articles()),
            Duration::ZERO,
            Duration::from_secs(10),
        );
        let handle = feed.handle();

        handle.load(Endpoint::Everything, &query(), fallback()).await;
        handle.load(Endpoint::Everything, &query(), fallback()).await;
        assert_eq!(source.calls(), 1);

        // A different key runs again
        handle
            .load(Endpoint::TopHeadlines, &NewsQuery::headlines("us"), fallback())
            .await;
        assert_eq!(source.calls(), 2);

        handle.invalidate();
        handle
            .load(Endpoint::TopHeadlines, &NewsQuery::headlines("us"), fallback())
            .await;
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn test_stale_entries_miss() {
        let (feed, source) = feed_with(
            ScriptedSource::ok(live_articles()),
            Duration::from_millis(20),
            Duration::from_secs(10),
        );

        feed.handle()
            .load(Endpoint::Everything, &query(), fallback())
            .await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        feed.handle()
            .load(Endpoint::Everything, &query(), fallback())
            .await;

        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_failure_returns_exact_fallback() {
        let (feed, source) = feed(ScriptedSource::failing(NewsApiError::Unauthorized));
        let handle = feed.handle();

        let state = handle.load(Endpoint::Everything, &query(), fallback()).await;

        assert_eq!(state.data, fallback());
        assert!(state.using_fallback);
        assert!(!state.is_loading);
        assert_eq!(
            state.error.as_deref(),
            Some("Invalid API key or unauthorized access")
        );
        assert_eq!(source.calls(), 1);
        // Failures are not cached
        assert!(feed.cache().is_empty());
    }

    #[tokio::test]
    async fn test_empty_result_is_success() {
        let (feed, _) = feed(ScriptedSource::ok(Vec::new()));
        let state = feed
            .handle()
            .load(Endpoint::Everything, &query(), fallback())
            .await;

        assert!(state.data.is_empty());
        assert!(!state.using_fallback);
    }

    #[tokio::test]
    async fn test_slow_source_loses_the_race() {
        let (feed, _) = feed_with(
            ScriptedSource::ok(live_articles()).with_delay(Duration::from_millis(200)),
            Duration::from_secs(300),
            Duration::from_millis(30),
        );

        let state = feed
            .handle()
            .load(Endpoint::Everything, &query(), fallback())
            .await;

        assert_eq!(state.data, fallback());
        assert!(state.using_fallback);
        assert_eq!(
            state.error.as_deref(),
            Some("Request timeout - NewsAPI is taking too long to respond")
        );
    }

    #[tokio::test]
    async fn test_timed_out_request_still_fills_cache() {
        let (feed, source) = feed_with(
            ScriptedSource::ok(live_articles()).with_delay(Duration::from_millis(80)),
            Duration::from_secs(300),
            Duration::from_millis(20),
        );

        let state = feed
            .handle()
            .load(Endpoint::Everything, &query(), fallback())
            .await;
        assert!(state.using_fallback);
        assert!(feed.cache().is_empty());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(feed.cache().len(), 1);

        // A new page is answered from the late result
        let state = feed
            .handle()
            .load(Endpoint::Everything, &query(), fallback())
            .await;
        assert_eq!(state.data, live_articles());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_second_load_while_in_flight_starts_nothing() {
        let (feed, source) =
            feed(ScriptedSource::ok(live_articles()).with_delay(Duration::from_millis(60)));
        let handle = Arc::new(feed.handle());

        let first = {
            let handle = handle.clone();
            tokio::spawn(async move {
                handle
                    .load(Endpoint::Everything, &query(), fallback())
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(handle.is_in_flight());

        let second = handle
            .load(Endpoint::TopHeadlines, &NewsQuery::headlines("us"), fallback())
            .await;
        assert!(second.is_loading);

        let first = tokio_test::assert_ok!(first.await);
        assert_eq!(first.data, live_articles());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_unmount_discards_result_but_fills_cache() {
        let (feed, source) =
            feed(ScriptedSource::ok(live_articles()).with_delay(Duration::from_millis(50)));
        let handle = Arc::new(feed.handle());

        let loader = {
            let handle = handle.clone();
            tokio::spawn(async move {
                handle
                    .load(Endpoint::Everything, &query(), fallback())
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.unmount();

        let state = tokio_test::assert_ok!(loader.await);
        assert!(state.is_loading);
        assert_eq!(state.data, fallback());

        // The request was not aborted
        assert_eq!(source.calls(), 1);
        assert_eq!(feed.cache().len(), 1);

        // Later loads on an unmounted handle do nothing
        handle.load(Endpoint::Everything, &query(), fallback()).await;
        assert_eq!(source.calls(), 1);
    }
}

#[cfg(test)]
mod payout_tests {
    use super::support::*;
    use crate::application::metrics::publication_trends;
    use crate::application::payouts::PayoutLedger;
    use crate::domain::article::{Article, decorate_all};
    use crate::domain::payout::{PayoutRates, Tier, TierRates, classify};
    use chrono::{NaiveDate, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn many_articles(n: usize) -> Vec<Article> {
        let raws: Vec<_> = (0..n)
            .map(|i| {
                raw(
                    ["Ana Lima", "Bo Chen", "Cy Park"][i % 3],
                    &format!("Story {i}"),
                    &format!("2024-03-{:02}T08:00:00Z", 1 + i % 10),
                    "Wired",
                )
            })
            .collect();
        decorate_all(&raws, today())
    }

    #[test]
    fn test_every_article_lands_in_exactly_one_cell() {
        let articles = many_articles(90);
        let ledger = PayoutLedger::build(&articles, PayoutRates::default(), Utc::now());

        let counted: u32 = ledger.records().map(|r| r.article_count()).sum();
        assert_eq!(counted as usize, articles.len());
    }

    #[test]
    fn test_totals_are_the_dot_product() {
        let articles = many_articles(60);
        let rates = PayoutRates::default();
        let ledger = PayoutLedger::build(&articles, rates, Utc::now());

        for record in ledger.records() {
            let expected: f64 = articles
                .iter()
                .filter(|a| a.author == record.author_name)
                .map(|a| {
                    let (class, tier) = classify(a);
                    rates.for_class(class).get(tier)
                })
                .sum();
            assert_eq!(record.total_amount, expected);
        }
    }

    #[test]
    fn test_rate_change_touches_totals_only() {
        let articles = many_articles(30);
        let mut ledger = PayoutLedger::build(&articles, PayoutRates::default(), Utc::now());
        let counts_before: Vec<_> = ledger
            .records()
            .map(|r| (r.news_articles, r.blog_posts))
            .collect();

        let doubled = PayoutRates {
            news_article: TierRates::new(100.0, 150.0, 200.0),
            blog_post: TierRates::new(80.0, 120.0, 160.0),
        };
        let totals_before: Vec<f64> = ledger.records().map(|r| r.total_amount).collect();
        ledger.apply_rates(doubled, Utc::now());

        let counts_after: Vec<_> = ledger
            .records()
            .map(|r| (r.news_articles, r.blog_posts))
            .collect();
        assert_eq!(counts_before, counts_after);

        let totals_after: Vec<f64> = ledger.records().map(|r| r.total_amount).collect();
        for (before, after) in totals_before.iter().zip(&totals_after) {
            assert_eq!(before * 2.0, *after);
        }
    }

    #[test]
    fn test_two_basic_one_premium_news_pays_175() {
        let mut articles = many_articles(3);
        for article in articles.iter_mut() {
            article.author = "Ana Lima".to_string();
            article.content_class = crate::domain::article::ContentClass::News;
            article.content_length = 100;
        }
        articles[0].views = 100;
        articles[1].views = 200;
        articles[2].views = 8_000;
        assert_eq!(
            articles.iter().map(|a| classify(a).1).collect::<Vec<_>>(),
            vec![Tier::Basic, Tier::Basic, Tier::Premium]
        );

        let ledger = PayoutLedger::build(&articles, PayoutRates::default(), Utc::now());
        assert_eq!(ledger.record("Ana Lima").unwrap().total_amount, 175.0);
    }

    #[test]
    fn test_decoration_is_reproducible() {
        assert_eq!(many_articles(20), many_articles(20));
    }

    #[test]
    fn test_trends_over_decorated_catalog() {
        let articles = many_articles(30);
        let trends = publication_trends(&articles, today(), 7);

        assert_eq!(trends.len(), 7);
        assert_eq!(trends[0].date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert!(trends.windows(2).all(|w| w[0].date < w[1].date));
        // Days 4..=10 of March, three articles each
        assert!(trends.iter().all(|b| b.articles == 3));
    }
}

#[cfg(test)]
mod router_tests {
    use super::support::*;
    use crate::application::config::NewsConfig;
    use crate::infra::rate_store::{PAYOUT_RATES_KEY, PayoutRateStore};
    use crate::presentation::handlers::NewsAppState;
    use crate::presentation::router::{news_router, payouts_router};
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use platform::storage::LocalStore;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> (Router, Arc<LocalStore>) {
        let (feed, _) = feed(ScriptedSource::ok(live_articles()));
        let store = Arc::new(LocalStore::in_memory());
        let state = NewsAppState::new(
            feed,
            Arc::new(NewsConfig::default()),
            PayoutRateStore::new(store.clone()),
        );
        let router = Router::new()
            .merge(news_router(state.clone()))
            .merge(payouts_router(state));
        (router, store)
    }

    async fn call(router: &Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    fn json(bytes: &[u8]) -> serde_json::Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn test_article_list_sorts_and_paginates() {
        let (router, _) = app();
        let (status, body) = call(
            &router,
            Method::GET,
            "/articles?sort=title&order=asc&perPage=2",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["totalItems"], 3);
        assert_eq!(body["totalPages"], 2);
        assert_eq!(body["items"][0]["title"], "Async traits land");
        assert_eq!(body["availableAuthors"], serde_json::json!(["Ana Lima", "Bo Chen"]));
        assert_eq!(body["feed"]["usingFallback"], false);
    }

    #[tokio::test]
    async fn test_article_detail_and_missing_article() {
        let (router, _) = app();

        let (status, body) = call(&router, Method::GET, "/articles/2", None).await;
        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["author"], "Bo Chen");

        let related: Vec<u64> = body["related"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_u64().unwrap())
            .collect();
        assert_eq!(related, vec![1, 3]);
        assert_eq!(body["related"][0]["title"], "Rust in the kernel");

        let (status, body) = call(&router, Method::GET, "/articles/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json(&body)["status"], 404);
    }

    #[tokio::test]
    async fn test_unknown_content_type_is_rejected() {
        let (router, _) = app();
        let (status, _) = call(&router, Method::GET, "/articles?types=opinion", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_dashboard_shape() {
        let (router, _) = app();
        let (status, body) = call(&router, Method::GET, "/dashboard", None).await;

        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["recentArticles"].as_array().unwrap().len(), 3);
        assert_eq!(body["metrics"]["totalArticles"], 3);
        assert_eq!(body["metrics"]["topAuthors"], 2);
        assert_eq!(body["authorPerformance"][0]["author"], "Ana Lima");
        assert_eq!(body["trends"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_analytics_shape() {
        let (router, _) = app();
        let (status, body) = call(&router, Method::GET, "/analytics", None).await;

        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["kpis"]["totalArticles"], 3);
        assert_eq!(body["kpis"]["activeAuthors"], 2);
        assert_eq!(body["sources"][0]["source"], "Wired");
        assert_eq!(body["sources"][0]["percentage"], 67);
        assert_eq!(body["trends"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_rates_are_validated_and_persisted() {
        let (router, store) = app();

        let bad = serde_json::json!({
            "newsArticle": {"basic": -5.0, "premium": 75.0, "featured": 100.0},
            "blogPost": {"basic": 40.0, "premium": 60.0, "featured": 80.0}
        });
        let (status, _) = call(&router, Method::PUT, "/payouts/rates", Some(bad)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(store.get_item(PAYOUT_RATES_KEY).is_none());

        let good = serde_json::json!({
            "newsArticle": {"basic": 10.0, "premium": 20.0, "featured": 30.0},
            "blogPost": {"basic": 1.0, "premium": 2.0, "featured": 3.0}
        });
        let (status, _) = call(&router, Method::PUT, "/payouts/rates", Some(good)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(store.get_item(PAYOUT_RATES_KEY).is_some());

        let (_, body) = call(&router, Method::GET, "/payouts", None).await;
        assert_eq!(json(&body)["rates"]["newsArticle"]["basic"], 10.0);
    }

    #[tokio::test]
    async fn test_bulk_status_then_filter_and_export() {
        let (router, _) = app();

        let (status, body) = call(
            &router,
            Method::POST,
            "/payouts/status",
            Some(serde_json::json!({"authors": ["Bo Chen"], "status": "paid"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["updated"], 1);

        let (_, body) = call(&router, Method::GET, "/payouts?status=paid", None).await;
        let body = json(&body);
        assert_eq!(body["records"].as_array().unwrap().len(), 1);
        assert_eq!(body["records"][0]["authorName"], "Bo Chen");
        assert_eq!(body["summary"]["totalAuthors"], 1);

        let (status, body) = call(
            &router,
            Method::GET,
            "/payouts/export?fields=authorName,paymentStatus",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let csv = String::from_utf8(body).unwrap();
        assert_eq!(
            csv,
            "\"Author Name\",\"Payment Status\"\n\"Ana Lima\",\"pending\"\n\"Bo Chen\",\"paid\""
        );
    }

    #[tokio::test]
    async fn test_report_download() {
        let (router, _) = app();
        let response = router
            .clone()
            .oneshot(Request::get("/payouts/report").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"payout-report-"));
        assert!(disposition.ends_with(".txt\""));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let report = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(report.starts_with("PAYOUT REPORT\n"));
        assert!(report.contains("Total Authors: 2"));
        assert!(report.contains("Ana Lima (ana.lima@newshub.com)"));
        assert!(report.contains("Bo Chen (bo.chen@newshub.com)"));
    }

    #[tokio::test]
    async fn test_invoices_skip_paid_authors() {
        let (router, _) = app();
        call(
            &router,
            Method::POST,
            "/payouts/status",
            Some(serde_json::json!({"authors": ["Bo Chen"], "status": "paid"})),
        )
        .await;

        let (status, body) = call(&router, Method::GET, "/payouts/invoices", None).await;
        assert_eq!(status, StatusCode::OK);

        let text = String::from_utf8(body).unwrap();
        assert!(text.starts_with("INVOICE - Ana Lima\n"));
        assert!(text.contains("News Articles: ") || text.contains("Blog Posts: "));
        assert!(!text.contains("Bo Chen"));
        assert!(!text.contains("---"));
    }

    #[tokio::test]
    async fn test_empty_status_update_is_rejected() {
        let (router, _) = app();
        let (status, _) = call(
            &router,
            Method::POST,
            "/payouts/status",
            Some(serde_json::json!({"authors": [], "status": "paid"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
