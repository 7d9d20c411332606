//! Data-Fetch Handle
//!
//! [`NewsFeed`] is built once at the composition root and owns the source,
//! the shared cache and the fetch timeout. Each consumer (a page, a request
//! handler) takes its own [`FeedHandle`] and reads a [`FetchState`] from it.
//!
//! Handle rules:
//! - a load for the key that last settled on this handle does not re-run
//! - a fresh cache entry answers without calling the source
//! - a load while another is in flight on the same handle starts nothing
//! - any failure (error or timeout) swaps in the caller's fallback data
//! - once unmounted, results are no longer written to the handle; the
//!   request itself keeps running and still fills the cache

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;

use crate::application::config::NewsConfig;
use crate::domain::article::RawArticle;
use crate::domain::query::{CacheKey, Endpoint, NewsQuery};
use crate::domain::source::ArticleSource;
use crate::error::NewsApiError;
use crate::infra::cache::ResponseCache;

/// What a consumer sees
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchState {
    pub data: Vec<RawArticle>,
    pub is_loading: bool,
    /// Message of the last failure, cleared when a load starts
    pub error: Option<String>,
    pub using_fallback: bool,
}

impl FetchState {
    fn initial(fallback: Vec<RawArticle>) -> Self {
        Self {
            data: fallback,
            is_loading: true,
            error: None,
            using_fallback: false,
        }
    }
}

/// Shared fetch machinery
#[derive(Debug)]
pub struct NewsFeed<S> {
    source: Arc<S>,
    cache: Arc<ResponseCache>,
    fetch_timeout: Duration,
}

impl<S> NewsFeed<S>
where
    S: ArticleSource + Send + Sync + 'static,
{
    pub fn new(source: Arc<S>, cache: Arc<ResponseCache>, config: &NewsConfig) -> Self {
        Self {
            source,
            cache,
            fetch_timeout: config.fetch_timeout,
        }
    }

    /// A new consumer handle
    pub fn handle(self: &Arc<Self>) -> FeedHandle<S> {
        FeedHandle {
            feed: Arc::clone(self),
            inner: Arc::new(HandleInner {
                state: Mutex::new(None),
                in_flight: AtomicBool::new(false),
                mounted: AtomicBool::new(true),
                settled_key: Mutex::new(None),
            }),
        }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }
}

#[derive(Debug)]
struct HandleInner {
    /// `None` until the first load supplies a fallback
    state: Mutex<Option<FetchState>>,
    in_flight: AtomicBool,
    mounted: AtomicBool,
    settled_key: Mutex<Option<CacheKey>>,
}

impl HandleInner {
    fn state(&self) -> MutexGuard<'_, Option<FetchState>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn settled_key(&self) -> MutexGuard<'_, Option<CacheKey>> {
        self.settled_key
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn snapshot(&self, fallback: &[RawArticle]) -> FetchState {
        self.state()
            .clone()
            .unwrap_or_else(|| FetchState::initial(fallback.to_vec()))
    }

    fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    /// Write a finished load, unless the consumer has gone away
    fn settle(&self, key: CacheKey, result: Result<Vec<RawArticle>, String>, fallback: Vec<RawArticle>) {
        if self.is_mounted() {
            let next = match result {
                Ok(data) => FetchState {
                    data,
                    is_loading: false,
                    error: None,
                    using_fallback: false,
                },
                Err(message) => {
                    tracing::warn!(key = %key, error = %message, "Using fallback data");
                    FetchState {
                        data: fallback,
                        is_loading: false,
                        error: Some(message),
                        using_fallback: true,
                    }
                }
            };
            *self.state() = Some(next);
            *self.settled_key() = Some(key);
        } else {
            tracing::debug!(key = %key, "Handle unmounted, result discarded");
        }
        self.in_flight.store(false, Ordering::Release);
    }
}

/// One consumer's view of the feed
#[derive(Debug)]
pub struct FeedHandle<S> {
    feed: Arc<NewsFeed<S>>,
    inner: Arc<HandleInner>,
}

impl<S> FeedHandle<S>
where
    S: ArticleSource + Send + Sync + 'static,
{
    /// Load `endpoint` with `query`, falling back to `fallback` on failure
    ///
    /// Returns the handle state after the load settles (or immediately when
    /// nothing needed to run).
    pub async fn load(
        &self,
        endpoint: Endpoint,
        query: &NewsQuery,
        fallback: Vec<RawArticle>,
    ) -> FetchState {
        let key = CacheKey::new(endpoint, query);

        if !self.inner.is_mounted() {
            return self.inner.snapshot(&fallback);
        }

        if self.inner.settled_key().as_ref() == Some(&key) {
            return self.inner.snapshot(&fallback);
        }

        if self.inner.in_flight.swap(true, Ordering::AcqRel) {
            tracing::debug!(key = %key, "Load already in flight");
            return self.inner.snapshot(&fallback);
        }

        {
            let mut state = self.inner.state();
            let current = state.get_or_insert_with(|| FetchState::initial(fallback.clone()));
            current.is_loading = true;
            current.error = None;
        }

        if let Some(cached) = self.feed.cache.get(&key) {
            tracing::debug!(key = %key, count = cached.len(), "Cache hit");
            self.inner.settle(key, Ok(cached), fallback.clone());
            return self.inner.snapshot(&fallback);
        }

        let source = Arc::clone(&self.feed.source);
        let cache = Arc::clone(&self.feed.cache);
        let inner = Arc::clone(&self.inner);
        let timeout = self.feed.fetch_timeout;
        let query = query.clone();
        let task_fallback = fallback.clone();

        // The request runs on its own task: losing the race or a cancelled
        // caller only detaches it, and a late success still fills the cache
        let request_key = key.clone();
        let request = tokio::spawn(async move {
            let result = source.fetch(endpoint, &query).await;
            if let Ok(articles) = &result {
                cache.insert(request_key, articles.clone());
            }
            result
        });

        let task = tokio::spawn(async move {
            let result = match tokio::time::timeout(timeout, request).await {
                Ok(Ok(Ok(articles))) => Ok(articles),
                Ok(Ok(Err(e))) => Err(e.to_string()),
                Ok(Err(join)) => Err(join.to_string()),
                Err(_) => {
                    tracing::warn!(key = %key, "Fetch timed out; request left running");
                    Err(NewsApiError::Timeout.to_string())
                }
            };
            inner.settle(key, result, task_fallback);
        });

        if let Err(e) = task.await {
            tracing::error!(error = %e, "Fetch task failed");
            self.inner.in_flight.store(false, Ordering::Release);
        }

        self.inner.snapshot(&fallback)
    }

    /// Current state without loading
    pub fn state(&self) -> Option<FetchState> {
        self.inner.state().clone()
    }

    pub fn is_in_flight(&self) -> bool {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    /// Stop accepting results
    pub fn unmount(&self) {
        self.inner.mounted.store(false, Ordering::Release);
    }

    /// Forget the last settled key so the next load runs again
    pub fn invalidate(&self) {
        *self.inner.settled_key() = None;
    }
}

impl<S> Drop for FeedHandle<S> {
    fn drop(&mut self) {
        self.inner.mounted.store(false, Ordering::Release);
    }
}
