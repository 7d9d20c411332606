//! Response Cache
//!
//! Concurrent map from [`CacheKey`] to the last successful payload, backed by
//! `moka`. Entries expire after the freshness window and are evicted by the
//! cache itself.

use std::time::Duration;

use moka::sync::Cache;

use crate::domain::article::RawArticle;
use crate::domain::query::CacheKey;

/// Upper bound on distinct request keys kept at once
const MAX_ENTRIES: u64 = 1_000;

/// Shared response cache
#[derive(Debug, Clone)]
pub struct ResponseCache {
    inner: Cache<CacheKey, Vec<RawArticle>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(MAX_ENTRIES)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Fresh payload for `key`, if any
    #[inline]
    pub fn get(&self, key: &CacheKey) -> Option<Vec<RawArticle>> {
        self.inner.get(key)
    }

    /// Store a payload; overwriting restarts its freshness window
    #[inline]
    pub fn insert(&self, key: CacheKey, articles: Vec<RawArticle>) {
        self.inner.insert(key, articles);
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.inner.run_pending_tasks();
        self.inner.entry_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
