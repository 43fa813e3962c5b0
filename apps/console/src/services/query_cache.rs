//! Shared query cache for list and detail reads.
//!
//! Entries are fresh for `stale_after`, refetched on the next read after that,
//! and dropped by [`QueryCache::collect_garbage`] once unused for `gc_after`.
//! The cache is the only shared mutable state between views; mutations
//! invalidate whole resources and subscribers are told so they can refetch.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, warn};

use crate::config::QuerySettings;
use crate::error::AppResult;

/// Query parameters of a list read. Ordered so equal parameter sets hash equally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ListParams(BTreeMap<String, String>);

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter; empty values are skipped.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.0.insert(key.into(), value);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryScope {
    List(ListParams),
    Detail(String),
}

/// Cache key: resource path plus what was asked of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub resource: String,
    pub scope: QueryScope,
}

impl QueryKey {
    pub fn list(resource: &str, params: &ListParams) -> Self {
        Self {
            resource: resource.to_string(),
            scope: QueryScope::List(params.clone()),
        }
    }

    pub fn detail(resource: &str, id: &str) -> Self {
        Self {
            resource: resource.to_string(),
            scope: QueryScope::Detail(id.to_string()),
        }
    }
}

struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    fetched_at: Instant,
    last_used: Instant,
}

#[derive(Clone)]
pub struct QueryCache {
    entries: Arc<Mutex<HashMap<QueryKey, Entry>>>,
    settings: QuerySettings,
    invalidations: broadcast::Sender<String>,
}

impl QueryCache {
    pub fn new(settings: QuerySettings) -> Self {
        let (invalidations, _) = broadcast::channel(64);
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            settings,
            invalidations,
        }
    }

    pub fn settings(&self) -> &QuerySettings {
        &self.settings
    }

    /// Return the cached value when fresh, otherwise run `fetcher`.
    ///
    /// The fetcher is retried up to `retries` extra times. A failed fetch
    /// leaves any previous (stale) entry in place.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, retries: u32, fetcher: F) -> AppResult<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        if let Some(hit) = self.fresh::<T>(&key).await {
            debug!(key = ?key, "Query cache hit");
            return Ok(hit);
        }

        debug!(key = ?key, "Query cache miss");
        let mut attempt = 0;
        let value = loop {
            match fetcher().await {
                Ok(value) => break Arc::new(value),
                Err(e) if attempt < retries => {
                    attempt += 1;
                    warn!(key = ?key, attempt, "Query failed, retrying: {}", e);
                }
                Err(e) => return Err(e),
            }
        };

        self.store(key, value.clone()).await;
        Ok(value)
    }

    /// Cached value regardless of staleness.
    pub async fn peek<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .and_then(|entry| entry.value.clone().downcast::<T>().ok())
    }

    /// Seed or replace an entry.
    pub async fn set<T: Send + Sync + 'static>(&self, key: QueryKey, value: T) {
        self.store(key, Arc::new(value)).await;
    }

    async fn fresh<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let mut entries = self.entries.lock().await;
        let entry = entries.get_mut(key)?;
        if entry.fetched_at.elapsed() >= self.settings.stale_after {
            return None;
        }
        entry.last_used = Instant::now();
        entry.value.clone().downcast::<T>().ok()
    }

    async fn store<T: Send + Sync + 'static>(&self, key: QueryKey, value: Arc<T>) {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        entries.insert(
            key,
            Entry {
                value,
                fetched_at: now,
                last_used: now,
            },
        );
    }

    /// Drop every entry of `resource` and notify subscribers.
    pub async fn invalidate(&self, resource: &str) -> usize {
        let removed = {
            let mut entries = self.entries.lock().await;
            let before = entries.len();
            entries.retain(|key, _| key.resource != resource);
            before - entries.len()
        };
        debug!(resource = %resource, removed, "Query cache invalidated");
        let _ = self.invalidations.send(resource.to_string());
        removed
    }

    /// Receive the name of every invalidated resource.
    pub fn subscribe_invalidations(&self) -> broadcast::Receiver<String> {
        self.invalidations.subscribe()
    }

    /// Evict entries unused for longer than the gc window.
    pub async fn collect_garbage(&self) -> usize {
        let gc_after = self.settings.gc_after;
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.last_used.elapsed() < gc_after);
        before - entries.len()
    }

    /// Forget everything, e.g. on sign-out.
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
