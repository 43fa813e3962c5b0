//! Generic per-entity query/mutation service.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use super::notifier::Notifier;
use super::query_cache::{ListParams, QueryCache, QueryKey};
use crate::error::AppResult;
use crate::http::ApiClient;

/// Kind of write, used to word log lines and toasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update,
    Delete,
    Upload,
}

impl Mutation {
    fn past(&self) -> &'static str {
        match self {
            Self::Create => "created",
            Self::Update => "updated",
            Self::Delete => "deleted",
            Self::Upload => "file uploaded",
        }
    }

    fn infinitive(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Upload => "upload file for",
        }
    }
}

/// Typed access to one REST collection.
///
/// Lists are cached and retried; details are cached without retry and skipped
/// for an empty id; mutations never retry, invalidate the collection on
/// success, and always report their outcome as a toast.
pub struct Resource<T> {
    client: ApiClient,
    cache: QueryCache,
    notifier: Notifier,
    path: String,
    label: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            cache: self.cache.clone(),
            notifier: self.notifier.clone(),
            path: self.path.clone(),
            label: self.label.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Resource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("path", &self.path)
            .field("label", &self.label)
            .finish()
    }
}

impl<T> Resource<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(
        client: ApiClient,
        cache: QueryCache,
        notifier: Notifier,
        path: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            client,
            cache,
            notifier,
            path: path.into(),
            label: label.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub(crate) fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.path, urlencoding::encode(id))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub async fn list(&self) -> AppResult<Arc<Vec<T>>> {
        self.list_with(&ListParams::new()).await
    }

    /// Cached list read, parameterized by query string.
    pub async fn list_with(&self, params: &ListParams) -> AppResult<Arc<Vec<T>>> {
        let key = QueryKey::list(&self.path, params);
        let retries = self.cache.settings().list_retries;
        self.cache
            .fetch(key, retries, move || async move {
                if params.is_empty() {
                    self.client.get::<Vec<T>>(&self.path).await
                } else {
                    self.client
                        .get_with_query::<Vec<T>, _>(&self.path, params)
                        .await
                }
            })
            .await
    }

    /// Cached detail read. An empty id disables the query.
    pub async fn detail(&self, id: &str) -> AppResult<Option<Arc<T>>> {
        if id.trim().is_empty() {
            return Ok(None);
        }
        let key = QueryKey::detail(&self.path, id);
        let path = self.item_path(id);
        let path = path.as_str();
        self.cache
            .fetch(key, 0, move || self.client.get::<T>(path))
            .await
            .map(Some)
    }

    /// Force the next read of this collection to hit the backend.
    pub async fn invalidate(&self) -> usize {
        self.cache.invalidate(&self.path).await
    }

    /// Invalidate then read the default list again.
    pub async fn refetch(&self) -> AppResult<Arc<Vec<T>>> {
        self.invalidate().await;
        self.list().await
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    pub async fn create<P>(&self, payload: &P) -> AppResult<T>
    where
        P: Serialize + Sync + ?Sized,
    {
        self.run_mutation(Mutation::Create, self.client.post::<T, P>(&self.path, payload))
            .await
    }

    pub async fn update<P>(&self, id: &str, payload: &P) -> AppResult<T>
    where
        P: Serialize + Sync + ?Sized,
    {
        let path = self.item_path(id);
        self.run_mutation(Mutation::Update, self.client.put::<T, P>(&path, payload))
            .await
    }

    /// Hard delete; the backend keeps no tombstone.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let path = self.item_path(id);
        self.run_mutation(Mutation::Delete, self.client.delete::<()>(&path))
            .await
    }

    /// Await `request`, then invalidate and notify according to its outcome.
    pub(crate) async fn run_mutation<R, Fut>(&self, kind: Mutation, request: Fut) -> AppResult<R>
    where
        Fut: Future<Output = AppResult<R>>,
    {
        match request.await {
            Ok(result) => {
                self.cache.invalidate(&self.path).await;
                info!(resource = %self.path, "{} {}", self.label, kind.past());
                self.notifier
                    .success(format!("{} {} successfully", self.label, kind.past()));
                Ok(result)
            }
            Err(e) => {
                warn!(resource = %self.path, "Failed to {} {}: {}", kind.infinitive(), self.label, e);
                self.notifier.error(format!(
                    "Failed to {} {}: {}",
                    kind.infinitive(),
                    self.label.to_lowercase(),
                    e.user_message()
                ));
                Err(e)
            }
        }
    }
}
