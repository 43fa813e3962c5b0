//! Callbacks a management table invokes, and their resource-backed implementations.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::AppResult;
use crate::models::{Template, TemplateUpload, User, Writable};
use crate::services::{Resource, TemplateResource, UserAdmin};

/// Add, edit, delete, and reload for one table.
#[async_trait]
pub trait TableActions<T>: Send + Sync {
    type Payload: Send + Sync;

    async fn add(&self, payload: &Self::Payload) -> AppResult<()>;

    async fn edit(&self, id: &str, payload: &Self::Payload) -> AppResult<()>;

    async fn delete(&self, id: &str) -> AppResult<()>;

    /// Rows after a write; must bypass the cache.
    async fn refetch(&self) -> AppResult<Vec<T>>;
}

#[async_trait]
impl<T> TableActions<T> for Resource<T>
where
    T: Writable + DeserializeOwned + Clone + Send + Sync + 'static,
{
    type Payload = T::Payload;

    async fn add(&self, payload: &T::Payload) -> AppResult<()> {
        self.create(payload).await.map(|_| ())
    }

    async fn edit(&self, id: &str, payload: &T::Payload) -> AppResult<()> {
        self.update(id, payload).await.map(|_| ())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        Resource::delete(self, id).await
    }

    async fn refetch(&self) -> AppResult<Vec<T>> {
        Resource::refetch(self).await.map(Arc::unwrap_or_clone)
    }
}

#[async_trait]
impl TableActions<Template> for TemplateResource {
    type Payload = TemplateUpload;

    async fn add(&self, payload: &TemplateUpload) -> AppResult<()> {
        self.upload(payload.clone()).await.map(|_| ())
    }

    async fn edit(&self, id: &str, payload: &TemplateUpload) -> AppResult<()> {
        self.replace(id, payload.clone()).await.map(|_| ())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        (**self).delete(id).await
    }

    async fn refetch(&self) -> AppResult<Vec<Template>> {
        (**self).refetch().await.map(Arc::unwrap_or_clone)
    }
}

#[async_trait]
impl TableActions<User> for UserAdmin {
    type Payload = <User as Writable>::Payload;

    async fn add(&self, payload: &Self::Payload) -> AppResult<()> {
        self.invite(payload).await.map(|_| ())
    }

    async fn edit(&self, id: &str, payload: &Self::Payload) -> AppResult<()> {
        self.update(id, payload).await.map(|_| ())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        (**self).delete(id).await
    }

    async fn refetch(&self) -> AppResult<Vec<User>> {
        (**self).refetch().await.map(Arc::unwrap_or_clone)
    }
}
