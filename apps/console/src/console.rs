//! The assembled console context.
//!
//! A [`Console`] owns the HTTP client, the query cache, and the notifier,
//! and hands out typed services that share all three.

use serde::de::DeserializeOwned;
use tracing::info;

use crate::auth::{AuthProvider, ProfileService, Session};
use crate::config::Config;
use crate::error::AppResult;
use crate::http::ApiClient;
use crate::models::{Company, Facility, NameItem, NameItemKind, Role};
use crate::services::{
    IncidentResource, Locations, Notifier, QueryCache, Resource, TemplateResource, UserAdmin,
};
use crate::workflow::WorkflowService;

#[derive(Debug, Clone)]
pub struct Console {
    config: Config,
    client: ApiClient,
    cache: QueryCache,
    notifier: Notifier,
}

impl Console {
    pub fn new(config: Config, session: Option<Session>) -> AppResult<Self> {
        let client = ApiClient::from_config(&config, session)?;
        let cache = QueryCache::new(config.query);
        Ok(Self {
            config,
            client,
            cache,
            notifier: Notifier::new(),
        })
    }

    /// Bind another session. Cached reads belong to the previous user and are dropped.
    pub async fn with_session(&self, session: Option<Session>) -> Self {
        self.cache.clear().await;
        if let Some(session) = &session {
            info!(user = %session.user().email, "Session bound");
        }
        Self {
            config: self.config.clone(),
            client: self.client.with_session(session),
            cache: self.cache.clone(),
            notifier: self.notifier.clone(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn session(&self) -> Option<&Session> {
        self.client.session()
    }

    fn resource<T>(&self, path: &str, label: &str) -> Resource<T>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        Resource::new(
            self.client.clone(),
            self.cache.clone(),
            self.notifier.clone(),
            path,
            label,
        )
    }

    // ========================================================================
    // Entities
    // ========================================================================

    pub fn facilities(&self) -> Resource<Facility> {
        self.resource("facilities", "Facility")
    }

    pub fn companies(&self) -> Resource<Company> {
        self.resource("companies", "Company")
    }

    pub fn incidents(&self) -> IncidentResource {
        IncidentResource::new(self.resource("incidentReports", "Incident"))
    }

    pub fn templates(&self) -> TemplateResource {
        TemplateResource::new(self.resource("templates", "Template"))
    }

    pub fn name_items(&self, kind: NameItemKind) -> Resource<NameItem> {
        self.resource(kind.path(), kind.label())
    }

    pub fn locations(&self) -> Locations {
        Locations::new(self.resource("states", "State"), self.resource("lgas", "LGA"))
    }

    pub fn users(&self) -> UserAdmin {
        UserAdmin::new(self.resource("users", "User"))
    }

    pub fn roles(&self) -> Resource<Role> {
        self.resource("roles", "Role")
    }

    pub fn workflow(&self) -> WorkflowService {
        WorkflowService::new(self.incidents())
    }

    // ========================================================================
    // Auth
    // ========================================================================

    pub fn auth(&self) -> AppResult<AuthProvider> {
        AuthProvider::new(&self.config)
    }

    pub fn profile(&self) -> ProfileService {
        ProfileService::new(self.client.clone(), self.notifier.clone())
    }
}
