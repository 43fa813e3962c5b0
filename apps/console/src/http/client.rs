//! Authenticated JSON client for the regulator REST backend.

use std::time::Instant;

use reqwest::{Client, Method, RequestBuilder, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use super::envelope::ApiResponse;
use super::multipart::MultipartForm;
use crate::auth::Session;
use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Thin wrapper over `reqwest::Client`.
///
/// Every request carries `Authorization: Bearer <token>` when a session is
/// bound, and a JSON content type unless it is multipart or raw. Any non-2xx
/// status becomes [`AppError::Http`]; there is no retry and no timeout.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
    session: Option<Session>,
}

/// How the request body is encoded.
enum Body {
    Empty,
    Json(JsonValue),
    Raw { bytes: Vec<u8>, content_type: String },
    Multipart(MultipartForm),
}

impl ApiClient {
    /// Create a client rooted at `base_url`.
    pub fn new(base_url: impl Into<String>, session: Option<Session>) -> AppResult<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| AppError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            session,
        })
    }

    /// Create a client for the configured REST backend.
    pub fn from_config(config: &Config, session: Option<Session>) -> AppResult<Self> {
        Self::new(config.api_url.clone(), session)
    }

    /// Same connection pool, different session.
    pub fn with_session(&self, session: Option<Session>) -> Self {
        Self {
            base_url: self.base_url.clone(),
            http: self.http.clone(),
            session,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    // ========================================================================
    // JSON verbs
    // ========================================================================

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        self.send(Method::GET, path, None::<&()>, Body::Empty).await
    }

    /// GET with URL query parameters.
    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> AppResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(Method::GET, path, Some(query), Body::Empty).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> AppResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = Body::Json(serde_json::to_value(body)?);
        self.send(Method::POST, path, None::<&()>, body).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> AppResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = Body::Json(serde_json::to_value(body)?);
        self.send(Method::PUT, path, None::<&()>, body).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> AppResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = Body::Json(serde_json::to_value(body)?);
        self.send(Method::PATCH, path, None::<&()>, body).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        self.send(Method::DELETE, path, None::<&()>, Body::Empty)
            .await
    }

    // ========================================================================
    // Raw and multipart bodies
    // ========================================================================

    /// POST an opaque body with a caller-chosen content type.
    pub async fn post_raw<T: DeserializeOwned>(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> AppResult<T> {
        let body = Body::Raw {
            bytes,
            content_type: content_type.to_string(),
        };
        self.send(Method::POST, path, None::<&()>, body).await
    }

    pub async fn put_raw<T: DeserializeOwned>(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> AppResult<T> {
        let body = Body::Raw {
            bytes,
            content_type: content_type.to_string(),
        };
        self.send(Method::PUT, path, None::<&()>, body).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: MultipartForm,
    ) -> AppResult<T> {
        self.send(Method::POST, path, None::<&()>, Body::Multipart(form))
            .await
    }

    pub async fn put_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: MultipartForm,
    ) -> AppResult<T> {
        self.send(Method::PUT, path, None::<&()>, Body::Multipart(form))
            .await
    }

    /// Probe `GET /health`; any 2xx counts as healthy.
    pub async fn health_check(&self) -> bool {
        match self.http.get(self.url("health")).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("Health check failed: {}", e);
                false
            }
        }
    }

    // ========================================================================
    // Plumbing
    // ========================================================================

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.http.request(method, self.url(path));
        if let Some(session) = &self.session {
            builder = builder.header(header::AUTHORIZATION, session.bearer());
        }
        builder
    }

    async fn send<T, Q>(
        &self,
        method: Method,
        path: &str,
        query: Option<&Q>,
        body: Body,
    ) -> AppResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let start = Instant::now();
        let mut builder = self.request(method.clone(), path);

        if let Some(query) = query {
            builder = builder.query(query);
        }

        builder = match body {
            Body::Empty => builder.header(header::CONTENT_TYPE, "application/json"),
            Body::Json(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(&value)?),
            Body::Raw {
                bytes,
                content_type,
            } => builder.header(header::CONTENT_TYPE, content_type).body(bytes),
            Body::Multipart(form) => builder.multipart(form.into_reqwest()?),
        };

        let response = builder.send().await.map_err(|e| {
            warn!(
                target: "api",
                method = %method,
                path = %path,
                "Request failed before a response: {}", e
            );
            AppError::Transport(e.to_string())
        })?;

        let status = response.status();
        let elapsed = start.elapsed();

        if !status.is_success() {
            warn!(
                target: "api",
                method = %method,
                path = %path,
                status = %status.as_u16(),
                duration_ms = %elapsed.as_millis(),
                "Request rejected"
            );
            return Err(AppError::Http {
                status: status.as_u16(),
            });
        }

        debug!(
            target: "api",
            method = %method,
            path = %path,
            status = %status.as_u16(),
            duration_ms = %elapsed.as_millis(),
            "Request completed"
        );

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return ApiResponse::<JsonValue> {
                is_success: true,
                message: String::new(),
                status_code: Some(status.as_u16()),
                result: None,
            }
            .into_result(status.as_u16());
        }

        let envelope: ApiResponse<JsonValue> = serde_json::from_slice(&bytes)?;
        envelope.into_result(status.as_u16())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish()
    }
}
