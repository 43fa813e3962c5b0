//! Identity-provider flows: credentials, enterprise directory, account recovery.

use std::time::Duration;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{Session, SessionUser};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::http::ApiClient;

/// HTTP connect timeout for directory API calls.
const DIRECTORY_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// HTTP total timeout for directory API calls.
const DIRECTORY_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Email and password sign-in body.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Self-service account creation body.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Body for `POST /auth/reset-password`, built from the emailed link.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    pub email: String,
    pub token: String,
    #[serde(serialize_with = "expose")]
    pub new_password: SecretString,
}

impl std::fmt::Debug for PasswordReset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordReset")
            .field("email", &self.email)
            .field("token", &"[REDACTED]")
            .field("new_password", &"[REDACTED]")
            .finish()
    }
}

/// Body for `POST /auth/confirm-email`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailConfirmation {
    pub user_id: String,
    pub token: String,
}

/// Group entry from the directory's `memberOf` listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryGroup {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DirectoryPage {
    #[serde(default)]
    value: Vec<DirectoryGroup>,
}

/// What the backend returns for any successful sign-in.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResult {
    token: String,
    user: SessionUser,
    #[serde(default, deserialize_with = "crate::models::de_opt_datetime")]
    expires_at: Option<DateTime<Utc>>,
}

impl From<SignInResult> for Session {
    fn from(result: SignInResult) -> Self {
        Session::new(result.token, result.user).with_expiry(result.expires_at)
    }
}

fn expose<S: serde::Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// Client for the identity provider.
#[derive(Debug, Clone)]
pub struct AuthProvider {
    client: ApiClient,
    directory: reqwest::Client,
    directory_url: String,
    directory_groups: Vec<String>,
}

impl AuthProvider {
    pub fn new(config: &Config) -> AppResult<Self> {
        let directory = reqwest::Client::builder()
            .connect_timeout(DIRECTORY_CONNECT_TIMEOUT)
            .timeout(DIRECTORY_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Transport(e.to_string()))?;
        Ok(Self {
            client: ApiClient::new(config.auth_url.clone(), None)?,
            directory,
            directory_url: config.directory_url.clone(),
            directory_groups: config.directory_groups.clone(),
        })
    }

    /// `POST /auth/login`
    pub async fn sign_in(&self, credentials: &Credentials) -> AppResult<Session> {
        let result: SignInResult = self
            .client
            .post("auth/login", credentials)
            .await
            .map_err(|e| match e {
                AppError::Http { status: 401 } | AppError::Http { status: 400 } => {
                    AppError::Unauthorized("Invalid email or password".to_string())
                }
                other => other,
            })?;
        info!(user = %result.user.email, "Signed in");
        Ok(result.into())
    }

    /// Sign in with an enterprise directory access token.
    ///
    /// When groups are configured, the directory user must belong to at least
    /// one of them (case-insensitive, by display name or id) before the token
    /// is exchanged for a console session.
    pub async fn sign_in_with_directory(&self, directory_token: &SecretString) -> AppResult<Session> {
        if !self.directory_groups.is_empty() {
            let groups = self.member_of(directory_token).await?;
            let allowed = groups.iter().any(|group| {
                self.directory_groups.iter().any(|wanted| {
                    wanted.eq_ignore_ascii_case(&group.id)
                        || group
                            .display_name
                            .as_deref()
                            .is_some_and(|name| wanted.eq_ignore_ascii_case(name))
                })
            });
            if !allowed {
                warn!(
                    "Directory sign-in rejected: not in allowed groups {:?}",
                    self.directory_groups
                );
                return Err(AppError::Unauthorized(
                    "You are not a member of an authorized group".to_string(),
                ));
            }
        }

        let body = serde_json::json!({ "accessToken": directory_token.expose_secret() });
        let result: SignInResult = self.client.post("auth/directory", &body).await?;
        info!(user = %result.user.email, "Signed in through directory");
        Ok(result.into())
    }

    /// `GET /me/memberOf` on the directory API.
    pub async fn member_of(&self, directory_token: &SecretString) -> AppResult<Vec<DirectoryGroup>> {
        let url = format!("{}/me/memberOf", self.directory_url);
        let page: DirectoryPage = self
            .directory
            .get(&url)
            .header(
                "Authorization",
                format!("Bearer {}", directory_token.expose_secret()),
            )
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| {
                warn!("Directory: failed to fetch group membership: {}", e);
                AppError::Unauthorized("Directory authentication failed".to_string())
            })?
            .json()
            .await
            .map_err(|e| {
                warn!("Directory: failed to parse group membership: {}", e);
                AppError::Unauthorized("Directory authentication failed".to_string())
            })?;
        Ok(page.value)
    }

    /// `POST /auth/register`; the account stays unconfirmed until the emailed link is used.
    pub async fn register(&self, registration: &Registration) -> AppResult<()> {
        self.client
            .post::<serde_json::Value, _>("auth/register", registration)
            .await?;
        info!(user = %registration.email, "Registration submitted");
        Ok(())
    }

    /// `POST /auth/forgot-password`
    pub async fn forgot_password(&self, email: &str) -> AppResult<()> {
        let body = serde_json::json!({ "email": email });
        self.client
            .post::<serde_json::Value, _>("auth/forgot-password", &body)
            .await?;
        Ok(())
    }

    /// `POST /auth/reset-password`
    pub async fn reset_password(&self, reset: &PasswordReset) -> AppResult<()> {
        self.client
            .post::<serde_json::Value, _>("auth/reset-password", reset)
            .await?;
        info!(user = %reset.email, "Password reset");
        Ok(())
    }

    /// `POST /auth/confirm-email`
    pub async fn confirm_email(&self, confirmation: &EmailConfirmation) -> AppResult<()> {
        self.client
            .post::<serde_json::Value, _>("auth/confirm-email", confirmation)
            .await?;
        Ok(())
    }
}
