//! Session context and identity-provider flows.

mod profile;
mod provider;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

pub use profile::{PasswordChange, ProfileService, ProfileUpdate};
pub use provider::{
    AuthProvider, Credentials, DirectoryGroup, EmailConfirmation, PasswordReset, Registration,
};

/// Profile of the signed-in user as carried by the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(deserialize_with = "crate::models::de_id")]
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Authenticated session handed explicitly to every client that needs it.
///
/// # Security features
/// - `Debug` prints `[REDACTED]` instead of the token
/// - Memory is zeroed when dropped (via `zeroize`)
/// - Explicit `.expose_secret()` required to access the value
#[derive(Clone)]
pub struct Session {
    token: SecretString,
    user: SessionUser,
    expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(token: impl Into<String>, user: SessionUser) -> Self {
        Self {
            token: SecretString::from(token.into()),
            user,
            expires_at: None,
        }
    }

    pub fn with_expiry(mut self, expires_at: Option<DateTime<Utc>>) -> Self {
        self.expires_at = expires_at;
        self
    }

    pub fn user(&self) -> &SessionUser {
        &self.user
    }

    /// Value for the `Authorization` header.
    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.token.expose_secret())
    }

    /// Case-insensitive role check.
    pub fn has_role(&self, role: &str) -> bool {
        self.user.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }

    /// Check if the session is past its expiry, when the provider reported one.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Utc::now() >= at)
    }

    /// Same token with a refreshed profile.
    pub fn with_user(&self, user: SessionUser) -> Self {
        Self {
            token: self.token.clone(),
            user,
            expires_at: self.expires_at,
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("user", &self.user.email)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
