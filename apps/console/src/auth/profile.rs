//! Profile settings for the signed-in user.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{info, warn};

use super::{Session, SessionUser};
use crate::error::{AppError, AppResult};
use crate::http::ApiClient;
use crate::services::Notifier;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub full_name: String,
    pub email: String,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    #[serde(serialize_with = "expose")]
    pub current_password: SecretString,
    #[serde(serialize_with = "expose")]
    pub new_password: SecretString,
}

impl std::fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordChange { .. }")
    }
}

fn expose<S: serde::Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// Authenticated profile endpoints. Outcomes are reported as toasts.
#[derive(Debug, Clone)]
pub struct ProfileService {
    client: ApiClient,
    notifier: Notifier,
}

impl ProfileService {
    pub fn new(client: ApiClient, notifier: Notifier) -> Self {
        Self { client, notifier }
    }

    fn session(&self) -> AppResult<&Session> {
        self.client
            .session()
            .ok_or_else(|| AppError::Unauthorized("Sign in to manage your profile".to_string()))
    }

    /// `PUT /auth/profile`; returns the session carrying the refreshed profile.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> AppResult<Session> {
        let session = self.session()?;
        match self.client.put::<SessionUser, _>("auth/profile", update).await {
            Ok(user) => {
                info!(user = %user.email, "Profile updated");
                self.notifier.success("Profile updated successfully");
                Ok(session.with_user(user))
            }
            Err(e) => {
                warn!("Failed to update profile: {}", e);
                self.notifier
                    .error(format!("Failed to update profile: {}", e.user_message()));
                Err(e)
            }
        }
    }

    /// `POST /auth/change-password`
    pub async fn change_password(&self, change: &PasswordChange) -> AppResult<()> {
        self.session()?;
        match self
            .client
            .post::<serde_json::Value, _>("auth/change-password", change)
            .await
        {
            Ok(_) => {
                info!("Password changed");
                self.notifier.success("Password changed successfully");
                Ok(())
            }
            Err(e) => {
                warn!("Failed to change password: {}", e);
                self.notifier
                    .error(format!("Failed to change password: {}", e.user_message()));
                Err(e)
            }
        }
    }
}
