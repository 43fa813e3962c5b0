//! Console users and roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Identified, Writable, de_id, de_opt_datetime};

/// User account as listed under `/users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub email_confirmed: bool,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Case-insensitive role check.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }

    /// Comma separated role names, as shown in the users table.
    pub fn roles_label(&self) -> String {
        self.roles.join(", ")
    }
}

impl Identified for User {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Writable for User {
    type Payload = InviteUserPayload;
}

/// Role; the name is the unique key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub name: String,
    #[serde(default)]
    pub user_count: u64,
}

impl Identified for Role {
    fn id(&self) -> &str {
        &self.name
    }
}

impl Writable for Role {
    type Payload = RolePayload;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePayload {
    pub name: String,
}

/// Invitation body for `POST /users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteUserPayload {
    pub full_name: String,
    pub email: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRolesPayload {
    pub roles: Vec<String>,
}
