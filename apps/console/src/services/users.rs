//! User administration: invitations, role assignment, activation.

use std::ops::Deref;

use serde_json::json;

use crate::error::AppResult;
use crate::models::{InviteUserPayload, UpdateUserRolesPayload, User};

use super::resource::{Mutation, Resource};

#[derive(Debug, Clone)]
pub struct UserAdmin {
    base: Resource<User>,
}

impl UserAdmin {
    pub fn new(base: Resource<User>) -> Self {
        Self { base }
    }

    /// Invite a user; the backend emails the confirmation link.
    pub async fn invite(&self, payload: &InviteUserPayload) -> AppResult<User> {
        self.base.create(payload).await
    }

    /// `PUT /users/{id}/roles` replaces the full role list.
    pub async fn update_roles(&self, id: &str, roles: Vec<String>) -> AppResult<User> {
        let path = format!("{}/roles", self.base.item_path(id));
        let body = UpdateUserRolesPayload { roles };
        self.base
            .run_mutation(
                Mutation::Update,
                self.base.client().put::<User, _>(&path, &body),
            )
            .await
    }

    /// `PATCH /users/{id}/status`
    pub async fn set_active(&self, id: &str, is_active: bool) -> AppResult<User> {
        let path = format!("{}/status", self.base.item_path(id));
        let body = json!({ "isActive": is_active });
        self.base
            .run_mutation(
                Mutation::Update,
                self.base.client().patch::<User, _>(&path, &body),
            )
            .await
    }
}

impl Deref for UserAdmin {
    type Target = Resource<User>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}
