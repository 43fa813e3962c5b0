//! Form state, validation schemas, and per-entity payload builders.

mod auth;
mod entity;
mod schema;
mod state;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub use auth::{
    ChangePasswordForm, ForgotPasswordForm, LoginForm, ProfileForm, RegisterForm,
    ResetPasswordForm,
};
pub use entity::{
    CompanyForm, EntityForm, FacilityForm, IncidentDeskForm, InviteUserForm, NameItemForm,
    OML_NUMBER_MESSAGE, RoleForm, TEMPLATE_FILE_TYPES, TemplateForm,
};
pub use schema::{FieldRule, FieldSchema, Schema};
pub use state::{FormAction, FormState, reduce};

/// Field name to raw input value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(field, value)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Value of `field`, empty when unset.
    pub fn get(&self, field: &str) -> &str {
        self.0.get(field).map(String::as_str).unwrap_or("")
    }

    /// Trimmed value of `field`.
    pub fn trimmed(&self, field: &str) -> String {
        self.get(field).trim().to_string()
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Per-field error messages; empty means the values are valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Record an error unless the field already has one.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn remove(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

/// Validate then build a payload.
///
/// On validation failure the returned state carries the errors, has every
/// field marked touched, and is no longer submitting; the result is
/// `AppError::Validation` and the caller must not issue any request. On
/// success the state stays `submitting` until the caller dispatches
/// `FormAction::SubmitFinished`.
pub fn submit<P>(
    state: FormState,
    validate: impl FnOnce(&FormValues) -> FormErrors,
    build: impl FnOnce(&FormValues) -> AppResult<P>,
) -> (FormState, AppResult<P>) {
    let state = reduce(state, FormAction::SubmitAttempt);
    let errors = validate(&state.values);
    let state = reduce(state, FormAction::SetErrors(errors.clone()));

    if !errors.is_empty() {
        let state = reduce(state, FormAction::SubmitFinished { ok: false });
        return (state, Err(AppError::Validation(errors)));
    }

    match build(&state.values) {
        Ok(payload) => (state, Ok(payload)),
        Err(e) => (reduce(state, FormAction::SubmitFinished { ok: false }), Err(e)),
    }
}

/// Form definition: schema, defaults, and the payload it produces.
pub trait FormDefinition {
    type Payload: Send + Sync;

    fn schema(&self) -> Schema;

    /// Values for an empty "add" form.
    fn defaults(&self) -> FormValues;

    /// Cross-field checks beyond the schema can override this.
    fn validate(&self, values: &FormValues) -> FormErrors {
        self.schema().validate(values)
    }

    fn build_payload(&self, values: &FormValues) -> AppResult<Self::Payload>;

    fn initial_state(&self) -> FormState {
        FormState::new(self.defaults())
    }

    fn submit(&self, state: FormState) -> (FormState, AppResult<Self::Payload>) {
        submit(state, |v| self.validate(v), |v| self.build_payload(v))
    }
}
