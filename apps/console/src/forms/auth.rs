//! Sign-in, registration, recovery, and profile forms.

use secrecy::SecretString;

use super::{EntityForm, FieldRule, FormDefinition, FormValues, Schema};
use crate::auth::{
    Credentials, PasswordChange, PasswordReset, ProfileUpdate, Registration, SessionUser,
};
use crate::error::AppResult;

const MIN_PASSWORD_LEN: usize = 8;
const PASSWORDS_MUST_MATCH: &str = "Passwords must match";

fn secret(values: &FormValues, field: &str) -> SecretString {
    SecretString::from(values.get(field).to_string())
}

fn new_password_rules() -> [FieldRule; 2] {
    [FieldRule::Required, FieldRule::MinLength(MIN_PASSWORD_LEN)]
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoginForm;

impl FormDefinition for LoginForm {
    type Payload = Credentials;

    fn schema(&self) -> Schema {
        Schema::new()
            .field("email", "Email", [FieldRule::Required, FieldRule::Email])
            .field("password", "Password", [FieldRule::Required])
    }

    fn defaults(&self) -> FormValues {
        FormValues::from_pairs([("email", ""), ("password", "")])
    }

    fn build_payload(&self, values: &FormValues) -> AppResult<Credentials> {
        Ok(Credentials {
            email: values.trimmed("email"),
            password: secret(values, "password"),
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RegisterForm;

impl FormDefinition for RegisterForm {
    type Payload = Registration;

    fn schema(&self) -> Schema {
        Schema::new()
            .field("fullName", "Full name", [FieldRule::Required, FieldRule::MaxLength(200)])
            .field("email", "Email", [FieldRule::Required, FieldRule::Email])
            .field("password", "Password", new_password_rules())
            .field("confirmPassword", "Confirm password", [
                FieldRule::Required,
                FieldRule::matches("password", PASSWORDS_MUST_MATCH),
            ])
    }

    fn defaults(&self) -> FormValues {
        FormValues::from_pairs([
            ("fullName", ""),
            ("email", ""),
            ("password", ""),
            ("confirmPassword", ""),
        ])
    }

    fn build_payload(&self, values: &FormValues) -> AppResult<Registration> {
        Ok(Registration {
            full_name: values.trimmed("fullName"),
            email: values.trimmed("email"),
            password: secret(values, "password"),
        })
    }
}

/// Produces the email address the reset link is sent to.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForgotPasswordForm;

impl FormDefinition for ForgotPasswordForm {
    type Payload = String;

    fn schema(&self) -> Schema {
        Schema::new().field("email", "Email", [FieldRule::Required, FieldRule::Email])
    }

    fn defaults(&self) -> FormValues {
        FormValues::from_pairs([("email", "")])
    }

    fn build_payload(&self, values: &FormValues) -> AppResult<String> {
        Ok(values.trimmed("email"))
    }
}

/// Reset form; `email` and `token` come from the emailed link.
#[derive(Debug, Clone)]
pub struct ResetPasswordForm {
    pub email: String,
    pub token: String,
}

impl FormDefinition for ResetPasswordForm {
    type Payload = PasswordReset;

    fn schema(&self) -> Schema {
        Schema::new()
            .field("newPassword", "New password", new_password_rules())
            .field("confirmPassword", "Confirm password", [
                FieldRule::Required,
                FieldRule::matches("newPassword", PASSWORDS_MUST_MATCH),
            ])
    }

    fn defaults(&self) -> FormValues {
        FormValues::from_pairs([("newPassword", ""), ("confirmPassword", "")])
    }

    fn build_payload(&self, values: &FormValues) -> AppResult<PasswordReset> {
        Ok(PasswordReset {
            email: self.email.clone(),
            token: self.token.clone(),
            new_password: secret(values, "newPassword"),
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChangePasswordForm;

impl FormDefinition for ChangePasswordForm {
    type Payload = PasswordChange;

    fn schema(&self) -> Schema {
        Schema::new()
            .field("currentPassword", "Current password", [FieldRule::Required])
            .field("newPassword", "New password", new_password_rules())
            .field("confirmPassword", "Confirm password", [
                FieldRule::Required,
                FieldRule::matches("newPassword", PASSWORDS_MUST_MATCH),
            ])
    }

    fn defaults(&self) -> FormValues {
        FormValues::from_pairs([
            ("currentPassword", ""),
            ("newPassword", ""),
            ("confirmPassword", ""),
        ])
    }

    fn build_payload(&self, values: &FormValues) -> AppResult<PasswordChange> {
        Ok(PasswordChange {
            current_password: secret(values, "currentPassword"),
            new_password: secret(values, "newPassword"),
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileForm;

impl FormDefinition for ProfileForm {
    type Payload = ProfileUpdate;

    fn schema(&self) -> Schema {
        Schema::new()
            .field("fullName", "Full name", [FieldRule::Required, FieldRule::MaxLength(200)])
            .field("email", "Email", [FieldRule::Required, FieldRule::Email])
    }

    fn defaults(&self) -> FormValues {
        FormValues::from_pairs([("fullName", ""), ("email", "")])
    }

    fn build_payload(&self, values: &FormValues) -> AppResult<ProfileUpdate> {
        Ok(ProfileUpdate {
            full_name: values.trimmed("fullName"),
            email: values.trimmed("email"),
        })
    }
}

impl EntityForm<SessionUser> for ProfileForm {
    fn from_entity(&self, user: &SessionUser) -> FormValues {
        FormValues::from_pairs([
            ("fullName", user.full_name.clone()),
            ("email", user.email.clone()),
        ])
    }
}
