//! E2E tests: sign-in, directory sign-in, account recovery and profile.

use regulator_console_lib::auth::{Credentials, EmailConfirmation, ProfileUpdate};
use regulator_console_lib::error::AppError;
use regulator_console_lib::forms::{
    ChangePasswordForm, FormDefinition, FormState, FormValues, RegisterForm, ResetPasswordForm,
};
use secrecy::SecretString;

use super::mock_backend::{
    EXPIRED_RESET_TOKEN, MEMBER_TOKEN, MockBackend, OUTSIDER_TOKEN, SESSION_TOKEN,
};
use super::test_helpers::*;

/// (1) Valid credentials produce a session carrying the profile and roles.
#[actix_rt::test]
async fn test_sign_in() {
    let mock = MockBackend::start().await;
    let auth = anonymous_console(&mock).auth().unwrap();

    let session = auth
        .sign_in(&Credentials::new("ada@regulator.gov.ng", "correct-horse-battery"))
        .await
        .unwrap();

    assert_eq!(session.user().full_name, "Ada Obi");
    assert!(session.has_role("admin"));
    assert!(!session.is_expired());
    assert!(!format!("{:?}", session).contains(SESSION_TOKEN));

    let request = &mock.requests_to("POST", "/api/auth/login")[0];
    assert_eq!(request.json()["email"], "ada@regulator.gov.ng");
    assert!(request.authorization.is_none());
}

/// (2) A rejected password is reported as invalid credentials.
#[actix_rt::test]
async fn test_sign_in_wrong_password() {
    let mock = MockBackend::start().await;
    let auth = anonymous_console(&mock).auth().unwrap();

    let err = auth
        .sign_in(&Credentials::new("ada@regulator.gov.ng", "guess"))
        .await
        .unwrap_err();

    match err {
        AppError::Unauthorized(message) => assert_eq!(message, "Invalid email or password"),
        other => panic!("expected Unauthorized, got {:?}", other),
    }
}

/// (3) Directory members are exchanged for a console session.
#[actix_rt::test]
async fn test_directory_member_signs_in() {
    let mock = MockBackend::start().await;
    let auth = anonymous_console(&mock).auth().unwrap();

    let session = auth
        .sign_in_with_directory(&SecretString::from(MEMBER_TOKEN.to_string()))
        .await
        .unwrap();
    assert_eq!(session.user().email, "ada@regulator.gov.ng");

    let lookup = &mock.requests_to("GET", "/directory/me/memberOf")[0];
    assert_eq!(
        lookup.authorization.as_deref(),
        Some(format!("Bearer {}", MEMBER_TOKEN).as_str())
    );
    let exchange = &mock.requests_to("POST", "/api/auth/directory")[0];
    assert_eq!(exchange.json()["accessToken"], MEMBER_TOKEN);
}

/// (4) Directory users outside every allowed group are refused before the exchange.
#[actix_rt::test]
async fn test_directory_outsider_is_refused() {
    let mock = MockBackend::start().await;
    let auth = anonymous_console(&mock).auth().unwrap();

    let err = auth
        .sign_in_with_directory(&SecretString::from(OUTSIDER_TOKEN.to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Unauthorized(ref m) if m.contains("not a member")));
    assert_eq!(mock.count("POST", "/api/auth/directory"), 0);
}

/// (5) An invalid directory token fails the membership lookup.
#[actix_rt::test]
async fn test_directory_bad_token() {
    let mock = MockBackend::start().await;
    let auth = anonymous_console(&mock).auth().unwrap();

    let err = auth
        .sign_in_with_directory(&SecretString::from("forged".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Unauthorized(_)));
    assert_eq!(mock.count("POST", "/api/auth/directory"), 0);
}

/// (6) Without configured groups the membership lookup is skipped.
#[actix_rt::test]
async fn test_directory_without_groups_skips_lookup() {
    let mock = MockBackend::start().await;
    let mut config = config_for(&mock);
    config.directory_groups.clear();
    let auth = regulator_console_lib::auth::AuthProvider::new(&config).unwrap();

    auth.sign_in_with_directory(&SecretString::from(OUTSIDER_TOKEN.to_string()))
        .await
        .unwrap();
    assert_eq!(mock.count("GET", "/directory/me/memberOf"), 0);
}

/// (7) Registration, recovery and confirmation, with payloads built by their forms.
#[actix_rt::test]
async fn test_account_recovery_flows() {
    let mock = MockBackend::start().await;
    let auth = anonymous_console(&mock).auth().unwrap();

    let (_, registration) = RegisterForm.submit(FormState::new(FormValues::from_pairs([
        ("fullName", "Chidi Okafor"),
        ("email", "chidi@regulator.gov.ng"),
        ("password", "pipeline-42"),
        ("confirmPassword", "pipeline-42"),
    ])));
    auth.register(&registration.unwrap()).await.unwrap();
    let body = mock.requests_to("POST", "/api/auth/register")[0].json();
    assert_eq!(body["fullName"], "Chidi Okafor");
    assert_eq!(body["password"], "pipeline-42");

    auth.forgot_password("chidi@regulator.gov.ng").await.unwrap();
    assert_eq!(
        mock.requests_to("POST", "/api/auth/forgot-password")[0].json()["email"],
        "chidi@regulator.gov.ng"
    );

    let form = ResetPasswordForm {
        email: "chidi@regulator.gov.ng".into(),
        token: EXPIRED_RESET_TOKEN.into(),
    };
    let (_, reset) = form.submit(FormState::new(FormValues::from_pairs([
        ("newPassword", "pipeline-43"),
        ("confirmPassword", "pipeline-43"),
    ])));
    let err = auth.reset_password(&reset.unwrap()).await.unwrap_err();
    match err {
        AppError::Api { message, .. } => assert_eq!(message, "Invalid or expired token"),
        other => panic!("expected Api error, got {:?}", other),
    }

    auth.confirm_email(&EmailConfirmation {
        user_id: "7".into(),
        token: "confirm-token".into(),
    })
    .await
    .unwrap();
    assert_eq!(
        mock.requests_to("POST", "/api/auth/confirm-email")[0].json(),
        serde_json::json!({ "userId": "7", "token": "confirm-token" })
    );
}

/// (8) Mismatched passwords never reach the backend.
#[actix_rt::test]
async fn test_register_mismatch_blocks_request() {
    let mock = MockBackend::start().await;

    let (state, registration) = RegisterForm.submit(FormState::new(FormValues::from_pairs([
        ("fullName", "Chidi Okafor"),
        ("email", "chidi@regulator.gov.ng"),
        ("password", "pipeline-42"),
        ("confirmPassword", "pipeline-24"),
    ])));

    assert!(matches!(registration, Err(AppError::Validation(_))));
    assert_eq!(
        state.visible_error("confirmPassword"),
        Some("Passwords must match")
    );
    assert!(mock.requests().is_empty());
}

/// (9) Profile update returns a refreshed session under the same token.
#[actix_rt::test]
async fn test_update_profile() {
    let (mock, console) = setup().await;
    let mut toasts = console.notifier().subscribe();

    let session = console
        .profile()
        .update_profile(&ProfileUpdate {
            full_name: "Ada N. Obi".into(),
            email: "ada.obi@regulator.gov.ng".into(),
        })
        .await
        .unwrap();

    assert_eq!(session.user().full_name, "Ada N. Obi");
    assert_eq!(session.user().email, "ada.obi@regulator.gov.ng");
    let request = &mock.requests_to("PUT", "/api/auth/profile")[0];
    assert_eq!(
        request.authorization.as_deref(),
        Some(format!("Bearer {}", SESSION_TOKEN).as_str())
    );
    assert_eq!(drain(&mut toasts), vec!["Profile updated successfully"]);
}

/// (10) A wrong current password is rejected by the backend and toasted.
#[actix_rt::test]
async fn test_change_password() {
    let (mock, console) = setup().await;
    let mut toasts = console.notifier().subscribe();

    let (_, change) = ChangePasswordForm.submit(FormState::new(FormValues::from_pairs([
        ("currentPassword", "not-my-password"),
        ("newPassword", "pipeline-43"),
        ("confirmPassword", "pipeline-43"),
    ])));
    let err = console
        .profile()
        .change_password(&change.unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));

    let (_, change) = ChangePasswordForm.submit(FormState::new(FormValues::from_pairs([
        ("currentPassword", "correct-horse-battery"),
        ("newPassword", "pipeline-43"),
        ("confirmPassword", "pipeline-43"),
    ])));
    console
        .profile()
        .change_password(&change.unwrap())
        .await
        .unwrap();

    assert_eq!(mock.count("POST", "/api/auth/change-password"), 2);
    assert_eq!(drain(&mut toasts), vec![
        "Failed to change password: Request failed with status code 400",
        "Password changed successfully",
    ]);
}

/// (11) Profile operations need a session.
#[actix_rt::test]
async fn test_profile_requires_session() {
    let mock = MockBackend::start().await;
    let console = anonymous_console(&mock);

    let err = console
        .profile()
        .update_profile(&ProfileUpdate {
            full_name: "Nobody".into(),
            email: "nobody@example.com".into(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Unauthorized(_)));
    assert!(mock.requests().is_empty());
}
