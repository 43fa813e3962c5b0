//! E2E tests: incident workflow transitions against the backend.

use regulator_console_lib::error::AppError;
use regulator_console_lib::models::{Incident, IncidentStatus};
use regulator_console_lib::workflow::{StepState, Stepper, WorkflowAction, WorkflowError};
use serde_json::json;

use super::test_helpers::*;

const WORKFLOW_PATH: &str = "/api/incidentReports/1/workflow";

async fn load(console: &regulator_console_lib::Console, id: &str) -> Incident {
    let incident = console.incidents().detail(id).await.unwrap().unwrap();
    (*incident).clone()
}

/// (1) Forward sends the next desk with the revision the console saw.
#[actix_rt::test]
async fn test_forward_patches_next_desk() {
    let (mock, console) = setup().await;
    let mut toasts = console.notifier().subscribe();

    console.incidents().list().await.unwrap();
    let incident = load(&console, "1").await;
    let updated = console.workflow().forward(&incident).await.unwrap();

    assert_eq!(updated.current_desk, "Head HSEC (Field Office)");
    assert_eq!(updated.revision, 4);
    let request = &mock.requests_to("PATCH", WORKFLOW_PATH)[0];
    assert_eq!(
        request.json(),
        json!({ "currentDesk": "Head HSEC (Field Office)", "expectedRevision": 3 })
    );
    assert_eq!(drain(&mut toasts), vec![
        "Incident forwarded to Head HSEC (Field Office)"
    ]);

    // The incidents list was invalidated
    console.incidents().list().await.unwrap();
    assert_eq!(mock.count("GET", "/api/incidentReports"), 2);

    let stepper = Stepper::for_incident(console.workflow().definition(), &updated);
    assert_eq!(stepper.steps[0].state, StepState::Completed);
    assert_eq!(stepper.steps[1].state, StepState::Active);
    assert!(stepper.can_forward && stepper.can_return);
}

/// (2) Return from the first stage is refused locally.
#[actix_rt::test]
async fn test_return_at_first_stage_sends_nothing() {
    let (mock, console) = setup().await;
    let mut toasts = console.notifier().subscribe();

    let incident = load(&console, "1").await;
    let err = console
        .workflow()
        .return_to_previous(&incident)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Workflow(WorkflowError::NoPreviousStage)
    ));
    assert_eq!(mock.count_method("PATCH"), 0);
    assert_eq!(drain(&mut toasts), vec!["No previous stage available"]);
}

/// (3) Forward from the last stage is refused locally; the desk id is accepted as an alias.
#[actix_rt::test]
async fn test_forward_at_last_stage_sends_nothing() {
    let (mock, console) = setup().await;

    let incident = load(&console, "3").await;
    let stepper = Stepper::for_incident(console.workflow().definition(), &incident);
    assert_eq!(
        stepper.active_step().map(|s| s.display_name.as_str()),
        Some("Director H&S (HQ)")
    );
    assert!(!stepper.can_forward);

    let err = console.workflow().forward(&incident).await.unwrap_err();
    assert!(matches!(err, AppError::Workflow(WorkflowError::NoNextStage)));
    assert_eq!(mock.count_method("PATCH"), 0);

    let updated = console.workflow().return_to_previous(&incident).await.unwrap();
    assert_eq!(updated.current_desk, "Senior Manager IM (HQ)");
}

/// (4) A closed incident hides the controls and rejects every action.
#[actix_rt::test]
async fn test_closed_incident_is_final() {
    let (mock, console) = setup().await;
    let mut toasts = console.notifier().subscribe();

    let incident = load(&console, "2").await;
    let stepper = Stepper::for_incident(console.workflow().definition(), &incident);
    assert!(stepper.closed);
    assert!(!stepper.controls_visible);
    assert!(stepper.steps.iter().all(|s| s.state == StepState::Completed));

    for action in [
        WorkflowAction::Forward,
        WorkflowAction::Return,
        WorkflowAction::Close,
    ] {
        let err = console.workflow().apply(&incident, action).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Workflow(WorkflowError::AlreadyClosed)
        ));
    }
    assert_eq!(mock.count_method("PATCH"), 0);
    assert_eq!(drain(&mut toasts).len(), 3);
}

/// (5) Close sets the terminal status.
#[actix_rt::test]
async fn test_close_incident() {
    let (mock, console) = setup().await;
    let mut toasts = console.notifier().subscribe();

    let incident = load(&console, "1").await;
    let closed = console.workflow().close(&incident).await.unwrap();

    assert_eq!(closed.status, IncidentStatus::Closed);
    assert_eq!(
        mock.requests_to("PATCH", WORKFLOW_PATH)[0].json(),
        json!({ "status": "Closed", "expectedRevision": 3 })
    );
    assert_eq!(drain(&mut toasts), vec!["Incident closed"]);
}

/// (6) Someone else moved the incident first: the stale write is a conflict.
#[actix_rt::test]
async fn test_stale_revision_is_conflict() {
    let (mock, console) = setup().await;
    let mut toasts = console.notifier().subscribe();

    let incident = load(&console, "1").await;
    mock.update_record("incidentReports", "1", |record| {
        record["currentDesk"] = json!("Head HSEC (Field Office)");
        record["revision"] = json!(5);
    });

    let err = console.workflow().forward(&incident).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Conflict {
            expected: 3,
            actual: 5
        }
    ));
    assert_eq!(mock.count("PATCH", WORKFLOW_PATH), 1);
    assert_eq!(drain(&mut toasts), vec![
        "Failed to forward incident: This record was changed by someone else. Reload and try again."
    ]);

    // The stored incident is untouched by the rejected write
    let stored = mock.record("incidentReports", "1").unwrap();
    assert_eq!(stored["currentDesk"], "Head HSEC (Field Office)");
    assert_eq!(stored["revision"], 5);
}

/// (7) Backend failures surface as an error toast with the user message.
#[actix_rt::test]
async fn test_backend_failure_toasts() {
    let (mock, console) = setup().await;
    let mut toasts = console.notifier().subscribe();

    let incident = load(&console, "1").await;
    mock.fail_next("PATCH", WORKFLOW_PATH, 403);
    let err = console.workflow().forward(&incident).await.unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert_eq!(drain(&mut toasts), vec![
        "Failed to forward incident: You do not have permission to perform this action."
    ]);
}
