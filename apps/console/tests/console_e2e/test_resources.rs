//! E2E tests: resource queries, mutations, cache and toasts.

use regulator_console_lib::error::AppError;
use regulator_console_lib::models::{
    AttachmentKind, CompanyPayload, FacilityPayload, NameItemKind, TemplateFile, TemplateUpload,
};
use regulator_console_lib::services::{AttachmentUpload, ListParams};

use super::mock_backend::SESSION_TOKEN;
use super::test_helpers::*;

fn facility_payload(name: &str) -> FacilityPayload {
    FacilityPayload {
        name: name.to_string(),
        address: "Ibeno".to_string(),
        latitude: 4.55,
        longitude: 8.0,
        oml_number: "OML-13".to_string(),
        field: "Qua Iboe".to_string(),
        installation_type_id: "1".to_string(),
        facility_type_id: "1".to_string(),
        company_id: "1".to_string(),
        state_id: "1".to_string(),
        lga_id: "10".to_string(),
    }
}

/// (1) Lists are served from the cache until a mutation invalidates them.
#[actix_rt::test]
async fn test_list_cached_until_mutation() {
    let (mock, console) = setup().await;
    let mut toasts = console.notifier().subscribe();
    let facilities = console.facilities();

    let first = facilities.list().await.unwrap();
    let second = facilities.list().await.unwrap();
    assert_eq!(first.len(), 3);
    assert_eq!(second.len(), 3);
    assert_eq!(mock.count("GET", "/api/facilities"), 1);

    let request = &mock.requests_to("GET", "/api/facilities")[0];
    assert_eq!(
        request.authorization.as_deref(),
        Some(format!("Bearer {}", SESSION_TOKEN).as_str())
    );

    let created = facilities
        .create(&facility_payload("Qua Iboe Terminal"))
        .await
        .unwrap();
    assert_eq!(created.name, "Qua Iboe Terminal");
    assert_eq!(drain(&mut toasts), vec!["Facility created successfully"]);

    let after = facilities.list().await.unwrap();
    assert_eq!(after.len(), 4);
    assert_eq!(mock.count("GET", "/api/facilities"), 2);
}

/// (2) Query parameters are part of the cache key and the URL.
#[actix_rt::test]
async fn test_list_with_params() {
    let (mock, console) = setup().await;
    let params = ListParams::new().with("stateId", "1");

    console.facilities().list_with(&params).await.unwrap();
    console.facilities().list().await.unwrap();
    console.facilities().list_with(&params).await.unwrap();

    let requests = mock.requests_to("GET", "/api/facilities");
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].query, "stateId=1");
    assert_eq!(requests[1].query, "");
}

/// (3) Detail with an empty id is disabled and never reaches the backend.
#[actix_rt::test]
async fn test_detail_empty_id_is_skipped() {
    let (mock, console) = setup().await;

    assert!(console.facilities().detail("").await.unwrap().is_none());
    assert!(mock.requests().is_empty());

    let facility = console.facilities().detail("2").await.unwrap().unwrap();
    assert_eq!(facility.name, "Eko Gas Plant");
    assert_eq!(facility.state_id.as_deref(), Some("1"));
}

/// (4) A failed list is retried once; a failed detail is not.
#[actix_rt::test]
async fn test_list_retries_detail_does_not() {
    let (mock, console) = setup().await;

    mock.fail_next("GET", "/api/companies", 503);
    let companies = console.companies().list().await.unwrap();
    assert_eq!(companies[0].name, "Niger Delta Petroleum");
    assert_eq!(mock.count("GET", "/api/companies"), 2);

    mock.fail_next("GET", "/api/companies/1", 503);
    let err = console.companies().detail("1").await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert_eq!(mock.count("GET", "/api/companies/1"), 1);
}

/// (5) Failed mutations are not retried and report the user message.
#[actix_rt::test]
async fn test_failed_update_toasts_error() {
    let (mock, console) = setup().await;
    let mut toasts = console.notifier().subscribe();

    mock.fail_next("PUT", "/api/facilities/1", 500);
    let err = console
        .facilities()
        .update("1", &facility_payload("Bonny"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Http { status: 500 }));
    assert_eq!(mock.count("PUT", "/api/facilities/1"), 1);
    assert_eq!(drain(&mut toasts), vec![
        "Failed to update facility: The server encountered an error. Please try again later."
    ]);
    assert_eq!(
        mock.record("facilities", "1").unwrap()["name"],
        "Bonny Oil Terminal"
    );
}

/// (6) `isSuccess: false` on a 200 is an error carrying the backend message.
#[actix_rt::test]
async fn test_envelope_failure_is_api_error() {
    let (mock, console) = setup().await;
    let mut toasts = console.notifier().subscribe();

    mock.fail_envelope_next("POST", "/api/companies", "Company name already exists");
    let err = console
        .companies()
        .create(&CompanyPayload {
            name: "Niger Delta Petroleum".into(),
            email: "info@ndp.ng".into(),
            phone_number: "+2348012345678".into(),
            address: "Port Harcourt".into(),
            sector_id: "1".into(),
        })
        .await
        .unwrap_err();

    match err {
        AppError::Api { message, .. } => assert_eq!(message, "Company name already exists"),
        other => panic!("expected Api error, got {:?}", other),
    }
    assert_eq!(drain(&mut toasts), vec![
        "Failed to create company: Company name already exists"
    ]);
}

/// (7) Delete removes the row and a second delete is a 404.
#[actix_rt::test]
async fn test_delete_then_not_found() {
    let (mock, console) = setup().await;
    let mut toasts = console.notifier().subscribe();
    let sectors = console.name_items(NameItemKind::Sector);

    sectors.delete("1").await.unwrap();
    assert!(mock.collection("sectors").is_empty());

    let err = sectors.delete("1").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(drain(&mut toasts), vec![
        "Sector deleted successfully",
        "Failed to delete sector: The requested record no longer exists.",
    ]);
}

/// (8) LGAs are filtered by state on the client from one cached list.
#[actix_rt::test]
async fn test_lgas_for_state() {
    let (mock, console) = setup().await;
    let locations = console.locations();

    assert!(locations.lgas_for_state("").await.unwrap().is_empty());
    assert!(mock.requests().is_empty());

    let lagos: Vec<String> = locations
        .lgas_for_state("1")
        .await
        .unwrap()
        .into_iter()
        .map(|lga| lga.name)
        .collect();
    assert_eq!(lagos, vec!["Ikeja", "Eti-Osa"]);

    let rivers = locations.lgas_for_state("2").await.unwrap();
    assert_eq!(rivers.len(), 1);
    assert_eq!(mock.count("GET", "/api/lgas"), 1);
}

/// (9) Templates are uploaded as multipart with the file part.
#[actix_rt::test]
async fn test_template_upload_is_multipart() {
    let (mock, console) = setup().await;
    let mut toasts = console.notifier().subscribe();

    let template = console
        .templates()
        .upload(TemplateUpload {
            name: "HSE Audit Checklist".into(),
            file_type: "pdf".into(),
            is_active: true,
            file: Some(TemplateFile {
                file_name: "hse-audit.pdf".into(),
                content_type: "application/pdf".into(),
                bytes: b"%PDF-1.7".to_vec(),
            }),
        })
        .await
        .unwrap();

    assert_eq!(template.name, "HSE Audit Checklist");
    assert_eq!(template.file_url, "/files/hse-audit.pdf");
    assert!(template.is_active);

    let request = &mock.requests_to("POST", "/api/templates")[0];
    assert!(
        request
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("multipart/form-data"))
    );
    assert!(request.body_text().contains("filename=\"hse-audit.pdf\""));
    assert_eq!(drain(&mut toasts), vec!["Template created successfully"]);
}

/// (10) Replacing template metadata without a file sends no file part.
#[actix_rt::test]
async fn test_template_replace_without_file() {
    let (mock, console) = setup().await;

    let template = console
        .templates()
        .replace("1", TemplateUpload {
            name: "Incident Report Form v2".into(),
            file_type: "pdf".into(),
            is_active: false,
            file: None,
        })
        .await
        .unwrap();

    assert_eq!(template.name, "Incident Report Form v2");
    assert!(!template.is_active);
    assert_eq!(template.file_url, "/files/incident-report.pdf");
    let request = &mock.requests_to("PUT", "/api/templates/1")[0];
    assert!(!request.body_text().contains("filename="));
}

/// (11) User administration endpoints.
#[actix_rt::test]
async fn test_user_roles_and_status() {
    let (mock, console) = setup().await;
    let users = console.users();

    let user = users.update_roles("2", vec!["Admin".into()]).await.unwrap();
    assert!(user.has_role("admin"));
    let request = &mock.requests_to("PUT", "/api/users/2/roles")[0];
    assert_eq!(request.json(), serde_json::json!({ "roles": ["Admin"] }));

    let user = users.set_active("2", false).await.unwrap();
    assert!(!user.is_active);
    let request = &mock.requests_to("PATCH", "/api/users/2/status")[0];
    assert_eq!(request.json(), serde_json::json!({ "isActive": false }));
}

/// (12) Attachments are uploaded against their incident.
#[actix_rt::test]
async fn test_incident_attachment_upload() {
    let (mock, console) = setup().await;

    let attachment = console
        .incidents()
        .upload_attachment("1", AttachmentUpload {
            file_name: "manifold-leak.jpg".into(),
            content_type: "image/jpeg".into(),
            bytes: vec![0xFF, 0xD8, 0xFF],
        })
        .await
        .unwrap();

    assert_eq!(attachment.kind(), AttachmentKind::Image);
    assert_eq!(attachment.file_name.as_deref(), Some("manifold-leak.jpg"));
    assert_eq!(mock.count("POST", "/api/incidentReports/1/attachments"), 1);
    let stored = mock.record("incidentReports", "1").unwrap();
    assert_eq!(stored["attachments"].as_array().map(Vec::len), Some(1));
}

/// (13) Health check hits `/health`.
#[actix_rt::test]
async fn test_health_check() {
    let (_mock, console) = setup().await;
    assert!(console.client().health_check().await);
}
