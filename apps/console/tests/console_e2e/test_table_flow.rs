//! E2E tests: management tables wired to backend resources.

use std::sync::Arc;

use regulator_console_lib::error::AppError;
use regulator_console_lib::forms::{
    FacilityForm, FormAction, InviteUserForm, OML_NUMBER_MESSAGE, reduce,
};
use regulator_console_lib::models::{Facility, User};
use regulator_console_lib::table::{
    Column, DropdownFilter, ManagementTable, ModalState, RowAction, TableActions,
};

use super::test_helpers::*;

fn facility_columns() -> Vec<Column<Facility>> {
    vec![
        Column::new("name", "Name", |f: &Facility| f.name.clone()),
        Column::new("oml", "OML Number", |f: &Facility| f.oml_number.clone()),
        Column::new("state", "State", |f: &Facility| {
            f.state_name.clone().unwrap_or_default()
        }),
    ]
}

fn open_modal(action: RowAction) -> ModalState {
    match action {
        RowAction::OpenModal(modal) => modal,
        RowAction::Navigate(url) => panic!("expected a modal, got navigation to {}", url),
    }
}

fn fill(modal: &mut ModalState, pairs: &[(&str, &str)]) {
    for (field, value) in pairs {
        modal.form = reduce(std::mem::take(&mut modal.form), FormAction::set(*field, *value));
    }
}

const NEW_FACILITY: [(&str, &str); 11] = [
    ("name", "Lekki Gas Station"),
    ("address", "Lekki Phase 1"),
    ("latitude", "6.44"),
    ("longitude", "3.47"),
    ("omlNumber", "OML-90"),
    ("field", "Lekki"),
    ("installationTypeId", "1"),
    ("facilityTypeId", "1"),
    ("companyId", "1"),
    ("stateId", "1"),
    ("lgaId", "11"),
];

async fn facility_table(
    console: &regulator_console_lib::Console,
) -> ManagementTable<Facility> {
    let rows = console.facilities().list().await.unwrap();
    let state_filter = DropdownFilter::new("state", "State", |f: &Facility| {
        f.state_name.clone().unwrap_or_default()
    })
    .options_from(&rows);
    ManagementTable::new(Arc::unwrap_or_clone(rows), facility_columns(), 10)
        .with_filters(vec![state_filter])
        .with_selection()
}

/// (1) Filter by state, then add a facility through the modal.
#[actix_rt::test]
async fn test_filter_and_add_facility() {
    let (mock, console) = setup().await;
    let mut toasts = console.notifier().subscribe();
    let mut table = facility_table(&console).await;

    assert_eq!(table.filters()[0].options.len(), 2);
    table.set_filter("state", Some("Lagos"));
    let names: Vec<&str> = table.filtered_rows().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Eko Gas Plant", "Ikeja Depot"]);

    let lgas = console.locations().lgas().await.unwrap();
    let form = FacilityForm::new(lgas.to_vec());
    let facilities = console.facilities();

    let mut modal = open_modal(table.begin_add(&form));
    fill(&mut modal, &NEW_FACILITY);
    table
        .submit_modal(&mut modal, &form, &facilities)
        .await
        .unwrap();

    assert_eq!(mock.count("POST", "/api/facilities"), 1);
    let body = mock.requests_to("POST", "/api/facilities")[0].json();
    assert_eq!(body["omlNumber"], "OML-90");
    assert_eq!(body["latitude"], 6.44);
    assert_eq!(table.rows().len(), 4);
    assert_eq!(drain(&mut toasts), vec!["Facility created successfully"]);
}

/// (2) An invalid OML number keeps the modal open and sends nothing.
#[actix_rt::test]
async fn test_invalid_oml_sends_nothing() {
    let (mock, console) = setup().await;
    let mut table = facility_table(&console).await;
    mock.clear_requests();

    let form = FacilityForm::default();
    let facilities = console.facilities();
    let mut modal = open_modal(table.begin_add(&form));
    fill(&mut modal, &NEW_FACILITY);
    fill(&mut modal, &[("omlNumber", "90")]);

    let err = table
        .submit_modal(&mut modal, &form, &facilities)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(modal.form.visible_error("omlNumber"), Some(OML_NUMBER_MESSAGE));
    assert!(mock.requests().is_empty());
}

/// (3) An LGA from another state is caught before the request.
#[actix_rt::test]
async fn test_lga_must_match_state() {
    let (mock, console) = setup().await;
    let mut table = facility_table(&console).await;
    let lgas = console.locations().lgas().await.unwrap();
    mock.clear_requests();

    let form = FacilityForm::new(lgas.to_vec());
    let mut modal = open_modal(table.begin_add(&form));
    fill(&mut modal, &NEW_FACILITY);
    fill(&mut modal, &[("lgaId", "20")]);

    let err = table
        .submit_modal(&mut modal, &form, &console.facilities())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(
        modal.form.visible_error("lgaId"),
        Some("Selected LGA does not belong to the selected state")
    );
    assert_eq!(mock.count("POST", "/api/facilities"), 0);
}

/// (4) Edit is seeded from the row and writes through PUT.
#[actix_rt::test]
async fn test_edit_facility() {
    let (mock, console) = setup().await;
    let mut table = facility_table(&console).await;
    let form = FacilityForm::default();

    let mut modal = open_modal(table.begin_edit("2", &form).unwrap());
    assert_eq!(modal.form.values.get("omlNumber"), "OML-40");
    fill(&mut modal, &NEW_FACILITY);
    fill(&mut modal, &[("name", "Eko Gas Plant II")]);

    table
        .submit_modal(&mut modal, &form, &console.facilities())
        .await
        .unwrap();

    assert_eq!(mock.count("PUT", "/api/facilities/2"), 1);
    assert_eq!(
        mock.record("facilities", "2").unwrap()["name"],
        "Eko Gas Plant II"
    );
    assert!(table.rows().iter().any(|f| f.name == "Eko Gas Plant II"));
}

/// (5) Delete only happens through the confirmation and drops the row from the selection.
#[actix_rt::test]
async fn test_confirmed_delete() {
    let (mock, console) = setup().await;
    let mut toasts = console.notifier().subscribe();
    let mut table = facility_table(&console).await;
    let facilities = console.facilities();

    table.toggle_row("1");
    table.toggle_row("3");
    assert_eq!(table.selected_ids(), vec!["1", "3"]);

    let confirmation = table.request_delete("1").unwrap();
    table.cancel_delete(confirmation);
    assert_eq!(mock.count_method("DELETE"), 0);

    let confirmation = table.request_delete("1").unwrap();
    table.confirm_delete(confirmation, &facilities).await.unwrap();

    assert_eq!(mock.count("DELETE", "/api/facilities/1"), 1);
    assert_eq!(table.rows().len(), 2);
    assert_eq!(table.selected_ids(), vec!["3"]);
    assert_eq!(drain(&mut toasts), vec!["Facility deleted successfully"]);
}

/// (6) Users are invited through the user table with their roles.
#[actix_rt::test]
async fn test_invite_user_from_table() {
    let (mock, console) = setup().await;
    let users = console.users();
    let rows = TableActions::<User>::refetch(&users).await.unwrap();
    let mut table = ManagementTable::new(
        rows,
        vec![
            Column::new("name", "Name", |u: &User| u.full_name.clone()),
            Column::new("roles", "Roles", |u: &User| u.roles_label()),
        ],
        10,
    );

    let roles: Vec<String> = console
        .roles()
        .list()
        .await
        .unwrap()
        .iter()
        .map(|r| r.name.clone())
        .collect();
    let form = InviteUserForm::new(roles);

    let mut modal = open_modal(table.begin_add(&form));
    fill(&mut modal, &[
        ("fullName", "Ngozi Eze"),
        ("email", "ngozi@regulator.gov.ng"),
        ("roles", "Superuser"),
    ]);
    let err = table
        .submit_modal(&mut modal, &form, &users)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(modal.form.visible_error("roles"), Some("Unknown role: Superuser"));

    fill(&mut modal, &[("roles", "investigator, Admin")]);
    table.submit_modal(&mut modal, &form, &users).await.unwrap();

    let body = mock.requests_to("POST", "/api/users")[0].json();
    assert_eq!(body["roles"], serde_json::json!(["investigator", "Admin"]));
    table.set_search("ngozi");
    assert_eq!(table.filtered_count(), 1);
}
