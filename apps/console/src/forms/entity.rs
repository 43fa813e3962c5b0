//! Forms behind the management tables.

use std::sync::LazyLock;

use regex::Regex;

use super::{FieldRule, FormDefinition, FormErrors, FormValues, Schema};
use crate::error::{AppError, AppResult};
use crate::models::template::TemplateFile;
use crate::models::{
    Company, CompanyPayload, Facility, FacilityPayload, Incident, IncidentStatus,
    InviteUserPayload, Lga, NameItem, NameItemKind, NameItemPayload, Role, RolePayload, Template,
    TemplateUpload, User, WorkflowUpdate,
};
use crate::workflow::WorkflowDefinition;

static OML_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^OML-\d+$").expect("valid OML pattern"));
static PHONE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 -]{6,17}$").expect("valid phone pattern"));
static REVISION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("valid revision pattern"));

pub const OML_NUMBER_MESSAGE: &str = "OML Number must be in format OML-123";

/// File types accepted for report templates.
pub const TEMPLATE_FILE_TYPES: [&str; 4] = ["pdf", "docx", "xlsx", "csv"];

/// A form that edits records of `T`.
pub trait EntityForm<T>: FormDefinition {
    /// Values for an "edit" form seeded from an existing record.
    fn from_entity(&self, entity: &T) -> FormValues;
}

fn parse_decimal(values: &FormValues, field: &str) -> AppResult<f64> {
    values
        .trimmed(field)
        .parse::<f64>()
        .map_err(|_| AppError::InvalidInput(format!("{} is not a number", field)))
}

fn optional(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

// ============================================================================
// Facility
// ============================================================================

const FACILITY_FIELDS: [&str; 11] = [
    "name",
    "address",
    "latitude",
    "longitude",
    "omlNumber",
    "field",
    "installationTypeId",
    "facilityTypeId",
    "companyId",
    "stateId",
    "lgaId",
];

/// Facility form. `lgas` is the LGA list the location pickers were built from.
#[derive(Debug, Clone, Default)]
pub struct FacilityForm {
    pub lgas: Vec<Lga>,
}

impl FacilityForm {
    pub fn new(lgas: Vec<Lga>) -> Self {
        Self { lgas }
    }
}

impl FormDefinition for FacilityForm {
    type Payload = FacilityPayload;

    fn schema(&self) -> Schema {
        Schema::new()
            .field("name", "Name", [FieldRule::Required, FieldRule::MaxLength(200)])
            .field("address", "Address", [FieldRule::Required])
            .field("latitude", "Latitude", [
                FieldRule::Required,
                FieldRule::DecimalRange {
                    min: -90.0,
                    max: 90.0,
                },
            ])
            .field("longitude", "Longitude", [
                FieldRule::Required,
                FieldRule::DecimalRange {
                    min: -180.0,
                    max: 180.0,
                },
            ])
            .field("omlNumber", "OML Number", [
                FieldRule::Required,
                FieldRule::pattern(&OML_NUMBER, OML_NUMBER_MESSAGE),
            ])
            .field("field", "Field", [FieldRule::Required])
            .field("installationTypeId", "Installation type", [FieldRule::Required])
            .field("facilityTypeId", "Facility type", [FieldRule::Required])
            .field("companyId", "Company", [FieldRule::Required])
            .field("stateId", "State", [FieldRule::Required])
            .field("lgaId", "LGA", [FieldRule::Required])
    }

    fn defaults(&self) -> FormValues {
        FormValues::from_pairs(FACILITY_FIELDS.map(|field| (field, "")))
    }

    fn validate(&self, values: &FormValues) -> FormErrors {
        let mut errors = self.schema().validate(values);
        let state_id = values.trimmed("stateId");
        let lga_id = values.trimmed("lgaId");
        if !self.lgas.is_empty() && !state_id.is_empty() && !lga_id.is_empty() {
            let belongs = self
                .lgas
                .iter()
                .any(|lga| lga.id == lga_id && lga.state_id == state_id);
            if !belongs {
                errors.insert("lgaId", "Selected LGA does not belong to the selected state");
            }
        }
        errors
    }

    fn build_payload(&self, values: &FormValues) -> AppResult<FacilityPayload> {
        Ok(FacilityPayload {
            name: values.trimmed("name"),
            address: values.trimmed("address"),
            latitude: parse_decimal(values, "latitude")?,
            longitude: parse_decimal(values, "longitude")?,
            oml_number: values.trimmed("omlNumber"),
            field: values.trimmed("field"),
            installation_type_id: values.trimmed("installationTypeId"),
            facility_type_id: values.trimmed("facilityTypeId"),
            company_id: values.trimmed("companyId"),
            state_id: values.trimmed("stateId"),
            lga_id: values.trimmed("lgaId"),
        })
    }
}

impl EntityForm<Facility> for FacilityForm {
    fn from_entity(&self, facility: &Facility) -> FormValues {
        FormValues::from_pairs([
            ("name", facility.name.clone()),
            ("address", facility.address.clone()),
            (
                "latitude",
                facility.latitude.map(|v| v.to_string()).unwrap_or_default(),
            ),
            (
                "longitude",
                facility.longitude.map(|v| v.to_string()).unwrap_or_default(),
            ),
            ("omlNumber", facility.oml_number.clone()),
            ("field", facility.field.clone()),
            ("installationTypeId", optional(&facility.installation_type_id)),
            ("facilityTypeId", optional(&facility.facility_type_id)),
            ("companyId", optional(&facility.company_id)),
            ("stateId", optional(&facility.state_id)),
            ("lgaId", optional(&facility.lga_id)),
        ])
    }
}

// ============================================================================
// Company
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct CompanyForm;

impl FormDefinition for CompanyForm {
    type Payload = CompanyPayload;

    fn schema(&self) -> Schema {
        Schema::new()
            .field("name", "Name", [FieldRule::Required, FieldRule::MaxLength(200)])
            .field("email", "Email", [FieldRule::Required, FieldRule::Email])
            .field("phoneNumber", "Phone number", [
                FieldRule::Required,
                FieldRule::pattern(&PHONE_NUMBER, "Invalid phone number"),
            ])
            .field("address", "Address", [FieldRule::Required])
            .field("sectorId", "Sector", [FieldRule::Required])
    }

    fn defaults(&self) -> FormValues {
        FormValues::from_pairs([
            ("name", ""),
            ("email", ""),
            ("phoneNumber", ""),
            ("address", ""),
            ("sectorId", ""),
        ])
    }

    fn build_payload(&self, values: &FormValues) -> AppResult<CompanyPayload> {
        Ok(CompanyPayload {
            name: values.trimmed("name"),
            email: values.trimmed("email"),
            phone_number: values.trimmed("phoneNumber"),
            address: values.trimmed("address"),
            sector_id: values.trimmed("sectorId"),
        })
    }
}

impl EntityForm<Company> for CompanyForm {
    fn from_entity(&self, company: &Company) -> FormValues {
        FormValues::from_pairs([
            ("name", company.name.clone()),
            ("email", company.email.clone()),
            ("phoneNumber", company.phone_number.clone()),
            ("address", company.address.clone()),
            ("sectorId", optional(&company.sector_id)),
        ])
    }
}

// ============================================================================
// Template
// ============================================================================

/// Template metadata plus the file picked by the user.
#[derive(Debug, Clone, Default)]
pub struct TemplateForm {
    pub file: Option<TemplateFile>,
    file_required: bool,
}

impl TemplateForm {
    /// New template; a file must be attached.
    pub fn for_upload(file: Option<TemplateFile>) -> Self {
        Self {
            file,
            file_required: true,
        }
    }

    /// Existing template; the file is only replaced when one is attached.
    pub fn for_replace(file: Option<TemplateFile>) -> Self {
        Self {
            file,
            file_required: false,
        }
    }
}

impl FormDefinition for TemplateForm {
    type Payload = TemplateUpload;

    fn schema(&self) -> Schema {
        Schema::new()
            .field("name", "Name", [FieldRule::Required, FieldRule::MaxLength(200)])
            .field("fileType", "File type", [
                FieldRule::Required,
                FieldRule::one_of(TEMPLATE_FILE_TYPES),
            ])
            .field("isActive", "Active", [FieldRule::one_of(["true", "false"])])
    }

    fn defaults(&self) -> FormValues {
        FormValues::from_pairs([("name", ""), ("fileType", ""), ("isActive", "true")])
    }

    fn validate(&self, values: &FormValues) -> FormErrors {
        let mut errors = self.schema().validate(values);
        if self.file_required && self.file.is_none() {
            errors.insert("file", "File is required");
        }
        errors
    }

    fn build_payload(&self, values: &FormValues) -> AppResult<TemplateUpload> {
        Ok(TemplateUpload {
            name: values.trimmed("name"),
            file_type: values.trimmed("fileType"),
            is_active: values.trimmed("isActive") != "false",
            file: self.file.clone(),
        })
    }
}

impl EntityForm<Template> for TemplateForm {
    fn from_entity(&self, template: &Template) -> FormValues {
        FormValues::from_pairs([
            ("name", template.name.clone()),
            ("fileType", template.file_type.clone()),
            ("isActive", template.is_active.to_string()),
        ])
    }
}

// ============================================================================
// Name items and roles
// ============================================================================

/// Shared `{name}` form for every [`NameItemKind`].
#[derive(Debug, Clone, Copy)]
pub struct NameItemForm {
    pub kind: NameItemKind,
}

impl FormDefinition for NameItemForm {
    type Payload = NameItemPayload;

    fn schema(&self) -> Schema {
        Schema::new().field("name", self.kind.label(), [
            FieldRule::Required,
            FieldRule::MaxLength(100),
        ])
    }

    fn defaults(&self) -> FormValues {
        FormValues::from_pairs([("name", "")])
    }

    fn build_payload(&self, values: &FormValues) -> AppResult<NameItemPayload> {
        Ok(NameItemPayload {
            name: values.trimmed("name"),
        })
    }
}

impl EntityForm<NameItem> for NameItemForm {
    fn from_entity(&self, item: &NameItem) -> FormValues {
        FormValues::from_pairs([("name", item.name.clone())])
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RoleForm;

impl FormDefinition for RoleForm {
    type Payload = RolePayload;

    fn schema(&self) -> Schema {
        Schema::new().field("name", "Role name", [
            FieldRule::Required,
            FieldRule::MinLength(2),
            FieldRule::MaxLength(50),
        ])
    }

    fn defaults(&self) -> FormValues {
        FormValues::from_pairs([("name", "")])
    }

    fn build_payload(&self, values: &FormValues) -> AppResult<RolePayload> {
        Ok(RolePayload {
            name: values.trimmed("name"),
        })
    }
}

impl EntityForm<Role> for RoleForm {
    fn from_entity(&self, role: &Role) -> FormValues {
        FormValues::from_pairs([("name", role.name.clone())])
    }
}

// ============================================================================
// Users
// ============================================================================

/// Invitation form. `roles` is a comma separated list of role names.
#[derive(Debug, Clone, Default)]
pub struct InviteUserForm {
    /// Roles that exist on the backend; empty skips the membership check.
    pub available_roles: Vec<String>,
}

impl InviteUserForm {
    pub fn new(available_roles: Vec<String>) -> Self {
        Self { available_roles }
    }

    fn split_roles(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl FormDefinition for InviteUserForm {
    type Payload = InviteUserPayload;

    fn schema(&self) -> Schema {
        Schema::new()
            .field("fullName", "Full name", [FieldRule::Required, FieldRule::MaxLength(200)])
            .field("email", "Email", [FieldRule::Required, FieldRule::Email])
            .field("roles", "Roles", [FieldRule::Required])
    }

    fn defaults(&self) -> FormValues {
        FormValues::from_pairs([("fullName", ""), ("email", ""), ("roles", "")])
    }

    fn validate(&self, values: &FormValues) -> FormErrors {
        let mut errors = self.schema().validate(values);
        if !self.available_roles.is_empty() {
            let unknown = Self::split_roles(values.get("roles"))
                .into_iter()
                .find(|role| {
                    !self
                        .available_roles
                        .iter()
                        .any(|known| known.eq_ignore_ascii_case(role))
                });
            if let Some(role) = unknown {
                errors.insert("roles", format!("Unknown role: {}", role));
            }
        }
        errors
    }

    fn build_payload(&self, values: &FormValues) -> AppResult<InviteUserPayload> {
        Ok(InviteUserPayload {
            full_name: values.trimmed("fullName"),
            email: values.trimmed("email"),
            roles: Self::split_roles(values.get("roles")),
        })
    }
}

impl EntityForm<User> for InviteUserForm {
    fn from_entity(&self, user: &User) -> FormValues {
        FormValues::from_pairs([
            ("fullName", user.full_name.clone()),
            ("email", user.email.clone()),
            ("roles", user.roles_label()),
        ])
    }
}

// ============================================================================
// Incident desk/status
// ============================================================================

/// Manual desk and status override for an incident.
#[derive(Debug, Clone, Copy)]
pub struct IncidentDeskForm {
    pub workflow: &'static WorkflowDefinition,
}

impl Default for IncidentDeskForm {
    fn default() -> Self {
        Self {
            workflow: WorkflowDefinition::incident(),
        }
    }
}

impl FormDefinition for IncidentDeskForm {
    type Payload = WorkflowUpdate;

    fn schema(&self) -> Schema {
        Schema::new()
            .field("currentDesk", "Current desk", [FieldRule::Required])
            .field("status", "Status", [
                FieldRule::Required,
                FieldRule::one_of(
                    [
                        IncidentStatus::Open,
                        IncidentStatus::UnderReview,
                        IncidentStatus::Returned,
                        IncidentStatus::Closed,
                    ]
                    .map(String::from),
                ),
            ])
            .field("expectedRevision", "Revision", [
                FieldRule::Required,
                FieldRule::pattern(&REVISION, "Revision must be a whole number"),
            ])
    }

    fn defaults(&self) -> FormValues {
        let first = self
            .workflow
            .stages()
            .first()
            .map(|stage| stage.display_name.clone())
            .unwrap_or_default();
        FormValues::from_pairs([
            ("currentDesk", first),
            ("status", IncidentStatus::Open.to_string()),
            ("expectedRevision", "0".to_string()),
        ])
    }

    fn validate(&self, values: &FormValues) -> FormErrors {
        let mut errors = self.schema().validate(values);
        let desk = values.trimmed("currentDesk");
        if !desk.is_empty() && self.workflow.resolve_stage(&desk).is_none() {
            errors.insert("currentDesk", format!("Unknown desk: {}", desk));
        }
        errors
    }

    fn build_payload(&self, values: &FormValues) -> AppResult<WorkflowUpdate> {
        let desk = values.trimmed("currentDesk");
        let stage = self
            .workflow
            .resolve_stage(&desk)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown desk: {}", desk)))?;
        let expected_revision = values
            .trimmed("expectedRevision")
            .parse::<u64>()
            .map_err(|_| AppError::InvalidInput("Revision must be a whole number".into()))?;
        Ok(WorkflowUpdate {
            current_desk: Some(stage.display_name.clone()),
            status: Some(IncidentStatus::parse(values.get("status"))),
            expected_revision,
        })
    }
}

impl EntityForm<Incident> for IncidentDeskForm {
    fn from_entity(&self, incident: &Incident) -> FormValues {
        FormValues::from_pairs([
            ("currentDesk", incident.current_desk.clone()),
            ("status", incident.status.to_string()),
            ("expectedRevision", incident.revision.to_string()),
        ])
    }
}
