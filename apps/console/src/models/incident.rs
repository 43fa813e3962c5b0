//! Incident report domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Identified, Writable, de_id, de_opt_datetime, de_opt_id};

/// Incident status.
///
/// Statuses the console does not know are preserved verbatim so a newer
/// backend never breaks list rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IncidentStatus {
    #[default]
    Open,
    UnderReview,
    Returned,
    Closed,
    Other(String),
}

impl IncidentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "Open",
            Self::UnderReview => "Under Review",
            Self::Returned => "Returned",
            Self::Closed => "Closed",
            Self::Other(s) => s,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
            "open" | "new" | "pending" => Self::Open,
            "under review" | "in review" | "in progress" => Self::UnderReview,
            "returned" => Self::Returned,
            "closed" => Self::Closed,
            _ => Self::Other(s.to_string()),
        }
    }

    /// Closed is the only terminal status.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl From<String> for IncidentStatus {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<IncidentStatus> for String {
    fn from(status: IncidentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where and when the incident happened.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentDetail {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub facility_id: Option<String>,
    #[serde(default)]
    pub facility_name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub incident_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub reported_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentConsequence {
    #[serde(default)]
    pub asset_damage_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvolvedPerson {
    pub full_name: String,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub injury_type_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Witness {
    pub full_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub statement: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDamage {
    pub description: String,
    #[serde(default)]
    pub estimated_cost: Option<f64>,
}

/// Kind of attachment, inferred from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    Pdf,
    Document,
    Spreadsheet,
    Video,
    Other,
}

impl AttachmentKind {
    /// Infer the kind from a file name or URL; query strings and fragments are ignored.
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let file = path.rsplit('/').next().unwrap_or(path);
        let Some((_, ext)) = file.rsplit_once('.') else {
            return Self::Other;
        };

        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" | "png" | "gif" | "bmp" | "webp" | "svg" => Self::Image,
            "pdf" => Self::Pdf,
            "doc" | "docx" | "txt" | "rtf" | "odt" => Self::Document,
            "xls" | "xlsx" | "csv" | "ods" => Self::Spreadsheet,
            "mp4" | "mov" | "avi" | "mkv" | "webm" => Self::Video,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    pub file_url: String,
    #[serde(default)]
    pub file_name: Option<String>,
}

impl Attachment {
    pub fn kind(&self) -> AttachmentKind {
        AttachmentKind::from_path(&self.file_url)
    }
}

/// Incident report as returned by `/incidentReports`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub status: IncidentStatus,
    /// Desk currently responsible; matched case-insensitively against workflow stages
    #[serde(default)]
    pub current_desk: String,
    /// Incremented by the backend on every workflow write
    #[serde(default)]
    pub revision: u64,
    #[serde(default)]
    pub incident_detail: IncidentDetail,
    #[serde(default)]
    pub incident_consequence: IncidentConsequence,
    #[serde(default)]
    pub involved_persons: Vec<InvolvedPerson>,
    #[serde(default)]
    pub witnesses: Vec<Witness>,
    #[serde(default)]
    pub asset_damages: Vec<AssetDamage>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identified for Incident {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Writable for Incident {
    type Payload = IncidentPayload;
}

/// Create/update body for `/incidentReports`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentPayload {
    pub incident_detail: IncidentDetail,
    pub incident_consequence: IncidentConsequence,
    pub involved_persons: Vec<InvolvedPerson>,
    pub witnesses: Vec<Witness>,
    pub asset_damages: Vec<AssetDamage>,
}

/// Body for `PATCH /incidentReports/{id}/workflow`.
///
/// The backend applies the write only if the stored revision equals
/// `expected_revision`, otherwise it answers 409.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_desk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<IncidentStatus>,
    pub expected_revision: u64,
}
