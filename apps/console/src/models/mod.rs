//! Domain records exchanged with the regulator backend.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub mod company;
pub mod facility;
pub mod incident;
pub mod location;
pub mod name_item;
pub mod template;
pub mod user;

// Re-export commonly used types
pub use company::{Company, CompanyPayload};
pub use facility::{Facility, FacilityPayload};
pub use incident::{
    AssetDamage, Attachment, AttachmentKind, Incident, IncidentConsequence, IncidentDetail,
    IncidentPayload, IncidentStatus, InvolvedPerson, Witness, WorkflowUpdate,
};
pub use location::{Lga, State};
pub use name_item::{NameItem, NameItemKind, NameItemPayload};
pub use template::{Template, TemplateFile, TemplateUpload};
pub use user::{InviteUserPayload, Role, RolePayload, UpdateUserRolesPayload, User};

/// A row that can be addressed by a stable string id.
pub trait Identified {
    fn id(&self) -> &str;
}

/// Records the backend creates and updates from a JSON body.
pub trait Writable: Identified {
    type Payload: Serialize + Send + Sync;
}

/// Deserialize an id that the backend may send as a number or a string.
pub(crate) fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

/// Optional variant of [`de_id`] for foreign keys.
pub(crate) fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(
        Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }),
    )
}

/// Accept RFC 3339 timestamps as well as the zone-less form the backend
/// emits for some audit columns (interpreted as UTC).
pub(crate) fn de_opt_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return Ok(None);
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }

    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc()))
        .map_err(serde::de::Error::custom)
}
