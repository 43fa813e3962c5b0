//! Minimal `{id, name}` reference entities.

use serde::{Deserialize, Serialize};

use super::{Identified, Writable, de_id};

/// Which reference list a [`NameItem`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameItemKind {
    InstallationType,
    FacilityType,
    InjuryType,
    Sector,
}

impl NameItemKind {
    pub const ALL: [NameItemKind; 4] = [
        Self::InstallationType,
        Self::FacilityType,
        Self::InjuryType,
        Self::Sector,
    ];

    /// REST collection path.
    pub fn path(&self) -> &'static str {
        match self {
            Self::InstallationType => "installationTypes",
            Self::FacilityType => "facilityTypes",
            Self::InjuryType => "injuryTypes",
            Self::Sector => "sectors",
        }
    }

    /// Human label used in notifications and headers.
    pub fn label(&self) -> &'static str {
        match self {
            Self::InstallationType => "Installation type",
            Self::FacilityType => "Facility type",
            Self::InjuryType => "Injury type",
            Self::Sector => "Sector",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.to_lowercase().replace(['-', '_', ' '], "");
        let plural = format!("{wanted}s");
        Self::ALL.into_iter().find(|kind| {
            let path = kind.path().to_lowercase();
            path == wanted || path == plural
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameItem {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
}

impl Identified for NameItem {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Writable for NameItem {
    type Payload = NameItemPayload;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameItemPayload {
    pub name: String,
}
