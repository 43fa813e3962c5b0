//! Facility records.

use serde::{Deserialize, Serialize};

use super::{Identified, Writable, de_id, de_opt_id};

/// Facility as returned by `/facilities`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    /// Decimal degrees
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Decimal degrees
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Oil Mining Lease identifier (`OML-<digits>`)
    #[serde(default)]
    pub oml_number: String,
    #[serde(default)]
    pub field: String,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub installation_type_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub facility_type_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub company_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub state_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub lga_id: Option<String>,
    // Display names joined by the backend for list views.
    #[serde(default)]
    pub installation_type_name: Option<String>,
    #[serde(default)]
    pub facility_type_name: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub state_name: Option<String>,
    #[serde(default)]
    pub lga_name: Option<String>,
}

impl Identified for Facility {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Writable for Facility {
    type Payload = FacilityPayload;
}

/// Create/update body for `/facilities`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityPayload {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub oml_number: String,
    pub field: String,
    pub installation_type_id: String,
    pub facility_type_id: String,
    pub company_id: String,
    pub state_id: String,
    pub lga_id: String,
}
