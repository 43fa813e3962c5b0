//! Operator companies.

use serde::{Deserialize, Serialize};

use super::{Identified, Writable, de_id, de_opt_id};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub sector_id: Option<String>,
    #[serde(default)]
    pub sector_name: Option<String>,
}

impl Identified for Company {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Writable for Company {
    type Payload = CompanyPayload;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPayload {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub sector_id: String,
}
