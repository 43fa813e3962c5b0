//! States and Local Government Areas.

use serde::{Deserialize, Serialize};

use super::{Identified, de_id};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
}

impl Identified for State {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Local Government Area, a subdivision of a [`State`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lga {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "de_id")]
    pub state_id: String,
}

impl Identified for Lga {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Lga {
    /// Keep only the LGAs belonging to `state_id`.
    pub fn for_state<'a>(lgas: &'a [Lga], state_id: &str) -> Vec<&'a Lga> {
        lgas.iter().filter(|lga| lga.state_id == state_id).collect()
    }
}
