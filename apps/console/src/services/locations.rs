//! States and LGAs used by facility forms and filters.

use std::sync::Arc;

use crate::error::AppResult;
use crate::models::{Lga, State};

use super::resource::Resource;

/// Read-only location lookups.
#[derive(Debug, Clone)]
pub struct Locations {
    states: Resource<State>,
    lgas: Resource<Lga>,
}

impl Locations {
    pub fn new(states: Resource<State>, lgas: Resource<Lga>) -> Self {
        Self { states, lgas }
    }

    pub async fn states(&self) -> AppResult<Arc<Vec<State>>> {
        self.states.list().await
    }

    pub async fn lgas(&self) -> AppResult<Arc<Vec<Lga>>> {
        self.lgas.list().await
    }

    /// LGAs of one state, derived client-side from the cached full list.
    pub async fn lgas_for_state(&self, state_id: &str) -> AppResult<Vec<Lga>> {
        if state_id.is_empty() {
            return Ok(Vec::new());
        }
        let lgas = self.lgas().await?;
        Ok(Lga::for_state(&lgas, state_id).into_iter().cloned().collect())
    }
}
