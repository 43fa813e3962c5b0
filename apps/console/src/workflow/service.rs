//! Forward, return, and close transitions against the backend.

use tracing::{info, warn};

use super::{WorkflowDefinition, WorkflowError};
use crate::error::{AppError, AppResult};
use crate::models::{Incident, IncidentStatus, WorkflowUpdate};
use crate::services::IncidentResource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowAction {
    Forward,
    Return,
    Close,
}

impl WorkflowAction {
    fn verb(&self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Return => "return",
            Self::Close => "close",
        }
    }
}

/// Applies workflow transitions to incidents.
///
/// Rule violations are reported as an error toast and never reach the
/// backend. Writes carry the revision the caller saw; the backend rejects a
/// stale one with 409, reported as `AppError::Conflict`.
///
/// Close is allowed from any stage, including an unknown desk, but a closed
/// incident is final: every action on it, Close included, fails with
/// `WorkflowError::AlreadyClosed` so a repeated Close never rewrites the
/// record or its revision.
#[derive(Debug, Clone)]
pub struct WorkflowService {
    incidents: IncidentResource,
    definition: &'static WorkflowDefinition,
}

impl WorkflowService {
    pub fn new(incidents: IncidentResource) -> Self {
        Self::with_definition(incidents, WorkflowDefinition::incident())
    }

    pub fn with_definition(
        incidents: IncidentResource,
        definition: &'static WorkflowDefinition,
    ) -> Self {
        Self {
            incidents,
            definition,
        }
    }

    pub fn definition(&self) -> &'static WorkflowDefinition {
        self.definition
    }

    /// Check the rule for `action` and build the write it implies.
    pub fn plan(
        &self,
        incident: &Incident,
        action: WorkflowAction,
    ) -> Result<WorkflowUpdate, WorkflowError> {
        if incident.status.is_closed() {
            return Err(WorkflowError::AlreadyClosed);
        }

        let current_desk = match action {
            WorkflowAction::Close => None,
            WorkflowAction::Forward | WorkflowAction::Return => {
                let stage = self
                    .definition
                    .resolve_stage(&incident.current_desk)
                    .ok_or_else(|| WorkflowError::UnknownDesk(incident.current_desk.clone()))?;
                let target = if action == WorkflowAction::Forward {
                    self.definition
                        .next_stage(&stage.id)
                        .ok_or(WorkflowError::NoNextStage)?
                } else {
                    self.definition
                        .previous_stage(&stage.id)
                        .ok_or(WorkflowError::NoPreviousStage)?
                };
                Some(target.display_name.clone())
            }
        };

        let status = match action {
            WorkflowAction::Close => Some(IncidentStatus::Closed),
            _ => None,
        };

        Ok(WorkflowUpdate {
            current_desk,
            status,
            expected_revision: incident.revision,
        })
    }

    pub async fn forward(&self, incident: &Incident) -> AppResult<Incident> {
        self.apply(incident, WorkflowAction::Forward).await
    }

    pub async fn return_to_previous(&self, incident: &Incident) -> AppResult<Incident> {
        self.apply(incident, WorkflowAction::Return).await
    }

    pub async fn close(&self, incident: &Incident) -> AppResult<Incident> {
        self.apply(incident, WorkflowAction::Close).await
    }

    pub async fn apply(&self, incident: &Incident, action: WorkflowAction) -> AppResult<Incident> {
        let notifier = self.incidents.notifier();

        let update = match self.plan(incident, action) {
            Ok(update) => update,
            Err(e) => {
                warn!(incident = %incident.id, "Workflow {} rejected: {}", action.verb(), e);
                notifier.error(e.to_string());
                return Err(e.into());
            }
        };

        let path = format!("{}/workflow", self.incidents.item_path(&incident.id));
        let result = self
            .incidents
            .client()
            .patch::<Incident, _>(&path, &update)
            .await;

        match result {
            Ok(updated) => {
                self.incidents.invalidate().await;
                let message = match (action, &update.current_desk) {
                    (WorkflowAction::Forward, Some(desk)) => {
                        format!("Incident forwarded to {}", desk)
                    }
                    (WorkflowAction::Return, Some(desk)) => {
                        format!("Incident returned to {}", desk)
                    }
                    _ => "Incident closed".to_string(),
                };
                info!(incident = %incident.id, revision = updated.revision, "{}", message);
                notifier.success(message);
                Ok(updated)
            }
            Err(e) => {
                let e = match e {
                    AppError::Http { status: 409 } => self.conflict(incident).await,
                    other => other,
                };
                warn!(incident = %incident.id, "Failed to {} incident: {}", action.verb(), e);
                notifier.error(format!(
                    "Failed to {} incident: {}",
                    action.verb(),
                    e.user_message()
                ));
                Err(e)
            }
        }
    }

    /// Re-read the incident to report which revision won.
    async fn conflict(&self, incident: &Incident) -> AppError {
        self.incidents.invalidate().await;
        let actual = match self.incidents.detail(&incident.id).await {
            Ok(Some(current)) => current.revision,
            _ => incident.revision,
        };
        AppError::Conflict {
            expected: incident.revision,
            actual,
        }
    }
}
