//! Stepper view-model for one incident.

use std::fmt;

use super::WorkflowDefinition;
use crate::models::{Incident, IncidentStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Completed,
    Active,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub id: String,
    pub display_name: String,
    pub state: StepState,
}

/// What the workflow panel renders: one step per stage plus control flags.
///
/// An unknown desk yields no active step and disables Forward and Return;
/// Close stays available until the incident is closed. Once closed, the
/// desk reached is shown as completed and no control is visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stepper {
    pub steps: Vec<Step>,
    pub active: Option<usize>,
    pub closed: bool,
    pub can_forward: bool,
    pub can_return: bool,
    pub can_close: bool,
    pub controls_visible: bool,
}

impl Stepper {
    pub fn new(definition: &WorkflowDefinition, current_desk: &str, status: &IncidentStatus) -> Self {
        let closed = status.is_closed();
        let active = definition.resolve_index(current_desk);

        let steps = definition
            .stages()
            .iter()
            .enumerate()
            .map(|(index, stage)| {
                let state = match active {
                    Some(a) if index < a => StepState::Completed,
                    Some(a) if index == a && closed => StepState::Completed,
                    Some(a) if index == a => StepState::Active,
                    _ => StepState::Pending,
                };
                Step {
                    id: stage.id.clone(),
                    display_name: stage.display_name.clone(),
                    state,
                }
            })
            .collect();

        let active_id = active.map(|i| definition.stages()[i].id.as_str());
        let can_forward =
            !closed && active_id.is_some_and(|id| definition.next_stage(id).is_some());
        let can_return =
            !closed && active_id.is_some_and(|id| definition.previous_stage(id).is_some());

        Self {
            steps,
            active,
            closed,
            can_forward,
            can_return,
            can_close: !closed,
            controls_visible: !closed,
        }
    }

    pub fn for_incident(definition: &WorkflowDefinition, incident: &Incident) -> Self {
        Self::new(definition, &incident.current_desk, &incident.status)
    }

    pub fn active_step(&self) -> Option<&Step> {
        self.active.and_then(|i| self.steps.get(i))
    }
}

impl fmt::Display for Stepper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(" > ")?;
            }
            let mark = match step.state {
                StepState::Completed => "[x]",
                StepState::Active => "[*]",
                StepState::Pending => "[ ]",
            };
            write!(f, "{} {}", mark, step.display_name)?;
        }
        if self.closed {
            f.write_str(" (closed)")?;
        }
        Ok(())
    }
}
