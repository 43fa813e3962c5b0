//! Incident review workflow: stage definition, stepper view, transitions.

mod definition;
mod service;
mod stepper;

pub use definition::{StageDescriptor, Transition, TransitionRule, WorkflowDefinition};
pub use service::{WorkflowAction, WorkflowService};
pub use stepper::{Step, StepState, Stepper};

/// Workflow rule violations, detected before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("No next stage available")]
    NoNextStage,

    #[error("No previous stage available")]
    NoPreviousStage,

    #[error("Incident is already closed")]
    AlreadyClosed,

    #[error("Unknown desk: {0}")]
    UnknownDesk(String),

    #[error("Invalid workflow definition: {0}")]
    InvalidDefinition(String),
}
