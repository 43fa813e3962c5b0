//! Declarative stage list and transition table.

use std::collections::HashSet;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::WorkflowError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageDescriptor {
    pub id: String,
    pub display_name: String,
    /// Other spellings of this desk found in existing records.
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl StageDescriptor {
    fn new(id: &str, display_name: &str, aliases: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Case-insensitive match on id, display name, or any alias.
    pub fn matches(&self, desk: &str) -> bool {
        let desk = desk.trim();
        self.id.eq_ignore_ascii_case(desk)
            || self.display_name.eq_ignore_ascii_case(desk)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(desk))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Forward,
    Return,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRule {
    pub from: String,
    pub to: String,
    pub kind: Transition,
}

/// Ordered stages plus the allowed moves between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinition {
    pub name: String,
    pub stages: Vec<StageDescriptor>,
    pub transitions: Vec<TransitionRule>,
}

static INCIDENT_WORKFLOW: OnceLock<WorkflowDefinition> = OnceLock::new();

impl WorkflowDefinition {
    /// The five-desk incident review chain.
    pub fn incident() -> &'static WorkflowDefinition {
        INCIDENT_WORKFLOW.get_or_init(|| {
            Self::linear(
                "incident",
                vec![
                    StageDescriptor::new("incident_investigator", "Investigator", &[
                        "Incident Investigator",
                    ]),
                    StageDescriptor::new("head_hsec_field", "Head HSEC (Field Office)", &[
                        "Head HSEC",
                        "Head HSEC (Field)",
                    ]),
                    StageDescriptor::new("sc_rc_reviewer_hq", "SC/RC Reviewer (HQ)", &[
                        "SC/RC Reviewer",
                    ]),
                    StageDescriptor::new("senior_manager_im_hq", "Senior Manager IM (HQ)", &[
                        "Senior Manager IM",
                    ]),
                    StageDescriptor::new("director_hs_hq", "Director H&S (HQ)", &[
                        "Director H&S",
                    ]),
                ],
            )
        })
    }

    /// Chain `stages` in order: each forwards to the next and returns to the previous.
    pub fn linear(name: impl Into<String>, stages: Vec<StageDescriptor>) -> Self {
        let transitions = stages
            .windows(2)
            .flat_map(|pair| {
                [
                    TransitionRule {
                        from: pair[0].id.clone(),
                        to: pair[1].id.clone(),
                        kind: Transition::Forward,
                    },
                    TransitionRule {
                        from: pair[1].id.clone(),
                        to: pair[0].id.clone(),
                        kind: Transition::Return,
                    },
                ]
            })
            .collect();
        Self {
            name: name.into(),
            stages,
            transitions,
        }
    }

    /// Parse and check a definition shared as JSON.
    pub fn from_json(json: &str) -> Result<Self, WorkflowError> {
        let definition: Self = serde_json::from_str(json)
            .map_err(|e| WorkflowError::InvalidDefinition(e.to_string()))?;
        definition.validate()?;
        Ok(definition)
    }

    pub fn to_json(&self) -> Result<String, WorkflowError> {
        serde_json::to_string_pretty(self).map_err(|e| WorkflowError::InvalidDefinition(e.to_string()))
    }

    /// Stage ids are unique, transitions reference known stages, and each
    /// stage has at most one target per transition kind.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        if self.stages.is_empty() {
            return Err(WorkflowError::InvalidDefinition("no stages".into()));
        }
        let mut ids = HashSet::new();
        for stage in &self.stages {
            if !ids.insert(stage.id.as_str()) {
                return Err(WorkflowError::InvalidDefinition(format!(
                    "duplicate stage '{}'",
                    stage.id
                )));
            }
        }
        let mut seen = HashSet::new();
        for rule in &self.transitions {
            for id in [&rule.from, &rule.to] {
                if !ids.contains(id.as_str()) {
                    return Err(WorkflowError::InvalidDefinition(format!(
                        "transition references unknown stage '{}'",
                        id
                    )));
                }
            }
            if !seen.insert((rule.from.as_str(), rule.kind)) {
                return Err(WorkflowError::InvalidDefinition(format!(
                    "stage '{}' has more than one {:?} transition",
                    rule.from, rule.kind
                )));
            }
        }
        Ok(())
    }

    pub fn stages(&self) -> &[StageDescriptor] {
        &self.stages
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.id == id)
    }

    /// Stage for a free-text desk value; `None` when nothing matches.
    pub fn resolve_stage(&self, desk: &str) -> Option<&StageDescriptor> {
        self.stages.iter().find(|s| s.matches(desk))
    }

    pub fn resolve_index(&self, desk: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.matches(desk))
    }

    /// Where `kind` leads from stage `from`.
    pub fn target(&self, from: &str, kind: Transition) -> Option<&StageDescriptor> {
        let rule = self
            .transitions
            .iter()
            .find(|r| r.from == from && r.kind == kind)?;
        self.stages.iter().find(|s| s.id == rule.to)
    }

    pub fn next_stage(&self, from: &str) -> Option<&StageDescriptor> {
        self.target(from, Transition::Forward)
    }

    pub fn previous_stage(&self, from: &str) -> Option<&StageDescriptor> {
        self.target(from, Transition::Return)
    }
}
