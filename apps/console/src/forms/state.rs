//! Form state reducer.

use std::collections::BTreeSet;

use super::{FormErrors, FormValues};

/// Everything a form view needs to render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub values: FormValues,
    pub initial: FormValues,
    pub touched: BTreeSet<String>,
    pub errors: FormErrors,
    pub submitting: bool,
    pub submit_count: u32,
}

/// Events a form view dispatches.
#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    SetField { field: String, value: String },
    Blur(String),
    SetErrors(FormErrors),
    SubmitAttempt,
    /// `ok` marks the current values as the new baseline.
    SubmitFinished { ok: bool },
    /// Start over, optionally from new initial values.
    Reset(Option<FormValues>),
}

impl FormAction {
    pub fn set(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::SetField {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl FormState {
    pub fn new(initial: FormValues) -> Self {
        Self {
            values: initial.clone(),
            initial,
            ..Self::default()
        }
    }

    /// Values differ from the initial snapshot.
    pub fn is_dirty(&self) -> bool {
        self.values != self.initial
    }

    /// Error for `field`, but only once the user touched it or tried to submit.
    pub fn visible_error(&self, field: &str) -> Option<&str> {
        if self.submit_count > 0 || self.touched.contains(field) {
            self.errors.get(field)
        } else {
            None
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Pure transition function.
pub fn reduce(mut state: FormState, action: FormAction) -> FormState {
    match action {
        FormAction::SetField { field, value } => {
            state.errors.remove(&field);
            state.values.set(field, value);
        }
        FormAction::Blur(field) => {
            state.touched.insert(field);
        }
        FormAction::SetErrors(errors) => {
            state.errors = errors;
        }
        FormAction::SubmitAttempt => {
            state.submit_count += 1;
            state.submitting = true;
            let fields: Vec<String> = state.values.fields().map(str::to_string).collect();
            state.touched.extend(fields);
        }
        FormAction::SubmitFinished { ok } => {
            state.submitting = false;
            if ok {
                state.initial = state.values.clone();
            }
        }
        FormAction::Reset(initial) => {
            let initial = initial.unwrap_or(state.initial);
            state = FormState::new(initial);
        }
    }
    state
}
