//! Declarative field validation.

use std::sync::LazyLock;

use regex::Regex;

use super::{FormErrors, FormValues};

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

/// One validation rule. Rules other than `Required` pass on empty input.
#[derive(Debug, Clone)]
pub enum FieldRule {
    Required,
    Email,
    Pattern { regex: Regex, message: String },
    MinLength(usize),
    MaxLength(usize),
    /// Inclusive bounds on a decimal number.
    DecimalRange { min: f64, max: f64 },
    /// Must equal another field's value.
    Matches { field: String, message: String },
    /// Must be one of the listed values (case-sensitive).
    OneOf(Vec<String>),
}

impl FieldRule {
    pub fn pattern(regex: &Regex, message: impl Into<String>) -> Self {
        Self::Pattern {
            regex: regex.clone(),
            message: message.into(),
        }
    }

    pub fn matches(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Matches {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn one_of<S: Into<String>>(options: impl IntoIterator<Item = S>) -> Self {
        Self::OneOf(options.into_iter().map(Into::into).collect())
    }

    /// Error message, or `None` when `value` satisfies the rule.
    fn check(&self, label: &str, value: &str, values: &FormValues) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() && !matches!(self, Self::Required) {
            return None;
        }

        match self {
            Self::Required if trimmed.is_empty() => Some(format!("{} is required", label)),
            Self::Required => None,
            Self::Email if !EMAIL.is_match(trimmed) => Some("Invalid email address".to_string()),
            Self::Email => None,
            Self::Pattern { regex, message } if !regex.is_match(trimmed) => Some(message.clone()),
            Self::Pattern { .. } => None,
            Self::MinLength(min) if value.chars().count() < *min => Some(format!(
                "{} must be at least {} characters",
                label, min
            )),
            Self::MaxLength(max) if value.chars().count() > *max => Some(format!(
                "{} must be at most {} characters",
                label, max
            )),
            Self::MinLength(_) | Self::MaxLength(_) => None,
            Self::DecimalRange { min, max } => match trimmed.parse::<f64>() {
                Ok(n) if n.is_finite() && n >= *min && n <= *max => None,
                Ok(_) => Some(format!("{} must be between {} and {}", label, min, max)),
                Err(_) => Some(format!("{} must be a number", label)),
            },
            Self::Matches { field, message } if values.get(field) != value => {
                Some(message.clone())
            }
            Self::Matches { .. } => None,
            Self::OneOf(options) if !options.iter().any(|o| o == trimmed) => {
                Some(format!("{} must be one of the available options", label))
            }
            Self::OneOf(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub field: String,
    pub label: String,
    pub rules: Vec<FieldRule>,
}

/// Ordered field rules; validation reports the first failing rule per field.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldSchema>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(
        mut self,
        field: impl Into<String>,
        label: impl Into<String>,
        rules: impl IntoIterator<Item = FieldRule>,
    ) -> Self {
        self.fields.push(FieldSchema {
            field: field.into(),
            label: label.into(),
            rules: rules.into_iter().collect(),
        });
        self
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn validate(&self, values: &FormValues) -> FormErrors {
        let mut errors = FormErrors::new();
        for schema in &self.fields {
            let value = values.get(&schema.field);
            if let Some(message) = schema
                .rules
                .iter()
                .find_map(|rule| rule.check(&schema.label, value, values))
            {
                errors.insert(schema.field.clone(), message);
            }
        }
        errors
    }
}
