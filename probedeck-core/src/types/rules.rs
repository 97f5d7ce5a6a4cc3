//! Declarative validation rules and results

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// What a [`FieldRule`] checks.
///
/// Rules are pure predicates over a single field's raw string value. They
/// never see other fields and never perform I/O, so submission gating stays
/// synchronous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RuleKind {
    /// Value must be non-empty after trimming
    Required,
    /// Value must parse as a port number 1-65535
    Port,
    /// Value must parse as an integer within `[min, max]`
    IntRange { min: i64, max: i64 },
    /// Value must be at most `max` characters
    MaxLength { max: usize },
}

/// One validation rule: a predicate plus the message surfaced when it fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRule {
    /// The predicate
    #[serde(flatten)]
    pub kind: RuleKind,
    /// Error message recorded on failure
    pub message: String,
}

impl FieldRule {
    /// Require a non-empty value
    #[must_use]
    pub fn required(message: &str) -> Self {
        Self {
            kind: RuleKind::Required,
            message: message.to_string(),
        }
    }

    /// Require a valid port number
    #[must_use]
    pub fn port(message: &str) -> Self {
        Self {
            kind: RuleKind::Port,
            message: message.to_string(),
        }
    }

    /// Require an integer within the inclusive range
    #[must_use]
    pub fn int_range(min: i64, max: i64, message: &str) -> Self {
        Self {
            kind: RuleKind::IntRange { min, max },
            message: message.to_string(),
        }
    }

    /// Cap the value length in characters
    #[must_use]
    pub fn max_length(max: usize, message: &str) -> Self {
        Self {
            kind: RuleKind::MaxLength { max },
            message: message.to_string(),
        }
    }

    /// Evaluate the predicate against a raw value.
    ///
    /// Rules other than `Required` accept an empty value, so an optional
    /// field only fails constraint rules once something was entered.
    #[must_use]
    pub fn check(&self, value: &str) -> bool {
        let trimmed = value.trim();
        match &self.kind {
            RuleKind::Required => !trimmed.is_empty(),
            RuleKind::Port => {
                trimmed.is_empty()
                    || trimmed.parse::<u16>().map(|port| port >= 1).unwrap_or(false)
            }
            RuleKind::IntRange { min, max } => {
                trimmed.is_empty()
                    || trimmed
                        .parse::<i64>()
                        .map(|n| n >= *min && n <= *max)
                        .unwrap_or(false)
            }
            RuleKind::MaxLength { max } => trimmed.chars().count() <= *max,
        }
    }
}

/// Outcome of validating one set of field values.
///
/// Only failing fields appear; an empty map means the submission may
/// proceed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: BTreeMap<String, String>,
}

impl ValidationResult {
    /// A result with no errors
    #[must_use]
    pub fn valid() -> Self {
        Self::default()
    }

    /// A result with a single field error
    #[must_use]
    pub fn single(field: &str, message: &str) -> Self {
        let mut result = Self::default();
        result.record(field, message);
        result
    }

    /// Record a field error. The first recorded message per field wins.
    pub fn record(&mut self, field: &str, message: &str) {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    /// Whether every field passed
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The error message for one field, if it failed
    #[must_use]
    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// All recorded errors, keyed by field name
    #[must_use]
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }
}
