//! Synchronous field validation

use std::collections::HashMap;

use crate::types::{FieldRule, FieldValues, ValidationResult};

/// Pure, synchronous validation of field values against declarative rules.
///
/// Deterministic and side-effect-free; no rule performs I/O, so submission
/// gating never blocks on the network.
pub struct ValidationEngine;

impl ValidationEngine {
    /// Validate field values against per-field rule lists.
    ///
    /// For each declared field, rules run in declared order and the first
    /// failure wins (short-circuit). Fields with no declared rules are
    /// always valid; a declared field with no submitted value validates as
    /// the empty string, so `Required` still fires.
    #[must_use]
    pub fn validate(
        fields: &FieldValues,
        rules: &HashMap<String, Vec<FieldRule>>,
    ) -> ValidationResult {
        let mut result = ValidationResult::valid();
        for (field, field_rules) in rules {
            let value = fields.get(field).map(String::as_str).unwrap_or("");
            for rule in field_rules {
                if !rule.check(value) {
                    result.record(field, &rule.message);
                    break;
                }
            }
        }
        result
    }
}
