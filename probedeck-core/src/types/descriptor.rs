//! Schema-driven protocol panel descriptors

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::types::field::{FieldSpec, FieldValues};
use crate::types::probe::ProbeRequest;
use crate::types::rules::{FieldRule, ValidationResult};

/// Default probe timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default history ring capacity
const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Declarative description of one protocol probe panel.
///
/// One descriptor replaces a hand-written panel controller: it names the
/// backend endpoint, the input fields with their coercion and defaults, the
/// validation rules gating submission, and the timeout. The controller is
/// generic over the descriptor.
#[derive(Debug, Clone)]
pub struct ProtocolDescriptor {
    /// Protocol identifier, first path segment (`echo`, `chargen`, …)
    pub protocol: String,
    /// Action identifier, second path segment (`send`, `generate`, …)
    pub action: String,
    /// Input fields in display order
    pub fields: Vec<FieldSpec>,
    /// Validation rules per field, evaluated in declared order
    pub rules: HashMap<String, Vec<FieldRule>>,
    /// Upper bound on the probe round trip, milliseconds
    pub timeout_ms: u64,
    /// Whether successful results are pushed into the history ring
    pub track_history: bool,
    /// History ring capacity
    pub history_capacity: usize,
}

impl ProtocolDescriptor {
    /// Create a descriptor with default timeout and history settings
    #[must_use]
    pub fn new(protocol: &str, action: &str) -> Self {
        Self {
            protocol: protocol.to_string(),
            action: action.to_string(),
            fields: Vec::new(),
            rules: HashMap::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            track_history: true,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    /// Append an input field
    #[must_use]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Declare the rules for one field
    #[must_use]
    pub fn rules(mut self, field: &str, rules: Vec<FieldRule>) -> Self {
        self.rules.insert(field.to_string(), rules);
        self
    }

    /// Override the probe timeout
    #[must_use]
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Disable history tracking
    #[must_use]
    pub fn without_history(mut self) -> Self {
        self.track_history = false;
        self
    }

    /// Backend path for this panel
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("/api/{}/{}", self.protocol, self.action)
    }

    /// Build the request for a validated set of field values.
    ///
    /// Declared defaults fill in missing values; fields left empty are
    /// omitted from the payload. The descriptor timeout is added as the
    /// `timeout` payload key the backend expects. Coercion failures come
    /// back as a [`ValidationResult`] so callers can surface them exactly
    /// like rule failures.
    pub fn build_request(&self, fields: &FieldValues) -> Result<ProbeRequest, ValidationResult> {
        let mut payload = Map::new();
        for spec in &self.fields {
            let raw = fields
                .get(&spec.name)
                .map(String::as_str)
                .filter(|value| !value.trim().is_empty())
                .or(spec.default.as_deref())
                .unwrap_or("");
            if raw.trim().is_empty() {
                continue;
            }
            let value = spec
                .coerce(raw)
                .map_err(|message| ValidationResult::single(&spec.name, &message))?;
            payload.insert(spec.name.clone(), value);
        }
        payload.insert("timeout".to_string(), Value::from(self.timeout_ms));
        Ok(ProbeRequest {
            endpoint: self.endpoint(),
            payload,
            timeout_ms: self.timeout_ms,
        })
    }
}
