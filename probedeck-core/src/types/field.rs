//! Field specifications and value coercion

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw field values as entered in a panel, keyed by field name.
pub type FieldValues = HashMap<String, String>;

/// How a raw string value is coerced into the JSON request payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    /// Passed through as a JSON string
    Text,
    /// Coerced to a JSON integer
    Integer,
    /// Coerced to a JSON integer, 1-65535
    Port,
    /// Coerced to a JSON boolean (`true`/`1`/`on` vs `false`/`0`/`off`)
    Flag,
}

/// Declarative description of one panel input field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    /// Field name, also the payload key
    pub name: String,
    /// Coercion kind
    pub kind: FieldKind,
    /// Value used when the panel supplies none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl FieldSpec {
    /// Create a text field
    #[must_use]
    pub fn text(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Text,
            default: None,
        }
    }

    /// Create an integer field
    #[must_use]
    pub fn integer(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Integer,
            default: None,
        }
    }

    /// Create a port field
    #[must_use]
    pub fn port(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Port,
            default: None,
        }
    }

    /// Create a boolean flag field
    #[must_use]
    pub fn flag(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Flag,
            default: None,
        }
    }

    /// Attach a default value
    #[must_use]
    pub fn with_default(mut self, default: &str) -> Self {
        self.default = Some(default.to_string());
        self
    }

    /// Coerce a raw string value according to the field kind.
    ///
    /// Returns the error message on failure. Declared rules normally catch
    /// malformed values before coercion runs; this is the backstop for
    /// fields without a matching rule.
    pub fn coerce(&self, raw: &str) -> Result<Value, String> {
        let raw = raw.trim();
        match self.kind {
            FieldKind::Text => Ok(Value::String(raw.to_string())),
            FieldKind::Integer => raw
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| format!("{} must be an integer", self.name)),
            FieldKind::Port => raw
                .parse::<u16>()
                .ok()
                .filter(|port| *port >= 1)
                .map(Value::from)
                .ok_or_else(|| format!("{} must be a port between 1 and 65535", self.name)),
            FieldKind::Flag => match raw {
                "true" | "1" | "on" => Ok(Value::Bool(true)),
                "false" | "0" | "off" | "" => Ok(Value::Bool(false)),
                _ => Err(format!("{} must be a boolean", self.name)),
            },
        }
    }
}
