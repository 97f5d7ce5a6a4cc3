//! Probe request, response envelope and lifecycle state

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Immutable value object describing one outgoing probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeRequest {
    /// Backend path, e.g. `/api/chargen/generate`
    pub endpoint: String,
    /// Coerced field values plus `timeout`; protocol-specific and opaque here
    pub payload: Map<String, Value>,
    /// Upper bound on the round trip, milliseconds
    pub timeout_ms: u64,
}

/// The backend response envelope.
///
/// Only `success` and `error` are inspected by the core; everything else is
/// kept verbatim for the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeReport {
    /// Whether the probe succeeded
    pub success: bool,
    /// Backend-reported failure message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Protocol-specific result fields, untouched
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl ProbeReport {
    /// A successful report carrying an opaque payload
    #[must_use]
    pub fn ok(payload: Map<String, Value>) -> Self {
        Self {
            success: true,
            error: None,
            payload,
        }
    }

    /// A failed report with a backend error message
    #[must_use]
    pub fn failed(message: &str) -> Self {
        Self {
            success: false,
            error: Some(message.to_string()),
            payload: Map::new(),
        }
    }
}

/// Request lifecycle state. Exactly one exists per controller instance.
///
/// Transitions are strictly linear: `Idle → Validating → Idle` when
/// validation fails, otherwise `Validating → Pending → Success | Error`.
/// A new invocation restarts from `Validating`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", content = "details", rename_all = "camelCase")]
pub enum ProbeState {
    /// Nothing in flight
    #[default]
    Idle,
    /// Synchronous validation running
    Validating,
    /// A request is in flight
    Pending,
    /// Last invocation settled successfully
    Success(ProbeReport),
    /// Last invocation settled with a user-visible message
    Error(String),
}

impl ProbeState {
    /// Whether a request is currently in flight
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// State name for display and logging
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Pending => "pending",
            Self::Success(_) => "success",
            Self::Error(_) => "error",
        }
    }
}
