//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// Core layer error type
///
/// Every failure a controller can settle with falls into one of four
/// categories. Timeouts are reported as [`ProbeError::NetworkError`] with a
/// timeout message; they are not a separate kind.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum ProbeError {
    /// Pre-flight field validation failed; nothing was dispatched
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Transport failure: connection refused, DNS, timeout, bad envelope
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The backend answered but reported `success: false`
    #[error("Protocol error: {0}")]
    ProtocolError(String),

    /// A checklist persistence write failed; the optimistic value was rolled back
    #[error("Persistence error: {0}")]
    PersistenceError(String),
}

impl ProbeError {
    /// Whether this is expected behavior (user input, misbehaving target
    /// service) used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error`
    /// when returning `false`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::ValidationError(_) | Self::ProtocolError(_))
    }
}

/// Core layer Result type alias
pub type ProbeResult<T> = std::result::Result<T, ProbeError>;
