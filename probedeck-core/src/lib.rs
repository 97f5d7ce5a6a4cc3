//! Probedeck Core Library
//!
//! Control core for per-protocol probe panels:
//! - Synchronous field validation gating submission (`ValidationEngine`)
//! - One-shot request lifecycle state machine (`ProbeController`)
//! - Bounded result history (`HistoryRing`)
//! - Optimistic checklist mutations with rollback (`ChecklistService`)
//!
//! This library is platform-independent: the backend transport and the
//! checklist store are abstracted through traits, implemented by
//! `probedeck-http` against the real HTTP endpoints and by scripted mocks
//! in tests. Wire-level protocol handling lives behind the backend and is
//! opaque here.

pub mod catalog;
pub mod error;
pub mod history;
pub mod services;
pub mod traits;
pub mod types;
pub mod validation;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{ProbeError, ProbeResult};
pub use history::{HistoryEntry, HistoryRing};
pub use services::{ChecklistService, MutationSettlement, ProbeController, ProbeOutcome};
pub use traits::{ChecklistSnapshot, ChecklistStore, ProbeTransport};
pub use types::{
    FieldKind, FieldRule, FieldSpec, FieldValues, MutationIntent, MutationPhase, ProbeReport,
    ProbeRequest, ProbeState, ProtocolDescriptor, RuleKind, ValidationResult,
};
pub use validation::ValidationEngine;
