//! Type definition module

mod descriptor;
mod field;
mod mutation;
mod probe;
mod rules;

pub use descriptor::{ProtocolDescriptor, DEFAULT_TIMEOUT_MS};
pub use field::{FieldKind, FieldSpec, FieldValues};
pub use mutation::{MutationIntent, MutationPhase};
pub use probe::{ProbeReport, ProbeRequest, ProbeState};
pub use rules::{FieldRule, RuleKind, ValidationResult};
