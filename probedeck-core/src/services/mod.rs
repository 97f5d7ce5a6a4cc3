//! Controller service layer

mod checklist_service;
mod probe_controller;

pub use checklist_service::{ChecklistService, MutationSettlement};
pub use probe_controller::{ProbeController, ProbeOutcome};
