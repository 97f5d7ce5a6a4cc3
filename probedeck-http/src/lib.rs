//! HTTP adapters for Probedeck
//!
//! Implements the core's [`probedeck_core::ProbeTransport`] and
//! [`probedeck_core::ChecklistStore`] traits against the real backend:
//! `POST /api/<protocol>/<action>` for probes and `GET|POST /api/checklist`
//! for the persisted checklist.

mod checklist;
mod client;
mod transport;

pub use checklist::HttpChecklistStore;
pub use transport::HttpProbeTransport;
