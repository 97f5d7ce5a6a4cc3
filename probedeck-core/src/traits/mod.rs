//! Transport and persistence abstraction traits

mod checklist_store;
mod transport;

pub use checklist_store::{ChecklistSnapshot, ChecklistStore};
pub use transport::ProbeTransport;
