//! Checklist persistence abstract trait

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::ProbeResult;

/// Checklist state as `protocol id → item name → checked`.
pub type ChecklistSnapshot = HashMap<String, HashMap<String, bool>>;

/// Remote store backing the optimistic checklist.
///
/// `load_all` is read-only and called once to seed initial state;
/// `persist` is the write whose failure triggers rollback. Failures map to
/// [`crate::ProbeError::PersistenceError`].
#[async_trait]
pub trait ChecklistStore: Send + Sync {
    /// Fetch the complete persisted checklist
    async fn load_all(&self) -> ProbeResult<ChecklistSnapshot>;

    /// Persist one item's checked state
    async fn persist(&self, protocol_id: &str, item: &str, checked: bool) -> ProbeResult<()>;
}
