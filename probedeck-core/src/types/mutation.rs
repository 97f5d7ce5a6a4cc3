//! Optimistic mutation bookkeeping

use serde::Serialize;

/// Phase of an optimistic checklist mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationPhase {
    /// Locally applied, persistence in flight
    Applied,
    /// Persistence confirmed; the visible value already matched
    Committed,
    /// Persistence failed; the visible value was restored
    RolledBack,
}

/// A pending optimistic change to one checklist key.
///
/// Created the moment a toggle is applied and discarded once persistence
/// settles. The epoch ties the intent to the toggle that created it, so a
/// stale settlement can be recognized and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationIntent {
    /// Protocol the checklist item belongs to
    pub protocol_id: String,
    /// Checklist item name
    pub item: String,
    /// Value before the toggle; restored on rollback
    pub previous: bool,
    /// Value applied optimistically
    pub desired: bool,
    /// Current phase
    pub phase: MutationPhase,
    pub(crate) epoch: u64,
}
