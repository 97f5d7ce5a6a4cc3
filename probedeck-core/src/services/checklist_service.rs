//! Optimistic checklist mutation controller

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::{ProbeError, ProbeResult};
use crate::traits::{ChecklistSnapshot, ChecklistStore};
use crate::types::{MutationIntent, MutationPhase};

/// How one toggle settled.
#[derive(Debug)]
pub enum MutationSettlement {
    /// Persistence confirmed; the visible value was already correct
    Committed(MutationIntent),
    /// Persistence failed; the visible value was restored and the error
    /// is surfaced to the caller
    RolledBack {
        intent: MutationIntent,
        error: ProbeError,
    },
    /// A newer toggle on the same key was applied while this one was in
    /// flight; this settlement left the newer value alone
    Superseded,
}

/// Applies checklist toggles locally before persistence confirms them.
///
/// The exposed value for a key equals the desired value while the write is
/// pending, the previous value if the write fails, and the desired value
/// once it succeeds; it never takes any third value. A per-key epoch
/// counter makes stale settlements inert, so an old failure can never
/// roll back a newer, still-settling toggle. Mutations on different keys
/// never interfere.
pub struct ChecklistService {
    store: Arc<dyn ChecklistStore>,
    items: RwLock<ChecklistSnapshot>,
    epochs: RwLock<HashMap<(String, String), u64>>,
    pending: RwLock<HashMap<(String, String), MutationIntent>>,
}

impl ChecklistService {
    /// Create a service over a persistence store
    #[must_use]
    pub fn new(store: Arc<dyn ChecklistStore>) -> Self {
        Self {
            store,
            items: RwLock::new(ChecklistSnapshot::new()),
            epochs: RwLock::new(HashMap::new()),
            pending: RwLock::new(HashMap::new()),
        }
    }

    /// Seed local state from the store. Called once at panel mount.
    pub async fn load(&self) -> ProbeResult<()> {
        let snapshot = self.store.load_all().await?;
        log::debug!(
            "[Checklist] seeded {} protocol(s) from store",
            snapshot.len()
        );
        *self.items.write().await = snapshot;
        Ok(())
    }

    /// The exposed value for one item (unknown items are unchecked)
    pub async fn is_checked(&self, protocol_id: &str, item: &str) -> bool {
        self.items
            .read()
            .await
            .get(protocol_id)
            .and_then(|items| items.get(item))
            .copied()
            .unwrap_or(false)
    }

    /// A copy of the full visible checklist state
    pub async fn snapshot(&self) -> ChecklistSnapshot {
        self.items.read().await.clone()
    }

    /// Intents whose persistence has not settled yet
    pub async fn pending_intents(&self) -> Vec<MutationIntent> {
        self.pending.read().await.values().cloned().collect()
    }

    /// Toggle one item optimistically and persist it.
    ///
    /// The visible value changes before any network round trip. On a failed
    /// write the value is restored, unless a newer toggle on the same key
    /// has been applied in the meantime (last-write-wins).
    pub async fn toggle(
        &self,
        protocol_id: &str,
        item: &str,
        desired: bool,
    ) -> MutationSettlement {
        let key = (protocol_id.to_string(), item.to_string());

        // Apply phase: flip the visible value and open an intent, atomically
        // with respect to other toggles.
        let intent = {
            let mut items = self.items.write().await;
            let mut epochs = self.epochs.write().await;
            let mut pending = self.pending.write().await;

            let entry = items
                .entry(protocol_id.to_string())
                .or_default()
                .entry(item.to_string())
                .or_insert(false);
            let previous = *entry;
            *entry = desired;

            let epoch = epochs
                .entry(key.clone())
                .and_modify(|epoch| *epoch += 1)
                .or_insert(1);
            let intent = MutationIntent {
                protocol_id: protocol_id.to_string(),
                item: item.to_string(),
                previous,
                desired,
                phase: MutationPhase::Applied,
                epoch: *epoch,
            };
            pending.insert(key.clone(), intent.clone());
            intent
        };

        let persisted = self.store.persist(protocol_id, item, desired).await;

        // Settle phase: only the latest epoch for this key may touch state.
        let mut items = self.items.write().await;
        let epochs = self.epochs.read().await;
        let mut pending = self.pending.write().await;

        if epochs.get(&key).copied() != Some(intent.epoch) {
            log::debug!(
                "[Checklist] stale settlement for {protocol_id}/{item} (epoch {}) discarded",
                intent.epoch
            );
            return MutationSettlement::Superseded;
        }
        pending.remove(&key);

        match persisted {
            Ok(()) => {
                let mut intent = intent;
                intent.phase = MutationPhase::Committed;
                MutationSettlement::Committed(intent)
            }
            Err(error) => {
                if let Some(entry) = items
                    .get_mut(protocol_id)
                    .and_then(|items| items.get_mut(item))
                {
                    *entry = intent.previous;
                }
                log::warn!("[Checklist] persist failed for {protocol_id}/{item}: {error}");
                let mut intent = intent;
                intent.phase = MutationPhase::RolledBack;
                MutationSettlement::RolledBack { intent, error }
            }
        }
    }
}
