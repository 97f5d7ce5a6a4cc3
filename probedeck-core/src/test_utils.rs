//! Test helper module
//!
//! Scripted mock implementations of the transport and checklist traits.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::sleep;

use crate::error::ProbeResult;
use crate::traits::{ChecklistSnapshot, ChecklistStore, ProbeTransport};
use crate::types::{ProbeReport, ProbeRequest};

struct Scripted<T> {
    delay_ms: u64,
    result: T,
}

// ===== MockTransport =====

/// Records every dispatched request and answers from a scripted FIFO queue.
///
/// An empty queue answers with an empty successful report. Delays use the
/// tokio clock, so `start_paused` tests control settlement order exactly.
pub struct MockTransport {
    responses: RwLock<VecDeque<Scripted<ProbeResult<ProbeReport>>>>,
    dispatched: RwLock<Vec<ProbeRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(VecDeque::new()),
            dispatched: RwLock::new(Vec::new()),
        }
    }

    /// Queue a response answered immediately
    pub async fn enqueue(&self, result: ProbeResult<ProbeReport>) {
        self.enqueue_delayed(0, result).await;
    }

    /// Queue a response answered after a simulated delay
    pub async fn enqueue_delayed(&self, delay_ms: u64, result: ProbeResult<ProbeReport>) {
        self.responses
            .write()
            .await
            .push_back(Scripted { delay_ms, result });
    }

    /// Every request dispatched so far, in order
    pub async fn dispatched(&self) -> Vec<ProbeRequest> {
        self.dispatched.read().await.clone()
    }

    pub async fn dispatch_count(&self) -> usize {
        self.dispatched.read().await.len()
    }
}

#[async_trait]
impl ProbeTransport for MockTransport {
    async fn dispatch(&self, request: &ProbeRequest) -> ProbeResult<ProbeReport> {
        self.dispatched.write().await.push(request.clone());
        let scripted = self.responses.write().await.pop_front();
        match scripted {
            Some(scripted) => {
                if scripted.delay_ms > 0 {
                    sleep(Duration::from_millis(scripted.delay_ms)).await;
                }
                scripted.result
            }
            None => Ok(ProbeReport::ok(serde_json::Map::new())),
        }
    }
}

// ===== MockChecklistStore =====

/// In-memory checklist store with scripted persistence outcomes.
pub struct MockChecklistStore {
    seeded: RwLock<ChecklistSnapshot>,
    outcomes: RwLock<VecDeque<Scripted<ProbeResult<()>>>>,
    persisted: RwLock<Vec<(String, String, bool)>>,
}

impl MockChecklistStore {
    pub fn new() -> Self {
        Self {
            seeded: RwLock::new(ChecklistSnapshot::new()),
            outcomes: RwLock::new(VecDeque::new()),
            persisted: RwLock::new(Vec::new()),
        }
    }

    /// Pre-populate the state `load_all` returns
    pub async fn seed(&self, protocol_id: &str, item: &str, checked: bool) {
        self.seeded
            .write()
            .await
            .entry(protocol_id.to_string())
            .or_default()
            .insert(item.to_string(), checked);
    }

    /// Queue a persistence outcome answered immediately
    pub async fn enqueue_persist(&self, result: ProbeResult<()>) {
        self.enqueue_persist_delayed(0, result).await;
    }

    /// Queue a persistence outcome answered after a simulated delay
    pub async fn enqueue_persist_delayed(&self, delay_ms: u64, result: ProbeResult<()>) {
        self.outcomes
            .write()
            .await
            .push_back(Scripted { delay_ms, result });
    }

    /// Every persistence call recorded so far, in order
    pub async fn persisted(&self) -> Vec<(String, String, bool)> {
        self.persisted.read().await.clone()
    }
}

#[async_trait]
impl ChecklistStore for MockChecklistStore {
    async fn load_all(&self) -> ProbeResult<ChecklistSnapshot> {
        Ok(self.seeded.read().await.clone())
    }

    async fn persist(&self, protocol_id: &str, item: &str, checked: bool) -> ProbeResult<()> {
        self.persisted.write().await.push((
            protocol_id.to_string(),
            item.to_string(),
            checked,
        ));
        let scripted = self.outcomes.write().await.pop_front();
        match scripted {
            Some(scripted) => {
                if scripted.delay_ms > 0 {
                    sleep(Duration::from_millis(scripted.delay_ms)).await;
                }
                scripted.result
            }
            None => Ok(()),
        }
    }
}
