//! Bounded probe result history

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::ProbeReport;

/// Immutable snapshot of one successful probe result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Creation order, 1-based and strictly increasing per ring
    pub sequence: u64,
    /// When the result settled
    pub recorded_at: DateTime<Utc>,
    /// The successful report
    pub report: ProbeReport,
}

/// Bounded, FIFO-evicting store of past successful results.
///
/// Insertion order is preserved and listings are newest-first. Once at
/// capacity, each push evicts exactly the oldest entry. Entries are never
/// deduplicated and never persisted.
#[derive(Debug)]
pub struct HistoryRing {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
    next_sequence: u64,
}

impl HistoryRing {
    /// Create a ring with the given capacity (minimum 1)
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
            next_sequence: 0,
        }
    }

    /// Record a successful report, evicting the oldest entry when full.
    ///
    /// Returns the sequence number assigned to the new entry.
    pub fn push(&mut self, report: ProbeReport) -> u64 {
        self.next_sequence += 1;
        self.entries.push_front(HistoryEntry {
            sequence: self.next_sequence,
            recorded_at: Utc::now(),
            report,
        });
        if self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
        self.next_sequence
    }

    /// All entries, newest first
    #[must_use]
    pub fn to_list(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    /// The most recent entry
    #[must_use]
    pub fn newest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Number of stored entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ring is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured capacity
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all entries. Sequence numbering continues where it left off.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for HistoryRing {
    fn default() -> Self {
        Self::with_capacity(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn report(tag: i64) -> ProbeReport {
        let mut payload = Map::new();
        payload.insert("tag".to_string(), serde_json::Value::from(tag));
        ProbeReport::ok(payload)
    }

    #[test]
    fn test_push_under_capacity() {
        let mut ring = HistoryRing::default();
        ring.push(report(1));
        ring.push(report(2));
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.newest().unwrap().sequence, 2);
    }

    #[test]
    fn test_eviction_beyond_capacity() {
        let mut ring = HistoryRing::default();
        for tag in 1..=11 {
            ring.push(report(tag));
        }
        assert_eq!(ring.len(), 10);

        let list = ring.to_list();
        // Newest first: sequences 11 down to 2; the first push is gone.
        let sequences: Vec<u64> = list.iter().map(|entry| entry.sequence).collect();
        assert_eq!(sequences, (2..=11).rev().collect::<Vec<u64>>());
        assert!(list.iter().all(|entry| entry.sequence != 1));
    }

    #[test]
    fn test_no_deduplication() {
        let mut ring = HistoryRing::with_capacity(5);
        ring.push(report(7));
        ring.push(report(7));
        assert_eq!(ring.len(), 2);
        assert_ne!(ring.to_list()[0].sequence, ring.to_list()[1].sequence);
    }

    #[test]
    fn test_capacity_floor_is_one() {
        let mut ring = HistoryRing::with_capacity(0);
        assert_eq!(ring.capacity(), 1);
        ring.push(report(1));
        ring.push(report(2));
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.newest().unwrap().sequence, 2);
    }

    #[test]
    fn test_clear_keeps_sequence_monotonic() {
        let mut ring = HistoryRing::with_capacity(3);
        ring.push(report(1));
        ring.clear();
        assert!(ring.is_empty());
        assert_eq!(ring.push(report(2)), 2);
    }
}
