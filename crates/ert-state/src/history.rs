//! # Execution History
//!
//! A bounded, in-memory record of finished requests, most recent first.
//! Entries hold public data only: identifiers, hashes, status, and a
//! description built from non-private fields.
//!
//! The store is injected into the orchestrator rather than held in module
//! state, so each orchestrator (and each test) owns its own history.
//! Prepends are serialized by a mutex; beyond capacity the oldest entries
//! are evicted. Nothing is persisted beyond process lifetime.

use std::collections::VecDeque;

use ert_core::{ActionType, ErtId, Timestamp};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default number of entries kept.
pub const DEFAULT_HISTORY_CAPACITY: usize = 1_000;

/// Outcome recorded for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryStatus {
    /// Submitted, outcome not yet known.
    ///
    /// Reserved for producers that record before submission. The
    /// orchestrator records terminal outcomes only and never writes it.
    Pending,
    /// Gateway accepted the action.
    Completed,
    /// Generation, verification, or execution failed.
    Failed,
}

/// One finished request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Entry identifier (UUID v4).
    pub id: Uuid,
    /// Right the action was proven against.
    pub ert_id: ErtId,
    /// Action kind.
    pub action: ActionType,
    /// When the request finished.
    pub timestamp: Timestamp,
    /// Proof digest; absent when generation itself failed.
    pub proof_hash: Option<String>,
    /// Gateway transaction hash, when execution succeeded.
    pub tx_hash: Option<String>,
    /// Outcome.
    pub status: HistoryStatus,
    /// Public-only description.
    pub description: String,
    /// Failure message, when failed.
    pub error: Option<String>,
}

impl HistoryEntry {
    /// Entry for a request that reached the gateway and succeeded.
    pub fn completed(
        ert_id: ErtId,
        action: ActionType,
        proof_hash: String,
        tx_hash: String,
        description: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            ert_id,
            action,
            timestamp: Timestamp::now(),
            proof_hash: Some(proof_hash),
            tx_hash: Some(tx_hash),
            status: HistoryStatus::Completed,
            description,
            error: None,
        }
    }

    /// Entry for a request that failed at any stage.
    pub fn failed(
        ert_id: ErtId,
        action: ActionType,
        proof_hash: Option<String>,
        description: String,
        error: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            ert_id,
            action,
            timestamp: Timestamp::now(),
            proof_hash,
            tx_hash: None,
            status: HistoryStatus::Failed,
            description,
            error: Some(error),
        }
    }
}

/// Bounded most-recent-first history.
#[derive(Debug)]
pub struct HistoryStore {
    entries: Mutex<VecDeque<HistoryEntry>>,
    capacity: usize,
}

impl HistoryStore {
    /// Store keeping at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY))),
            capacity,
        }
    }

    /// Prepend an entry, evicting the oldest beyond capacity. Returns the
    /// entry's id.
    pub fn record(&self, entry: HistoryEntry) -> Uuid {
        let id = entry.id;
        let mut entries = self.entries.lock();
        entries.push_front(entry);
        entries.truncate(self.capacity);
        id
    }

    /// Up to `limit` entries, most recent first.
    pub fn recent(&self, limit: usize) -> Vec<HistoryEntry> {
        self.entries.lock().iter().take(limit).cloned().collect()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of entries held.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Maximum number of entries kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn entry(n: u64) -> HistoryEntry {
        HistoryEntry::completed(
            ErtId(n),
            ActionType::Swap,
            format!("0x{n:064x}"),
            format!("0x{:064x}", n + 1),
            format!("swap for ERT #{n}"),
        )
    }

    #[test]
    fn recent_is_most_recent_first() {
        let store = HistoryStore::default();
        for n in 1..=5 {
            store.record(entry(n));
        }
        let ids: Vec<u64> = store.recent(3).iter().map(|e| e.ert_id.value()).collect();
        assert_eq!(ids, vec![5, 4, 3]);
        assert_eq!(store.recent(50).len(), 5);
    }

    #[test]
    fn clear_empties() {
        let store = HistoryStore::default();
        store.record(entry(1));
        store.clear();
        assert!(store.recent(10).is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn capacity_evicts_oldest() {
        let store = HistoryStore::new(3);
        for n in 1..=5 {
            store.record(entry(n));
        }
        assert_eq!(store.len(), 3);
        let ids: Vec<u64> = store.recent(10).iter().map(|e| e.ert_id.value()).collect();
        assert_eq!(ids, vec![5, 4, 3]);
    }

    #[test]
    fn zero_capacity_keeps_one() {
        let store = HistoryStore::new(0);
        store.record(entry(1));
        store.record(entry(2));
        assert_eq!(store.len(), 1);
        assert_eq!(store.capacity(), 1);
    }

    #[test]
    fn failed_entry_without_proof_hash() {
        let store = HistoryStore::default();
        let e = HistoryEntry::failed(
            ErtId(9),
            ActionType::Perpetual,
            None,
            "perpetual for ERT #9".into(),
            "invalid address".into(),
        );
        let id = store.record(e);
        let got = store.recent(1).remove(0);
        assert_eq!(got.id, id);
        assert_eq!(got.status, HistoryStatus::Failed);
        assert!(got.proof_hash.is_none());
        assert!(got.tx_hash.is_none());
    }

    #[test]
    fn status_wire_names() {
        for (status, name) in [
            (HistoryStatus::Pending, "\"pending\""),
            (HistoryStatus::Completed, "\"completed\""),
            (HistoryStatus::Failed, "\"failed\""),
        ] {
            assert_eq!(serde_json::to_string(&status).unwrap(), name);
            assert_eq!(serde_json::from_str::<HistoryStatus>(name).unwrap(), status);
        }
    }

    #[test]
    fn concurrent_records_are_all_kept() {
        let store = Arc::new(HistoryStore::new(100));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for n in 0..10 {
                        store.record(entry(t * 10 + n));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.len(), 80);
    }
}
