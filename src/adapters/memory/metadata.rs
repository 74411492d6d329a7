//! In-memory transactional metadata store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::ports::clock::Clock;
use crate::ports::metadata::{MetadataRecord, MetadataStore, TxDecision};

/// Metadata store backed by a mutex-guarded map.
///
/// Holding the map lock for the whole read-then-write gives the serializable
/// per-entity isolation the handler relies on. Transaction and write counts
/// are tracked so tests can assert the at-most-once-effect property.
pub struct MemoryMetadataStore {
    records: Mutex<HashMap<String, MetadataRecord>>,
    clock: Box<dyn Clock>,
    transactions: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryMetadataStore {
    /// Creates an empty store stamping commits from the given clock.
    #[must_use]
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            clock,
            transactions: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    /// Returns the record for an entity, if any.
    #[must_use]
    pub fn record(&self, entity_id: &str) -> Option<MetadataRecord> {
        self.records.lock().unwrap().get(entity_id).cloned()
    }

    /// Number of transactions opened so far.
    #[must_use]
    pub fn transactions_run(&self) -> usize {
        self.transactions.load(Ordering::SeqCst)
    }

    /// Number of writes committed so far.
    #[must_use]
    pub fn writes_committed(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl MetadataStore for MemoryMetadataStore {
    fn transact(
        &self,
        entity_id: &str,
        body: &mut dyn FnMut(Option<&MetadataRecord>) -> TxDecision,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let mut records = self.records.lock().unwrap();
        self.transactions.fetch_add(1, Ordering::SeqCst);

        match body(records.get(entity_id)) {
            TxDecision::Abort => Ok(false),
            TxDecision::Write(update) => {
                let record = MetadataRecord {
                    last_event_id: Some(update.last_event_id),
                    // Commit time comes from the store clock, not the caller.
                    last_update: Some(self.clock.now()),
                    display_name: update.display_name,
                    roles: update.roles,
                    updated_by: Some(update.updated_by),
                };
                records.insert(entity_id.to_string(), record);
                self.writes.fetch_add(1, Ordering::SeqCst);
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::FixedClock;
    use crate::ports::metadata::MetadataUpdate;

    fn store() -> MemoryMetadataStore {
        MemoryMetadataStore::new(Box::new(FixedClock::default()))
    }

    #[test]
    fn abort_commits_nothing() {
        let store = store();
        let committed = store.transact("u1", &mut |_| TxDecision::Abort).unwrap();
        assert!(!committed);
        assert_eq!(store.transactions_run(), 1);
        assert_eq!(store.writes_committed(), 0);
        assert!(store.record("u1").is_none());
    }

    #[test]
    fn write_stamps_commit_time_from_store_clock() {
        let store = store();
        store
            .transact("u1", &mut |_| {
                TxDecision::Write(MetadataUpdate {
                    last_event_id: "evt-1".into(),
                    display_name: None,
                    roles: None,
                    updated_by: "test".into(),
                })
            })
            .unwrap();

        let record = store.record("u1").unwrap();
        assert_eq!(record.last_event_id.as_deref(), Some("evt-1"));
        assert!(record.last_update.is_some());
        assert_eq!(store.writes_committed(), 1);
    }
}
