//! At-most-once-effect handler for document-update events.

use crate::ports::metadata::{MetadataStore, MetadataUpdate, TxDecision};
use crate::trigger::{entity_id_from_path, Document, EventRecord};

/// Name recorded in the `updated_by` field of every committed record.
const HANDLER_NAME: &str = "set-last-update-meta";

/// What one delivery did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The metadata record was written.
    Applied,
    /// This delivery identifier was already committed; nothing changed.
    DuplicateDelivery,
    /// The watched document no longer exists; no transaction was opened.
    MissingAfterState,
}

/// Handles one entity-update delivery.
///
/// Per entity the record is a two-state machine, `Unseen` or
/// `Processed(delivery_id)`. A delivery whose identifier equals the stored
/// one aborts inside the transaction with no writes; anything else commits
/// the denormalized fields together with the new identifier, atomically
/// with the read. An event without an after-state returns immediately and
/// never opens a transaction.
///
/// # Errors
///
/// Returns an error when the transaction fails to commit; the external
/// delivery system owns retries, which the identifier guard makes safe.
pub fn on_entity_updated(
    store: &dyn MetadataStore,
    event: &EventRecord,
) -> Result<TriggerOutcome, String> {
    let Some(after) = event.after.as_ref() else {
        return Ok(TriggerOutcome::MissingAfterState);
    };

    let update = denormalize(after, &event.delivery_id);
    let committed = store
        .transact(&event.entity_id, &mut |record| {
            let already_processed =
                record.and_then(|r| r.last_event_id.as_deref()) == Some(event.delivery_id.as_str());
            if already_processed {
                TxDecision::Abort
            } else {
                TxDecision::Write(update.clone())
            }
        })
        .map_err(|e| format!("Metadata transaction failed for {}: {e}", event.entity_id))?;

    Ok(if committed { TriggerOutcome::Applied } else { TriggerOutcome::DuplicateDelivery })
}

/// Routes a raw document path to the handler.
///
/// Paths outside the watched pattern are ignored (`None`); matching paths
/// return the handler outcome.
///
/// # Errors
///
/// Propagates transaction failures from [`on_entity_updated`].
pub fn dispatch_document_update(
    store: &dyn MetadataStore,
    path: &str,
    delivery_id: &str,
    before: Option<Document>,
    after: Option<Document>,
) -> Result<Option<TriggerOutcome>, String> {
    let Some(entity_id) = entity_id_from_path(path) else {
        return Ok(None);
    };
    let event = EventRecord {
        delivery_id: delivery_id.to_string(),
        entity_id,
        before,
        after,
    };
    on_entity_updated(store, &event).map(Some)
}

/// Picks the fields to denormalize into the metadata record.
fn denormalize(after: &Document, delivery_id: &str) -> MetadataUpdate {
    MetadataUpdate {
        last_event_id: delivery_id.to_string(),
        display_name: after.get("displayName").cloned(),
        roles: after.get("roles").cloned(),
        updated_by: HANDLER_NAME.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{FixedClock, MemoryMetadataStore};
    use serde_json::json;

    fn store() -> MemoryMetadataStore {
        MemoryMetadataStore::new(Box::new(FixedClock::default()))
    }

    fn document(display_name: &str) -> Document {
        let mut doc = Document::new();
        doc.insert("displayName".into(), json!(display_name));
        doc.insert("roles".into(), json!(["admin"]));
        doc
    }

    fn event(entity_id: &str, delivery_id: &str, after: Option<Document>) -> EventRecord {
        EventRecord {
            delivery_id: delivery_id.to_string(),
            entity_id: entity_id.to_string(),
            before: Some(document("Old Name")),
            after,
        }
    }

    #[test]
    fn first_delivery_commits_denormalized_fields() {
        let store = store();
        let outcome =
            on_entity_updated(&store, &event("u1", "evt-1", Some(document("Alice")))).unwrap();

        assert_eq!(outcome, TriggerOutcome::Applied);
        let record = store.record("u1").unwrap();
        assert_eq!(record.last_event_id.as_deref(), Some("evt-1"));
        assert_eq!(record.display_name, Some(json!("Alice")));
        assert_eq!(record.roles, Some(json!(["admin"])));
        assert_eq!(record.updated_by.as_deref(), Some(HANDLER_NAME));
        assert!(record.last_update.is_some());
    }

    #[test]
    fn duplicate_delivery_commits_exactly_one_write() {
        let store = store();
        let evt = event("u1", "evt-1", Some(document("Alice")));

        assert_eq!(on_entity_updated(&store, &evt).unwrap(), TriggerOutcome::Applied);
        let after_first = store.record("u1").unwrap();

        // Same entity id, same delivery id: the second transaction aborts.
        assert_eq!(on_entity_updated(&store, &evt).unwrap(), TriggerOutcome::DuplicateDelivery);

        assert_eq!(store.writes_committed(), 1);
        assert_eq!(store.transactions_run(), 2);
        assert_eq!(store.record("u1").unwrap(), after_first);
    }

    #[test]
    fn new_delivery_id_reprocesses_the_entity() {
        let store = store();
        on_entity_updated(&store, &event("u1", "evt-1", Some(document("Alice")))).unwrap();
        let outcome =
            on_entity_updated(&store, &event("u1", "evt-2", Some(document("Alice Smith"))))
                .unwrap();

        assert_eq!(outcome, TriggerOutcome::Applied);
        let record = store.record("u1").unwrap();
        assert_eq!(record.last_event_id.as_deref(), Some("evt-2"));
        assert_eq!(record.display_name, Some(json!("Alice Smith")));
        assert_eq!(store.writes_committed(), 2);
    }

    #[test]
    fn missing_after_state_opens_no_transaction() {
        let store = store();
        let outcome = on_entity_updated(&store, &event("u2", "evt-9", None)).unwrap();

        assert_eq!(outcome, TriggerOutcome::MissingAfterState);
        assert_eq!(store.transactions_run(), 0);
        assert_eq!(store.writes_committed(), 0);
        assert!(store.record("u2").is_none());
    }

    #[test]
    fn deliveries_for_different_entities_are_independent() {
        let store = store();
        on_entity_updated(&store, &event("u1", "evt-1", Some(document("Alice")))).unwrap();
        on_entity_updated(&store, &event("u2", "evt-1", Some(document("Bob")))).unwrap();

        assert_eq!(store.record("u1").unwrap().display_name, Some(json!("Alice")));
        assert_eq!(store.record("u2").unwrap().display_name, Some(json!("Bob")));
        assert_eq!(store.writes_committed(), 2);
    }

    #[test]
    fn commit_timestamps_come_from_the_store_clock() {
        let store = store();
        on_entity_updated(&store, &event("u1", "evt-1", Some(document("Alice")))).unwrap();
        on_entity_updated(&store, &event("u1", "evt-2", Some(document("Alice")))).unwrap();

        // FixedClock advances per commit, so the second write is later.
        let record = store.record("u1").unwrap();
        assert!(record.last_update.unwrap() > chrono::DateTime::<chrono::Utc>::UNIX_EPOCH);
    }

    #[test]
    fn dispatch_routes_only_watched_paths() {
        let store = store();
        let delivery = uuid::Uuid::new_v4().to_string();

        let routed = dispatch_document_update(
            &store,
            "user/u1",
            &delivery,
            None,
            Some(document("Alice")),
        )
        .unwrap();
        assert_eq!(routed, Some(TriggerOutcome::Applied));

        let ignored = dispatch_document_update(
            &store,
            "orders/o1",
            &delivery,
            None,
            Some(document("Alice")),
        )
        .unwrap();
        assert_eq!(ignored, None);
        assert_eq!(store.writes_committed(), 1);
    }
}
