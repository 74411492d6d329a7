//! Metadata-store port — boundary to the transactional record store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Denormalized metadata for one entity, keyed by entity id in the store.
///
/// `last_event_id` always reflects the most recently *committed* delivery;
/// a duplicate delivery must leave every other field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Delivery identifier of the last committed event.
    pub last_event_id: Option<String>,
    /// Commit timestamp, assigned by the store — never by the handler clock.
    pub last_update: Option<DateTime<Utc>>,
    /// Denormalized display name from the watched document.
    pub display_name: Option<Value>,
    /// Denormalized roles from the watched document.
    pub roles: Option<Value>,
    /// Name of the handler that wrote the record.
    pub updated_by: Option<String>,
}

/// Fields written on a successful transition; the store supplies the
/// commit timestamp itself.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataUpdate {
    /// Delivery identifier being committed.
    pub last_event_id: String,
    /// Denormalized display name.
    pub display_name: Option<Value>,
    /// Denormalized roles.
    pub roles: Option<Value>,
    /// Name of the writing handler.
    pub updated_by: String,
}

/// Outcome of a transaction body: abort without writes, or commit an update.
#[derive(Debug, Clone, PartialEq)]
pub enum TxDecision {
    /// Leave the record untouched.
    Abort,
    /// Commit the update atomically with the read.
    Write(MetadataUpdate),
}

/// Transactional store for [`MetadataRecord`]s.
///
/// Implementations must serialize concurrent transactions for the same
/// entity id; the handler performs no in-process locking of its own.
pub trait MetadataStore: Send + Sync {
    /// Runs a read-then-decide transaction for one entity.
    ///
    /// `body` receives the current record (if any) and decides whether to
    /// write; read and write happen atomically. Returns `true` when a write
    /// was committed.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails to commit. Such failures
    /// are left to the external delivery system's retry mechanism.
    fn transact(
        &self,
        entity_id: &str,
        body: &mut dyn FnMut(Option<&MetadataRecord>) -> TxDecision,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}
