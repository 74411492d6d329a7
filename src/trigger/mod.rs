//! Document-update trigger: event records, path routing, and the
//! idempotent handler.
//!
//! The external event source delivers change notifications at least once;
//! the handler in [`handler`] guarantees at most one *effect* per delivery
//! identifier by guarding every write with the last committed identifier.

pub mod handler;

use serde_json::Value;

/// A document body: field name to value.
pub type Document = serde_json::Map<String, Value>;

/// Document path pattern the trigger watches; the single wildcard segment
/// is the entity id.
pub const ENTITY_DOCUMENT_PATTERN: &str = "user/{userId}";

/// One delivered change notification.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    /// Identifier of this delivery attempt, unique per delivery.
    pub delivery_id: String,
    /// Entity id extracted from the wildcard path segment.
    pub entity_id: String,
    /// Document state before the change, if it existed.
    pub before: Option<Document>,
    /// Document state after the change; absent when the document was
    /// concurrently deleted.
    pub after: Option<Document>,
}

/// Extracts the wildcard segment of `path` against a one-wildcard pattern.
///
/// Returns `None` when the path does not match the pattern shape.
#[must_use]
pub fn match_wildcard(pattern: &str, path: &str) -> Option<String> {
    let pattern_segments: Vec<&str> = pattern.split('/').collect();
    let path_segments: Vec<&str> = path.split('/').collect();
    if pattern_segments.len() != path_segments.len() {
        return None;
    }

    let mut captured = None;
    for (pattern_segment, path_segment) in pattern_segments.iter().zip(&path_segments) {
        if pattern_segment.starts_with('{') && pattern_segment.ends_with('}') {
            if path_segment.is_empty() || captured.is_some() {
                return None;
            }
            captured = Some((*path_segment).to_string());
        } else if pattern_segment != path_segment {
            return None;
        }
    }
    captured
}

/// Entity id of a watched document path, if the path matches the pattern.
#[must_use]
pub fn entity_id_from_path(path: &str) -> Option<String> {
    match_wildcard(ENTITY_DOCUMENT_PATTERN, path)
}
