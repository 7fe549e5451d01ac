//! Domain types for the harvest event log.
//!
//! Events are opaque JSON objects; the only field this tool interprets is
//! `id`, which the remote feed emits as a numeric string. Everything else
//! rides along verbatim as one compact JSON line.

use std::fmt;

use serde_json::Value;

use crate::error::DataError;

// ---------------------------------------------------------------------------
// EventId
// ---------------------------------------------------------------------------

/// A strongly-typed event identifier.
///
/// Precondition inherited from the remote feed's id allocator: ids are
/// monotonically increasing with recency, so a strictly greater id denotes
/// a strictly newer event. This tool cannot verify the assumption; the
/// synchronizer's early pagination stop is only correct under it.
///
/// Comparison is always numeric. The feed emits ids as decimal strings
/// whose digit count grows over time, so string comparison would order
/// `"999"` after `"1000"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for EventId {
    fn from(n: u64) -> Self {
        Self(n)
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// One activity event: the extracted id plus the raw record.
///
/// `raw` is a single compact JSON object with no embedded newline — exactly
/// the line that gets appended to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: EventId,
    pub raw: String,
}

impl Event {
    /// Build an event from a decoded feed element, keeping the payload
    /// verbatim as a compact JSON line.
    pub fn from_value(value: &Value) -> Result<Self, DataError> {
        let id = extract_id(value)?;
        let raw = serde_json::to_string(value)?;
        Ok(Self { id, raw })
    }

    /// Parse one line of the log back into an event.
    pub fn from_json_line(line: &str) -> Result<Self, DataError> {
        let value: Value = serde_json::from_str(line)?;
        let id = extract_id(&value)?;
        Ok(Self {
            id,
            raw: line.trim().to_owned(),
        })
    }
}

/// Pull the numeric id out of an event object. Accepts the feed's native
/// numeric-string form and, for robustness, a plain JSON number.
fn extract_id(value: &Value) -> Result<EventId, DataError> {
    let id = value.get("id").ok_or(DataError::MissingId)?;
    match id {
        Value::String(s) => s
            .parse::<u64>()
            .map(EventId)
            .map_err(|_| DataError::BadId { value: s.clone() }),
        Value::Number(n) => n.as_u64().map(EventId).ok_or_else(|| DataError::BadId {
            value: n.to_string(),
        }),
        other => Err(DataError::BadId {
            value: other.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// FetchPage
// ---------------------------------------------------------------------------

/// One bounded response unit from the remote feed's pagination mechanism,
/// in the feed's native descending-id order (newest first). An empty page
/// means the feed is exhausted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchPage {
    pub events: Vec<Event>,
}

impl FetchPage {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_numeric_string_id() {
        let event = Event::from_value(&json!({"id": "12345", "type": "Push"})).unwrap();
        assert_eq!(event.id, EventId(12345));
    }

    #[test]
    fn extracts_plain_number_id() {
        let event = Event::from_value(&json!({"id": 7})).unwrap();
        assert_eq!(event.id, EventId(7));
    }

    #[test]
    fn raw_is_compact_single_line() {
        let event = Event::from_value(&json!({"id": "1", "payload": {"k": "v"}})).unwrap();
        assert!(!event.raw.contains('\n'));
        // The raw line must round-trip to the same value.
        let reparsed: Value = serde_json::from_str(&event.raw).unwrap();
        assert_eq!(reparsed["payload"]["k"], "v");
    }

    #[test]
    fn missing_id_is_rejected() {
        let err = Event::from_value(&json!({"type": "Push"})).unwrap_err();
        assert!(matches!(err, DataError::MissingId));
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        let err = Event::from_value(&json!({"id": "abc123"})).unwrap_err();
        assert!(matches!(err, DataError::BadId { .. }));
    }

    #[test]
    fn from_json_line_preserves_the_line_verbatim() {
        let line = r#"{"id":"42","actor":{"login":"me"}}"#;
        let event = Event::from_json_line(line).unwrap();
        assert_eq!(event.id, EventId(42));
        assert_eq!(event.raw, line);
    }

    #[test]
    fn from_json_line_rejects_garbage() {
        assert!(matches!(
            Event::from_json_line("not json").unwrap_err(),
            DataError::Json(_)
        ));
    }

    #[test]
    fn ids_compare_numerically_not_lexically() {
        // "999" > "1000" lexically; numerically the order is reversed.
        let older = Event::from_json_line(r#"{"id":"999"}"#).unwrap();
        let newer = Event::from_json_line(r#"{"id":"1000"}"#).unwrap();
        assert!(newer.id > older.id);
    }
}
