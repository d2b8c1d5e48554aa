use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::{Message, MessageId, ReplyRef};

/// A message record as the remote collection holds it: a document id plus
/// an arbitrary JSON body. Nothing about the body shape is trusted until
/// [`validate`] has accepted it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: String,
    pub data: Value,
}

impl RawRecord {
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

/// Why a raw record was rejected on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("text is missing or not a string")]
    InvalidText,
    #[error("created_at is missing or not a store-assigned timestamp")]
    InvalidTimestamp,
}

/// Validate a raw record into a renderable [`Message`].
///
/// Two hard checks: `text` must be a JSON string and `created_at` must
/// parse as an RFC 3339 timestamp. Records failing either are excluded
/// from view state entirely. Author fields default to empty strings when
/// absent or of the wrong type, and a malformed `reply_to` degrades to
/// `None` rather than rejecting the record.
pub fn validate(raw: &RawRecord) -> Result<Message, RecordError> {
    let text = raw
        .data
        .get("text")
        .and_then(Value::as_str)
        .ok_or(RecordError::InvalidText)?;

    let created_at = raw
        .data
        .get("created_at")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
        .ok_or(RecordError::InvalidTimestamp)?;

    Ok(Message {
        id: MessageId(raw.id.clone()),
        text: text.to_string(),
        created_at,
        author_id: string_field(&raw.data, "uid"),
        author_name: string_field(&raw.data, "display_name"),
        author_avatar: string_field(&raw.data, "avatar_url"),
        reply_to: reply_field(&raw.data),
    })
}

fn string_field(data: &Value, key: &str) -> String {
    data.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn reply_field(data: &Value) -> Option<ReplyRef> {
    let obj = data.get("reply_to")?;
    let message_id = obj.get("message_id").and_then(Value::as_str)?;
    let text = obj.get("text").and_then(Value::as_str)?;
    Some(ReplyRef {
        message_id: MessageId(message_id.to_string()),
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(data: Value) -> RawRecord {
        RawRecord::new("m1", data)
    }

    #[test]
    fn accepts_complete_record() {
        let raw = record(json!({
            "text": "hello",
            "created_at": "2024-05-12T14:30:00Z",
            "uid": "u1",
            "display_name": "Ann",
            "avatar_url": "https://example.com/a.png",
        }));

        let msg = validate(&raw).unwrap();
        assert_eq!(msg.id, MessageId::from("m1"));
        assert_eq!(msg.text, "hello");
        assert_eq!(msg.author_id, "u1");
        assert_eq!(msg.author_name, "Ann");
        assert!(msg.reply_to.is_none());
    }

    #[test]
    fn rejects_missing_text() {
        let raw = record(json!({ "created_at": "2024-05-12T14:30:00Z" }));
        assert_eq!(validate(&raw), Err(RecordError::InvalidText));
    }

    #[test]
    fn rejects_non_string_text() {
        let raw = record(json!({ "text": 42, "created_at": "2024-05-12T14:30:00Z" }));
        assert_eq!(validate(&raw), Err(RecordError::InvalidText));
    }

    #[test]
    fn rejects_missing_or_garbage_timestamp() {
        let raw = record(json!({ "text": "hi" }));
        assert_eq!(validate(&raw), Err(RecordError::InvalidTimestamp));

        let raw = record(json!({ "text": "hi", "created_at": "yesterday" }));
        assert_eq!(validate(&raw), Err(RecordError::InvalidTimestamp));
    }

    #[test]
    fn mistyped_author_fields_default_to_empty() {
        let raw = record(json!({
            "text": "hi",
            "created_at": "2024-05-12T14:30:00Z",
            "uid": 7,
            "display_name": null,
        }));

        let msg = validate(&raw).unwrap();
        assert_eq!(msg.author_id, "");
        assert_eq!(msg.author_name, "");
        assert_eq!(msg.author_avatar, "");
    }

    #[test]
    fn well_formed_reply_is_kept() {
        let raw = record(json!({
            "text": "agreed",
            "created_at": "2024-05-12T14:31:00Z",
            "reply_to": { "message_id": "m0", "text": "hello" },
        }));

        let msg = validate(&raw).unwrap();
        let reply = msg.reply_to.unwrap();
        assert_eq!(reply.message_id, MessageId::from("m0"));
        assert_eq!(reply.text, "hello");
    }

    #[test]
    fn malformed_reply_degrades_to_none() {
        let raw = record(json!({
            "text": "agreed",
            "created_at": "2024-05-12T14:31:00Z",
            "reply_to": { "message_id": 9 },
        }));

        assert!(validate(&raw).unwrap().reply_to.is_none());
    }
}
