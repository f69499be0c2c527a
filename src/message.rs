use crate::error::Result;
use serde::Serialize;
use serde_json::Value;

/// A keyed message ready to be handed to a producer.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingMessage {
    pub key:     Option<String>,
    pub payload: String,
}

impl OutgoingMessage {
    /// Builds the message for one record. The whole record becomes the payload,
    /// the value under `key_field` becomes the key.
    pub fn from_record(record: &Value, key_field: &str) -> Result<Self> {
        Ok(OutgoingMessage {
            key:     key_of(record, key_field),
            payload: serde_json::to_string(record)?,
        })
    }
}

/// String form of `record[key_field]`. Strings are taken verbatim, anything
/// else as compact json. `None` when the field is absent or null.
pub fn key_of(record: &Value, key_field: &str) -> Option<String> {
    match record.get(key_field)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

pub fn build_batch(records: &[Value], key_field: &str) -> Result<Vec<OutgoingMessage>> {
    records.iter().map(|record| OutgoingMessage::from_record(record, key_field)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_key_and_literal_payload() {
        let record = json!({"id": "A1", "name": "x"});
        let msg = OutgoingMessage::from_record(&record, "id").unwrap();
        assert_eq!(msg.key.as_deref(), Some("A1"));
        assert_eq!(msg.payload, r#"{"id":"A1","name":"x"}"#);
    }

    #[test]
    fn payload_keeps_field_order() {
        let record: Value = serde_json::from_str(r#"{"z": 1, "id": 7, "a": [true, null]}"#).unwrap();
        let msg = OutgoingMessage::from_record(&record, "id").unwrap();
        assert_eq!(msg.payload, r#"{"z":1,"id":7,"a":[true,null]}"#);
        let back: Value = serde_json::from_str(&msg.payload).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn non_string_keys_use_json_text() {
        assert_eq!(key_of(&json!({"id": 42}), "id").as_deref(), Some("42"));
        assert_eq!(key_of(&json!({"id": true}), "id").as_deref(), Some("true"));
        assert_eq!(key_of(&json!({"id": {"a": 1}}), "id").as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn missing_or_null_key_is_none() {
        assert_eq!(key_of(&json!({"name": "x"}), "id"), None);
        assert_eq!(key_of(&json!({"id": null}), "id"), None);
        assert_eq!(key_of(&json!([1, 2]), "id"), None);
    }

    #[test]
    fn batch_has_one_message_per_record() {
        let records = vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})];
        let batch = build_batch(&records, "id").unwrap();
        assert_eq!(batch.len(), records.len());
        assert_eq!(batch[2].key.as_deref(), Some("3"));
    }
}
