//! Firestore typed values
//!
//! Firestore wraps every field in a single-key object naming its type
//! (`{"stringValue": "x"}`, `{"integerValue": "42"}`, ...). These helpers
//! convert between that encoding and plain JSON.

use serde_json::{Map, Number, Value};

use crate::error::StoreError;

pub fn encode(value: &Value) -> Value {
    let (kind, inner) = match value {
        Value::Null => ("nullValue", Value::Null),
        Value::Bool(b) => ("booleanValue", Value::Bool(*b)),
        Value::Number(n) if n.is_i64() || n.is_u64() => ("integerValue", Value::String(n.to_string())),
        Value::Number(n) => ("doubleValue", Value::Number(n.clone())),
        Value::String(s) => ("stringValue", Value::String(s.clone())),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode).collect();
            ("arrayValue", serde_json::json!({ "values": values }))
        }
        Value::Object(map) => ("mapValue", serde_json::json!({ "fields": encode_fields(map) })),
    };
    let mut wrapper = Map::new();
    wrapper.insert(kind.to_string(), inner);
    Value::Object(wrapper)
}

pub fn encode_fields(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter().map(|(k, v)| (k.clone(), encode(v))).collect()
}

pub fn decode(value: &Value) -> Result<Value, StoreError> {
    let wrapper = value
        .as_object()
        .filter(|o| o.len() == 1)
        .ok_or_else(|| StoreError::Decode(format!("not a typed value: {}", value)))?;
    let (kind, inner) = wrapper
        .iter()
        .next()
        .ok_or_else(|| StoreError::Decode("empty typed value".to_string()))?;

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => Ok(inner.clone()),
        "integerValue" => {
            // int64 is sent as a decimal string
            let n = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                Value::Number(n) => n.as_i64(),
                _ => None,
            };
            n.map(|n| Value::Number(n.into()))
                .ok_or_else(|| StoreError::Decode(format!("bad integer: {}", inner)))
        }
        "doubleValue" => inner
            .as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| StoreError::Decode(format!("bad double: {}", inner))),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => Ok(inner.clone()),
        "arrayValue" => {
            let values = match inner.get("values") {
                Some(Value::Array(values)) => values.iter().map(decode).collect::<Result<Vec<_>, _>>()?,
                _ => Vec::new(),
            };
            Ok(Value::Array(values))
        }
        "mapValue" => {
            let fields = match inner.get("fields") {
                Some(Value::Object(fields)) => decode_fields(fields)?,
                _ => Map::new(),
            };
            Ok(Value::Object(fields))
        }
        "geoPointValue" => Ok(inner.clone()),
        other => Err(StoreError::Decode(format!("unknown value type {}", other))),
    }
}

pub fn decode_fields(fields: &Map<String, Value>) -> Result<Map<String, Value>, StoreError> {
    fields
        .iter()
        .map(|(k, v)| decode(v).map(|v| (k.clone(), v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_scalars() {
        assert_eq!(encode(&json!("a")), json!({"stringValue": "a"}));
        assert_eq!(encode(&json!(42)), json!({"integerValue": "42"}));
        assert_eq!(encode(&json!(4.5)), json!({"doubleValue": 4.5}));
        assert_eq!(encode(&json!(true)), json!({"booleanValue": true}));
        assert_eq!(encode(&Value::Null), json!({"nullValue": null}));
    }

    #[test]
    fn test_profile_document_decodes() {
        let fields = json!({
            "uid": {"stringValue": "u1"},
            "email": {"nullValue": null},
            "display_name": {"stringValue": "ada"},
            "tags": {"arrayValue": {"values": [{"stringValue": "vegan"}, {"integerValue": "3"}]}},
            "empty": {"arrayValue": {}},
            "nested": {"mapValue": {"fields": {"rating": {"doubleValue": 4.5}}}},
            "created": {"timestampValue": "2024-01-01T00:00:00Z"}
        });
        let decoded = decode_fields(fields.as_object().unwrap()).unwrap();
        assert_eq!(
            Value::Object(decoded),
            json!({
                "uid": "u1",
                "email": null,
                "display_name": "ada",
                "tags": ["vegan", 3],
                "empty": [],
                "nested": {"rating": 4.5},
                "created": "2024-01-01T00:00:00Z"
            })
        );
    }

    #[test]
    fn test_nested_encoding_decodes_back() {
        let original = json!({"name": "Soup", "steps": ["boil", "serve"], "meta": {"minutes": 20}});
        let encoded = encode_fields(original.as_object().unwrap());
        let decoded = decode_fields(&encoded).unwrap();
        assert_eq!(Value::Object(decoded), original);
    }

    #[test]
    fn test_rejects_untyped_value() {
        assert!(decode(&json!("plain")).is_err());
        assert!(decode(&json!({"mysteryValue": 1})).is_err());
        assert!(decode(&json!({"integerValue": "x"})).is_err());
    }
}
