//! Envelope unwrapping and list-shape normalization
//!
//! The API wraps responses in `{ success, message?, data }`. List payloads
//! are less disciplined: depending on the endpoint's vintage they arrive as a
//! bare array, under `data`, or under a collection-named field. All three
//! normalize identically here; anything else is a loud [`ApiError::Decode`]
//! rather than a silent empty list.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::remote::error::ApiError;

/// The conventional success envelope
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub data: Option<Value>,
}

/// Strip the envelope from a response body, honoring `success`.
///
/// Bodies that are not enveloped at all (bare payloads) pass through.
pub fn unwrap_envelope(body: Value) -> Result<Value, ApiError> {
    let is_envelope = body
        .as_object()
        .is_some_and(|o| o.contains_key("success"));

    if !is_envelope {
        return Ok(body);
    }

    let envelope: Envelope = serde_json::from_value(body)
        .map_err(|e| ApiError::Decode(format!("malformed envelope: {}", e)))?;

    if !envelope.success {
        return Err(ApiError::rejected_or_default(envelope.message));
    }

    Ok(envelope.data.unwrap_or(Value::Null))
}

/// Decode a collection payload into typed records.
///
/// Accepted shapes, in order:
///   - a bare array
///   - `{ "data": [...] }`
///   - `{ "<collection>": [...] }` (e.g. `{ "projects": [...] }`)
pub fn decode_list<T: DeserializeOwned>(
    payload: Value,
    collection: &str,
) -> Result<Vec<T>, ApiError> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut obj) => {
            let nested = obj.remove("data").or_else(|| obj.remove(collection));
            match nested {
                Some(Value::Array(items)) => items,
                Some(other) => {
                    return Err(ApiError::Decode(format!(
                        "expected an array for '{}', got {}",
                        collection,
                        kind_of(&other)
                    )))
                }
                None => {
                    return Err(ApiError::Decode(format!(
                        "no '{}' or 'data' field in object payload",
                        collection
                    )))
                }
            }
        }
        Value::Null => Vec::new(),
        other => {
            return Err(ApiError::Decode(format!(
                "expected a list payload for '{}', got {}",
                collection,
                kind_of(&other)
            )))
        }
    };

    items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item)
                .map_err(|e| ApiError::Decode(format!("bad {} record: {}", collection, e)))
        })
        .collect()
}

/// Decode a single-record payload
pub fn decode_item<T: DeserializeOwned>(payload: Value, what: &str) -> Result<T, ApiError> {
    serde_json::from_value(payload)
        .map_err(|e| ApiError::Decode(format!("bad {} record: {}", what, e)))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Project;
    use serde_json::json;

    fn project_json() -> Value {
        json!({
            "id": "p1",
            "name": "Sky Gardens",
            "developer": "Meridian Builders",
            "reraNumber": "P52100012345",
            "isActive": true
        })
    }

    #[test]
    fn test_three_list_shapes_normalize_identically() {
        let bare = json!([project_json()]);
        let wrapped = json!({ "data": [project_json()] });
        let named = json!({ "projects": [project_json()] });

        let a: Vec<Project> = decode_list(bare, "projects").unwrap();
        let b: Vec<Project> = decode_list(wrapped, "projects").unwrap();
        let c: Vec<Project> = decode_list(named, "projects").unwrap();

        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].name, "Sky Gardens");
    }

    #[test]
    fn test_unknown_shape_fails_loudly() {
        let odd = json!({ "items": [project_json()] });
        let err = decode_list::<Project>(odd, "projects").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));

        let scalar = json!(42);
        assert!(matches!(
            decode_list::<Project>(scalar, "projects").unwrap_err(),
            ApiError::Decode(_)
        ));
    }

    #[test]
    fn test_null_payload_is_an_empty_list() {
        let items: Vec<Project> = decode_list(Value::Null, "projects").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_envelope_success_unwraps_data() {
        let body = json!({ "success": true, "data": { "ok": 1 } });
        assert_eq!(unwrap_envelope(body).unwrap(), json!({ "ok": 1 }));
    }

    #[test]
    fn test_envelope_failure_carries_remote_message() {
        let body = json!({ "success": false, "message": "name already taken" });
        match unwrap_envelope(body).unwrap_err() {
            ApiError::Rejected(msg) => assert_eq!(msg, "name already taken"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_envelope_failure_without_message_gets_fallback() {
        let body = json!({ "success": false });
        match unwrap_envelope(body).unwrap_err() {
            ApiError::Rejected(msg) => assert_eq!(msg, "operation failed"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unenveloped_body_passes_through() {
        let body = json!([1, 2, 3]);
        assert_eq!(unwrap_envelope(body.clone()).unwrap(), body);
    }
}
