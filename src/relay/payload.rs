//! Client payload parsing.
//!
//! Fields are checked for presence and JSON type only; their values are
//! passed upstream untouched.

use serde_json::Value;

use crate::relay::error::RelayResult;

/// Parse a client body as JSON.
pub fn parse_payload(body: &[u8]) -> RelayResult<Value> {
    Ok(serde_json::from_slice(body)?)
}

/// A non-empty string field.
pub fn non_empty_str<'a>(payload: &'a Value, field: &str) -> Option<&'a str> {
    payload
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// An array field (possibly empty).
pub fn array<'a>(payload: &'a Value, field: &str) -> Option<&'a Vec<Value>> {
    payload.get(field).and_then(Value::as_array)
}
