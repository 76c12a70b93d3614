//! Compact, order-preserving JSON for header and claims segments
//!
//! Objects keep caller insertion order (`serde_json` is built with
//! `preserve_order`), and output carries no whitespace, so encoding the same
//! logical content twice yields identical bytes.

use crate::error::{JwtError, JwtResult};
use serde::Serialize;
use serde_json::{Map, Value};

/// Serialize a JSON object compactly.
///
/// # Errors
/// `UnsupportedValueType` if serialization fails.
pub fn encode_object(object: &Map<String, Value>) -> JwtResult<Vec<u8>> {
    serde_json::to_vec(object).map_err(|e| JwtError::UnsupportedValueType(e.to_string()))
}

/// Convert any serializable value into a JSON object.
///
/// # Errors
/// `UnsupportedValueType` when the value does not serialize (for example a map
/// with non-string keys) or serializes to something other than an object.
pub fn to_object<T: Serialize + ?Sized>(value: &T) -> JwtResult<Map<String, Value>> {
    match serde_json::to_value(value) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(other) => Err(JwtError::UnsupportedValueType(format!(
            "expected a JSON object, got {}",
            kind_of(&other)
        ))),
        Err(e) => Err(JwtError::UnsupportedValueType(e.to_string())),
    }
}

/// Parse bytes as a JSON object.
///
/// # Errors
/// `MalformedJson` when the bytes are not JSON or the top level is not an object.
pub fn decode_object(bytes: &[u8]) -> JwtResult<Map<String, Value>> {
    match serde_json::from_slice(bytes) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(other) => Err(JwtError::MalformedJson(format!(
            "expected a JSON object, got {}",
            kind_of(&other)
        ))),
        Err(e) => Err(JwtError::MalformedJson(e.to_string())),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
