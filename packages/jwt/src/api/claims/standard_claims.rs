//! JWT claims set with accessors for the registered claims

use crate::codec::json;
use crate::error::{JwtError, JwtResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Registered claim names from RFC 7519 §4.1
pub const REGISTERED_CLAIMS: [&str; 7] = ["iss", "sub", "aud", "exp", "nbf", "iat", "jti"];

/// A JWT claims set.
///
/// An ordered JSON object: claims keep the order they were inserted in, so
/// signing the same set twice produces the same payload bytes. Claims other
/// than the registered ones pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

/// Read a NumericDate, truncating fractional seconds.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn numeric_date(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|secs| secs.floor() as i64))
}

impl Claims {
    /// Empty claims set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize any object-shaped value into a claims set.
    ///
    /// # Errors
    /// `UnsupportedValueType` if `value` does not serialize to a JSON object.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> JwtResult<Self> {
        json::to_object(value).map(Self)
    }

    /// Parse claims from JSON text.
    ///
    /// # Errors
    /// `MalformedJson` if `text` is not a JSON object.
    pub fn from_json(text: &str) -> JwtResult<Self> {
        json::decode_object(text.as_bytes()).map(Self)
    }

    /// Deserialize the claims into a caller type.
    ///
    /// # Errors
    /// `InvalidClaim` if the claims do not fit `T`.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> JwtResult<T> {
        T::deserialize(&Value::Object(self.0.clone()))
            .map_err(|e| JwtError::invalid_claim(format!("claims do not match target type: {e}")))
    }

    /// Raw claim value
    #[inline]
    #[must_use]
    pub fn get(&self, claim: &str) -> Option<&Value> {
        self.0.get(claim)
    }

    /// Whether `claim` is present (a `null` value counts as present)
    #[inline]
    #[must_use]
    pub fn contains(&self, claim: &str) -> bool {
        self.0.contains_key(claim)
    }

    /// Insert or replace a claim, returning the previous value
    pub fn insert(&mut self, claim: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(claim.into(), value)
    }

    /// Remove a claim, keeping the order of the rest
    pub fn remove(&mut self, claim: &str) -> Option<Value> {
        self.0.shift_remove(claim)
    }

    /// Number of claims
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Claims in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Borrow the underlying object
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Take the underlying object
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Subject (`sub`)
    #[inline]
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.get("sub").and_then(Value::as_str)
    }

    /// Issuer (`iss`)
    #[inline]
    #[must_use]
    pub fn issuer(&self) -> Option<&str> {
        self.get("iss").and_then(Value::as_str)
    }

    /// Audience (`aud`), whether it was a single string or an array
    #[must_use]
    pub fn audience(&self) -> Vec<&str> {
        match self.get("aud") {
            Some(Value::String(aud)) => vec![aud.as_str()],
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Expiration time (`exp`), Unix seconds
    #[inline]
    #[must_use]
    pub fn expiration(&self) -> Option<i64> {
        self.get("exp").and_then(numeric_date)
    }

    /// Not-before time (`nbf`), Unix seconds
    #[inline]
    #[must_use]
    pub fn not_before(&self) -> Option<i64> {
        self.get("nbf").and_then(numeric_date)
    }

    /// Issued-at time (`iat`), Unix seconds
    #[inline]
    #[must_use]
    pub fn issued_at(&self) -> Option<i64> {
        self.get("iat").and_then(numeric_date)
    }

    /// JWT ID (`jti`)
    #[inline]
    #[must_use]
    pub fn jwt_id(&self) -> Option<&str> {
        self.get("jti").and_then(Value::as_str)
    }

    /// Custom claim as string
    #[must_use]
    pub fn custom_string(&self, claim: &str) -> Option<&str> {
        self.get(claim).and_then(Value::as_str)
    }

    /// Custom claim as integer
    #[must_use]
    pub fn custom_number(&self, claim: &str) -> Option<i64> {
        self.get(claim).and_then(Value::as_i64)
    }

    /// Custom claim as boolean
    #[must_use]
    pub fn custom_bool(&self, claim: &str) -> Option<bool> {
        self.get(claim).and_then(Value::as_bool)
    }

    /// Claims that are not registered claim names
    pub fn custom_claims(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0
            .iter()
            .filter(|(name, _)| !REGISTERED_CLAIMS.contains(&name.as_str()))
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Claims> for Map<String, Value> {
    fn from(claims: Claims) -> Self {
        claims.0
    }
}

impl TryFrom<Value> for Claims {
    type Error = JwtError;

    fn try_from(value: Value) -> JwtResult<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(JwtError::UnsupportedValueType(format!(
                "claims must be a JSON object, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Session {
        sub: String,
        exp: i64,
        role: String,
    }

    #[test]
    fn registered_accessors() {
        let claims = Claims::from_json(
            r#"{"iss":"auth","sub":"alice","aud":["api","admin"],"exp":1700000100.75,"nbf":1700000000,"iat":1700000000,"jti":"j1"}"#,
        )
        .expect("object");
        assert_eq!(claims.issuer(), Some("auth"));
        assert_eq!(claims.subject(), Some("alice"));
        assert_eq!(claims.audience(), vec!["api", "admin"]);
        assert_eq!(claims.expiration(), Some(1_700_000_100));
        assert_eq!(claims.not_before(), Some(1_700_000_000));
        assert_eq!(claims.issued_at(), Some(1_700_000_000));
        assert_eq!(claims.jwt_id(), Some("j1"));
        assert_eq!(claims.custom_claims().count(), 0);
    }

    #[test]
    fn single_string_audience() {
        let claims = Claims::try_from(json!({"aud": "api"})).expect("object");
        assert_eq!(claims.audience(), vec!["api"]);
        assert!(Claims::new().audience().is_empty());
    }

    #[test]
    fn typed_round_trip_preserves_order() {
        let session = Session {
            sub: "alice".into(),
            exp: 42,
            role: "admin".into(),
        };
        let claims = Claims::from_serialize(&session).expect("struct is an object");
        let names: Vec<_> = claims.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["sub", "exp", "role"]);
        assert_eq!(claims.custom_string("role"), Some("admin"));
        assert_eq!(claims.deserialize_into::<Session>(), Ok(session));
    }

    #[test]
    fn deserialize_into_reports_shape_mismatch() {
        let claims = Claims::try_from(json!({"sub": 7})).expect("object");
        assert!(matches!(
            claims.deserialize_into::<Session>(),
            Err(JwtError::InvalidClaim(_))
        ));
    }

    #[test]
    fn non_objects_are_rejected() {
        assert!(matches!(
            Claims::from_serialize(&[1, 2, 3]),
            Err(JwtError::UnsupportedValueType(_))
        ));
        assert!(matches!(
            Claims::try_from(json!("alice")),
            Err(JwtError::UnsupportedValueType(_))
        ));
        assert!(matches!(
            Claims::from_json("[1]"),
            Err(JwtError::MalformedJson(_))
        ));
    }

    #[test]
    fn remove_keeps_order() {
        let mut claims = Claims::try_from(json!({"a": 1, "b": 2, "c": 3})).expect("object");
        assert_eq!(claims.remove("b"), Some(json!(2)));
        let names: Vec<_> = claims.iter().map(|(name, _)| name.clone()).collect();
        assert_eq!(names, ["a", "c"]);
    }
}
