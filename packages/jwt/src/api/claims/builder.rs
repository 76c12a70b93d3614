//! JWT Claims Builder - builder pattern for constructing claims sets
//!
//! Claims are emitted in the order they are set, which fixes the payload
//! bytes of the signed token.

use super::standard_claims::Claims;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

/// Claims builder for creating JWT claims
#[derive(Debug, Clone, Default)]
pub struct ClaimsBuilder {
    claims: Claims,
}

impl ClaimsBuilder {
    /// Create new claims builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn set(mut self, claim: &str, value: Value) -> Self {
        self.claims.insert(claim, value);
        self
    }

    /// Set subject claim
    #[inline]
    #[must_use]
    pub fn with_subject(self, subject: &str) -> Self {
        self.set("sub", Value::String(subject.to_string()))
    }

    /// Set issuer claim
    #[inline]
    #[must_use]
    pub fn with_issuer(self, issuer: &str) -> Self {
        self.set("iss", Value::String(issuer.to_string()))
    }

    /// Set audience claim as string
    #[inline]
    #[must_use]
    pub fn with_audience(self, audience: &str) -> Self {
        self.set("aud", Value::String(audience.to_string()))
    }

    /// Set audience claim as array
    #[must_use]
    pub fn with_audience_array(self, audiences: &[&str]) -> Self {
        let aud_array = audiences
            .iter()
            .map(|&aud| Value::String(aud.to_string()))
            .collect();
        self.set("aud", Value::Array(aud_array))
    }

    /// Set expiration time (Unix seconds)
    #[inline]
    #[must_use]
    pub fn with_expiration(self, exp: i64) -> Self {
        self.set("exp", Value::Number(exp.into()))
    }

    /// Set not before time (Unix seconds)
    #[inline]
    #[must_use]
    pub fn with_not_before(self, nbf: i64) -> Self {
        self.set("nbf", Value::Number(nbf.into()))
    }

    /// Set issued at time (Unix seconds)
    #[inline]
    #[must_use]
    pub fn with_issued_at(self, iat: i64) -> Self {
        self.set("iat", Value::Number(iat.into()))
    }

    /// Set JWT ID
    #[inline]
    #[must_use]
    pub fn with_jwt_id(self, jti: &str) -> Self {
        self.set("jti", Value::String(jti.to_string()))
    }

    /// Set expiration time using duration from now
    #[must_use]
    pub fn expires_in(self, duration: Duration) -> Self {
        self.expires_at(Utc::now() + duration)
    }

    /// Set expiration time
    #[must_use]
    pub fn expires_at(self, at: DateTime<Utc>) -> Self {
        self.with_expiration(at.timestamp())
    }

    /// Set not before time
    #[must_use]
    pub fn not_before(self, nbf: DateTime<Utc>) -> Self {
        self.with_not_before(nbf.timestamp())
    }

    /// Set issued at time to now
    #[must_use]
    pub fn issued_now(self) -> Self {
        self.with_issued_at(Utc::now().timestamp())
    }

    /// Set custom string claim
    #[must_use]
    pub fn with_custom_string(self, claim: &str, value: &str) -> Self {
        self.set(claim, Value::String(value.to_string()))
    }

    /// Set custom number claim
    #[must_use]
    pub fn with_custom_number(self, claim: &str, value: i64) -> Self {
        self.set(claim, Value::Number(value.into()))
    }

    /// Set custom boolean claim
    #[must_use]
    pub fn with_custom_bool(self, claim: &str, value: bool) -> Self {
        self.set(claim, Value::Bool(value))
    }

    /// Set custom claim with any JSON value
    #[must_use]
    pub fn custom(self, claim: &str, value: Value) -> Self {
        self.set(claim, value)
    }

    /// Build the claims set
    #[inline]
    #[must_use]
    pub fn build(self) -> Claims {
        self.claims
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::json;
    use serde_json::json;

    #[test]
    fn claims_keep_insertion_order() {
        let claims = ClaimsBuilder::new()
            .with_subject("alice")
            .with_expiration(1_700_000_060)
            .with_issuer("auth")
            .with_custom_bool("admin", true)
            .build();
        let bytes = json::encode_object(claims.as_map()).expect("encodable");
        assert_eq!(
            String::from_utf8(bytes).expect("utf8"),
            r#"{"sub":"alice","exp":1700000060,"iss":"auth","admin":true}"#
        );
    }

    #[test]
    fn later_setter_replaces_value_in_place() {
        let claims = ClaimsBuilder::new()
            .with_audience("api")
            .with_subject("alice")
            .with_audience_array(&["api", "web"])
            .build();
        let names: Vec<_> = claims.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["aud", "sub"]);
        assert_eq!(claims.audience(), vec!["api", "web"]);
    }

    #[test]
    fn relative_times_are_stamped_from_now() {
        let before = Utc::now().timestamp();
        let claims = ClaimsBuilder::new()
            .issued_now()
            .expires_in(Duration::hours(1))
            .build();
        let iat = claims.issued_at().expect("iat set");
        let exp = claims.expiration().expect("exp set");
        assert!(iat >= before);
        assert!(exp - iat >= 3599 && exp - iat <= 3601);
    }

    #[test]
    fn custom_values() {
        let claims = ClaimsBuilder::new()
            .custom("scopes", json!(["read", "write"]))
            .with_custom_number("tier", 3)
            .with_custom_string("tenant", "acme")
            .build();
        assert_eq!(claims.get("scopes"), Some(&json!(["read", "write"])));
        assert_eq!(claims.custom_number("tier"), Some(3));
        assert_eq!(claims.custom_string("tenant"), Some("acme"));
        assert_eq!(claims.custom_claims().count(), 3);
    }
}
