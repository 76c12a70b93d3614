//! Standard claim rules: registered claim types, time windows, expected values

use super::standard_claims::Claims;
use crate::error::{JwtError, JwtResult};
use crate::validation::ValidationOptions;
use serde_json::Value;

/// NumericDate as f64 so fractional seconds compare exactly
#[inline]
fn seconds(claims: &Claims, name: &str) -> Option<f64> {
    claims.get(name).and_then(Value::as_f64)
}

/// Registered claims must have their RFC 7519 types when present
pub(crate) fn validate_claim_types(claims: &Claims) -> JwtResult<()> {
    for name in ["exp", "nbf", "iat"] {
        if let Some(value) = claims.get(name) {
            if !value.is_number() {
                return Err(JwtError::invalid_claim(format!("{name} must be a NumericDate")));
            }
        }
    }

    for name in ["iss", "sub", "jti"] {
        if let Some(value) = claims.get(name) {
            if !value.is_string() {
                return Err(JwtError::invalid_claim(format!("{name} must be a string")));
            }
        }
    }

    match claims.get("aud") {
        None | Some(Value::String(_)) => Ok(()),
        Some(Value::Array(items)) if items.iter().all(Value::is_string) => Ok(()),
        Some(_) => Err(JwtError::invalid_claim(
            "aud must be a string or array of strings",
        )),
    }
}

/// `exp`, `nbf`, `iat` and max age against `now`, each widened by the leeway
#[allow(clippy::cast_precision_loss)]
pub(crate) fn validate_time_claims(
    claims: &Claims,
    options: &ValidationOptions,
    now: i64,
) -> JwtResult<()> {
    let now = now as f64;
    let leeway = options.leeway_seconds as f64;

    if options.validate_exp {
        if let Some(exp) = seconds(claims, "exp") {
            if now > exp + leeway {
                return Err(JwtError::TokenExpired);
            }
        }
    }

    if options.validate_nbf {
        if let Some(nbf) = seconds(claims, "nbf") {
            if now < nbf - leeway {
                return Err(JwtError::TokenNotYetValid);
            }
        }
    }

    let iat = seconds(claims, "iat");
    if let Some(iat) = iat {
        if iat > now + leeway {
            return Err(JwtError::invalid_claim("iat is in the future"));
        }
    }

    if let Some(max_age) = options.max_age_seconds {
        let iat = iat.ok_or_else(|| JwtError::missing_claim("iat"))?;
        if now > iat + max_age as f64 + leeway {
            return Err(JwtError::TokenExpired);
        }
    }

    Ok(())
}

/// Expected issuer, subject and audience
pub(crate) fn validate_expected_values(
    claims: &Claims,
    options: &ValidationOptions,
) -> JwtResult<()> {
    if let Some(expected) = &options.expected_issuer {
        if claims.issuer() != Some(expected.as_str()) {
            return Err(JwtError::IssuerMismatch);
        }
    }

    if let Some(expected) = &options.expected_subject {
        if claims.subject() != Some(expected.as_str()) {
            return Err(JwtError::SubjectMismatch);
        }
    }

    if let Some(expected) = &options.expected_audience {
        let audience = claims.audience();
        if !expected.iter().any(|aud| audience.contains(&aud.as_str())) {
            return Err(JwtError::AudienceMismatch);
        }
    }

    Ok(())
}

pub(crate) fn validate_required_claims(
    claims: &Claims,
    options: &ValidationOptions,
) -> JwtResult<()> {
    match options
        .required_claims
        .iter()
        .find(|name| !claims.contains(name))
    {
        Some(missing) => Err(JwtError::missing_claim(missing)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: i64 = 1_700_000_000;

    fn claims(value: Value) -> Claims {
        Claims::try_from(value).expect("object")
    }

    fn strict() -> ValidationOptions {
        ValidationOptions::strict()
    }

    #[test]
    fn registered_claim_types() {
        assert!(validate_claim_types(&claims(json!({"exp": 1.5, "aud": ["a"], "x": {}}))).is_ok());
        for bad in [
            json!({"exp": "tomorrow"}),
            json!({"nbf": true}),
            json!({"iat": null}),
            json!({"iss": 1}),
            json!({"sub": ["alice"]}),
            json!({"jti": 9}),
            json!({"aud": 1}),
            json!({"aud": ["ok", 2]}),
        ] {
            assert!(
                matches!(validate_claim_types(&claims(bad.clone())), Err(JwtError::InvalidClaim(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn expiry_boundary() {
        let options = strict();
        assert_eq!(
            validate_time_claims(&claims(json!({"exp": NOW - 1})), &options, NOW),
            Err(JwtError::TokenExpired)
        );
        assert!(validate_time_claims(&claims(json!({"exp": NOW})), &options, NOW).is_ok());
        assert!(validate_time_claims(&claims(json!({"exp": NOW + 3600})), &options, NOW).is_ok());

        let lenient = strict().with_leeway(chrono::Duration::seconds(30));
        assert!(validate_time_claims(&claims(json!({"exp": NOW - 30})), &lenient, NOW).is_ok());
        assert!(validate_time_claims(&claims(json!({"exp": NOW - 31})), &lenient, NOW).is_err());

        let unchecked = strict().validate_expiration(false);
        assert!(validate_time_claims(&claims(json!({"exp": 0})), &unchecked, NOW).is_ok());
    }

    #[test]
    fn not_before_boundary() {
        let options = strict();
        assert_eq!(
            validate_time_claims(&claims(json!({"nbf": NOW + 1})), &options, NOW),
            Err(JwtError::TokenNotYetValid)
        );
        assert!(validate_time_claims(&claims(json!({"nbf": NOW})), &options, NOW).is_ok());
        assert!(validate_time_claims(&claims(json!({"nbf": NOW as f64 + 0.5})), &options, NOW).is_err());

        let unchecked = strict().validate_not_before(false);
        assert!(validate_time_claims(&claims(json!({"nbf": NOW + 100})), &unchecked, NOW).is_ok());
    }

    #[test]
    fn issued_in_the_future() {
        assert!(matches!(
            validate_time_claims(&claims(json!({"iat": NOW + 10})), &strict(), NOW),
            Err(JwtError::InvalidClaim(_))
        ));
        assert!(validate_time_claims(&claims(json!({"iat": NOW + 10})), &ValidationOptions::default(), NOW).is_ok());
    }

    #[test]
    fn max_age() {
        let options = strict().with_max_age(chrono::Duration::seconds(300));
        assert!(validate_time_claims(&claims(json!({"iat": NOW - 300})), &options, NOW).is_ok());
        assert_eq!(
            validate_time_claims(&claims(json!({"iat": NOW - 301})), &options, NOW),
            Err(JwtError::TokenExpired)
        );
        assert_eq!(
            validate_time_claims(&claims(json!({})), &options, NOW),
            Err(JwtError::MissingClaim("iat".into()))
        );
    }

    #[test]
    fn expected_values() {
        let options = strict()
            .expect_issuer("auth")
            .expect_subject("alice")
            .expect_audience("api")
            .expect_audience("billing");

        let good = claims(json!({"iss": "auth", "sub": "alice", "aud": ["web", "billing"]}));
        assert!(validate_expected_values(&good, &options).is_ok());

        let single = claims(json!({"iss": "auth", "sub": "alice", "aud": "api"}));
        assert!(validate_expected_values(&single, &options).is_ok());

        assert_eq!(
            validate_expected_values(&claims(json!({"sub": "alice", "aud": "api"})), &options),
            Err(JwtError::IssuerMismatch)
        );
        assert_eq!(
            validate_expected_values(&claims(json!({"iss": "auth", "sub": "bob", "aud": "api"})), &options),
            Err(JwtError::SubjectMismatch)
        );
        assert_eq!(
            validate_expected_values(&claims(json!({"iss": "auth", "sub": "alice", "aud": ["web"]})), &options),
            Err(JwtError::AudienceMismatch)
        );
        assert_eq!(
            validate_expected_values(&claims(json!({"iss": "auth", "sub": "alice"})), &options),
            Err(JwtError::AudienceMismatch)
        );
    }

    #[test]
    fn absent_optional_claims_are_fine() {
        let empty = claims(json!({}));
        assert!(validate_time_claims(&empty, &strict(), NOW).is_ok());
        assert!(validate_expected_values(&empty, &strict()).is_ok());
        assert!(validate_required_claims(&empty, &strict()).is_ok());
    }

    #[test]
    fn required_claims() {
        let options = strict().require_claim("sub").require_claim("tenant");
        assert_eq!(
            validate_required_claims(&claims(json!({"sub": "alice"})), &options),
            Err(JwtError::MissingClaim("tenant".into()))
        );
        assert!(validate_required_claims(&claims(json!({"sub": "a", "tenant": null})), &options).is_ok());
    }
}
