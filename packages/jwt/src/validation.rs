//! JWT validation options and configuration.

use crate::types::Algorithm;
use chrono::Duration;
use serde::{Deserialize, Serialize};

fn default_leeway_seconds() -> i64 {
    60
}

fn default_true() -> bool {
    true
}

/// JWT validation options.
///
/// Deserializable from any serde format; omitted fields take their defaults.
/// The algorithm allowlist starts empty, so a verifier built from default
/// options accepts nothing until algorithms are allowed explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOptions {
    /// Clock skew tolerated on `exp`, `nbf`, `iat` and max age, in seconds.
    #[serde(default = "default_leeway_seconds")]
    pub leeway_seconds: i64,
    /// Validate expiry.
    #[serde(default = "default_true")]
    pub validate_exp: bool,
    /// Validate not-before.
    #[serde(default = "default_true")]
    pub validate_nbf: bool,
    /// Required claims.
    #[serde(default)]
    pub required_claims: Vec<String>,
    /// Allowed algorithms.
    #[serde(default)]
    pub allowed_algorithms: Vec<Algorithm>,
    /// Expected issuer.
    #[serde(default)]
    pub expected_issuer: Option<String>,
    /// Accepted audiences; the token must name at least one.
    #[serde(default)]
    pub expected_audience: Option<Vec<String>>,
    /// Expected subject.
    #[serde(default)]
    pub expected_subject: Option<String>,
    /// Maximum token age measured from `iat`, in seconds.
    #[serde(default)]
    pub max_age_seconds: Option<i64>,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            leeway_seconds: default_leeway_seconds(),
            validate_exp: true,
            validate_nbf: true,
            required_claims: vec![],
            allowed_algorithms: vec![],
            expected_issuer: None,
            expected_audience: None,
            expected_subject: None,
            max_age_seconds: None,
        }
    }
}

impl ValidationOptions {
    /// Create validation options with no leeway.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            leeway_seconds: 0,
            ..Self::default()
        }
    }

    /// Leeway as a duration.
    #[must_use]
    pub fn leeway(&self) -> Duration {
        Duration::seconds(self.leeway_seconds)
    }

    /// Set clock skew tolerance.
    #[must_use]
    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway_seconds = leeway.num_seconds();
        self
    }

    /// Toggle `exp` checking.
    #[must_use]
    pub fn validate_expiration(mut self, enabled: bool) -> Self {
        self.validate_exp = enabled;
        self
    }

    /// Toggle `nbf` checking.
    #[must_use]
    pub fn validate_not_before(mut self, enabled: bool) -> Self {
        self.validate_nbf = enabled;
        self
    }

    /// Require a claim to be present.
    #[must_use]
    pub fn require_claim(mut self, claim: &str) -> Self {
        if !self.required_claims.iter().any(|c| c == claim) {
            self.required_claims.push(claim.to_string());
        }
        self
    }

    /// Replace the algorithm allowlist.
    #[must_use]
    pub fn allowed_algorithms(mut self, algorithms: &[Algorithm]) -> Self {
        self.allowed_algorithms = algorithms.to_vec();
        self
    }

    /// Add one algorithm to the allowlist.
    #[must_use]
    pub fn allow_algorithm(mut self, algorithm: Algorithm) -> Self {
        if !self.allowed_algorithms.contains(&algorithm) {
            self.allowed_algorithms.push(algorithm);
        }
        self
    }

    /// Require `iss` to equal `issuer`.
    #[must_use]
    pub fn expect_issuer(mut self, issuer: &str) -> Self {
        self.expected_issuer = Some(issuer.to_string());
        self
    }

    /// Accept tokens addressed to `audience`. May be called repeatedly.
    #[must_use]
    pub fn expect_audience(mut self, audience: &str) -> Self {
        self.expected_audience
            .get_or_insert_with(Vec::new)
            .push(audience.to_string());
        self
    }

    /// Require `sub` to equal `subject`.
    #[must_use]
    pub fn expect_subject(mut self, subject: &str) -> Self {
        self.expected_subject = Some(subject.to_string());
        self
    }

    /// Reject tokens issued more than `max_age` ago.
    #[must_use]
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age_seconds = Some(max_age.num_seconds());
        self
    }

    /// Whether the header algorithm passes the allowlist.
    #[must_use]
    pub fn is_algorithm_allowed(&self, algorithm: Algorithm) -> bool {
        self.allowed_algorithms.contains(&algorithm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = ValidationOptions::default();
        assert_eq!(options.leeway(), Duration::seconds(60));
        assert!(options.validate_exp);
        assert!(options.validate_nbf);
        assert!(options.allowed_algorithms.is_empty());
        assert!(!options.is_algorithm_allowed(Algorithm::HS256));
        assert_eq!(ValidationOptions::strict().leeway_seconds, 0);
    }

    #[test]
    fn deserializes_partial_config() {
        let options: ValidationOptions = serde_json::from_str(
            r#"{"allowed_algorithms": ["RS256", "none"], "expected_issuer": "auth", "leeway_seconds": 5}"#,
        )
        .expect("valid config");
        assert_eq!(options.leeway_seconds, 5);
        assert_eq!(options.allowed_algorithms, vec![Algorithm::RS256, Algorithm::None]);
        assert_eq!(options.expected_issuer.as_deref(), Some("auth"));
        assert!(options.validate_exp);
        assert!(options.required_claims.is_empty());
    }

    #[test]
    fn unknown_algorithm_in_config_is_rejected() {
        let parsed: Result<ValidationOptions, _> =
            serde_json::from_str(r#"{"allowed_algorithms": ["HS1"]}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn setters_accumulate() {
        let options = ValidationOptions::default()
            .allow_algorithm(Algorithm::ES256)
            .allow_algorithm(Algorithm::ES256)
            .require_claim("sub")
            .require_claim("sub")
            .expect_audience("api")
            .expect_audience("admin")
            .with_max_age(Duration::minutes(5));
        assert_eq!(options.allowed_algorithms, vec![Algorithm::ES256]);
        assert_eq!(options.required_claims, vec!["sub".to_string()]);
        assert_eq!(
            options.expected_audience,
            Some(vec!["api".to_string(), "admin".to_string()])
        );
        assert_eq!(options.max_age_seconds, Some(300));
    }
}
