//! Token verification
//!
//! A single fail-fast pass: parse, decode segments, check the header `alg`
//! against the allowlist, verify the signature, validate claims. Each stage
//! reports its own error kind and nothing after a failed stage runs.

use super::claims::{Claims, ClaimsValidator};
use super::keys::KeyMaterial;
use crate::clock::{Clock, SystemClock};
use crate::crypto;
use crate::error::{JwtError, JwtResult};
use crate::token;
use crate::types::Algorithm;
use crate::validation::ValidationOptions;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;

/// Verifies compact tokens against one key and a fixed set of options.
///
/// The header `alg` only selects among algorithms the options already allow;
/// a token cannot pick its own algorithm. Cheap to clone and safe to share
/// across threads.
#[derive(Clone)]
pub struct TokenVerifier<'k> {
    key: &'k KeyMaterial,
    validator: ClaimsValidator,
    clock: Arc<dyn Clock>,
}

impl<'k> TokenVerifier<'k> {
    /// Create a verifier
    #[must_use]
    pub fn new(key: &'k KeyMaterial, options: ValidationOptions) -> Self {
        if options.is_algorithm_allowed(Algorithm::None) {
            tracing::warn!("verifier allows unsigned tokens (alg=none)");
        }
        Self {
            key,
            validator: ClaimsValidator::new(options),
            clock: Arc::new(SystemClock),
        }
    }

    /// Time source for `exp`, `nbf`, `iat` and max age checks
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Add a claims check that runs after every built-in rule
    #[must_use]
    pub fn with_custom_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Claims) -> JwtResult<()> + Send + Sync + 'static,
    {
        self.validator = self.validator.with_custom_validator(validator);
        self
    }

    /// Options in effect
    #[must_use]
    pub fn options(&self) -> &ValidationOptions {
        self.validator.options()
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    /// The first failing stage's error: `MalformedToken`, `MalformedEncoding`,
    /// `MalformedJson`, `AlgorithmMismatch`, `InvalidKeyType`,
    /// `SignatureInvalid`, then any claims validation error.
    pub fn verify(&self, token: &str) -> JwtResult<Claims> {
        let decoded = token::decode(token).map_err(|e| rejected("decode", e))?;
        let alg = decoded.header.alg;

        if !self.options().is_algorithm_allowed(alg) {
            return Err(rejected(
                "algorithm",
                JwtError::AlgorithmMismatch(format!("{alg} is not an allowed algorithm")),
            ));
        }

        let valid = crypto::verify(
            alg,
            self.key,
            decoded.signing_input().as_bytes(),
            &decoded.signature,
        )
        .map_err(|e| rejected("signature", e))?;
        if !valid {
            return Err(rejected("signature", JwtError::SignatureInvalid));
        }

        self.validator
            .validate(&decoded.claims, self.clock.as_ref())
            .map_err(|e| rejected("claims", e))?;

        tracing::debug!(
            alg = %alg,
            kid = decoded.header.kid.as_deref().unwrap_or("-"),
            "accepted token"
        );
        Ok(decoded.claims)
    }

    /// Verify a token and deserialize its claims into `T`.
    ///
    /// # Errors
    /// As [`Self::verify`], plus `InvalidClaim` when the claims do not fit `T`.
    pub fn verify_into<T: DeserializeOwned>(&self, token: &str) -> JwtResult<T> {
        self.verify(token)?.deserialize_into()
    }

    /// Verify the token carried by an `Authorization: Bearer ...` value.
    ///
    /// # Errors
    /// `MalformedToken` when the value is not a bearer credential, otherwise
    /// as [`Self::verify`].
    pub fn verify_bearer(&self, authorization: &str) -> JwtResult<Claims> {
        let token = token::extract_bearer_token(authorization)
            .ok_or_else(|| rejected("decode", JwtError::malformed_token("not a bearer credential")))?;
        self.verify(token)
    }
}

fn rejected(stage: &'static str, error: JwtError) -> JwtError {
    tracing::debug!(stage, error = %error, "rejected token");
    error
}

impl fmt::Debug for TokenVerifier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("key", &self.key.kind())
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}
