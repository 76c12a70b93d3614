//! JWT Claims Validator - standard rules plus caller-supplied checks

use super::standard_claims::Claims;
use super::validation::{
    validate_claim_types, validate_expected_values, validate_required_claims,
    validate_time_claims,
};
use crate::clock::Clock;
use crate::error::JwtResult;
use crate::validation::ValidationOptions;
use std::fmt;
use std::sync::Arc;

/// Type alias for custom validation functions
pub type CustomValidator = Arc<dyn Fn(&Claims) -> JwtResult<()> + Send + Sync>;

/// Checks a decoded claims set against [`ValidationOptions`].
///
/// Rules run in a fixed order and the first failure wins: claim types, `exp`,
/// `nbf`, `iat`, max age, issuer, subject, audience, required claims, then
/// custom validators in registration order.
#[derive(Clone, Default)]
pub struct ClaimsValidator {
    options: ValidationOptions,
    custom_validators: Vec<CustomValidator>,
}

impl ClaimsValidator {
    /// Create new claims validator
    #[must_use]
    pub fn new(options: ValidationOptions) -> Self {
        Self {
            options,
            custom_validators: Vec::new(),
        }
    }

    /// Add custom validator function
    #[must_use]
    pub fn with_custom_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Claims) -> JwtResult<()> + Send + Sync + 'static,
    {
        self.custom_validators.push(Arc::new(validator));
        self
    }

    /// Options in effect
    #[must_use]
    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Validate claims at the clock's current time.
    ///
    /// # Errors
    /// The first failing rule's error: `InvalidClaim`, `TokenExpired`,
    /// `TokenNotYetValid`, `MissingClaim`, `IssuerMismatch`, `SubjectMismatch`,
    /// `AudienceMismatch`, or whatever a custom validator returns.
    pub fn validate(&self, claims: &Claims, clock: &dyn Clock) -> JwtResult<()> {
        validate_claim_types(claims)?;
        validate_time_claims(claims, &self.options, clock.now())?;
        validate_expected_values(claims, &self.options)?;
        validate_required_claims(claims, &self.options)?;

        for validator in &self.custom_validators {
            validator(claims)?;
        }

        Ok(())
    }
}

impl fmt::Debug for ClaimsValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClaimsValidator")
            .field("options", &self.options)
            .field("custom_validators", &self.custom_validators.len())
            .finish()
    }
}
