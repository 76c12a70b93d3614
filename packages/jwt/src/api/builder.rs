//! JWT Builder API - entry point and token signing
//!
//! ```no_run
//! use jwt_signer::{Algorithm, ClaimsBuilder, Jwt, KeyMaterial};
//!
//! # fn main() -> jwt_signer::JwtResult<()> {
//! let key = KeyMaterial::secret(b"an example secret of thirty-two b".to_vec());
//! let claims = ClaimsBuilder::new().with_subject("alice").build();
//! let token = Jwt::signer(Algorithm::HS256, &key)
//!     .with_key_id("primary")
//!     .sign_claims(&claims)?;
//! # Ok(())
//! # }
//! ```

use super::claims::Claims;
use super::keys::{validate_hmac_key, KeyMaterial};
use super::verifier::TokenVerifier;
use crate::clock::{Clock, SystemClock};
use crate::crypto;
use crate::error::JwtResult;
use crate::token;
use crate::types::{Algorithm, AlgorithmFamily, JwtHeader};
use crate::validation::ValidationOptions;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Direct builder entry point
pub struct Jwt;

impl Jwt {
    /// Signer for `algorithm` using `key`
    #[inline]
    #[must_use]
    pub fn signer(algorithm: Algorithm, key: &KeyMaterial) -> TokenSigner<'_> {
        TokenSigner::new(algorithm, key)
    }

    /// Signer with the default algorithm, HS256
    #[inline]
    #[must_use]
    pub fn hs256(key: &KeyMaterial) -> TokenSigner<'_> {
        TokenSigner::new(Algorithm::default(), key)
    }

    /// Verifier for `key` that accepts the algorithms allowed in `options`
    #[inline]
    #[must_use]
    pub fn verifier(key: &KeyMaterial, options: ValidationOptions) -> TokenVerifier<'_> {
        TokenVerifier::new(key, options)
    }

    /// Read a token's header without verifying anything, e.g. to pick a key
    /// by `kid` before verification.
    ///
    /// # Errors
    /// `MalformedToken`, `MalformedEncoding`, `MalformedJson` or
    /// `AlgorithmMismatch` when the header cannot be read.
    pub fn decode_header(token: &str) -> JwtResult<JwtHeader> {
        token::decode_header(token)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IssuedAt {
    Untouched,
    Now,
    At(i64),
}

/// Signs claims into compact tokens with one algorithm and key.
///
/// The header always starts `{"alg":..,"typ":"JWT"` followed by `kid` and any
/// extra fields in the order they were added.
#[derive(Clone)]
pub struct TokenSigner<'k> {
    key: &'k KeyMaterial,
    header: JwtHeader,
    issued_at: IssuedAt,
    require_strong_key: bool,
    clock: Arc<dyn Clock>,
}

impl<'k> TokenSigner<'k> {
    /// Create a signer
    #[must_use]
    pub fn new(algorithm: Algorithm, key: &'k KeyMaterial) -> Self {
        Self {
            key,
            header: JwtHeader::new(algorithm),
            issued_at: IssuedAt::Untouched,
            require_strong_key: false,
            clock: Arc::new(SystemClock),
        }
    }

    /// Algorithm written to the header
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.header.alg
    }

    /// Set the `kid` header parameter
    #[must_use]
    pub fn with_key_id(mut self, kid: impl Into<String>) -> Self {
        self.header = self.header.with_key_id(kid);
        self
    }

    /// Add an extra header parameter. `alg`, `typ` and `kid` cannot be
    /// overridden this way.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: Value) -> Self {
        self.header = self.header.with_field(name, value);
        self
    }

    /// Stamp `iat` with the current time when the claims lack one
    #[must_use]
    pub fn issued_now(mut self) -> Self {
        self.issued_at = IssuedAt::Now;
        self
    }

    /// Stamp `iat` with a fixed time when the claims lack one
    #[must_use]
    pub fn issued_at(mut self, iat: i64) -> Self {
        self.issued_at = IssuedAt::At(iat);
        self
    }

    /// Refuse HMAC secrets shorter than the digest output
    #[must_use]
    pub fn require_strong_key(mut self) -> Self {
        self.require_strong_key = true;
        self
    }

    /// Time source for [`Self::issued_now`]
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Sign any value that serializes to a JSON object.
    ///
    /// # Errors
    /// `UnsupportedValueType` for non-object claims, `InvalidKeyType` when the
    /// key does not fit the algorithm, `InvalidKey` for a weak secret under
    /// [`Self::require_strong_key`], `Signing` when the primitive fails.
    pub fn sign<T: Serialize + ?Sized>(&self, claims: &T) -> JwtResult<String> {
        self.sign_object(Claims::from_serialize(claims)?)
    }

    /// Sign a claims set.
    ///
    /// # Errors
    /// As [`Self::sign`].
    pub fn sign_claims(&self, claims: &Claims) -> JwtResult<String> {
        self.sign_object(claims.clone())
    }

    /// Sign claims given as JSON text.
    ///
    /// # Errors
    /// `MalformedJson` when `claims` is not a JSON object, otherwise as
    /// [`Self::sign`].
    pub fn sign_json(&self, claims: &str) -> JwtResult<String> {
        self.sign_object(Claims::from_json(claims)?)
    }

    fn sign_object(&self, mut claims: Claims) -> JwtResult<String> {
        let alg = self.header.alg;

        if self.require_strong_key && alg.family() == AlgorithmFamily::Hmac {
            validate_hmac_key(self.key.hmac_secret(alg)?, alg)?;
        }

        let iat = match self.issued_at {
            IssuedAt::Untouched => None,
            IssuedAt::Now => Some(self.clock.now()),
            IssuedAt::At(iat) => Some(iat),
        };
        if let Some(iat) = iat {
            if !claims.contains("iat") {
                claims.insert("iat", Value::Number(iat.into()));
            }
        }

        let header = self.header.to_object();
        let signing_input = token::signing_input(&header, claims.as_map())?;
        let signature = crypto::sign(alg, self.key, signing_input.as_bytes())?;

        tracing::debug!(
            alg = %alg,
            kid = self.header.kid.as_deref().unwrap_or("-"),
            claims = claims.len(),
            "issued token"
        );
        Ok(token::assemble(&signing_input, &signature))
    }
}

impl fmt::Debug for TokenSigner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("header", &self.header)
            .field("key", &self.key.kind())
            .field("issued_at", &self.issued_at)
            .field("require_strong_key", &self.require_strong_key)
            .finish_non_exhaustive()
    }
}
