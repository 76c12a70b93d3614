//! Signature engine
//!
//! One [`SignatureBackend`] per algorithm family. [`sign`] and [`verify`] pick
//! the backend from the algorithm the caller passes in; nothing here reads a
//! token header.

pub(crate) mod ecdsa;
pub(crate) mod hmac;
pub(crate) mod rsa;

use crate::api::keys::KeyMaterial;
use crate::error::JwtResult;
use crate::types::Algorithm;

/// Signing capability shared by every algorithm family.
///
/// Implementations must be thread-safe and hold no mutable state; keys are
/// borrowed for the duration of one call.
pub trait SignatureBackend: Send + Sync {
    /// Algorithm this backend implements
    fn algorithm(&self) -> Algorithm;

    /// Produce a signature over `message`.
    ///
    /// # Errors
    /// `InvalidKeyType` when `key` belongs to another family (or curve),
    /// `Signing` when the primitive fails.
    fn sign(&self, key: &KeyMaterial, message: &[u8]) -> JwtResult<Vec<u8>>;

    /// Check `signature` over `message`. A wrong signature is `Ok(false)`.
    ///
    /// # Errors
    /// `InvalidKeyType` when `key` belongs to another family (or curve).
    fn verify(&self, key: &KeyMaterial, message: &[u8], signature: &[u8]) -> JwtResult<bool>;
}

/// `alg=none`: empty signature, verifies only an empty signature
pub(crate) struct UnsecuredBackend;

impl SignatureBackend for UnsecuredBackend {
    fn algorithm(&self) -> Algorithm {
        Algorithm::None
    }

    fn sign(&self, _key: &KeyMaterial, _message: &[u8]) -> JwtResult<Vec<u8>> {
        Ok(Vec::new())
    }

    fn verify(&self, _key: &KeyMaterial, _message: &[u8], signature: &[u8]) -> JwtResult<bool> {
        Ok(signature.is_empty())
    }
}

static UNSECURED: UnsecuredBackend = UnsecuredBackend;

/// Backend for an algorithm
#[must_use]
pub fn backend(alg: Algorithm) -> &'static dyn SignatureBackend {
    match alg {
        Algorithm::HS256 => &hmac::HS256,
        Algorithm::HS384 => &hmac::HS384,
        Algorithm::HS512 => &hmac::HS512,
        Algorithm::RS256 => &rsa::RS256,
        Algorithm::RS384 => &rsa::RS384,
        Algorithm::RS512 => &rsa::RS512,
        Algorithm::PS256 => &rsa::PS256,
        Algorithm::PS384 => &rsa::PS384,
        Algorithm::PS512 => &rsa::PS512,
        Algorithm::ES256 => &ecdsa::ES256,
        Algorithm::ES384 => &ecdsa::ES384,
        Algorithm::ES512 => &ecdsa::ES512,
        Algorithm::None => &UNSECURED,
    }
}

/// Sign `message` with `alg` and `key`.
///
/// # Errors
/// See [`SignatureBackend::sign`].
pub fn sign(alg: Algorithm, key: &KeyMaterial, message: &[u8]) -> JwtResult<Vec<u8>> {
    backend(alg).sign(key, message)
}

/// Verify `signature` over `message` with `alg` and `key`.
///
/// # Errors
/// See [`SignatureBackend::verify`].
pub fn verify(
    alg: Algorithm,
    key: &KeyMaterial,
    message: &[u8],
    signature: &[u8],
) -> JwtResult<bool> {
    backend(alg).verify(key, message, signature)
}
