//! JWT key material
//!
//! Callers load keys however they like (PEM, JWK, a KMS) and hand the result to
//! the signer or verifier as a [`KeyMaterial`]. DER helpers cover the common
//! PKCS#8 / SPKI case.

use crate::error::{JwtError, JwtResult};
use crate::types::{Algorithm, AlgorithmFamily};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::borrow::Cow;
use std::fmt;
use zeroize::Zeroizing;

/// Smallest RSA modulus accepted for RS* and PS*
pub const MIN_RSA_BITS: usize = 2048;

/// NIST curves used by ES256, ES384 and ES512
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcCurve {
    /// secp256r1
    P256,
    /// secp384r1
    P384,
    /// secp521r1
    P521,
}

impl EcCurve {
    /// Curve required by an ECDSA algorithm
    #[must_use]
    pub const fn for_algorithm(alg: Algorithm) -> Option<Self> {
        match alg {
            Algorithm::ES256 => Some(EcCurve::P256),
            Algorithm::ES384 => Some(EcCurve::P384),
            Algorithm::ES512 => Some(EcCurve::P521),
            _ => None,
        }
    }

    /// Byte length of one field element; R and S are each padded to this
    #[must_use]
    pub const fn coordinate_len(self) -> usize {
        match self {
            EcCurve::P256 => 32,
            EcCurve::P384 => 48,
            EcCurve::P521 => 66,
        }
    }

    /// JOSE curve name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EcCurve::P256 => "P-256",
            EcCurve::P384 => "P-384",
            EcCurve::P521 => "P-521",
        }
    }
}

/// ECDSA private key on one of the supported curves
pub enum EcSigningKey {
    /// P-256
    P256(p256::ecdsa::SigningKey),
    /// P-384
    P384(p384::ecdsa::SigningKey),
    /// P-521
    P521(p521::ecdsa::SigningKey),
}

/// ECDSA public key on one of the supported curves
pub enum EcVerifyingKey {
    /// P-256
    P256(p256::ecdsa::VerifyingKey),
    /// P-384
    P384(p384::ecdsa::VerifyingKey),
    /// P-521
    P521(p521::ecdsa::VerifyingKey),
}

impl EcSigningKey {
    /// Curve of this key
    #[must_use]
    pub const fn curve(&self) -> EcCurve {
        match self {
            EcSigningKey::P256(_) => EcCurve::P256,
            EcSigningKey::P384(_) => EcCurve::P384,
            EcSigningKey::P521(_) => EcCurve::P521,
        }
    }
}

impl EcVerifyingKey {
    /// Curve of this key
    #[must_use]
    pub const fn curve(&self) -> EcCurve {
        match self {
            EcVerifyingKey::P256(_) => EcCurve::P256,
            EcVerifyingKey::P384(_) => EcCurve::P384,
            EcVerifyingKey::P521(_) => EcCurve::P521,
        }
    }
}

/// Opaque key handle passed to sign and verify calls.
///
/// Symmetric secrets are wiped from memory on drop. Private asymmetric keys
/// verify as well as sign.
pub enum KeyMaterial {
    /// HMAC secret
    Secret(Zeroizing<Vec<u8>>),
    /// RSA private key (signs and verifies)
    RsaPrivate(Box<RsaPrivateKey>),
    /// RSA public key (verifies only)
    RsaPublic(Box<RsaPublicKey>),
    /// EC private key (signs and verifies)
    EcPrivate(EcSigningKey),
    /// EC public key (verifies only)
    EcPublic(EcVerifyingKey),
}

impl KeyMaterial {
    /// HMAC secret from raw bytes
    #[must_use]
    pub fn secret(bytes: impl Into<Vec<u8>>) -> Self {
        KeyMaterial::Secret(Zeroizing::new(bytes.into()))
    }

    /// HMAC secret from text as read from a key file; a single trailing `\n`
    /// is dropped. A preceding `\r` is kept and stays part of the secret.
    #[must_use]
    pub fn secret_from_text(text: &str) -> Self {
        Self::secret(text.strip_suffix('\n').unwrap_or(text).as_bytes())
    }

    /// RSA private key.
    ///
    /// # Errors
    /// `InvalidKey` if the modulus is shorter than [`MIN_RSA_BITS`].
    pub fn rsa_private(key: RsaPrivateKey) -> JwtResult<Self> {
        check_rsa_size(key.n().bits())?;
        Ok(KeyMaterial::RsaPrivate(Box::new(key)))
    }

    /// RSA public key.
    ///
    /// # Errors
    /// `InvalidKey` if the modulus is shorter than [`MIN_RSA_BITS`].
    pub fn rsa_public(key: RsaPublicKey) -> JwtResult<Self> {
        check_rsa_size(key.n().bits())?;
        Ok(KeyMaterial::RsaPublic(Box::new(key)))
    }

    /// RSA private key from PKCS#8 DER.
    ///
    /// # Errors
    /// `InvalidKey` if the DER does not hold an RSA key or the key is too small.
    pub fn rsa_private_from_pkcs8_der(der: &[u8]) -> JwtResult<Self> {
        let key = RsaPrivateKey::from_pkcs8_der(der)
            .map_err(|e| JwtError::invalid_key(format!("Invalid RSA private key: {e}")))?;
        Self::rsa_private(key)
    }

    /// RSA public key from SubjectPublicKeyInfo DER.
    ///
    /// # Errors
    /// `InvalidKey` if the DER does not hold an RSA key or the key is too small.
    pub fn rsa_public_from_der(der: &[u8]) -> JwtResult<Self> {
        let key = RsaPublicKey::from_public_key_der(der)
            .map_err(|e| JwtError::invalid_key(format!("Invalid RSA public key: {e}")))?;
        Self::rsa_public(key)
    }

    /// EC private key from PKCS#8 DER.
    ///
    /// # Errors
    /// `InvalidKey` if the DER does not hold a key on `curve`.
    pub fn ec_private_from_pkcs8_der(curve: EcCurve, der: &[u8]) -> JwtResult<Self> {
        let invalid =
            |e: &dyn fmt::Display| JwtError::invalid_key(format!("Invalid {} private key: {e}", curve.name()));
        let key = match curve {
            EcCurve::P256 => EcSigningKey::P256(
                p256::ecdsa::SigningKey::from_pkcs8_der(der).map_err(|e| invalid(&e))?,
            ),
            EcCurve::P384 => EcSigningKey::P384(
                p384::ecdsa::SigningKey::from_pkcs8_der(der).map_err(|e| invalid(&e))?,
            ),
            EcCurve::P521 => {
                let secret = p521::SecretKey::from_pkcs8_der(der).map_err(|e| invalid(&e))?;
                EcSigningKey::P521(
                    p521::ecdsa::SigningKey::from_slice(&secret.to_bytes())
                        .map_err(|e| invalid(&e))?,
                )
            }
        };
        Ok(KeyMaterial::EcPrivate(key))
    }

    /// EC public key from SubjectPublicKeyInfo DER.
    ///
    /// # Errors
    /// `InvalidKey` if the DER does not hold a point on `curve`.
    pub fn ec_public_from_der(curve: EcCurve, der: &[u8]) -> JwtResult<Self> {
        let invalid =
            |e: &dyn fmt::Display| JwtError::invalid_key(format!("Invalid {} public key: {e}", curve.name()));
        let key = match curve {
            EcCurve::P256 => EcVerifyingKey::P256(
                p256::ecdsa::VerifyingKey::from_public_key_der(der).map_err(|e| invalid(&e))?,
            ),
            EcCurve::P384 => EcVerifyingKey::P384(
                p384::ecdsa::VerifyingKey::from_public_key_der(der).map_err(|e| invalid(&e))?,
            ),
            EcCurve::P521 => {
                let public = p521::PublicKey::from_public_key_der(der).map_err(|e| invalid(&e))?;
                EcVerifyingKey::P521(
                    p521::ecdsa::VerifyingKey::from_sec1_bytes(&public.to_sec1_bytes())
                        .map_err(|e| invalid(&e))?,
                )
            }
        };
        Ok(KeyMaterial::EcPublic(key))
    }

    /// Human-readable key family, used in error messages
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            KeyMaterial::Secret(_) => "symmetric secret",
            KeyMaterial::RsaPrivate(_) => "RSA private key",
            KeyMaterial::RsaPublic(_) => "RSA public key",
            KeyMaterial::EcPrivate(k) => match k.curve() {
                EcCurve::P256 => "P-256 private key",
                EcCurve::P384 => "P-384 private key",
                EcCurve::P521 => "P-521 private key",
            },
            KeyMaterial::EcPublic(k) => match k.curve() {
                EcCurve::P256 => "P-256 public key",
                EcCurve::P384 => "P-384 public key",
                EcCurve::P521 => "P-521 public key",
            },
        }
    }

    /// Whether this key can produce signatures for `alg`
    #[must_use]
    pub fn can_sign(&self, alg: Algorithm) -> bool {
        match alg.family() {
            AlgorithmFamily::Hmac => matches!(self, KeyMaterial::Secret(_)),
            AlgorithmFamily::RsaPkcs1 | AlgorithmFamily::RsaPss => {
                matches!(self, KeyMaterial::RsaPrivate(_))
            }
            AlgorithmFamily::Ecdsa => match self {
                KeyMaterial::EcPrivate(k) => Some(k.curve()) == EcCurve::for_algorithm(alg),
                _ => false,
            },
            AlgorithmFamily::Unsecured => true,
        }
    }

    /// Whether this key can check signatures for `alg`
    #[must_use]
    pub fn can_verify(&self, alg: Algorithm) -> bool {
        match alg.family() {
            AlgorithmFamily::Hmac => matches!(self, KeyMaterial::Secret(_)),
            AlgorithmFamily::RsaPkcs1 | AlgorithmFamily::RsaPss => {
                matches!(self, KeyMaterial::RsaPrivate(_) | KeyMaterial::RsaPublic(_))
            }
            AlgorithmFamily::Ecdsa => {
                let curve = match self {
                    KeyMaterial::EcPrivate(k) => Some(k.curve()),
                    KeyMaterial::EcPublic(k) => Some(k.curve()),
                    _ => None,
                };
                curve.is_some() && curve == EcCurve::for_algorithm(alg)
            }
            AlgorithmFamily::Unsecured => true,
        }
    }

    pub(crate) fn hmac_secret(&self, alg: Algorithm) -> JwtResult<&[u8]> {
        match self {
            KeyMaterial::Secret(secret) => Ok(secret.as_slice()),
            other => Err(key_type_error(alg, other)),
        }
    }

    pub(crate) fn rsa_signing_key(&self, alg: Algorithm) -> JwtResult<&RsaPrivateKey> {
        match self {
            KeyMaterial::RsaPrivate(key) => Ok(&**key),
            other => Err(key_type_error(alg, other)),
        }
    }

    pub(crate) fn rsa_verifying_key(&self, alg: Algorithm) -> JwtResult<Cow<'_, RsaPublicKey>> {
        match self {
            KeyMaterial::RsaPrivate(key) => Ok(Cow::Owned(key.to_public_key())),
            KeyMaterial::RsaPublic(key) => Ok(Cow::Borrowed(&**key)),
            other => Err(key_type_error(alg, other)),
        }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}

impl From<p256::ecdsa::SigningKey> for KeyMaterial {
    fn from(key: p256::ecdsa::SigningKey) -> Self {
        KeyMaterial::EcPrivate(EcSigningKey::P256(key))
    }
}

impl From<p384::ecdsa::SigningKey> for KeyMaterial {
    fn from(key: p384::ecdsa::SigningKey) -> Self {
        KeyMaterial::EcPrivate(EcSigningKey::P384(key))
    }
}

impl From<p521::ecdsa::SigningKey> for KeyMaterial {
    fn from(key: p521::ecdsa::SigningKey) -> Self {
        KeyMaterial::EcPrivate(EcSigningKey::P521(key))
    }
}

impl From<p256::ecdsa::VerifyingKey> for KeyMaterial {
    fn from(key: p256::ecdsa::VerifyingKey) -> Self {
        KeyMaterial::EcPublic(EcVerifyingKey::P256(key))
    }
}

impl From<p384::ecdsa::VerifyingKey> for KeyMaterial {
    fn from(key: p384::ecdsa::VerifyingKey) -> Self {
        KeyMaterial::EcPublic(EcVerifyingKey::P384(key))
    }
}

impl From<p521::ecdsa::VerifyingKey> for KeyMaterial {
    fn from(key: p521::ecdsa::VerifyingKey) -> Self {
        KeyMaterial::EcPublic(EcVerifyingKey::P521(key))
    }
}

pub(crate) fn key_type_error(alg: Algorithm, key: &KeyMaterial) -> JwtError {
    JwtError::invalid_key_type(format!("{alg} cannot use a {}", key.kind()))
}

fn check_rsa_size(bits: usize) -> JwtResult<()> {
    if bits < MIN_RSA_BITS {
        return Err(JwtError::invalid_key(format!(
            "RSA key must be at least {MIN_RSA_BITS} bits, got {bits}"
        )));
    }
    Ok(())
}

/// Validate HMAC secret key length against the digest size of `alg`
///
/// # Errors
/// `InvalidKey` when the secret is shorter than the digest output.
pub fn validate_hmac_key(secret: &[u8], alg: Algorithm) -> JwtResult<()> {
    if alg.family() != AlgorithmFamily::Hmac {
        return Ok(());
    }
    let min_length = recommended_key_size(alg);
    if secret.len() < min_length {
        return Err(JwtError::invalid_key(format!(
            "HMAC key for {alg} must be at least {min_length} bytes, got {}",
            secret.len()
        )));
    }
    Ok(())
}

/// Recommended key size in bytes for an algorithm
#[must_use]
pub const fn recommended_key_size(alg: Algorithm) -> usize {
    match alg {
        Algorithm::HS256 | Algorithm::ES256 => 32,
        Algorithm::HS384 | Algorithm::ES384 => 48,
        Algorithm::HS512 => 64,
        Algorithm::ES512 => 66,
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => MIN_RSA_BITS / 8,
        Algorithm::None => 0,
    }
}
