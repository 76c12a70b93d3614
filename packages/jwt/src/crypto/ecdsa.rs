//! ECDSA-based JWS algorithms (ES256, ES384, ES512)
//!
//! JWS carries ECDSA signatures as the fixed-length concatenation `R || S`,
//! each half left-padded with zeros to the curve's field size, never as DER.
//! The RustCrypto `Signature::to_bytes` encoding is exactly that layout.

use super::SignatureBackend;
use crate::api::keys::{key_type_error, EcCurve, EcSigningKey, EcVerifyingKey, KeyMaterial};
use crate::error::{JwtError, JwtResult};
use crate::types::Algorithm;
use p256::ecdsa::signature::{Signer, Verifier};

pub(crate) struct EcdsaBackend {
    alg: Algorithm,
    curve: EcCurve,
}

pub(crate) static ES256: EcdsaBackend = EcdsaBackend {
    alg: Algorithm::ES256,
    curve: EcCurve::P256,
};
pub(crate) static ES384: EcdsaBackend = EcdsaBackend {
    alg: Algorithm::ES384,
    curve: EcCurve::P384,
};
pub(crate) static ES512: EcdsaBackend = EcdsaBackend {
    alg: Algorithm::ES512,
    curve: EcCurve::P521,
};

fn signing_failed(alg: Algorithm, e: impl std::fmt::Display) -> JwtError {
    JwtError::Signing(format!("{alg} signing failed: {e}"))
}

fn verify_p256(key: &p256::ecdsa::VerifyingKey, message: &[u8], signature: &[u8]) -> bool {
    p256::ecdsa::Signature::from_slice(signature)
        .is_ok_and(|signature| key.verify(message, &signature).is_ok())
}

fn verify_p384(key: &p384::ecdsa::VerifyingKey, message: &[u8], signature: &[u8]) -> bool {
    p384::ecdsa::Signature::from_slice(signature)
        .is_ok_and(|signature| key.verify(message, &signature).is_ok())
}

fn verify_p521(key: &p521::ecdsa::VerifyingKey, message: &[u8], signature: &[u8]) -> bool {
    p521::ecdsa::Signature::from_slice(signature)
        .is_ok_and(|signature| key.verify(message, &signature).is_ok())
}

impl SignatureBackend for EcdsaBackend {
    fn algorithm(&self) -> Algorithm {
        self.alg
    }

    fn sign(&self, key: &KeyMaterial, message: &[u8]) -> JwtResult<Vec<u8>> {
        let signing_key = match key {
            KeyMaterial::EcPrivate(signing_key) if signing_key.curve() == self.curve => signing_key,
            other => return Err(key_type_error(self.alg, other)),
        };

        let signature = match signing_key {
            EcSigningKey::P256(k) => {
                let signature: p256::ecdsa::Signature =
                    k.try_sign(message).map_err(|e| signing_failed(self.alg, e))?;
                signature.to_bytes().to_vec()
            }
            EcSigningKey::P384(k) => {
                let signature: p384::ecdsa::Signature =
                    k.try_sign(message).map_err(|e| signing_failed(self.alg, e))?;
                signature.to_bytes().to_vec()
            }
            EcSigningKey::P521(k) => {
                let signature: p521::ecdsa::Signature =
                    k.try_sign(message).map_err(|e| signing_failed(self.alg, e))?;
                signature.to_bytes().to_vec()
            }
        };

        debug_assert_eq!(signature.len(), 2 * self.curve.coordinate_len());
        Ok(signature)
    }

    fn verify(&self, key: &KeyMaterial, message: &[u8], signature: &[u8]) -> JwtResult<bool> {
        let valid = match key {
            KeyMaterial::EcPrivate(k) if k.curve() == self.curve => {
                if signature.len() != 2 * self.curve.coordinate_len() {
                    return Ok(false);
                }
                match k {
                    EcSigningKey::P256(k) => verify_p256(&k.verifying_key(), message, signature),
                    EcSigningKey::P384(k) => verify_p384(&k.verifying_key(), message, signature),
                    EcSigningKey::P521(k) => {
                        verify_p521(&p521::ecdsa::VerifyingKey::from(k), message, signature)
                    }
                }
            }
            KeyMaterial::EcPublic(k) if k.curve() == self.curve => {
                if signature.len() != 2 * self.curve.coordinate_len() {
                    return Ok(false);
                }
                match k {
                    EcVerifyingKey::P256(k) => verify_p256(k, message, signature),
                    EcVerifyingKey::P384(k) => verify_p384(k, message, signature),
                    EcVerifyingKey::P521(k) => verify_p521(k, message, signature),
                }
            }
            other => return Err(key_type_error(self.alg, other)),
        };
        Ok(valid)
    }
}
