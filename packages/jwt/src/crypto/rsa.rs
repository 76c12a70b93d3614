//! RSA-based JWS algorithms
//!
//! RS256/384/512 use RSASSA-PKCS1-v1_5, PS256/384/512 use RSASSA-PSS with a
//! salt as long as the digest and MGF1 over the same hash. Both sign through
//! the blinded private-key operation.

use super::SignatureBackend;
use crate::api::keys::KeyMaterial;
use crate::error::{JwtError, JwtResult};
use crate::types::{Algorithm, ShaSize};
use rsa::rand_core::OsRng;
use rsa::sha2::{Digest, Sha256, Sha384, Sha512};
use rsa::{Pkcs1v15Sign, Pss};

#[derive(Clone, Copy)]
enum Padding {
    Pkcs1v15,
    Pss,
}

pub(crate) struct RsaBackend {
    alg: Algorithm,
    padding: Padding,
}

pub(crate) static RS256: RsaBackend = RsaBackend::pkcs1(Algorithm::RS256);
pub(crate) static RS384: RsaBackend = RsaBackend::pkcs1(Algorithm::RS384);
pub(crate) static RS512: RsaBackend = RsaBackend::pkcs1(Algorithm::RS512);
pub(crate) static PS256: RsaBackend = RsaBackend::pss(Algorithm::PS256);
pub(crate) static PS384: RsaBackend = RsaBackend::pss(Algorithm::PS384);
pub(crate) static PS512: RsaBackend = RsaBackend::pss(Algorithm::PS512);

impl RsaBackend {
    const fn pkcs1(alg: Algorithm) -> Self {
        Self {
            alg,
            padding: Padding::Pkcs1v15,
        }
    }

    const fn pss(alg: Algorithm) -> Self {
        Self {
            alg,
            padding: Padding::Pss,
        }
    }

    fn sha_size(&self) -> JwtResult<ShaSize> {
        self.alg
            .sha_size()
            .ok_or_else(|| JwtError::UnsupportedAlgorithm(self.alg.to_string()))
    }
}

fn digest(size: ShaSize, message: &[u8]) -> Vec<u8> {
    match size {
        ShaSize::Sha256 => Sha256::digest(message).to_vec(),
        ShaSize::Sha384 => Sha384::digest(message).to_vec(),
        ShaSize::Sha512 => Sha512::digest(message).to_vec(),
    }
}

fn pkcs1_scheme(size: ShaSize) -> Pkcs1v15Sign {
    match size {
        ShaSize::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
        ShaSize::Sha384 => Pkcs1v15Sign::new::<Sha384>(),
        ShaSize::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
    }
}

fn pss_scheme(size: ShaSize) -> Pss {
    match size {
        ShaSize::Sha256 => Pss::new::<Sha256>(),
        ShaSize::Sha384 => Pss::new::<Sha384>(),
        ShaSize::Sha512 => Pss::new::<Sha512>(),
    }
}

impl SignatureBackend for RsaBackend {
    fn algorithm(&self) -> Algorithm {
        self.alg
    }

    fn sign(&self, key: &KeyMaterial, message: &[u8]) -> JwtResult<Vec<u8>> {
        let private_key = key.rsa_signing_key(self.alg)?;
        let size = self.sha_size()?;
        let hashed = digest(size, message);

        let signed = match self.padding {
            Padding::Pkcs1v15 => private_key.sign_with_rng(&mut OsRng, pkcs1_scheme(size), &hashed),
            Padding::Pss => private_key.sign_with_rng(&mut OsRng, pss_scheme(size), &hashed),
        };
        signed.map_err(|e| JwtError::Signing(format!("{} signing failed: {e}", self.alg)))
    }

    fn verify(&self, key: &KeyMaterial, message: &[u8], signature: &[u8]) -> JwtResult<bool> {
        let public_key = key.rsa_verifying_key(self.alg)?;
        let size = self.sha_size()?;
        let hashed = digest(size, message);

        let checked = match self.padding {
            Padding::Pkcs1v15 => public_key.verify(pkcs1_scheme(size), &hashed, signature),
            Padding::Pss => public_key.verify(pss_scheme(size), &hashed, signature),
        };
        Ok(checked.is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use rsa::traits::PublicKeyParts;
    use rsa::RsaPrivateKey;

    static PRIVATE: Lazy<RsaPrivateKey> =
        Lazy::new(|| RsaPrivateKey::new(&mut OsRng, 2048).expect("keygen"));

    fn private_key() -> KeyMaterial {
        KeyMaterial::rsa_private(PRIVATE.clone()).expect("2048-bit key")
    }

    fn public_key() -> KeyMaterial {
        KeyMaterial::rsa_public(PRIVATE.to_public_key()).expect("2048-bit key")
    }

    #[test]
    fn pkcs1_is_deterministic_and_verifies_with_public_key() {
        let key = private_key();
        let first = RS256.sign(&key, b"message").expect("sign");
        let second = RS256.sign(&key, b"message").expect("sign");
        assert_eq!(first, second);
        assert_eq!(first.len(), PRIVATE.size());
        assert_eq!(RS256.verify(&public_key(), b"message", &first), Ok(true));
        assert_eq!(RS256.verify(&key, b"message", &first), Ok(true));
        assert_eq!(RS256.verify(&public_key(), b"other", &first), Ok(false));
    }

    #[test]
    fn pss_is_randomized_but_verifies() {
        let key = private_key();
        for alg in [&PS256, &PS384, &PS512] {
            let first = alg.sign(&key, b"message").expect("sign");
            let second = alg.sign(&key, b"message").expect("sign");
            assert_ne!(first, second);
            assert_eq!(alg.verify(&public_key(), b"message", &first), Ok(true));
            assert_eq!(alg.verify(&public_key(), b"message", &second), Ok(true));
        }
    }

    #[test]
    fn digest_and_padding_are_bound_to_the_algorithm() {
        let key = private_key();
        let rs256 = RS256.sign(&key, b"message").expect("sign");
        assert_eq!(RS384.verify(&key, b"message", &rs256), Ok(false));
        assert_eq!(PS256.verify(&key, b"message", &rs256), Ok(false));

        let ps512 = PS512.sign(&key, b"message").expect("sign");
        assert_eq!(RS512.verify(&key, b"message", &ps512), Ok(false));
    }

    #[test]
    fn public_key_cannot_sign() {
        assert!(matches!(
            RS256.sign(&public_key(), b"message"),
            Err(JwtError::InvalidKeyType(_))
        ));
    }

    #[test]
    fn secret_is_wrong_type() {
        let secret = KeyMaterial::secret(b"secret".to_vec());
        assert!(matches!(
            RS512.sign(&secret, b"message"),
            Err(JwtError::InvalidKeyType(_))
        ));
        assert!(matches!(
            PS256.verify(&secret, b"message", &[0u8; 256]),
            Err(JwtError::InvalidKeyType(_))
        ));
    }

    #[test]
    fn malformed_signature_is_false_not_error() {
        assert_eq!(RS256.verify(&public_key(), b"message", &[]), Ok(false));
        assert_eq!(RS256.verify(&public_key(), b"message", &[1u8; 17]), Ok(false));
    }
}
