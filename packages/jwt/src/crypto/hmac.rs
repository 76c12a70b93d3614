//! HMAC-based JWS algorithms (HS256, HS384, HS512)

use super::SignatureBackend;
use crate::api::keys::KeyMaterial;
use crate::error::{JwtError, JwtResult};
use crate::types::{Algorithm, ShaSize};
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

pub(crate) struct HmacBackend(Algorithm);

pub(crate) static HS256: HmacBackend = HmacBackend(Algorithm::HS256);
pub(crate) static HS384: HmacBackend = HmacBackend(Algorithm::HS384);
pub(crate) static HS512: HmacBackend = HmacBackend(Algorithm::HS512);

#[inline]
fn compute<M: Mac + KeyInit>(secret: &[u8], message: &[u8]) -> JwtResult<Vec<u8>> {
    let mut mac = <M as Mac>::new_from_slice(secret)
        .map_err(|_| JwtError::invalid_key("Invalid HMAC key"))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

impl HmacBackend {
    fn mac(&self, key: &KeyMaterial, message: &[u8]) -> JwtResult<Vec<u8>> {
        let secret = key.hmac_secret(self.0)?;
        match self.0.sha_size() {
            Some(ShaSize::Sha256) => compute::<HmacSha256>(secret, message),
            Some(ShaSize::Sha384) => compute::<HmacSha384>(secret, message),
            Some(ShaSize::Sha512) => compute::<HmacSha512>(secret, message),
            None => Err(JwtError::UnsupportedAlgorithm(self.0.to_string())),
        }
    }
}

impl SignatureBackend for HmacBackend {
    fn algorithm(&self) -> Algorithm {
        self.0
    }

    fn sign(&self, key: &KeyMaterial, message: &[u8]) -> JwtResult<Vec<u8>> {
        self.mac(key, message)
    }

    fn verify(&self, key: &KeyMaterial, message: &[u8], signature: &[u8]) -> JwtResult<bool> {
        let expected = self.mac(key, message)?;
        // constant time in the content; lengths are public
        Ok(expected.as_slice().ct_eq(signature).into())
    }
}
