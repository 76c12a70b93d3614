//! Base64 URL-safe encoding without padding (RFC 7515 §2)

use crate::error::{JwtError, JwtResult};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

/// Encode bytes with the base64url alphabet, no `=` padding
#[inline]
#[must_use]
pub fn encode(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Decode unpadded base64url.
///
/// The engine rejects padding, characters outside `[A-Za-z0-9_-]`, lengths
/// that cannot come from an encoder and non-zero trailing bits, so every
/// accepted input has exactly one decoding.
///
/// # Errors
/// Returns `MalformedEncoding` describing the first offending symbol.
#[inline]
pub fn decode(input: &str) -> JwtResult<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| JwtError::MalformedEncoding(e.to_string()))
}
