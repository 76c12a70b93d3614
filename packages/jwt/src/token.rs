//! JWS Compact Serialization: assembly and structural parsing
//!
//! `BASE64URL(header) '.' BASE64URL(payload) '.' BASE64URL(signature)`

use crate::api::claims::Claims;
use crate::codec::{base64url, json};
use crate::error::{JwtError, JwtResult};
use crate::types::{Algorithm, JwtHeader};
use serde_json::{Map, Value};

/// The three raw segments of a compact token, borrowed from the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactParts<'a> {
    token: &'a str,
    header: &'a str,
    payload: &'a str,
    signature: &'a str,
}

impl<'a> CompactParts<'a> {
    /// Split a compact token on `.`.
    ///
    /// # Errors
    /// `MalformedToken` unless there are exactly three segments and the header
    /// and payload segments are non-empty.
    pub fn split(token: &'a str) -> JwtResult<Self> {
        let mut segments = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            let count = token.split('.').count();
            return Err(JwtError::malformed_token(format!(
                "expected 3 segments, found {count}"
            )));
        };

        if header.is_empty() {
            return Err(JwtError::malformed_token("empty header segment"));
        }
        if payload.is_empty() {
            return Err(JwtError::malformed_token("empty payload segment"));
        }

        Ok(Self {
            token,
            header,
            payload,
            signature,
        })
    }

    /// Header segment text
    #[must_use]
    pub fn header(&self) -> &'a str {
        self.header
    }

    /// Payload segment text
    #[must_use]
    pub fn payload(&self) -> &'a str {
        self.payload
    }

    /// Signature segment text
    #[must_use]
    pub fn signature(&self) -> &'a str {
        self.signature
    }

    /// `header.payload` exactly as received; this is what the signature covers
    #[must_use]
    pub fn signing_input(&self) -> &'a str {
        &self.token[..self.header.len() + 1 + self.payload.len()]
    }
}

/// A parsed token whose signature has not been checked yet
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedToken {
    /// Decoded protected header
    pub header: JwtHeader,
    /// Decoded claims
    pub claims: Claims,
    /// Raw signature bytes
    pub signature: Vec<u8>,
    signing_input: String,
}

impl DecodedToken {
    /// `header.payload` text the signature covers
    #[must_use]
    pub fn signing_input(&self) -> &str {
        &self.signing_input
    }
}

/// Parse and decode every segment of a compact token without verifying it.
///
/// # Errors
/// `MalformedToken` for structural problems, `MalformedEncoding` for bad
/// base64url, `MalformedJson` for header or payload that is not a JSON object,
/// `AlgorithmMismatch` for an unknown header `alg`.
pub fn decode(token: &str) -> JwtResult<DecodedToken> {
    let parts = CompactParts::split(token)?;
    let header = decode_header_segment(parts.header())?;
    let claims = Claims::from(json::decode_object(&base64url::decode(parts.payload())?)?);
    let signature = base64url::decode(parts.signature())?;

    match (header.alg, signature.is_empty()) {
        (Algorithm::None, false) => {
            return Err(JwtError::malformed_token(
                "unsecured token must have an empty signature",
            ))
        }
        (alg, true) if alg != Algorithm::None => {
            return Err(JwtError::malformed_token(format!(
                "{alg} token has an empty signature"
            )))
        }
        _ => {}
    }

    Ok(DecodedToken {
        header,
        claims,
        signature,
        signing_input: parts.signing_input().to_string(),
    })
}

/// Read the protected header without touching payload or signature, e.g. to
/// pick a key by `kid`. Nothing is verified.
///
/// # Errors
/// As [`decode`], for the header segment only.
pub fn decode_header(token: &str) -> JwtResult<JwtHeader> {
    let parts = CompactParts::split(token)?;
    decode_header_segment(parts.header())
}

fn decode_header_segment(segment: &str) -> JwtResult<JwtHeader> {
    let bytes = base64url::decode(segment)?;
    JwtHeader::from_object(json::decode_object(&bytes)?)
}

/// Encode header and payload into the signing input `b64(header).b64(payload)`.
///
/// # Errors
/// `UnsupportedValueType` if either object cannot be serialized.
pub fn signing_input(header: &Map<String, Value>, payload: &Map<String, Value>) -> JwtResult<String> {
    let header_b64 = base64url::encode(&json::encode_object(header)?);
    let payload_b64 = base64url::encode(&json::encode_object(payload)?);
    Ok(format!("{header_b64}.{payload_b64}"))
}

/// Append the encoded signature to a signing input
#[must_use]
pub fn assemble(signing_input: &str, signature: &[u8]) -> String {
    let signature_b64 = base64url::encode(signature);
    format!("{signing_input}.{signature_b64}")
}

/// Token from an `Authorization` header value such as `Bearer eyJ...`.
/// The scheme is matched case-insensitively; anything else yields `None`.
#[must_use]
pub fn extract_bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, rest) = header_value.trim().split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = rest.trim();
    (!token.is_empty()).then_some(token)
}
