//! JWT error types
//!
//! Every failure the signer or verifier can produce is one of these kinds.
//! None of them is transient: a token that fails once fails every time.

use thiserror::Error;

/// JWT operation result type
pub type JwtResult<T> = Result<T, JwtError>;

/// JWT error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    /// A segment is not valid unpadded base64url
    #[error("Malformed base64url encoding: {0}")]
    MalformedEncoding(String),

    /// A header or payload segment is not a JSON object
    #[error("Malformed JSON: {0}")]
    MalformedJson(String),

    /// The compact serialization is structurally broken
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// A header or claims value cannot be represented as a JSON object
    #[error("Unsupported value type: {0}")]
    UnsupportedValueType(String),

    /// The key family does not match the algorithm
    #[error("Invalid key type: {0}")]
    InvalidKeyType(String),

    /// Key material could not be decoded or is too weak
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// The algorithm name is not a known JWS algorithm
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The token's declared algorithm is not allowed by the verifier
    #[error("Algorithm mismatch: {0}")]
    AlgorithmMismatch(String),

    /// Signature or MAC did not verify
    #[error("Invalid JWT signature")]
    SignatureInvalid,

    /// Token has expired
    #[error("JWT token has expired")]
    TokenExpired,

    /// Token not yet valid
    #[error("JWT token not yet valid")]
    TokenNotYetValid,

    /// `iss` does not match the expected issuer
    #[error("Invalid JWT issuer")]
    IssuerMismatch,

    /// `aud` does not contain an expected audience
    #[error("Invalid JWT audience")]
    AudienceMismatch,

    /// `sub` does not match the expected subject
    #[error("Invalid JWT subject")]
    SubjectMismatch,

    /// Missing required claim
    #[error("Missing required claim: {0}")]
    MissingClaim(String),

    /// A registered claim has the wrong shape
    #[error("Invalid claim: {0}")]
    InvalidClaim(String),

    /// The signing primitive failed
    #[error("Signing error: {0}")]
    Signing(String),
}

impl JwtError {
    /// Create a malformed token error
    #[inline]
    #[must_use]
    pub fn malformed_token(msg: impl Into<String>) -> Self {
        Self::MalformedToken(msg.into())
    }

    /// Create an invalid key type error
    #[inline]
    #[must_use]
    pub fn invalid_key_type(msg: impl Into<String>) -> Self {
        Self::InvalidKeyType(msg.into())
    }

    /// Create an invalid key error
    #[inline]
    #[must_use]
    pub fn invalid_key(msg: impl Into<String>) -> Self {
        Self::InvalidKey(msg.into())
    }

    /// Create an invalid claim error
    #[inline]
    #[must_use]
    pub fn invalid_claim(msg: impl Into<String>) -> Self {
        Self::InvalidClaim(msg.into())
    }

    /// Create a missing claim error
    #[inline]
    #[must_use]
    pub fn missing_claim(claim: &str) -> Self {
        Self::MissingClaim(claim.to_string())
    }

    /// Whether retrying the same call could succeed. Always `false`: every
    /// kind reports a malformed or forged token or a caller configuration error.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        false
    }
}
