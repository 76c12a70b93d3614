//! JSON Web Token signing and verification
//!
//! This crate provides:
//! - JWS Compact Serialization of claims sets
//! - HMAC (HS256/384/512), RSA PKCS#1 v1.5 (RS256/384/512), RSA-PSS
//!   (PS256/384/512) and ECDSA (ES256/384/512) signatures
//! - Claims validation with clock skew, issuer/audience/subject matching,
//!   required claims and maximum token age
//!
//! Verification never trusts the token header to choose an algorithm: the
//! header `alg` must appear in [`ValidationOptions::allowed_algorithms`].

pub mod api;
pub mod clock;
pub mod codec;
pub mod crypto;
mod error;
pub mod token;
mod types;
pub mod validation;

pub use api::claims::{Claims, ClaimsBuilder, ClaimsValidator, CustomValidator};
pub use api::keys::{recommended_key_size, validate_hmac_key, EcCurve, KeyMaterial};
pub use api::{Jwt, TokenSigner, TokenVerifier};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::*;
pub use token::{decode_header, extract_bearer_token};
pub use types::*;
pub use validation::ValidationOptions;
