//! Public JWT API: key material, claims, signing and verification

pub mod builder;
pub mod claims;
pub mod keys;
pub mod verifier;

pub use builder::{Jwt, TokenSigner};
pub use claims::{Claims, ClaimsBuilder, ClaimsValidator};
pub use keys::{recommended_key_size, validate_hmac_key, EcCurve, KeyMaterial};
pub use verifier::TokenVerifier;
