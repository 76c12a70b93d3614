//! JWT claims: the claims set, its builder and its validator

pub mod builder;
pub mod standard_claims;
pub(crate) mod validation;
pub mod validator;

pub use builder::ClaimsBuilder;
pub use standard_claims::{Claims, REGISTERED_CLAIMS};
pub use validator::{ClaimsValidator, CustomValidator};
