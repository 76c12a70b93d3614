//! Segment codecs: unpadded base64url and compact JSON

pub mod base64url;
pub mod json;
