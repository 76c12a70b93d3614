//! JWS algorithm identifiers and the protected header

use crate::error::{JwtError, JwtResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Header `typ` value written on every token
pub const JWT_TYPE: &str = "JWT";

/// JWS `alg` values understood by this crate
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// HMAC using SHA-256, used when the caller does not choose one
    #[default]
    HS256,
    /// HMAC using SHA-384
    HS384,
    /// HMAC using SHA-512
    HS512,
    /// RSASSA-PKCS1-v1_5 using SHA-256
    RS256,
    /// RSASSA-PKCS1-v1_5 using SHA-384
    RS384,
    /// RSASSA-PKCS1-v1_5 using SHA-512
    RS512,
    /// ECDSA using P-256 and SHA-256
    ES256,
    /// ECDSA using P-384 and SHA-384
    ES384,
    /// ECDSA using P-521 and SHA-512
    ES512,
    /// RSASSA-PSS using SHA-256 and MGF1 with SHA-256
    PS256,
    /// RSASSA-PSS using SHA-384 and MGF1 with SHA-384
    PS384,
    /// RSASSA-PSS using SHA-512 and MGF1 with SHA-512
    PS512,
    /// Unsecured JWS, empty signature
    #[serde(rename = "none")]
    None,
}

/// Signature scheme family an [`Algorithm`] belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmFamily {
    /// HS*
    Hmac,
    /// RS*
    RsaPkcs1,
    /// PS*
    RsaPss,
    /// ES*
    Ecdsa,
    /// none
    Unsecured,
}

/// SHA-2 digest size paired with an algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaSize {
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl Algorithm {
    /// Every algorithm, in JOSE registry order
    pub const ALL: [Algorithm; 13] = [
        Algorithm::HS256,
        Algorithm::HS384,
        Algorithm::HS512,
        Algorithm::RS256,
        Algorithm::RS384,
        Algorithm::RS512,
        Algorithm::ES256,
        Algorithm::ES384,
        Algorithm::ES512,
        Algorithm::PS256,
        Algorithm::PS384,
        Algorithm::PS512,
        Algorithm::None,
    ];

    /// The registered `alg` name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::HS256 => "HS256",
            Algorithm::HS384 => "HS384",
            Algorithm::HS512 => "HS512",
            Algorithm::RS256 => "RS256",
            Algorithm::RS384 => "RS384",
            Algorithm::RS512 => "RS512",
            Algorithm::ES256 => "ES256",
            Algorithm::ES384 => "ES384",
            Algorithm::ES512 => "ES512",
            Algorithm::PS256 => "PS256",
            Algorithm::PS384 => "PS384",
            Algorithm::PS512 => "PS512",
            Algorithm::None => "none",
        }
    }

    /// Scheme family
    #[must_use]
    pub const fn family(self) -> AlgorithmFamily {
        match self {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => AlgorithmFamily::Hmac,
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => AlgorithmFamily::RsaPkcs1,
            Algorithm::PS256 | Algorithm::PS384 | Algorithm::PS512 => AlgorithmFamily::RsaPss,
            Algorithm::ES256 | Algorithm::ES384 | Algorithm::ES512 => AlgorithmFamily::Ecdsa,
            Algorithm::None => AlgorithmFamily::Unsecured,
        }
    }

    /// Digest paired with the algorithm; `None` for the unsecured algorithm
    #[must_use]
    pub const fn sha_size(self) -> Option<ShaSize> {
        match self {
            Algorithm::HS256 | Algorithm::RS256 | Algorithm::ES256 | Algorithm::PS256 => {
                Some(ShaSize::Sha256)
            }
            Algorithm::HS384 | Algorithm::RS384 | Algorithm::ES384 | Algorithm::PS384 => {
                Some(ShaSize::Sha384)
            }
            Algorithm::HS512 | Algorithm::RS512 | Algorithm::ES512 | Algorithm::PS512 => {
                Some(ShaSize::Sha512)
            }
            Algorithm::None => None,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = JwtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|alg| alg.name() == s)
            .ok_or_else(|| JwtError::UnsupportedAlgorithm(s.to_string()))
    }
}

/// JWS protected header
///
/// Serialized as `alg`, `typ`, optional `kid`, then any extra fields in the
/// order they were added. Extra fields named `alg`, `typ` or `kid` are ignored
/// on output; the typed fields win.
#[derive(Debug, Clone, PartialEq)]
pub struct JwtHeader {
    /// Signing algorithm
    pub alg: Algorithm,
    /// Token type, `JWT` on every header this crate writes
    pub typ: Option<String>,
    /// Key ID hint, passed through untouched
    pub kid: Option<String>,
    /// Other header parameters
    pub extra: Map<String, Value>,
}

impl JwtHeader {
    /// Header for `alg` with `typ` set to `JWT`
    #[must_use]
    pub fn new(alg: Algorithm) -> Self {
        Self {
            alg,
            typ: Some(JWT_TYPE.to_string()),
            kid: None,
            extra: Map::new(),
        }
    }

    /// Set the key ID
    #[must_use]
    pub fn with_key_id(mut self, kid: impl Into<String>) -> Self {
        self.kid = Some(kid.into());
        self
    }

    /// Add an extra header parameter
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.extra.insert(name.into(), value);
        self
    }

    /// Ordered JSON object form of the header
    #[must_use]
    pub fn to_object(&self) -> Map<String, Value> {
        let mut object = Map::new();
        object.insert("alg".to_string(), Value::String(self.alg.name().to_string()));
        if let Some(typ) = &self.typ {
            object.insert("typ".to_string(), Value::String(typ.clone()));
        }
        if let Some(kid) = &self.kid {
            object.insert("kid".to_string(), Value::String(kid.clone()));
        }
        for (name, value) in &self.extra {
            if !matches!(name.as_str(), "alg" | "typ" | "kid") {
                object.insert(name.clone(), value.clone());
            }
        }
        object
    }

    /// Build a header from a decoded JSON object.
    ///
    /// # Errors
    /// `MalformedToken` when `alg` is missing or `alg`/`typ`/`kid` are not
    /// strings; `AlgorithmMismatch` when `alg` names no known algorithm.
    pub fn from_object(mut object: Map<String, Value>) -> JwtResult<Self> {
        let alg = match object.shift_remove("alg") {
            Some(Value::String(name)) => name.parse::<Algorithm>().map_err(|_| {
                JwtError::AlgorithmMismatch(format!("unknown algorithm '{name}'"))
            })?,
            Some(_) => return Err(JwtError::malformed_token("header alg must be a string")),
            None => return Err(JwtError::malformed_token("header is missing alg")),
        };
        let typ = take_optional_string(&mut object, "typ")?;
        let kid = take_optional_string(&mut object, "kid")?;

        Ok(Self {
            alg,
            typ,
            kid,
            extra: object,
        })
    }
}

fn take_optional_string(object: &mut Map<String, Value>, name: &str) -> JwtResult<Option<String>> {
    match object.shift_remove(name) {
        Some(Value::String(value)) => Ok(Some(value)),
        Some(_) => Err(JwtError::malformed_token(format!(
            "header {name} must be a string"
        ))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn algorithm_names_round_trip() {
        for alg in Algorithm::ALL {
            assert_eq!(alg.name().parse::<Algorithm>(), Ok(alg));
            assert_eq!(alg.to_string(), alg.name());
        }
        assert_eq!(Algorithm::default(), Algorithm::HS256);
    }

    #[test]
    fn unknown_algorithm_is_rejected() {
        assert_eq!(
            "HS1024".parse::<Algorithm>(),
            Err(JwtError::UnsupportedAlgorithm("HS1024".to_string()))
        );
        // names are case-sensitive
        assert!("hs256".parse::<Algorithm>().is_err());
        assert!("None".parse::<Algorithm>().is_err());
    }

    #[test]
    fn algorithm_serde_uses_jose_names() {
        assert_eq!(serde_json::to_value(Algorithm::None).ok(), Some(json!("none")));
        assert_eq!(serde_json::to_value(Algorithm::PS384).ok(), Some(json!("PS384")));
        let parsed: Algorithm = serde_json::from_value(json!("ES512")).expect("valid name");
        assert_eq!(parsed, Algorithm::ES512);
    }

    #[test]
    fn header_object_is_ordered() {
        let header = JwtHeader::new(Algorithm::HS256)
            .with_field("cty", json!("example"))
            .with_key_id("key-1")
            .with_field("alg", json!("none"));
        let json = serde_json::to_string(&header.to_object()).expect("serializable");
        assert_eq!(json, r#"{"alg":"HS256","typ":"JWT","kid":"key-1","cty":"example"}"#);
    }

    #[test]
    fn header_from_object() {
        let object = json!({"typ": "JWT", "alg": "ES384", "kid": "k", "x5t": "abc"});
        let Value::Object(object) = object else {
            unreachable!()
        };
        let header = JwtHeader::from_object(object).expect("valid header");
        assert_eq!(header.alg, Algorithm::ES384);
        assert_eq!(header.kid.as_deref(), Some("k"));
        assert_eq!(header.extra.get("x5t"), Some(&json!("abc")));
    }

    #[test]
    fn header_without_alg_is_malformed() {
        let Value::Object(object) = json!({"typ": "JWT"}) else {
            unreachable!()
        };
        assert!(matches!(
            JwtHeader::from_object(object),
            Err(JwtError::MalformedToken(_))
        ));

        let Value::Object(object) = json!({"alg": 256}) else {
            unreachable!()
        };
        assert!(matches!(
            JwtHeader::from_object(object),
            Err(JwtError::MalformedToken(_))
        ));
    }

    #[test]
    fn header_with_unknown_alg_is_mismatch() {
        let Value::Object(object) = json!({"alg": "XS256"}) else {
            unreachable!()
        };
        assert!(matches!(
            JwtHeader::from_object(object),
            Err(JwtError::AlgorithmMismatch(_))
        ));
    }
}
