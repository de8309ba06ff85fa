use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Signing algorithm written to and required in the token header
pub const ALGORITHM: &str = "HS256";

/// Token type written to the header
pub const TOKEN_TYPE: &str = "JWT";

/// JOSE header of the compact serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Signing algorithm
    pub alg: String,
    /// Token type (optional on input)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            alg: ALGORITHM.to_string(),
            typ: Some(TOKEN_TYPE.to_string()),
        }
    }
}

/// Registered claims carried in the payload.
///
/// Times are whole seconds since the Unix epoch (JWT `NumericDate`).
/// Unknown claims in incoming tokens are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identity
    pub sub: String,
    /// Issued at
    pub iat: i64,
    /// Expiry
    pub exp: i64,
}

/// A freshly minted token with the claims it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Compact serialization `header.payload.signature`
    pub token: String,
    /// Claims signed into the token
    pub claims: Claims,
}

/// Identity recovered from a token that passed verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifiedToken {
    /// Subject identity
    pub subject: String,
    /// When the token was issued
    pub issued_at: DateTime<Utc>,
    /// When the token stops being accepted
    pub expires_at: DateTime<Utc>,
}
