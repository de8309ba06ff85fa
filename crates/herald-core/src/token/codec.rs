//! Segment encoding and HS256 signing for the compact serialization

use super::error::{Result, TokenError};
use super::secret::SigningSecret;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// JSON-serialize `value` and base64url-encode it without padding.
pub(crate) fn encode_json<T: Serialize>(value: &T, what: &str) -> Result<String> {
    let json = serde_json::to_vec(value)
        .map_err(|e| TokenError::Malformed(format!("cannot serialize {}: {}", what, e)))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Decode one base64url segment and parse it as JSON.
pub(crate) fn decode_json<T: DeserializeOwned>(segment: &str, what: &str) -> Result<T> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::Malformed(format!("{} is not base64url", what)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| TokenError::Malformed(format!("{} is not valid JSON: {}", what, e)))
}

/// HMAC-SHA256 of `signing_input`, base64url-encoded.
pub(crate) fn sign(secret: &SigningSecret, signing_input: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.expose())
        .map_err(|_| TokenError::Configuration("invalid signing secret".to_string()))?;
    mac.update(signing_input.as_bytes());
    Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
}

/// Whether `segment` only uses the unpadded base64url alphabet.
pub(crate) fn is_base64url(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
