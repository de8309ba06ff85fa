//! HMAC signing secret shared by the issuer and the verifier

use super::error::{Result, TokenError};
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Minimum secret length for HS256 (256 bits)
pub const MIN_SECRET_BYTES: usize = 32;

/// Length of secrets produced by [`SigningSecret::generate`]
pub const GENERATED_SECRET_BYTES: usize = 64;

/// HMAC key material.
///
/// Wiped from memory on drop and redacted in `Debug` output. Read-only once
/// built, so one instance is shared (behind `Arc`) across threads.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SigningSecret {
    bytes: Vec<u8>,
}

impl SigningSecret {
    /// Wrap raw key bytes, rejecting keys shorter than 256 bits.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let mut bytes: Vec<u8> = bytes.into();
        if bytes.len() < MIN_SECRET_BYTES {
            let len = bytes.len();
            bytes.zeroize();
            return Err(TokenError::Configuration(format!(
                "signing secret is {} bytes, at least {} required",
                len, MIN_SECRET_BYTES
            )));
        }
        Ok(Self { bytes })
    }

    /// Parse a secret as written in configuration.
    ///
    /// Base64 (standard or url-safe) text that decodes to at least 256 bits is
    /// used decoded; anything else is taken as raw UTF-8 bytes.
    pub fn from_config_value(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(TokenError::Configuration(
                "signing secret is not set".to_string(),
            ));
        }

        let decoded = URL_SAFE_NO_PAD
            .decode(trimmed)
            .or_else(|_| STANDARD.decode(trimmed))
            .ok()
            .filter(|bytes| bytes.len() >= MIN_SECRET_BYTES);

        match decoded {
            Some(bytes) => Self::new(bytes),
            None => Self::new(trimmed.as_bytes().to_vec()),
        }
    }

    /// Generate a fresh random secret using the OS CSPRNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; GENERATED_SECRET_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Url-safe base64 form, suitable for `HERALD_TOKEN__SECRET`.
    #[must_use]
    pub fn to_base64(&self) -> String {
        URL_SAFE_NO_PAD.encode(&self.bytes)
    }

    /// Key length in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false: construction rejects short keys
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub(crate) fn expose(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningSecret([REDACTED, {} bytes])", self.bytes.len())
    }
}
