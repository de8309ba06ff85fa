//! Stateless bearer tokens (HS256 JWT compact serialization)
//!
//! Provides:
//! - `TokenIssuer`: mints `header.payload.signature` tokens for an identity
//! - `TokenVerifier`: checks structure, signature (constant time) and expiry
//! - `SigningSecret`: the shared HMAC key, zeroized on drop
//!
//! Tokens are never stored server-side; a token stays valid until it expires.

#![forbid(unsafe_code)]

/// Header and claim types.
pub mod claims;
pub mod clock;
mod codec;
/// `[token]` configuration section.
pub mod config;
/// Token error taxonomy.
pub mod error;
/// Token minting.
pub mod issuer;
pub mod secret;
/// Token validation.
pub mod verifier;

pub use claims::{Claims, Header, IssuedToken, VerifiedToken, ALGORITHM, TOKEN_TYPE};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{TokenConfig, DEFAULT_TTL_SECS};
pub use error::{Result, TokenError};
pub use issuer::TokenIssuer;
pub use secret::{SigningSecret, MIN_SECRET_BYTES};
pub use verifier::TokenVerifier;

/// Build an issuer and a verifier sharing one secret from configuration.
pub fn from_config(config: &TokenConfig) -> Result<(TokenIssuer, TokenVerifier)> {
    let secret = config.signing_secret()?;
    let issuer = TokenIssuer::new(secret.clone(), config.ttl())?;
    let verifier = TokenVerifier::new(secret).with_leeway(config.leeway());
    Ok((issuer, verifier))
}
