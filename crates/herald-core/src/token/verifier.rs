use super::claims::{Claims, Header, VerifiedToken, ALGORITHM};
use super::clock::{Clock, SystemClock};
use super::codec;
use super::config::TokenConfig;
use super::error::{Result, TokenError};
use super::secret::SigningSecret;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

/// Validates HS256 tokens using only their content, the shared secret and
/// the clock. There is no session store and no revocation.
#[derive(Clone)]
pub struct TokenVerifier {
    secret: Arc<SigningSecret>,
    leeway_secs: i64,
    clock: Arc<dyn Clock>,
}

fn timestamp(secs: i64, claim: &str) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| TokenError::Malformed(format!("'{}' is out of range", claim)))
}

impl TokenVerifier {
    /// Create a verifier with no leeway
    #[must_use]
    pub fn new(secret: Arc<SigningSecret>) -> Self {
        Self {
            secret,
            leeway_secs: 0,
            clock: Arc::new(SystemClock),
        }
    }

    /// Build a verifier from configuration (startup path).
    pub fn from_config(config: &TokenConfig) -> Result<Self> {
        Ok(Self::new(config.signing_secret()?).with_leeway(config.leeway()))
    }

    /// Tolerate this much clock skew on the expiry and issued-at checks
    #[must_use]
    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway_secs = i64::try_from(leeway.as_secs()).unwrap_or(i64::MAX);
        self
    }

    /// Replace the time source
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Verify `token` and return the identity it carries.
    ///
    /// Checks run in order: structure, algorithm, signature, expiry,
    /// issued-at. The signature is compared in constant time.
    pub fn verify(&self, token: &str) -> Result<VerifiedToken> {
        let mut segments = token.split('.');
        let (Some(header_b64), Some(payload_b64), Some(signature_b64), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenError::Malformed(
                "expected three dot-separated segments".to_string(),
            ));
        };

        let header: Header = codec::decode_json(header_b64, "header")?;
        if header.alg != ALGORITHM {
            warn!(alg = %header.alg, "Rejected token with unsupported algorithm");
            return Err(TokenError::Malformed(format!(
                "unsupported algorithm '{}'",
                header.alg
            )));
        }
        let claims: Claims = codec::decode_json(payload_b64, "payload")?;
        if !codec::is_base64url(signature_b64) {
            return Err(TokenError::Malformed(
                "signature is not base64url".to_string(),
            ));
        }

        let signing_input = &token[..header_b64.len() + 1 + payload_b64.len()];
        let expected = codec::sign(&self.secret, signing_input)?;
        let signature_ok: bool = expected
            .as_bytes()
            .ct_eq(signature_b64.as_bytes())
            .into();
        if !signature_ok {
            warn!("Token signature mismatch");
            return Err(TokenError::InvalidSignature);
        }

        let issued_at = timestamp(claims.iat, "iat")?;
        let expires_at = timestamp(claims.exp, "exp")?;
        let now = self.clock.now().timestamp();

        if now >= claims.exp.saturating_add(self.leeway_secs) {
            debug!(subject = %claims.sub, "Token expired");
            return Err(TokenError::Expired {
                expired_at: expires_at,
            });
        }
        if claims.iat > now.saturating_add(self.leeway_secs) {
            warn!(subject = %claims.sub, "Token issued in the future");
            return Err(TokenError::NotYetValid { issued_at });
        }

        debug!(subject = %claims.sub, "Token verified");
        Ok(VerifiedToken {
            subject: claims.sub,
            issued_at,
            expires_at,
        })
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("secret", &self.secret)
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}
