use super::claims::{Claims, Header, IssuedToken};
use super::clock::{Clock, SystemClock};
use super::codec;
use super::config::TokenConfig;
use super::error::{Result, TokenError};
use super::secret::SigningSecret;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Mints HS256 tokens for already-authenticated identities.
///
/// Checking credentials is the caller's job; the issuer trusts the identity
/// it is given.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: Arc<SigningSecret>,
    ttl_secs: i64,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    /// Create an issuer. The lifetime must be at least one second.
    pub fn new(secret: Arc<SigningSecret>, ttl: Duration) -> Result<Self> {
        let ttl_secs = i64::try_from(ttl.as_secs())
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| {
                TokenError::Configuration(format!(
                    "token lifetime must be between 1 and {} seconds, got {:?}",
                    i64::MAX,
                    ttl
                ))
            })?;

        Ok(Self {
            secret,
            ttl_secs,
            clock: Arc::new(SystemClock),
        })
    }

    /// Build an issuer from configuration (startup path).
    pub fn from_config(config: &TokenConfig) -> Result<Self> {
        Self::new(config.signing_secret()?, config.ttl())
    }

    /// Replace the time source
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Token lifetime
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs.unsigned_abs())
    }

    /// Issue a token for `identity` and return its compact serialization.
    pub fn issue(&self, identity: &str) -> Result<String> {
        self.issue_claims(identity).map(|issued| issued.token)
    }

    /// Issue a token and also return the claims signed into it.
    pub fn issue_claims(&self, identity: &str) -> Result<IssuedToken> {
        if identity.trim().is_empty() {
            return Err(TokenError::InvalidIdentity);
        }

        // iat rounds down and exp rounds up so the token lives at least the full TTL
        let now = self.clock.now();
        let iat = now.timestamp();
        let partial = i64::from(now.timestamp_subsec_nanos() > 0);
        let exp = iat
            .checked_add(self.ttl_secs)
            .and_then(|exp| exp.checked_add(partial))
            .ok_or_else(|| {
                TokenError::Configuration(
                    "token expiry overflows the timestamp range".to_string(),
                )
            })?;
        let claims = Claims {
            sub: identity.to_string(),
            iat,
            exp,
        };

        let header = codec::encode_json(&Header::default(), "header")?;
        let payload = codec::encode_json(&claims, "payload")?;
        let signing_input = format!("{}.{}", header, payload);
        let signature = codec::sign(&self.secret, &signing_input)?;

        info!(subject = %identity, expires_at = exp, "Token issued");

        Ok(IssuedToken {
            token: format!("{}.{}", signing_input, signature),
            claims,
        })
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("secret", &self.secret)
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}
