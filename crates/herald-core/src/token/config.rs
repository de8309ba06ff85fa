use super::error::Result;
use super::secret::SigningSecret;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Default token lifetime: 24 hours
pub const DEFAULT_TTL_SECS: u64 = 24 * 60 * 60;

/// Token settings, usually the `[token]` section of the app config.
#[derive(Clone, Deserialize)]
pub struct TokenConfig {
    /// Signing secret (base64 or raw text), unset means misconfigured
    #[serde(default)]
    pub secret: Option<String>,
    /// Token lifetime in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Tolerated clock skew in seconds when verifying
    #[serde(default)]
    pub leeway_secs: u64,
}

fn default_ttl_secs() -> u64 {
    DEFAULT_TTL_SECS
}

impl TokenConfig {
    /// Config with the given secret and default lifetime
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            ..Self::default()
        }
    }

    /// Build the shared signing secret, failing if it is unset or too short.
    pub fn signing_secret(&self) -> Result<Arc<SigningSecret>> {
        let value = self.secret.as_deref().unwrap_or_default();
        SigningSecret::from_config_value(value).map(Arc::new)
    }

    /// Token lifetime
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Verification leeway
    #[must_use]
    pub fn leeway(&self) -> Duration {
        Duration::from_secs(self.leeway_secs)
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: None,
            ttl_secs: default_ttl_secs(),
            leeway_secs: 0,
        }
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("ttl_secs", &self.ttl_secs)
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}
