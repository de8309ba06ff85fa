use chrono::{DateTime, Utc};

/// Token issuance and verification errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Signing secret missing or too weak, or an invalid lifetime
    #[error("token configuration error: {0}")]
    Configuration(String),

    /// Token is not a well-formed compact serialization
    #[error("malformed token: {0}")]
    Malformed(String),

    /// Signature does not match the header and payload
    #[error("invalid token signature")]
    InvalidSignature,

    /// Token lifetime is over
    #[error("token expired at {expired_at}")]
    Expired {
        /// Expiry claim of the rejected token
        expired_at: DateTime<Utc>,
    },

    /// Token claims to be issued in the future
    #[error("token not valid before {issued_at}")]
    NotYetValid {
        /// Issued-at claim of the rejected token
        issued_at: DateTime<Utc>,
    },

    /// Identity to issue a token for is empty
    #[error("token subject must not be empty")]
    InvalidIdentity,
}

impl TokenError {
    /// Whether the caller should treat this as "not authenticated" and ask
    /// the client to log in again.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::Malformed(_)
                | Self::InvalidSignature
                | Self::Expired { .. }
                | Self::NotYetValid { .. }
        )
    }
}

/// Token result type
pub type Result<T> = std::result::Result<T, TokenError>;
