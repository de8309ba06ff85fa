//! Authentication flow
//!
//! Provides:
//! - `CredentialStore`: password checks (salted SHA-256 in memory by default)
//! - `Authenticator`: register/login/authenticate on top of the token and
//!   event bus modules
//! - Constant-time hash comparison

#![forbid(unsafe_code)]

use crate::event_bus::EventBusError;
use crate::token::TokenError;

/// Register/login/authenticate flow.
pub mod authenticator;
/// Credential storage.
pub mod store;

pub use authenticator::Authenticator;
pub use store::{CredentialStore, InMemoryCredentialStore};

// ============================================================================
// Error Types
// ============================================================================

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No credentials provided
    #[error("Authentication required")]
    MissingCredentials,

    /// Wrong username or password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Username already registered
    #[error("User already exists: {0}")]
    UserExists(String),

    /// Rejected username or password format
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Token could not be issued or verified
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Account event could not be published
    #[error(transparent)]
    Events(#[from] EventBusError),

    /// Internal error
    #[error("Auth internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Whether the caller should answer "not authenticated" (401-style)
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        match self {
            Self::MissingCredentials | Self::InvalidCredentials => true,
            Self::Token(e) => e.is_auth_failure(),
            _ => false,
        }
    }
}

/// Auth result type
pub type Result<T> = std::result::Result<T, AuthError>;

#[cfg(test)]
mod tests;
