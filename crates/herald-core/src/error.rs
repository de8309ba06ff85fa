//! Error types for herald-core
//!
//! This module provides the crate-wide error and user-friendly formatting.

use crate::auth::AuthError;
use crate::event_bus::EventBusError;
use crate::token::TokenError;
use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Token issuance or verification failed
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Event bus failure
    #[error("event bus error: {0}")]
    EventBus(#[from] EventBusError),

    /// Authentication failed
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for user-friendly error messages
///
/// Provides human-readable error messages and suggestions for fixing.
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get a suggestion for how to fix the error
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for TokenError {
    fn user_message(&self) -> String {
        match self {
            TokenError::Configuration(msg) => format!("Token signing is misconfigured: {}", msg),
            TokenError::Malformed(msg) => format!("That is not a valid token: {}", msg),
            TokenError::InvalidSignature => {
                "The token signature does not match; it was altered or signed elsewhere."
                    .to_string()
            }
            TokenError::Expired { expired_at } => {
                format!("The token expired at {}.", expired_at.to_rfc3339())
            }
            TokenError::NotYetValid { issued_at } => format!(
                "The token claims to be issued at {}, which is in the future.",
                issued_at.to_rfc3339()
            ),
            TokenError::InvalidIdentity => "A token needs a non-empty identity.".to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            TokenError::Configuration(_) => Some(
                "Run `herald gen-secret` and set HERALD_TOKEN__SECRET to the output.".to_string(),
            ),
            TokenError::Expired { .. }
            | TokenError::InvalidSignature
            | TokenError::Malformed(_) => Some("Log in again to get a new token.".to_string()),
            TokenError::NotYetValid { .. } => {
                Some("Check the clocks of the issuing and verifying hosts.".to_string())
            }
            TokenError::InvalidIdentity => None,
        }
    }
}

impl UserFriendlyError for Error {
    fn user_message(&self) -> String {
        match self {
            Error::Token(e) => e.user_message(),
            Error::EventBus(e) => format!("Event delivery failed: {}", e),
            Error::Auth(AuthError::Token(e)) => e.user_message(),
            Error::Auth(e) => format!("Authentication failed: {}", e),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Error::Token(e) | Error::Auth(AuthError::Token(e)) => e.suggestion(),
            Error::Auth(AuthError::InvalidCredentials) => {
                Some("Check the username and password.".to_string())
            }
            Error::Auth(AuthError::MissingCredentials) => {
                Some("Send the token as `Authorization: Bearer <token>`.".to_string())
            }
            _ => None,
        }
    }
}

/// Format an error for display in the CLI
pub fn format_error_for_cli(error: &Error) -> String {
    let mut output = error.user_message();

    if let Some(suggestion) = error.suggestion() {
        output.push_str("\n\n");
        output.push_str(&suggestion);
    }

    output
}

#[cfg(test)]
mod tests;
