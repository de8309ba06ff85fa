//! Herald Core - events and bearer tokens
//!
//! This crate provides:
//! - Event bus: observer registry with ordered, synchronous publish
//! - Tokens: stateless HS256 JWT issuing and verification
//! - Auth: credential checks that tie the two together

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod auth;
pub mod error;
pub mod event_bus;
pub mod token;

pub use auth::{AuthError, Authenticator, CredentialStore, InMemoryCredentialStore};
pub use error::{format_error_for_cli, Error, Result, UserFriendlyError};
pub use event_bus::{
    ChannelObserver, DispatchPolicy, DomainEvent, EventBus, EventBusConfig, EventBusError,
    FnObserver, ForwardedEvent, LoggingObserver, Observer, ObserverError, ObserverFailure,
    PublishReport,
};
pub use token::{
    Claims, Clock, FakeClock, IssuedToken, SigningSecret, SystemClock, TokenConfig, TokenError,
    TokenIssuer, TokenVerifier, VerifiedToken,
};
