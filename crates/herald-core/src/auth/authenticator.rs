use super::store::CredentialStore;
use super::{AuthError, Result};
use crate::event_bus::{DomainEvent, EventBus};
use crate::token::{IssuedToken, TokenIssuer, TokenVerifier, VerifiedToken};
use std::sync::Arc;
use tracing::{info, warn};

/// Login flow: credential check, token issuance, account events.
///
/// Observer failures follow the bus's dispatch policy. Under
/// `StopOnError` a failing observer turns a successful register or login
/// into `AuthError::Events`, even though the account change already
/// happened. Rejected logins always return `InvalidCredentials`.
#[derive(Clone)]
pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
    issuer: TokenIssuer,
    verifier: TokenVerifier,
    bus: EventBus,
}

impl Authenticator {
    /// Wire the collaborators together
    pub fn new(
        store: Arc<dyn CredentialStore>,
        issuer: TokenIssuer,
        verifier: TokenVerifier,
        bus: EventBus,
    ) -> Self {
        Self {
            store,
            issuer,
            verifier,
            bus,
        }
    }

    /// The bus account events are published on
    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Create an account and publish `user.registered`.
    pub fn register(&self, username: &str, password: &str) -> Result<()> {
        self.store.register(username, password)?;
        info!(username = %username, "User registered");

        self.bus.publish_event(&DomainEvent::user_registered(username))?;
        Ok(())
    }

    /// Check credentials and issue a token.
    ///
    /// Publishes `user.logged_in` on success and `user.login_failed` when
    /// the credentials are rejected.
    pub fn login(&self, username: &str, password: &str) -> Result<IssuedToken> {
        if !self.store.verify_password(username, password)? {
            warn!(username = %username, "Login rejected");
            // A wrong password stays InvalidCredentials whatever the dispatch policy
            if let Err(e) = self.bus.publish_event(&DomainEvent::login_failed(username)) {
                warn!(username = %username, error = %e, "Login failure event not delivered");
            }
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self.issuer.issue_claims(username)?;
        info!(username = %username, "User logged in");

        self.bus
            .publish_event(&DomainEvent::user_logged_in(username, issued.claims.exp))?;
        Ok(issued)
    }

    /// Validate an `Authorization` header value or a bare token.
    ///
    /// The `Bearer` scheme prefix is optional and matched case-insensitively.
    pub fn authenticate(&self, credentials: &str) -> Result<VerifiedToken> {
        let credentials = credentials.trim();
        let token = match credentials.split_once(char::is_whitespace) {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
            None if credentials.eq_ignore_ascii_case("bearer") => "",
            _ => credentials,
        };

        if token.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        Ok(self.verifier.verify(token)?)
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("issuer", &self.issuer)
            .field("verifier", &self.verifier)
            .field("bus", &self.bus)
            .finish()
    }
}
