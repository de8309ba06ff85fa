//! Service construction

use super::config::AppConfig;
use herald_core::{token, Authenticator, EventBus, InMemoryCredentialStore, TokenIssuer};
use std::sync::Arc;
use tracing::info;

/// Everything the CLI commands need, built once from configuration.
pub struct App {
    pub bus: EventBus,
    pub issuer: TokenIssuer,
    pub auth: Authenticator,
}

impl App {
    /// Build the services. Fails if the signing secret is missing or weak.
    pub fn from_config(config: &AppConfig) -> herald_core::Result<Self> {
        let (issuer, verifier) = token::from_config(&config.token)?;
        let bus = EventBus::from_config(&config.events);
        let auth = Authenticator::new(
            Arc::new(InMemoryCredentialStore::new()),
            issuer.clone(),
            verifier,
            bus.clone(),
        );

        info!(
            ttl_secs = config.token.ttl_secs,
            leeway_secs = config.token.leeway_secs,
            dispatch_policy = ?config.events.dispatch_policy,
            "Herald services initialized"
        );

        Ok(Self {
            bus,
            issuer,
            auth,
        })
    }
}
