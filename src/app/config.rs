//! Application configuration types

use herald_core::{EventBusConfig, TokenConfig};
use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub token: TokenConfig,
    #[serde(default)]
    pub events: EventBusConfig,
}

impl AppConfig {
    /// Whether a signing secret was configured at all
    pub fn has_secret(&self) -> bool {
        self.token
            .secret
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }
}
