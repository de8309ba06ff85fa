use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::observer::ObserverError;

/// Event type name published when a user registers
pub const USER_REGISTERED: &str = "user.registered";
/// Event type name published after a successful login
pub const USER_LOGGED_IN: &str = "user.logged_in";
/// Event type name published when a login attempt is rejected
pub const USER_LOGIN_FAILED: &str = "user.login_failed";

/// Account lifecycle events emitted by the authentication flow.
///
/// **Security note**: events never carry passwords or tokens. Observers that
/// need the token must get it from the caller of `login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A new account was created
    UserRegistered {
        /// Unique event identifier
        event_id: Uuid,
        /// Username of the new account
        username: String,
        /// When the account was created
        at: DateTime<Utc>,
    },
    /// A user logged in and received a token
    UserLoggedIn {
        /// Unique event identifier
        event_id: Uuid,
        /// Authenticated username
        username: String,
        /// Expiry of the issued token (seconds since the Unix epoch)
        token_expires_at: i64,
        /// When the login happened
        at: DateTime<Utc>,
    },
    /// A login attempt was rejected
    LoginFailed {
        /// Unique event identifier
        event_id: Uuid,
        /// Username that was attempted
        username: String,
        /// When the attempt happened
        at: DateTime<Utc>,
    },
}

impl DomainEvent {
    /// Build a `UserRegistered` event stamped with the current time.
    pub fn user_registered(username: impl Into<String>) -> Self {
        Self::UserRegistered {
            event_id: Uuid::new_v4(),
            username: username.into(),
            at: Utc::now(),
        }
    }

    /// Build a `UserLoggedIn` event stamped with the current time.
    pub fn user_logged_in(username: impl Into<String>, token_expires_at: i64) -> Self {
        Self::UserLoggedIn {
            event_id: Uuid::new_v4(),
            username: username.into(),
            token_expires_at,
            at: Utc::now(),
        }
    }

    /// Build a `LoginFailed` event stamped with the current time.
    pub fn login_failed(username: impl Into<String>) -> Self {
        Self::LoginFailed {
            event_id: Uuid::new_v4(),
            username: username.into(),
            at: Utc::now(),
        }
    }

    /// Event type name the event is published under.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::UserRegistered { .. } => USER_REGISTERED,
            Self::UserLoggedIn { .. } => USER_LOGGED_IN,
            Self::LoginFailed { .. } => USER_LOGIN_FAILED,
        }
    }

    /// Username the event is about.
    #[must_use]
    pub fn username(&self) -> &str {
        match self {
            Self::UserRegistered { username, .. }
            | Self::UserLoggedIn { username, .. }
            | Self::LoginFailed { username, .. } => username,
        }
    }
}

/// What `publish` does when an observer returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchPolicy {
    /// Log the failure, record it in the report and keep notifying
    #[default]
    ContinueOnError,
    /// Stop at the first failure and return it to the publisher
    StopOnError,
}

/// Event bus settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventBusConfig {
    /// Observer failure policy
    #[serde(default)]
    pub dispatch_policy: DispatchPolicy,
}

/// A failure isolated during a publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObserverFailure {
    /// Position of the observer in the subscriber list at publish time
    pub position: usize,
    /// Error it returned
    pub error: ObserverError,
}

/// Outcome of one `publish` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Observers that handled the event successfully
    pub delivered: usize,
    /// Observers that returned an error (only under `ContinueOnError`)
    pub failures: Vec<ObserverFailure>,
}

impl PublishReport {
    /// Total observers invoked
    #[must_use]
    pub fn notified(&self) -> usize {
        self.delivered + self.failures.len()
    }

    /// Whether every invoked observer succeeded
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
