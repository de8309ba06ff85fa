//! EventBus - synchronous observer registry keyed by event type name.
//!
//! Publishers and subscribers share one explicitly owned [`EventBus`]; a
//! publish runs every observer of that event type on the caller's thread, in
//! the order they subscribed.

/// Core registry and dispatch.
pub mod bus;
/// Observer trait and the provided observer variants.
pub mod observer;
/// Domain events, dispatch policy and publish reports.
pub mod types;

pub use bus::{EventBus, EventBusError};
pub use observer::{
    ChannelObserver, FnObserver, ForwardedEvent, LoggingObserver, Observer, ObserverError,
};
pub use types::{
    DispatchPolicy, DomainEvent, EventBusConfig, ObserverFailure, PublishReport, USER_LOGGED_IN,
    USER_LOGIN_FAILED, USER_REGISTERED,
};
