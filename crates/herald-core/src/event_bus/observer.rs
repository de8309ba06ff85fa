use serde_json::Value;
use tokio::sync::mpsc;
use tracing::info;

/// Error returned by an observer that could not handle an event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("observer failed: {0}")]
pub struct ObserverError(pub String);

impl ObserverError {
    /// Create a new observer error from any message
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Callback capability notified by the [`EventBus`](super::EventBus).
///
/// The bus only keeps a weak reference to each observer, so the subscriber
/// decides how long an observer lives by holding its `Arc`.
#[cfg_attr(test, mockall::automock)]
pub trait Observer: Send + Sync {
    /// Handle one published event.
    fn receive(&self, event_type: &str, payload: &Value) -> Result<(), ObserverError>;
}

// ============================================================================
// Closure observer
// ============================================================================

type Callback = dyn Fn(&str, &Value) -> Result<(), ObserverError> + Send + Sync;

/// Observer backed by a closure.
pub struct FnObserver {
    name: String,
    callback: Box<Callback>,
}

impl FnObserver {
    /// Wrap a closure as an observer
    pub fn new<F>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<(), ObserverError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            callback: Box::new(callback),
        }
    }

    /// Name given at construction (used in logs)
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for FnObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnObserver").field("name", &self.name).finish()
    }
}

impl Observer for FnObserver {
    fn receive(&self, event_type: &str, payload: &Value) -> Result<(), ObserverError> {
        (self.callback)(event_type, payload)
    }
}

// ============================================================================
// Logging observer
// ============================================================================

/// Observer that writes every event it receives to the tracing log.
#[derive(Debug, Default, Clone)]
pub struct LoggingObserver {
    target: String,
}

impl LoggingObserver {
    /// Create a logging observer labelled with `target`
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

impl Observer for LoggingObserver {
    fn receive(&self, event_type: &str, payload: &Value) -> Result<(), ObserverError> {
        info!(
            observer = %self.target,
            event_type = %event_type,
            payload = %payload,
            "Event received"
        );
        Ok(())
    }
}

// ============================================================================
// Channel observer
// ============================================================================

/// An event forwarded by [`ChannelObserver`].
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardedEvent {
    /// Event type name it was published under
    pub event_type: String,
    /// Published payload
    pub payload: Value,
}

/// Observer that forwards events into an unbounded tokio channel.
///
/// Lets async tasks consume bus traffic without blocking the publisher.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: mpsc::UnboundedSender<ForwardedEvent>,
}

impl ChannelObserver {
    /// Create the observer together with the receiving end of its channel
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ForwardedEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Observer for ChannelObserver {
    fn receive(&self, event_type: &str, payload: &Value) -> Result<(), ObserverError> {
        self.sender
            .send(ForwardedEvent {
                event_type: event_type.to_string(),
                payload: payload.clone(),
            })
            .map_err(|_| ObserverError::new("event channel receiver dropped"))
    }
}
