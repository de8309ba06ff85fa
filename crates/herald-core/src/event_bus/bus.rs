use super::observer::{Observer, ObserverError};
use super::types::{DispatchPolicy, DomainEvent, EventBusConfig, ObserverFailure, PublishReport};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, Weak};
use tracing::{debug, warn};

// ============================================================================
// Error Types
// ============================================================================

/// Event bus errors
#[derive(Debug, thiserror::Error)]
pub enum EventBusError {
    /// An observer failed while the bus runs with `StopOnError`
    #[error("observer #{position} failed on '{event_type}': {source}")]
    Observer {
        /// Event type being published
        event_type: String,
        /// Position of the failing observer in the subscriber list
        position: usize,
        /// Error returned by the observer
        #[source]
        source: ObserverError,
    },

    /// Event could not be turned into a payload
    #[error("event serialization failed: {0}")]
    Serialization(String),

    /// Internal error
    #[error("event bus internal error: {0}")]
    Internal(String),
}

/// Event bus result type
pub type Result<T> = std::result::Result<T, EventBusError>;

fn handle_lock_poison<T>(e: PoisonError<T>) -> EventBusError {
    EventBusError::Internal(format!("Lock poisoned: {}", e))
}

// ============================================================================
// Event Bus
// ============================================================================

type Registry = HashMap<String, Vec<Weak<dyn Observer>>>;

/// Whether `handle` refers to the live observer at `target`.
///
/// Dead handles never match: their allocation may have been reused.
fn refers_to(handle: &Weak<dyn Observer>, target: *const ()) -> bool {
    handle.strong_count() > 0 && handle.as_ptr() as *const () == target
}

/// Synchronous publish/subscribe registry keyed by event type name.
///
/// Cloning is cheap and every clone shares the same registry, so the bus can
/// be handed to publishers and subscribers explicitly instead of living in a
/// global. Observers are held weakly: dropping the last `Arc` of an observer
/// silently ends its subscriptions.
#[derive(Clone)]
pub struct EventBus {
    registry: Arc<RwLock<Registry>>,
    policy: DispatchPolicy,
}

impl EventBus {
    /// Create an empty bus with the given failure policy.
    #[must_use]
    pub fn new(policy: DispatchPolicy) -> Self {
        Self {
            registry: Arc::new(RwLock::new(HashMap::new())),
            policy,
        }
    }

    /// Create a bus from configuration.
    #[must_use]
    pub fn from_config(config: &EventBusConfig) -> Self {
        Self::new(config.dispatch_policy)
    }

    /// Failure policy of this bus
    #[must_use]
    pub fn policy(&self) -> DispatchPolicy {
        self.policy
    }

    /// Register `observer` under `event_type`.
    ///
    /// Subscribing the same observer twice means it is notified twice.
    pub fn subscribe<O>(&self, event_type: &str, observer: &Arc<O>) -> Result<()>
    where
        O: Observer + 'static,
    {
        let weak: Weak<O> = Arc::downgrade(observer);
        let handle: Weak<dyn Observer> = weak;
        let mut registry = self.registry.write().map_err(handle_lock_poison)?;
        let observers = registry.entry(event_type.to_string()).or_default();
        observers.push(handle);

        debug!(
            event_type = %event_type,
            subscribers = observers.len(),
            "Observer subscribed"
        );
        Ok(())
    }

    /// Remove the first registration of `observer` under `event_type`.
    ///
    /// Returns `false` (not an error) when there was nothing to remove.
    pub fn unsubscribe<O>(&self, event_type: &str, observer: &Arc<O>) -> Result<bool>
    where
        O: Observer + 'static,
    {
        let target = Arc::as_ptr(observer) as *const ();
        let mut registry = self.registry.write().map_err(handle_lock_poison)?;

        let Some(observers) = registry.get_mut(event_type) else {
            return Ok(false);
        };
        let Some(index) = observers.iter().position(|h| refers_to(h, target)) else {
            return Ok(false);
        };

        observers.remove(index);
        if observers.is_empty() {
            registry.remove(event_type);
        }

        debug!(event_type = %event_type, "Observer unsubscribed");
        Ok(true)
    }

    /// Remove every registration of `observer` across all event types.
    ///
    /// Returns the number of registrations removed.
    pub fn unsubscribe_all<O>(&self, observer: &Arc<O>) -> Result<usize>
    where
        O: Observer + 'static,
    {
        let target = Arc::as_ptr(observer) as *const ();
        let mut registry = self.registry.write().map_err(handle_lock_poison)?;

        let mut removed = 0;
        registry.retain(|_, observers| {
            let before = observers.len();
            observers.retain(|h| !refers_to(h, target));
            removed += before - observers.len();
            !observers.is_empty()
        });

        Ok(removed)
    }

    /// Notify every live observer of `event_type`, in registration order.
    ///
    /// Observers run on the caller's thread against a snapshot of the
    /// subscriber list, so they may subscribe or unsubscribe from inside
    /// `receive`; such changes apply to the next publish.
    pub fn publish(&self, event_type: &str, payload: &Value) -> Result<PublishReport> {
        let (snapshot, has_dead) = {
            let registry = self.registry.read().map_err(handle_lock_poison)?;
            match registry.get(event_type) {
                Some(handles) => {
                    let live: Vec<Arc<dyn Observer>> =
                        handles.iter().filter_map(Weak::upgrade).collect();
                    let has_dead = live.len() < handles.len();
                    (live, has_dead)
                }
                None => (Vec::new(), false),
            }
        };

        if has_dead {
            self.prune(event_type)?;
        }

        if snapshot.is_empty() {
            debug!(event_type = %event_type, "No subscribers, event dropped");
            return Ok(PublishReport::default());
        }

        let mut report = PublishReport::default();
        for (position, observer) in snapshot.iter().enumerate() {
            match observer.receive(event_type, payload) {
                Ok(()) => report.delivered += 1,
                Err(error) => match self.policy {
                    DispatchPolicy::ContinueOnError => {
                        warn!(
                            event_type = %event_type,
                            position,
                            error = %error,
                            "Observer failed, continuing"
                        );
                        report.failures.push(ObserverFailure { position, error });
                    }
                    DispatchPolicy::StopOnError => {
                        warn!(
                            event_type = %event_type,
                            position,
                            error = %error,
                            "Observer failed, aborting publish"
                        );
                        return Err(EventBusError::Observer {
                            event_type: event_type.to_string(),
                            position,
                            source: error,
                        });
                    }
                },
            }
        }

        debug!(
            event_type = %event_type,
            delivered = report.delivered,
            failed = report.failures.len(),
            "Event published"
        );
        Ok(report)
    }

    /// Publish a typed domain event under its own event type name.
    pub fn publish_event(&self, event: &DomainEvent) -> Result<PublishReport> {
        let payload = serde_json::to_value(event)
            .map_err(|e| EventBusError::Serialization(e.to_string()))?;
        self.publish(event.event_type(), &payload)
    }

    /// Number of live observers registered under `event_type`.
    #[must_use]
    pub fn subscriber_count(&self, event_type: &str) -> usize {
        self.registry
            .read()
            .map(|registry| {
                registry
                    .get(event_type)
                    .map(|handles| handles.iter().filter(|h| h.strong_count() > 0).count())
                    .unwrap_or(0)
            })
            .unwrap_or(0)
    }

    /// Event types that currently have at least one registration, sorted.
    #[must_use]
    pub fn event_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self
            .registry
            .read()
            .map(|registry| registry.keys().cloned().collect())
            .unwrap_or_default();
        types.sort();
        types
    }

    /// Drop handles whose observer no longer exists.
    fn prune(&self, event_type: &str) -> Result<()> {
        let mut registry = self.registry.write().map_err(handle_lock_poison)?;
        if let Some(handles) = registry.get_mut(event_type) {
            let before = handles.len();
            handles.retain(|h| h.strong_count() > 0);
            debug!(
                event_type = %event_type,
                pruned = before - handles.len(),
                "Pruned dropped observers"
            );
            if handles.is_empty() {
                registry.remove(event_type);
            }
        }
        Ok(())
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DispatchPolicy::default())
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("policy", &self.policy)
            .field("event_types", &self.event_types())
            .finish()
    }
}
