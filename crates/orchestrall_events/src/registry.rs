//! Typed event subscriptions with cancellable handles.

use orchestrall_core::StreamEvent;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, trace};

type Handler = Arc<dyn Fn(&StreamEvent) + Send + Sync>;

struct Entry {
    id: u64,
    handler: Handler,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    handlers: HashMap<String, Vec<Entry>>,
}

/// Registry mapping event type names to their handlers.
///
/// Clones share the same table, so handlers registered before a connection
/// is opened keep firing on the stream that connection produces.  Handler
/// invocation is synchronous and happens on the dispatch loop's task.
///
/// ```
/// use orchestrall_events::SubscriptionRegistry;
///
/// let registry = SubscriptionRegistry::new();
/// let subscription = registry.subscribe("workflow.completed", |event| {
///     println!("{:?}", event.get("executionId"));
/// });
/// subscription.cancel();
/// ```
#[derive(Clone, Default)]
pub struct SubscriptionRegistry {
    inner: Arc<Mutex<Inner>>,
}

impl SubscriptionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for one event type.
    ///
    /// The handler stays registered until the returned [`Subscription`] is
    /// cancelled; dropping the handle without cancelling leaves the handler
    /// in place.
    pub fn subscribe(
        &self,
        event_type: impl Into<String>,
        handler: impl Fn(&StreamEvent) + Send + Sync + 'static,
    ) -> Subscription {
        let event_type = event_type.into();
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.handlers.entry(event_type.clone()).or_default().push(Entry {
            id,
            handler: Arc::new(handler),
        });
        debug!(event_type = %event_type, id, "Registered event handler");
        Subscription {
            registry: self.clone(),
            event_type,
            id,
        }
    }

    /// Invokes every handler registered for the event's type, in
    /// registration order.
    ///
    /// Returns the number of handlers invoked; an event type nobody
    /// subscribed to delivers to zero handlers and is not an error.
    pub fn dispatch(&self, event: &StreamEvent) -> usize {
        // Handlers are cloned out so a handler can subscribe or cancel
        // without deadlocking against the dispatch.
        let handlers: Vec<Handler> = {
            let inner = self.lock();
            inner
                .handlers
                .get(event.event_type())
                .map(|entries| entries.iter().map(|entry| entry.handler.clone()).collect())
                .unwrap_or_default()
        };
        for handler in &handlers {
            handler(event);
        }
        trace!(
            event_type = %event.event_type(),
            delivered = handlers.len(),
            "Dispatched event"
        );
        handlers.len()
    }

    fn remove(&self, event_type: &str, id: u64) {
        let mut inner = self.lock();
        if let Some(entries) = inner.handlers.get_mut(event_type) {
            entries.retain(|entry| entry.id != id);
            if entries.is_empty() {
                inner.handlers.remove(event_type);
            }
        }
    }

    // Dispatch must survive a handler that panicked while holding nothing
    // of ours; a poisoned lock still guards consistent data here.
    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SubscriptionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        let handlers: usize = inner.handlers.values().map(Vec::len).sum();
        f.debug_struct("SubscriptionRegistry")
            .field("event_types", &inner.handlers.len())
            .field("handlers", &handlers)
            .finish()
    }
}

/// A cancellable registration of one handler for one event type.
///
/// The handle is a capability to cancel, not a lease: dropping it leaves
/// the subscription active.
pub struct Subscription {
    registry: SubscriptionRegistry,
    event_type: String,
    id: u64,
}

impl Subscription {
    /// The event type this subscription listens for.
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Removes exactly this handler from the registry.
    ///
    /// Other handlers for the same event type keep firing.
    pub fn cancel(self) {
        debug!(event_type = %self.event_type, id = self.id, "Cancelled event handler");
        self.registry.remove(&self.event_type, self.id);
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("event_type", &self.event_type)
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn event(event_type: &str) -> StreamEvent {
        serde_json::from_value(serde_json::json!({"type": event_type})).unwrap()
    }

    #[test]
    fn dispatch_reaches_every_handler_for_the_type() {
        let registry = SubscriptionRegistry::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let first_count = first.clone();
        let _a = registry.subscribe("tick", move |_| {
            first_count.fetch_add(1, Ordering::SeqCst);
        });
        let second_count = second.clone();
        let _b = registry.subscribe("tick", move |_| {
            second_count.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(registry.dispatch(&event("tick")), 2);
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribed_types_deliver_to_nobody() {
        let registry = SubscriptionRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));

        let seen = count.clone();
        let _a = registry.subscribe("tick", move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(registry.dispatch(&event("tock")), 0);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn cancel_removes_exactly_the_cancelled_handler() {
        let registry = SubscriptionRegistry::new();
        let kept = Arc::new(AtomicUsize::new(0));
        let cancelled = Arc::new(AtomicUsize::new(0));

        let kept_count = kept.clone();
        let _keep = registry.subscribe("tick", move |_| {
            kept_count.fetch_add(1, Ordering::SeqCst);
        });
        let cancelled_count = cancelled.clone();
        let drop_me = registry.subscribe("tick", move |_| {
            cancelled_count.fetch_add(1, Ordering::SeqCst);
        });

        drop_me.cancel();

        assert_eq!(registry.dispatch(&event("tick")), 1);
        assert_eq!(kept.load(Ordering::SeqCst), 1);
        assert_eq!(cancelled.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn dropping_the_handle_leaves_the_subscription_active() {
        let registry = SubscriptionRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));

        let seen = count.clone();
        let subscription = registry.subscribe("tick", move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        drop(subscription);

        assert_eq!(registry.dispatch(&event("tick")), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn handlers_receive_the_event_payload() {
        let registry = SubscriptionRegistry::new();
        let seen = Arc::new(Mutex::new(None));

        let slot = seen.clone();
        let _sub = registry.subscribe("workflow.completed", move |event| {
            *slot.lock().unwrap() = event.get("executionId").cloned();
        });

        let event: StreamEvent = serde_json::from_value(serde_json::json!({
            "type": "workflow.completed",
            "executionId": "w-42",
        }))
        .unwrap();
        registry.dispatch(&event);

        assert_eq!(*seen.lock().unwrap(), Some(serde_json::json!("w-42")));
    }
}
