//! Explicit observer registry for store changes

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// What changed in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// File records were created or overwritten
    FilesSaved(Vec<Uuid>),
    /// File records (and their blobs) were removed
    FilesRemoved(Vec<Uuid>),
    /// A tag record was created, overwritten or removed
    TagsChanged,
    /// Every record and blob was cleared
    Cleared,
}

impl StoreEvent {
    /// Whether the event can affect the file listing
    #[must_use]
    pub const fn touches_files(&self) -> bool {
        !matches!(self, Self::TagsChanged)
    }
}

type Handler = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

/// Handle returned by `ChangeBus::subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Subscription(u64);

/// Ordered list of change listeners
///
/// Listeners are called in the order they subscribed. Handlers run outside the
/// registry lock, so a handler may subscribe or unsubscribe without deadlocking;
/// such changes take effect from the next `emit`.
pub struct ChangeBus {
    next_id: AtomicU64,
    handlers: Mutex<BTreeMap<u64, Handler>>,
}

impl ChangeBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            handlers: Mutex::new(BTreeMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<u64, Handler>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a listener
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().insert(id, Arc::new(handler));
        Subscription(id)
    }

    /// Remove a listener
    ///
    /// Returns `false` if the subscription was already removed.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        self.lock().remove(&subscription.0).is_some()
    }

    /// Deliver `event` to every listener in subscription order
    pub fn emit(&self, event: &StoreEvent) {
        let handlers: Vec<Handler> = self.lock().values().cloned().collect();
        tracing::trace!(?event, listeners = handlers.len(), "dispatching store event");
        for handler in handlers {
            handler(event);
        }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ChangeBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_in_subscription_order() {
        let bus = ChangeBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for n in 0..3 {
            let seen = Arc::clone(&seen);
            bus.subscribe(move |_| seen.lock().unwrap().push(n));
        }

        bus.emit(&StoreEvent::TagsChanged);
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let bus = ChangeBus::new();
        let count = Arc::new(AtomicU64::new(0));
        let c = Arc::clone(&count);
        let sub = bus.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(&StoreEvent::Cleared);
        assert!(bus.unsubscribe(sub));
        assert!(!bus.unsubscribe(sub));
        bus.emit(&StoreEvent::Cleared);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_handler_may_subscribe_during_emit() {
        let bus = Arc::new(ChangeBus::new());
        let inner = Arc::clone(&bus);
        bus.subscribe(move |_| {
            inner.subscribe(|_| {});
        });

        bus.emit(&StoreEvent::FilesSaved(vec![]));
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[test]
    fn test_touches_files() {
        assert!(StoreEvent::FilesRemoved(vec![]).touches_files());
        assert!(!StoreEvent::TagsChanged.touches_files());
    }
}
