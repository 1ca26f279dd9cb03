//! Synchronous change notification.
//!
//! The stores publish a change event after every successful mutation,
//! before the mutating call returns. Subscribers registered at that point
//! are guaranteed to observe the post-mutation snapshot. One panicking
//! subscriber must not starve the others, so each handler runs behind
//! `catch_unwind` and failures are logged.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use uuid::Uuid;

/// Subscription handle for unsubscribing from change notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Type alias for change handler functions
type ChangeHandler<E> = Box<dyn Fn(&E) + Send + Sync>;

/// Synchronous publisher used by the guide and point stores.
///
/// Handlers are invoked on the mutating thread; they should return quickly
/// to avoid stretching the mutation call.
pub struct ChangeNotifier<E> {
    handlers: RwLock<HashMap<SubscriptionId, ChangeHandler<E>>>,
}

impl<E> ChangeNotifier<E> {
    /// Create an empty notifier
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Subscribe to change notifications
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        self.handlers.write().insert(id, Box::new(handler));
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Unsubscribe from change notifications
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.handlers.write().remove(&id).is_some();
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Get the number of active subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Notify all subscribers synchronously
    ///
    /// A panicking handler is caught and logged; the remaining handlers
    /// still run.
    pub fn notify(&self, event: &E) {
        let handlers = self.handlers.read();
        for (id, handler) in handlers.iter() {
            if catch_unwind(AssertUnwindSafe(|| handler(event))).is_err() {
                tracing::warn!("Change handler {} panicked; continuing with remaining", id);
            }
        }
    }
}

impl<E> Default for ChangeNotifier<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for ChangeNotifier<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let notifier: ChangeNotifier<u32> = ChangeNotifier::new();

        let id = notifier.subscribe(|_| {});
        assert_eq!(notifier.subscriber_count(), 1);

        assert!(notifier.unsubscribe(id));
        assert_eq!(notifier.subscriber_count(), 0);

        // Double unsubscribe should return false
        assert!(!notifier.unsubscribe(id));
    }

    #[test]
    fn test_notify_delivers_synchronously() {
        let notifier: ChangeNotifier<u32> = ChangeNotifier::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();

        let _id = notifier.subscribe(move |value| {
            counter_clone.fetch_add(*value as usize, Ordering::SeqCst);
        });

        notifier.notify(&3);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_panicking_handler_is_isolated() {
        let notifier: ChangeNotifier<()> = ChangeNotifier::new();
        let counter = Arc::new(AtomicUsize::new(0));

        notifier.subscribe(|_| panic!("listener failure"));
        let counter_clone = counter.clone();
        notifier.subscribe(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        notifier.notify(&());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
