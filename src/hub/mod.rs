//! Snapshot fan-out
//!
//! Two kinds of observers receive every post-tick snapshot:
//!
//! - callbacks registered with [`SubscriptionHub::subscribe`], invoked in
//!   registration order on the broadcasting task
//! - channel receivers from [`SubscriptionHub::subscribe_channel`], fed
//!   through `tokio::sync::broadcast`
//!
//! Snapshots handed to channel receivers are shared behind an `Arc`, so every
//! receiver reads the same allocation.

pub mod subscription;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast;

use crate::model::StreamRecord;

pub use subscription::Subscription;

/// Shared, immutable snapshot of all records in registry order
pub type Snapshot = Arc<Vec<StreamRecord>>;

/// Callback observer
pub type Observer = Arc<dyn Fn(&[StreamRecord]) + Send + Sync>;

pub(crate) type ObserverList = Vec<(u64, Observer)>;

/// Registry of snapshot observers
pub struct SubscriptionHub {
    observers: Arc<Mutex<ObserverList>>,
    next_id: AtomicU64,
    tx: broadcast::Sender<Snapshot>,
}

impl SubscriptionHub {
    /// Create a hub whose channel keeps up to `channel_capacity` snapshots
    /// for slow receivers
    pub fn new(channel_capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(channel_capacity.max(1));

        Self {
            observers: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(1),
            tx,
        }
    }

    /// Register a callback observer
    ///
    /// Each call registers a distinct observer, even for identical closures.
    #[must_use = "dropping the Subscription makes the observer impossible to remove"]
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&[StreamRecord]) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let observer: Observer = Arc::new(observer);
        let mut observers = self.lock();
        observers.push((id, observer));

        tracing::debug!(observer = id, observers = observers.len(), "Observer added");
        Subscription::new(id, Arc::downgrade(&self.observers))
    }

    /// Receive snapshots over a broadcast channel
    ///
    /// A receiver that falls behind gets `RecvError::Lagged` and skips ahead.
    pub fn subscribe_channel(&self) -> broadcast::Receiver<Snapshot> {
        self.tx.subscribe()
    }

    /// Deliver a snapshot to every observer
    ///
    /// A panicking callback is logged and skipped; the rest still run.
    /// Returns the number of callbacks that completed.
    pub fn broadcast(&self, snapshot: Snapshot) -> usize {
        // Copy out so callbacks run without the lock held and may
        // subscribe or unsubscribe themselves.
        let observers: Vec<(u64, Observer)> = self.lock().clone();

        let mut delivered = 0;
        for (id, observer) in observers {
            match catch_unwind(AssertUnwindSafe(|| observer(snapshot.as_slice()))) {
                Ok(()) => delivered += 1,
                Err(panic) => {
                    tracing::warn!(
                        observer = id,
                        reason = panic_message(panic.as_ref()),
                        "Observer panicked during broadcast"
                    );
                }
            }
        }

        // Err only means there are no channel receivers
        let _ = self.tx.send(snapshot);

        delivered
    }

    /// Number of callback observers
    pub fn observer_count(&self) -> usize {
        self.lock().len()
    }

    /// Number of live channel receivers
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Remove every callback observer
    pub fn clear(&self) {
        let mut observers = self.lock();
        let removed = observers.len();
        observers.clear();

        if removed > 0 {
            tracing::debug!(removed = removed, "Observers cleared");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ObserverList> {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SubscriptionHub {
    fn default() -> Self {
        Self::new(16)
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        *message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::model::record::test_record;

    fn snapshot() -> Snapshot {
        Arc::new(vec![test_record("a"), test_record("b")])
    }

    fn counter() -> (Arc<AtomicUsize>, impl Fn(&[StreamRecord]) + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&count);
        (count, move |_: &[StreamRecord]| {
            inner.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_delivers_in_registration_order() {
        let hub = SubscriptionHub::default();
        let order = Arc::new(Mutex::new(Vec::new()));

        for n in 0..3 {
            let order = Arc::clone(&order);
            let _ = hub.subscribe(move |records: &[StreamRecord]| {
                assert_eq!(records.len(), 2);
                order.lock().unwrap().push(n);
            });
        }

        assert_eq!(hub.broadcast(snapshot()), 3);
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_unsubscribe_by_identity() {
        let hub = SubscriptionHub::default();
        let (first_count, first) = counter();
        let (second_count, second) = counter();

        let first = hub.subscribe(first);
        let _second = hub.subscribe(second);
        assert_ne!(first.id(), _second.id());

        first.unsubscribe();
        first.unsubscribe();
        assert_eq!(hub.observer_count(), 1);

        hub.broadcast(snapshot());
        hub.broadcast(snapshot());

        assert_eq!(first_count.load(Ordering::SeqCst), 0);
        assert_eq!(second_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_duplicate_closures_tracked_independently() {
        let hub = SubscriptionHub::default();
        let count = Arc::new(AtomicUsize::new(0));

        let make = || {
            let count = Arc::clone(&count);
            move |_: &[StreamRecord]| {
                count.fetch_add(1, Ordering::SeqCst);
            }
        };
        let a = hub.subscribe(make());
        let _b = hub.subscribe(make());

        hub.broadcast(snapshot());
        assert_eq!(count.load(Ordering::SeqCst), 2);

        a.unsubscribe();
        hub.broadcast(snapshot());
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_panicking_observer_is_isolated() {
        let hub = SubscriptionHub::default();
        let _bad = hub.subscribe(|_: &[StreamRecord]| panic!("render failed"));
        let (count, good) = counter();
        let _good = hub.subscribe(good);

        assert_eq!(hub.broadcast(snapshot()), 1);
        assert_eq!(hub.broadcast(snapshot()), 1);
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(hub.observer_count(), 2);
    }

    #[test]
    fn test_clear_and_unsubscribe_after_clear() {
        let hub = SubscriptionHub::default();
        let (count, observer) = counter();
        let subscription = hub.subscribe(observer);

        hub.clear();
        subscription.unsubscribe();
        hub.broadcast(snapshot());

        assert_eq!(hub.observer_count(), 0);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unsubscribe_after_hub_dropped() {
        let hub = SubscriptionHub::default();
        let subscription = hub.subscribe(|_: &[StreamRecord]| {});
        drop(hub);
        subscription.unsubscribe();
    }

    #[tokio::test]
    async fn test_channel_receives_shared_snapshot() {
        let hub = SubscriptionHub::new(4);
        let mut rx = hub.subscribe_channel();
        assert_eq!(hub.receiver_count(), 1);

        let sent = snapshot();
        hub.broadcast(Arc::clone(&sent));

        let received = rx.recv().await.unwrap();
        assert!(Arc::ptr_eq(&sent, &received));
        assert_eq!(received[0].id(), "a");
    }

    #[test]
    fn test_broadcast_without_observers() {
        let hub = SubscriptionHub::default();
        assert_eq!(hub.broadcast(snapshot()), 0);
    }
}
