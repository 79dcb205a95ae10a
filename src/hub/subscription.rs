//! Subscription handles

use std::sync::{Mutex, PoisonError, Weak};

use super::ObserverList;

/// Capability to remove one observer from a [`SubscriptionHub`](super::SubscriptionHub)
///
/// Dropping the handle leaves the observer registered; call
/// [`unsubscribe`](Subscription::unsubscribe) to remove it.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    observers: Weak<Mutex<ObserverList>>,
}

impl Subscription {
    pub(super) fn new(id: u64, observers: Weak<Mutex<ObserverList>>) -> Self {
        Self { id, observers }
    }

    /// Observer id, unique within its hub
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Remove the observer
    ///
    /// Repeated calls, or calls after the hub is gone, do nothing.
    pub fn unsubscribe(&self) {
        let Some(observers) = self.observers.upgrade() else {
            return;
        };

        let mut observers = observers.lock().unwrap_or_else(PoisonError::into_inner);
        let before = observers.len();
        observers.retain(|(id, _)| *id != self.id);

        if observers.len() < before {
            tracing::debug!(observer = self.id, remaining = observers.len(), "Observer removed");
        }
    }
}
