use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Weak,
};

use parking_lot::Mutex;

type Callback = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: AtomicU64,
    callbacks: Mutex<Vec<(u64, Callback)>>,
}

/// Payload-free "catalog changed" broadcast. Subscribers re-read the store
/// when called; nothing is queued for late subscribers.
#[derive(Clone, Default)]
pub struct ChangeNotifier {
    listeners: Arc<Listeners>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.listeners.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.callbacks.lock().push((id, Arc::new(callback)));
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    pub fn notify(&self) {
        // Snapshot first: callbacks may subscribe or unsubscribe
        let callbacks: Vec<Callback> = self.listeners.callbacks
            .lock()
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();

        tracing::debug!("Notifying {} catalog subscribers", callbacks.len());
        for callback in callbacks {
            callback();
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.callbacks.lock().len()
    }
}

/// Dropping the handle unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    listeners: Weak<Listeners>,
}

impl Subscription {
    pub fn unsubscribe(self) {}

    /// Keeps the callback registered for the notifier's whole lifetime.
    pub fn detach(mut self) {
        self.listeners = Weak::new();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.callbacks.lock().retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    fn counter(notifier: &ChangeNotifier) -> (Arc<AtomicUsize>, Subscription) {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        let sub = notifier.subscribe(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        (hits, sub)
    }

    #[test]
    fn every_subscriber_is_called() {
        let notifier = ChangeNotifier::new();
        let (a, _sa) = counter(&notifier);
        let (b, _sb) = counter(&notifier);

        notifier.notify();
        assert_eq!(a.load(Ordering::SeqCst), 1);
        assert_eq!(b.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribed_callbacks_stop_firing() {
        let notifier = ChangeNotifier::new();
        let (hits, sub) = counter(&notifier);

        sub.unsubscribe();
        notifier.notify();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[test]
    fn detached_subscription_outlives_handle() {
        let notifier = ChangeNotifier::new();
        let (hits, sub) = counter(&notifier);

        sub.detach();
        notifier.notify();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn no_replay_for_late_subscribers() {
        let notifier = ChangeNotifier::new();
        notifier.notify();

        let (hits, _sub) = counter(&notifier);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
