use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use synclink_proto::SignalKind;
use tracing::{debug, error, warn};

/// One delivered signal.
#[derive(Debug, Clone)]
pub struct SignalEvent {
    pub kind: SignalKind,
    pub params: Value,
}

type Handler = Arc<dyn Fn(&SignalEvent) + Send + Sync>;

struct Subscription {
    id: u64,
    kind: SignalKind,
    handler: Handler,
}

/// Opaque handle returned by [`SignalHub::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionHandle(u64);

/// Event bus for unsolicited daemon notifications.
///
/// Handlers for a kind run in registration order over a snapshot taken
/// at publish time; subscribing or unsubscribing during a publish does
/// not affect that publish. A panicking handler is caught and logged so
/// it can neither skip later handlers nor unwind into the read loop.
#[derive(Default)]
pub struct SignalHub {
    subs: Mutex<Vec<Subscription>>,
    next_id: AtomicU64,
}

impl SignalHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one signal kind.
    pub fn subscribe<F>(&self, kind: SignalKind, handler: F) -> SubscriptionHandle
    where
        F: Fn(&SignalEvent) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subs
            .lock()
            .expect("signal hub lock poisoned")
            .push(Subscription {
                id,
                kind,
                handler: Arc::new(handler),
            });
        SubscriptionHandle(id)
    }

    /// Remove a subscription. Returns false if the handle was already
    /// gone.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        let mut subs = self.subs.lock().expect("signal hub lock poisoned");
        let before = subs.len();
        subs.retain(|sub| sub.id != handle.0);
        subs.len() != before
    }

    /// Drop every subscription. Used at connection teardown.
    pub fn clear(&self) {
        self.subs.lock().expect("signal hub lock poisoned").clear();
    }

    /// Fan a signal out to current subscribers of its kind.
    pub fn publish(&self, num: i32, params: Value) {
        let Some(kind) = SignalKind::from_num(num) else {
            warn!(num, "signal with unknown kind dropped");
            return;
        };

        let snapshot: Vec<Handler> = {
            let subs = self.subs.lock().expect("signal hub lock poisoned");
            subs.iter()
                .filter(|sub| sub.kind == kind)
                .map(|sub| Arc::clone(&sub.handler))
                .collect()
        };

        if snapshot.is_empty() {
            debug!(?kind, "signal has no subscribers");
            return;
        }

        let event = SignalEvent { kind, params };
        for handler in snapshot {
            if catch_unwind(AssertUnwindSafe(|| handler(&event))).is_err() {
                error!(?kind, "signal handler panicked");
            }
        }
    }

    /// Number of live subscriptions, all kinds.
    pub fn subscriber_count(&self) -> usize {
        self.subs.lock().expect("signal hub lock poisoned").len()
    }
}

impl std::fmt::Debug for SignalHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalHub")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use serde_json::json;

    use super::*;

    #[test]
    fn fans_out_to_all_subscribers_in_registration_order() {
        let hub = SignalHub::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second"] {
            let order = Arc::clone(&order);
            hub.subscribe(SignalKind::UserAdded, move |_| {
                order.lock().unwrap().push(tag);
            });
        }

        hub.publish(SignalKind::UserAdded.num(), json!({"userDbId": 1}));
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn handlers_only_see_their_kind() {
        let hub = SignalHub::new();
        let count = Arc::new(AtomicUsize::new(0));

        let counted = Arc::clone(&count);
        hub.subscribe(SignalKind::SyncProgressInfo, move |_| {
            counted.fetch_add(1, Ordering::SeqCst);
        });

        hub.publish(SignalKind::UserAdded.num(), json!({}));
        hub.publish(SignalKind::SyncProgressInfo.num(), json!({}));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_handler_does_not_block_later_handlers() {
        let hub = SignalHub::new();
        let reached = Arc::new(AtomicUsize::new(0));

        hub.subscribe(SignalKind::UserAdded, |_| panic!("handler bug"));
        let reached_clone = Arc::clone(&reached);
        hub.subscribe(SignalKind::UserAdded, move |_| {
            reached_clone.fetch_add(1, Ordering::SeqCst);
        });

        hub.publish(SignalKind::UserAdded.num(), json!({}));
        assert_eq!(reached.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_removes_exactly_one_handler() {
        let hub = SignalHub::new();
        let count = Arc::new(AtomicUsize::new(0));

        let kept = Arc::clone(&count);
        hub.subscribe(SignalKind::UserAdded, move |_| {
            kept.fetch_add(1, Ordering::SeqCst);
        });
        let removed = Arc::clone(&count);
        let handle = hub.subscribe(SignalKind::UserAdded, move |_| {
            removed.fetch_add(10, Ordering::SeqCst);
        });

        assert!(hub.unsubscribe(handle));
        assert!(!hub.unsubscribe(handle));

        hub.publish(SignalKind::UserAdded.num(), json!({}));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unknown_signal_num_is_dropped() {
        let hub = SignalHub::new();
        let count = Arc::new(AtomicUsize::new(0));

        let counted = Arc::clone(&count);
        hub.subscribe(SignalKind::UserAdded, move |_| {
            counted.fetch_add(1, Ordering::SeqCst);
        });

        hub.publish(9999, json!({}));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn subscription_during_publish_does_not_affect_that_publish() {
        let hub = Arc::new(SignalHub::new());
        let late_calls = Arc::new(AtomicUsize::new(0));

        let hub_clone = Arc::clone(&hub);
        let late_calls_clone = Arc::clone(&late_calls);
        hub.subscribe(SignalKind::UserAdded, move |_| {
            let late_calls = Arc::clone(&late_calls_clone);
            hub_clone.subscribe(SignalKind::UserAdded, move |_| {
                late_calls.fetch_add(1, Ordering::SeqCst);
            });
        });

        hub.publish(SignalKind::UserAdded.num(), json!({}));
        assert_eq!(late_calls.load(Ordering::SeqCst), 0);

        // The handler added mid-publish participates next time.
        hub.publish(SignalKind::UserAdded.num(), json!({}));
        assert_eq!(late_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn event_carries_params() {
        let hub = SignalHub::new();
        let seen = Arc::new(Mutex::new(None));

        let seen_clone = Arc::clone(&seen);
        hub.subscribe(SignalKind::SyncProgressInfo, move |event| {
            *seen_clone.lock().unwrap() = Some(event.params.clone());
        });

        hub.publish(
            SignalKind::SyncProgressInfo.num(),
            json!({"syncDbId": 3, "progress": 50}),
        );
        assert_eq!(
            *seen.lock().unwrap(),
            Some(json!({"syncDbId": 3, "progress": 50}))
        );
    }
}
