//! Progress bus: per-invitation publish/subscribe
//!
//! Subscribers are keyed by invitation id and invoked synchronously, in
//! registration order, on every publish for that id. There is no buffering
//! or replay: a late subscriber only sees the next publish. Unsubscribing
//! removes exactly one registration and is idempotent.

use projhub_types::EmailProgress;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use tracing::trace;
use uuid::Uuid;

type Callback = Arc<dyn Fn(&EmailProgress) + Send + Sync>;

struct Subscriber {
    token: u64,
    callback: Callback,
}

/// Publish/subscribe registry for delivery-progress snapshots
///
/// Multiple subscribers per invitation id are supported; duplicate
/// subscriptions are independent additional observers, not an error.
#[derive(Default)]
pub struct ProgressBus {
    subscribers: Mutex<HashMap<Uuid, Vec<Subscriber>>>,
    next_token: AtomicU64,
}

impl ProgressBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for one invitation id
    ///
    /// Returns a [`Subscription`] handle; call
    /// [`Subscription::unsubscribe`] to stop receiving snapshots. Dropping
    /// the handle without unsubscribing leaves the observer registered.
    pub fn subscribe<F>(self: &Arc<Self>, invitation_id: Uuid, callback: F) -> Subscription
    where
        F: Fn(&EmailProgress) + Send + Sync + 'static,
    {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.entry(invitation_id).or_default().push(Subscriber {
            token,
            callback: Arc::new(callback),
        });

        trace!(invitation_id = %invitation_id, token, "Registered progress subscriber");

        Subscription {
            bus: Arc::downgrade(self),
            invitation_id,
            token,
            active: AtomicBool::new(true),
        }
    }

    /// Fan a snapshot out to all current subscribers for its invitation
    ///
    /// No-op when nobody is subscribed. Callbacks run synchronously in
    /// registration order, outside the registry lock so they may subscribe
    /// or unsubscribe themselves.
    pub fn publish(&self, invitation_id: Uuid, progress: &EmailProgress) {
        let callbacks: Vec<Callback> = {
            let subscribers = self.subscribers.lock().unwrap();
            match subscribers.get(&invitation_id) {
                Some(list) => list.iter().map(|s| s.callback.clone()).collect(),
                None => return,
            }
        };

        trace!(
            invitation_id = %invitation_id,
            status = %progress.status,
            subscribers = callbacks.len(),
            "Publishing progress snapshot"
        );

        for callback in callbacks {
            callback(progress);
        }
    }

    /// Number of live subscriptions for an invitation
    pub fn subscriber_count(&self, invitation_id: Uuid) -> usize {
        let subscribers = self.subscribers.lock().unwrap();
        subscribers.get(&invitation_id).map_or(0, Vec::len)
    }

    fn remove(&self, invitation_id: Uuid, token: u64) {
        let mut subscribers = self.subscribers.lock().unwrap();
        if let Some(list) = subscribers.get_mut(&invitation_id) {
            list.retain(|s| s.token != token);
            if list.is_empty() {
                subscribers.remove(&invitation_id);
            }
        }
    }
}

/// Handle for one bus registration
pub struct Subscription {
    bus: Weak<ProgressBus>,
    invitation_id: Uuid,
    token: u64,
    active: AtomicBool,
}

impl Subscription {
    /// Remove this registration from the bus
    ///
    /// Idempotent: the second and later calls are no-ops. Other subscribers
    /// for the same invitation keep receiving snapshots.
    pub fn unsubscribe(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            if let Some(bus) = self.bus.upgrade() {
                bus.remove(self.invitation_id, self.token);
                trace!(
                    invitation_id = %self.invitation_id,
                    token = self.token,
                    "Unsubscribed progress observer"
                );
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}
