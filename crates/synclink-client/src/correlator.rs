use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::mpsc;
use std::sync::Mutex;
use std::time::Instant;

use synclink_proto::Envelope;
use tracing::{debug, warn};

/// The correlation table shared between calling contexts and the read
/// loop.
///
/// Each outstanding call owns the receiving end of a single-use
/// channel; the table holds the sending end. Resolution is a send, so a
/// waiting caller wakes immediately, and a slot can only ever be filled
/// once because resolving consumes the entry.
#[derive(Debug, Default)]
pub struct PendingTable {
    slots: Mutex<HashMap<i64, PendingSlot>>,
    next_id: AtomicI64,
}

#[derive(Debug)]
struct PendingSlot {
    tx: mpsc::Sender<Envelope>,
    created_at: Instant,
}

impl PendingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next request id. Ids ascend from 1 and are never
    /// reused while the process lives, let alone while pending.
    pub fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Register a pending request and hand back the caller's receiver.
    pub fn register(&self, id: i64) -> mpsc::Receiver<Envelope> {
        let (tx, rx) = mpsc::channel();
        let slot = PendingSlot {
            tx,
            created_at: Instant::now(),
        };
        let previous = self
            .slots
            .lock()
            .expect("pending table lock poisoned")
            .insert(id, slot);
        debug_assert!(previous.is_none(), "request id {id} reused while pending");
        rx
    }

    /// Remove an entry after cancellation, timeout, or write failure.
    pub fn remove(&self, id: i64) {
        self.slots
            .lock()
            .expect("pending table lock poisoned")
            .remove(&id);
    }

    /// Deliver a reply to its waiting caller. Called by the router.
    ///
    /// Unknown ids — late replies for cancelled calls, or duplicates —
    /// are logged and dropped.
    pub fn resolve(&self, id: i64, reply: Envelope) {
        let slot = self
            .slots
            .lock()
            .expect("pending table lock poisoned")
            .remove(&id);

        match slot {
            Some(slot) => {
                debug!(id, elapsed = ?slot.created_at.elapsed(), "resolving call");
                if slot.tx.send(reply).is_err() {
                    // The caller gave up between our map lookup and now.
                    debug!(id, "caller gone, reply dropped");
                }
            }
            None => {
                warn!(id, "no matching pending request, reply dropped");
            }
        }
    }

    /// Drop every outstanding slot so all waiting callers observe
    /// connection loss. Returns how many were failed.
    pub fn fail_all(&self) -> usize {
        let mut slots = self.slots.lock().expect("pending table lock poisoned");
        let failed = slots.len();
        slots.clear();
        failed
    }

    /// Number of currently outstanding requests.
    pub fn outstanding(&self) -> usize {
        self.slots.lock().expect("pending table lock poisoned").len()
    }
}
