use synclink_proto::{Envelope, MessageKind};
use tracing::warn;

use crate::correlator::PendingTable;
use crate::signals::SignalHub;

/// Classify one completed frame and hand it to the right component.
///
/// Replies resolve their pending call; signals fan out through the hub.
/// Anything else — including requests, which the daemon never sends us —
/// is logged and dropped. This function must never panic or block the
/// read loop on anything but the two component locks.
pub fn route(envelope: Envelope, pending: &PendingTable, signals: &SignalHub) {
    match envelope.kind {
        MessageKind::Reply => {
            let id = envelope.id;
            pending.resolve(id, envelope);
        }
        MessageKind::Signal => {
            signals.publish(envelope.num, envelope.params.unwrap_or_default());
        }
        MessageKind::Request => {
            warn!(
                id = envelope.id,
                num = envelope.num,
                "unexpected request from daemon, dropped"
            );
        }
    }
}
