//! Single-use notification relay between coordinators
//!
//! Each waiting attempt creates one relay. The sender half travels into the
//! waiting pool alongside the entry; whoever atomically removes the entry via
//! `find_compatible` receives the sender and is the only party that can ever
//! deliver into it. Delivery consumes the sender, so a pairing result can be
//! handed over at most once, and a receiver abandoned by timeout or
//! cancellation simply observes the sender being dropped.

use crate::types::PairingNotification;
use tokio::sync::oneshot;

/// Create a connected relay pair for one matchmaking attempt
pub fn channel() -> (RelaySender, RelayReceiver) {
    let (tx, rx) = oneshot::channel();
    (RelaySender { tx }, RelayReceiver { rx })
}

/// Sending half of a notification relay
///
/// Held inside the pool entry until a finder claims it.
#[derive(Debug)]
pub struct RelaySender {
    tx: oneshot::Sender<PairingNotification>,
}

impl RelaySender {
    /// Deliver the pairing result to the waiting side
    ///
    /// Consumes the sender. Returns the notification back if the waiting side
    /// already gave up (its receiver was dropped); callers log and move on,
    /// nothing is left blocked on the other end.
    pub fn deliver(
        self,
        notification: PairingNotification,
    ) -> std::result::Result<(), PairingNotification> {
        self.tx.send(notification)
    }
}

/// Receiving half of a notification relay
#[derive(Debug)]
pub struct RelayReceiver {
    rx: oneshot::Receiver<PairingNotification>,
}

impl RelayReceiver {
    /// Wait for the pairing result
    ///
    /// Resolves to `None` if the sender was dropped without delivering, which
    /// only happens when the entry itself was discarded without being matched.
    pub async fn notified(self) -> Option<PairingNotification> {
        self.rx.await.ok()
    }
}
