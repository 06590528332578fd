//! Collaboration transport contract.
//!
//! The core only needs to publish locally-originated events; delivery,
//! retries and ordering across peers belong to the transport. Inbound events
//! are handed to [`EditSession::receive`](crate::EditSession::receive) (or
//! drained from an inbox with [`EditSession::drain`](crate::EditSession::drain)).

use crate::DiagramEvent;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Outbound side of a collaboration transport. Fire-and-forget.
pub trait CollaborationChannel {
    fn send(&self, event: &DiagramEvent);
}

/// Discards everything (single-user editing)
#[derive(Debug, Default, Clone, Copy)]
pub struct Offline;

impl CollaborationChannel for Offline {
    fn send(&self, _event: &DiagramEvent) {}
}

/// Publishes into an unbounded tokio channel
#[derive(Debug, Clone)]
pub struct MpscChannel {
    sender: UnboundedSender<DiagramEvent>,
}

impl MpscChannel {
    pub fn new(sender: UnboundedSender<DiagramEvent>) -> Self {
        Self { sender }
    }

    /// Channel plus the receiving end a transport would forward from
    pub fn pair() -> (Self, UnboundedReceiver<DiagramEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl CollaborationChannel for MpscChannel {
    fn send(&self, event: &DiagramEvent) {
        if self.sender.send(event.clone()).is_err() {
            tracing::warn!(event = event.kind.name(), "outbound channel closed, event dropped");
        }
    }
}

/// Peer registered with a relay
#[derive(Clone)]
struct RelayPeer {
    actor_id: String,
    sender: UnboundedSender<DiagramEvent>,
}

/// In-process fan-out hub: every event is forwarded to every registered
/// peer except the actor that produced it.
#[derive(Default)]
pub struct EventRelay {
    peers: Mutex<Vec<RelayPeer>>,
}

impl EventRelay {
    pub fn new() -> Self {
        Self::default()
    }

    fn peers(&self) -> MutexGuard<'_, Vec<RelayPeer>> {
        // A panic while holding the lock cannot leave the peer list half-written
        self.peers.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a peer and return its inbox. Re-registering an actor
    /// replaces its previous inbox.
    pub fn add_peer(&self, actor_id: &str) -> UnboundedReceiver<DiagramEvent> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut peers = self.peers();
        peers.retain(|p| p.actor_id != actor_id);
        peers.push(RelayPeer {
            actor_id: actor_id.to_string(),
            sender,
        });
        receiver
    }

    pub fn remove_peer(&self, actor_id: &str) {
        self.peers().retain(|p| p.actor_id != actor_id);
    }

    pub fn peer_count(&self) -> usize {
        self.peers().len()
    }

    /// Deliver to all peers except the event's originating actor
    pub fn broadcast(&self, event: &DiagramEvent) {
        let mut peers = self.peers();

        // Peers whose inbox was dropped have disconnected
        peers.retain(|p| !p.sender.is_closed());

        for peer in peers.iter() {
            if peer.actor_id == event.actor_id {
                continue;
            }
            // Ignore send errors (peer may have disconnected)
            let _ = peer.sender.send(event.clone());
        }
    }
}

/// Adapts a shared [`EventRelay`] into a session's outbound channel
#[derive(Clone)]
pub struct RelayChannel {
    relay: Arc<EventRelay>,
}

impl RelayChannel {
    pub fn new(relay: Arc<EventRelay>) -> Self {
        Self { relay }
    }
}

impl CollaborationChannel for RelayChannel {
    fn send(&self, event: &DiagramEvent) {
        self.relay.broadcast(event);
    }
}
