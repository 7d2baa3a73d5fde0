//! Fan-out of chat messages to every connected peer.
//!
//! [`BroadcastHub`] wraps a [`tokio::sync::broadcast`] channel. Each
//! WebSocket connection subscribes once and drains its own receiver, so one
//! slow peer never delays delivery to the others.

use tokio::sync::broadcast;

use super::ChatMessage;

/// Destination for outbound chat messages.
///
/// The router and disconnect notifier only ever talk to this trait, keeping
/// message handling testable without sockets.
pub trait BroadcastSink: Send + Sync + std::fmt::Debug {
    /// Delivers `message` to every current subscriber.
    ///
    /// Returns the number of subscribers the message was queued for.
    fn broadcast(&self, message: ChatMessage) -> usize;
}

/// Broadcast channel shared by all connections.
///
/// The ring buffer holds `capacity` messages. A receiver that falls further
/// behind than that observes `RecvError::Lagged` and skips the oldest ones.
#[derive(Debug, Clone)]
pub struct BroadcastHub {
    sender: broadcast::Sender<ChatMessage>,
}

impl BroadcastHub {
    /// Creates a new hub with the given channel capacity.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Creates a receiver for all messages published from now on.
    ///
    /// Each WebSocket connection calls this once, before its upgrade
    /// completes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ChatMessage> {
        self.sender.subscribe()
    }

    /// Returns the current number of subscribers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl BroadcastSink for BroadcastHub {
    fn broadcast(&self, message: ChatMessage) -> usize {
        // Err only means nobody is listening.
        self.sender.send(message).unwrap_or(0)
    }
}
