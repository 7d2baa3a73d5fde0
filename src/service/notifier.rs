//! Disconnect notifier: turns connection teardown into a LEAVE broadcast.

use std::sync::Arc;

use crate::domain::{BroadcastSink, ChatMessage, ConnectionId, SessionRegistry};

/// Single entry point the transport calls once a connection is gone.
#[derive(Debug, Clone)]
pub struct DisconnectNotifier {
    sessions: Arc<SessionRegistry>,
    sink: Arc<dyn BroadcastSink>,
}

impl DisconnectNotifier {
    /// Creates a notifier reading names from `sessions` and publishing to
    /// `sink`.
    #[must_use]
    pub fn new(sessions: Arc<SessionRegistry>, sink: Arc<dyn BroadcastSink>) -> Self {
        Self { sessions, sink }
    }

    /// Forgets the connection and publishes LEAVE if it had joined.
    ///
    /// The bound name is taken from the same registry write that removes the
    /// entry, so a JOIN racing with the disconnect either lands before it
    /// (and gets its LEAVE) or finds the connection closed and binds nothing.
    /// A connection that never joined produces no broadcast. Returns the
    /// LEAVE message if one was published.
    pub async fn on_disconnect(&self, connection_id: ConnectionId) -> Option<ChatMessage> {
        let Some(username) = self.sessions.remove(connection_id).await else {
            tracing::debug!(%connection_id, "connection closed before joining");
            return None;
        };

        let leave = ChatMessage::leave(username);
        tracing::info!(%connection_id, sender = %leave.sender, "participant left");
        self.sink.broadcast(leave.clone());
        Some(leave)
    }
}
