//! Chat service: wires the router, the notifier and the broadcast sink to
//! the connection lifecycle.

use std::sync::Arc;

use crate::domain::{BroadcastSink, ChatMessage, ConnectionId, MessageKind, SessionRegistry};
use crate::error::ChatError;

use super::{DisconnectNotifier, MessageRouter};

/// Orchestration layer behind the WebSocket transport.
///
/// One method per transport event: [`on_connect`](Self::on_connect),
/// [`on_message`](Self::on_message), [`on_disconnect`](Self::on_disconnect).
/// Each call for a given connection is expected to be made from that
/// connection's task, in arrival order.
#[derive(Debug, Clone)]
pub struct ChatService {
    sessions: Arc<SessionRegistry>,
    router: MessageRouter,
    notifier: DisconnectNotifier,
    sink: Arc<dyn BroadcastSink>,
}

impl ChatService {
    /// Creates a new `ChatService`.
    #[must_use]
    pub fn new(sessions: Arc<SessionRegistry>, sink: Arc<dyn BroadcastSink>) -> Self {
        Self {
            router: MessageRouter::new(Arc::clone(&sessions)),
            notifier: DisconnectNotifier::new(Arc::clone(&sessions), Arc::clone(&sink)),
            sessions,
            sink,
        }
    }

    /// Returns a reference to the inner [`SessionRegistry`].
    #[must_use]
    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    /// Registers a new connection. No message is broadcast.
    pub async fn on_connect(&self, connection_id: ConnectionId) {
        self.sessions.open(connection_id).await;
        tracing::debug!(%connection_id, "connection opened");
    }

    /// Routes one decoded inbound message and broadcasts the result.
    ///
    /// A CHAT with a blank sender inherits the name bound to the connection.
    /// Returns the message that was broadcast.
    ///
    /// # Errors
    ///
    /// - [`ChatError::EmptySender`] for a blank JOIN, or a blank CHAT from a
    ///   connection that has not joined.
    /// - [`ChatError::UnexpectedKind`] for a client-sent LEAVE.
    /// - [`ChatError::UnknownConnection`] if the connection is not open.
    ///
    /// Nothing is broadcast on error.
    pub async fn on_message(
        &self,
        connection_id: ConnectionId,
        mut inbound: ChatMessage,
    ) -> Result<ChatMessage, ChatError> {
        if inbound.kind == MessageKind::Chat && inbound.has_blank_sender() {
            inbound.sender = self
                .sessions
                .lookup(connection_id)
                .await
                .ok_or(ChatError::EmptySender)?;
        }

        let outbound = self.router.route(connection_id, inbound).await?;
        let receivers = self.sink.broadcast(outbound.clone());
        tracing::debug!(
            %connection_id,
            kind = %outbound.kind,
            sender = %outbound.sender,
            receivers,
            "message broadcast"
        );
        Ok(outbound)
    }

    /// Handles teardown of a connection. See [`DisconnectNotifier`].
    pub async fn on_disconnect(&self, connection_id: ConnectionId) -> Option<ChatMessage> {
        self.notifier.on_disconnect(connection_id).await
    }
}
