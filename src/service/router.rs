//! Message router: stamps inbound messages and binds identities on JOIN.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{ChatMessage, ConnectionId, MessageKind, SessionRegistry};
use crate::error::ChatError;

/// Turns an inbound message into the message to broadcast.
///
/// Never performs fan-out itself. The caller hands the returned message to
/// a [`crate::domain::BroadcastSink`].
#[derive(Debug, Clone)]
pub struct MessageRouter {
    sessions: Arc<SessionRegistry>,
}

impl MessageRouter {
    /// Creates a router that binds identities in `sessions`.
    #[must_use]
    pub fn new(sessions: Arc<SessionRegistry>) -> Self {
        Self { sessions }
    }

    /// Handles a JOIN: binds the sender to `connection_id` and returns the
    /// stamped JOIN message.
    ///
    /// # Errors
    ///
    /// - [`ChatError::EmptySender`] if the sender is blank. Nothing is bound.
    /// - [`ChatError::UnknownConnection`] if the connection is not open.
    pub async fn handle_join(
        &self,
        connection_id: ConnectionId,
        inbound: ChatMessage,
    ) -> Result<ChatMessage, ChatError> {
        if inbound.has_blank_sender() {
            return Err(ChatError::EmptySender);
        }
        if !self.sessions.bind(connection_id, inbound.sender.as_str()).await {
            return Err(ChatError::UnknownConnection(connection_id));
        }
        tracing::debug!(%connection_id, sender = %inbound.sender, "participant joined");

        Ok(ChatMessage {
            kind: MessageKind::Join,
            timestamp: Utc::now(),
            ..inbound
        })
    }

    /// Handles a CHAT: only the timestamp is replaced.
    #[must_use]
    pub fn handle_chat(&self, inbound: ChatMessage) -> ChatMessage {
        ChatMessage {
            timestamp: Utc::now(),
            ..inbound
        }
    }

    /// Dispatches on the inbound kind.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::UnexpectedKind`] for a client-sent LEAVE, plus
    /// anything [`handle_join`](Self::handle_join) returns.
    pub async fn route(
        &self,
        connection_id: ConnectionId,
        inbound: ChatMessage,
    ) -> Result<ChatMessage, ChatError> {
        match inbound.kind {
            MessageKind::Join => self.handle_join(connection_id, inbound).await,
            MessageKind::Chat => Ok(self.handle_chat(inbound)),
            MessageKind::Leave => Err(ChatError::UnexpectedKind(MessageKind::Leave)),
        }
    }
}
