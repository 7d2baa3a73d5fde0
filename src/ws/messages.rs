//! Wire decoding of inbound frames and encoding of outbound frames.
//!
//! Inbound frames are lenient: `type` is accepted in place of `kind`,
//! `content`/`sender` may be missing or `null`, and any client `timestamp`
//! is ignored.

use chrono::Utc;
use serde::Deserialize;

use crate::domain::{ChatMessage, MessageKind};
use crate::error::ChatError;

/// Structural shape of a client frame.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    /// Requested message kind.
    #[serde(alias = "type")]
    pub kind: MessageKind,
    /// Optional text body.
    #[serde(default)]
    pub content: Option<String>,
    /// Optional display name.
    #[serde(default)]
    pub sender: Option<String>,
}

impl InboundMessage {
    /// Converts into a [`ChatMessage`] stamped with the receive time.
    ///
    /// The router replaces the timestamp again before broadcast.
    #[must_use]
    pub fn into_chat_message(self) -> ChatMessage {
        ChatMessage {
            kind: self.kind,
            content: self.content.unwrap_or_default(),
            sender: self.sender.unwrap_or_default(),
            timestamp: Utc::now(),
        }
    }
}

/// Decodes a text frame into a [`ChatMessage`].
///
/// # Errors
///
/// Returns [`ChatError::MalformedPayload`] if the frame is not a JSON object
/// with a known `kind`.
pub fn decode_inbound(text: &str) -> Result<ChatMessage, ChatError> {
    serde_json::from_str::<InboundMessage>(text)
        .map(InboundMessage::into_chat_message)
        .map_err(|e| ChatError::MalformedPayload(e.to_string()))
}

/// Encodes an outbound chat message as a JSON text frame.
///
/// # Errors
///
/// Returns [`ChatError::Serialization`] if encoding fails.
pub fn encode_outbound(message: &ChatMessage) -> Result<String, ChatError> {
    Ok(serde_json::to_string(message)?)
}

/// Encodes the error frame for `err`.
///
/// # Errors
///
/// Returns [`ChatError::Serialization`] if encoding fails.
pub fn encode_error(err: &ChatError) -> Result<String, ChatError> {
    Ok(serde_json::to_string(&err.to_response())?)
}
