//! Chat message value type and its wire representation.
//!
//! A [`ChatMessage`] is what every subscriber receives from the broadcast
//! channel. Timestamps are always server-assigned and serialized as RFC 3339
//! UTC instants with fixed millisecond precision, so the string form sorts
//! in the same order as the instants it encodes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Closed set of message kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageKind {
    /// A participant announced its display name.
    Join,
    /// Regular text message.
    Chat,
    /// A joined participant disconnected. Server-generated only.
    Leave,
}

impl MessageKind {
    /// Returns the wire name of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Join => "JOIN",
            Self::Chat => "CHAT",
            Self::Leave => "LEAVE",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of chat traffic as broadcast to every connected peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    /// Message kind discriminator.
    pub kind: MessageKind,
    /// Text body. Empty for JOIN/LEAVE unless the client supplied one.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
    /// Display name of the participant. Not authenticated, not unique.
    pub sender: String,
    /// Server-assigned instant.
    #[serde(with = "rfc3339_millis")]
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Builds a JOIN message stamped with the current server time.
    #[must_use]
    pub fn join(sender: impl Into<String>) -> Self {
        Self::now(MessageKind::Join, sender, String::new())
    }

    /// Builds a CHAT message stamped with the current server time.
    #[must_use]
    pub fn chat(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self::now(MessageKind::Chat, sender, content)
    }

    /// Builds a LEAVE message stamped with the current server time.
    #[must_use]
    pub fn leave(sender: impl Into<String>) -> Self {
        Self::now(MessageKind::Leave, sender, String::new())
    }

    fn now(kind: MessageKind, sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            sender: sender.into(),
            timestamp: Utc::now(),
        }
    }

    /// Returns `true` if the sender is empty or whitespace only.
    #[must_use]
    pub fn has_blank_sender(&self) -> bool {
        self.sender.trim().is_empty()
    }
}

/// Serde adapter writing `2026-10-19T12:00:00.123Z` and reading any RFC 3339
/// instant.
pub mod rfc3339_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes with millisecond precision and a `Z` suffix.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    /// Parses any RFC 3339 string and normalizes it to UTC.
    ///
    /// # Errors
    ///
    /// Returns a deserializer error if the value is not a valid RFC 3339
    /// timestamp.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
