//! Presence and health DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ConnectionId, Session};

/// Response body for `GET /health`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"healthy"` when the server answers.
    pub status: String,
    /// RFC 3339 server time.
    pub timestamp: String,
    /// Crate version.
    pub version: String,
    /// Open WebSocket connections, joined or not.
    pub connections: usize,
    /// Connections that have announced a display name.
    pub participants: usize,
    /// Live receivers on the broadcast channel.
    pub subscribers: usize,
}

/// One joined connection.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParticipantDto {
    /// Opaque connection identifier.
    #[schema(value_type = String, format = Uuid)]
    pub connection_id: ConnectionId,
    /// Display name bound by the latest JOIN.
    pub sender: String,
    /// When the connection was opened.
    #[serde(with = "crate::domain::message::rfc3339_millis")]
    #[schema(value_type = String, format = DateTime)]
    pub connected_at: DateTime<Utc>,
}

impl ParticipantDto {
    /// Builds the DTO from a registry snapshot. Sessions without a bound
    /// name yield `None`.
    #[must_use]
    pub fn from_session(session: Session) -> Option<Self> {
        Some(Self {
            connection_id: session.connection_id,
            sender: session.username?,
            connected_at: session.connected_at,
        })
    }
}

/// Response body for `GET /api/v1/participants`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParticipantsResponse {
    /// Number of joined connections.
    pub count: usize,
    /// Joined connections sorted by display name. Names are not unique.
    pub participants: Vec<ParticipantDto>,
}
