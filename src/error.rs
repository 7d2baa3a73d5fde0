//! Gateway error types and the error frame sent to WebSocket clients.
//!
//! [`ChatError`] is the central error type. Boundary rejections (bad JSON,
//! a client trying to send LEAVE) are answered to the offending client with
//! an [`ErrorResponse`] frame. Everything else is logged and absorbed; no
//! routing failure is ever surfaced to other peers.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{ConnectionId, MessageKind};

/// Structured JSON error frame.
///
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "malformed payload: expected value at line 1 column 1"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
}

/// Chat gateway error.
///
/// # Error Code Ranges
///
/// | Range     | Category   | Reported to sender |
/// |-----------|------------|--------------------|
/// | 1000–1999 | Validation | boundary only      |
/// | 2000–2999 | State      | never              |
/// | 3000–3999 | Server     | never              |
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// Inbound frame could not be decoded into a chat message.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// Client sent a kind only the server may produce.
    #[error("clients may not send {0} messages")]
    UnexpectedKind(MessageKind),

    /// JOIN (or CHAT from an unjoined connection) without a display name.
    #[error("sender must not be empty")]
    EmptySender,

    /// Connection is not open in the session registry.
    #[error("connection not open: {0}")]
    UnknownConnection(ConnectionId),

    /// Outbound message could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ChatError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::MalformedPayload(_) => 1001,
            Self::UnexpectedKind(_) => 1002,
            Self::EmptySender => 1003,
            Self::UnknownConnection(_) => 2001,
            Self::Serialization(_) => 3001,
        }
    }

    /// Returns `true` if the sending client should get an error frame.
    ///
    /// Only transport-boundary rejections are reported. Routing failures are
    /// absorbed silently.
    #[must_use]
    pub const fn is_reported_to_client(&self) -> bool {
        matches!(self, Self::MalformedPayload(_) | Self::UnexpectedKind(_))
    }

    /// Builds the error frame body for this error.
    #[must_use]
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
            },
        }
    }
}
