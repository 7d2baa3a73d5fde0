//! Domain layer: message model, connection identity, session registry and
//! broadcast fan-out.
//!
//! Nothing in here knows about sockets or HTTP. The session registry is
//! pure state, and the broadcast hub only moves [`ChatMessage`]s.

pub mod broadcast;
pub mod connection_id;
pub mod message;
pub mod session_registry;

pub use broadcast::{BroadcastHub, BroadcastSink};
pub use connection_id::ConnectionId;
pub use message::{ChatMessage, MessageKind};
pub use session_registry::{Session, SessionRegistry};
