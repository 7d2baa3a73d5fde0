//! WebSocket layer: upgrade handler, per-connection loop, wire codec.
//!
//! The WebSocket endpoint at `/ws` carries JSON chat frames in both
//! directions. Every connected client receives every broadcast message.

pub mod connection;
pub mod handler;
pub mod messages;
