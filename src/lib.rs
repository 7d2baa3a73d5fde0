//! # chat-gateway
//!
//! Real-time broadcast chat over WebSocket.
//!
//! Clients connect to `/ws`, announce a display name with a `JOIN` frame,
//! exchange `CHAT` frames, and are told when a joined peer disconnects via a
//! server-generated `LEAVE` frame. Every message is fanned out to every
//! connected client, stamped with the server's clock.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket, HTTP)
//!     │
//!     ├── WS Handler (ws/)          REST Handlers (api/)
//!     │
//!     ├── ChatService (service/)
//!     │     ├── MessageRouter
//!     │     └── DisconnectNotifier
//!     │
//!     ├── SessionRegistry (domain/)
//!     └── BroadcastHub (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod ws;
