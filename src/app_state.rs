//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::ChatConfig;
use crate::domain::{BroadcastHub, BroadcastSink, SessionRegistry};
use crate::service::ChatService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Chat service handling the connection lifecycle.
    pub chat: Arc<ChatService>,
    /// Broadcast hub every WebSocket connection subscribes to.
    pub hub: BroadcastHub,
    /// Runtime configuration.
    pub config: Arc<ChatConfig>,
}

impl AppState {
    /// Builds the domain and service layers from `config`.
    #[must_use]
    pub fn new(config: ChatConfig) -> Self {
        let sessions = Arc::new(SessionRegistry::new());
        let hub = BroadcastHub::new(config.broadcast_capacity);
        let sink: Arc<dyn BroadcastSink> = Arc::new(hub.clone());
        let chat = Arc::new(ChatService::new(sessions, sink));

        Self {
            chat,
            hub,
            config: Arc::new(config),
        }
    }
}
