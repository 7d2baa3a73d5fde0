//! Axum WebSocket upgrade handler.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::app_state::AppState;

/// `GET /ws` — Upgrade HTTP connection to WebSocket.
///
/// The broadcast subscription is taken before the upgrade completes, so the
/// client sees every message published after its handshake, including its
/// own JOIN.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let broadcast_rx = state.hub.subscribe();
    let chat = Arc::clone(&state.chat);
    let send_timeout = state.config.send_timeout;

    ws.max_message_size(state.config.max_message_bytes)
        .on_upgrade(move |socket| run_connection(socket, broadcast_rx, chat, send_timeout))
}
