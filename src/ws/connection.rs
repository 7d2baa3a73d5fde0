//! WebSocket connection loop.
//!
//! Handles the read/write loop for a single WebSocket connection: inbound
//! frames go through the [`ChatService`], broadcast messages are forwarded
//! to the client, and teardown triggers the disconnect notification.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{decode_inbound, encode_error, encode_outbound};
use crate::domain::{ChatMessage, ConnectionId};
use crate::service::ChatService;

type WsSender = SplitSink<WebSocket, Message>;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads client frames one at a time and routes them, so a client's own
///   messages are broadcast in the order they were received.
/// - Forwards every broadcast message to the client. Each write is bounded
///   by `send_timeout`; a peer that cannot keep up is disconnected.
/// - Always runs the disconnect notification on exit, whatever the cause.
pub async fn run_connection(
    socket: WebSocket,
    mut broadcast_rx: broadcast::Receiver<ChatMessage>,
    chat: Arc<ChatService>,
    send_timeout: Duration,
) {
    let connection_id = ConnectionId::new();
    chat.on_connect(connection_id).await;

    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            // Incoming frame from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_text_message(&chat, connection_id, text.as_str()).await;
                        if let Some(reply) = reply
                            && !send_text(&mut ws_tx, reply, send_timeout, connection_id).await
                        {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(%connection_id, error = %err, "ws read failed");
                        break;
                    }
                    Some(Ok(Message::Binary(bytes))) => {
                        tracing::debug!(%connection_id, len = bytes.len(), "binary frame ignored");
                    }
                    Some(Ok(_)) => {}
                }
            }
            // Message from the broadcast hub
            event = broadcast_rx.recv() => {
                match event {
                    Ok(message) => match encode_outbound(&message) {
                        Ok(json) => {
                            if !send_text(&mut ws_tx, json, send_timeout, connection_id).await {
                                break;
                            }
                        }
                        Err(err) => {
                            tracing::warn!(%connection_id, error = %err, "failed to encode broadcast");
                        }
                    },
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(%connection_id, lagged = n, "ws client lagged behind broadcast");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    chat.on_disconnect(connection_id).await;
    tracing::debug!(%connection_id, "ws connection closed");
}

/// Routes one text frame, returning an error frame for the sender if the
/// frame was rejected at the boundary.
async fn handle_text_message(
    chat: &ChatService,
    connection_id: ConnectionId,
    text: &str,
) -> Option<String> {
    let result = match decode_inbound(text) {
        Ok(inbound) => chat.on_message(connection_id, inbound).await.map(|_| ()),
        Err(err) => Err(err),
    };
    let Err(err) = result else {
        return None;
    };

    if !err.is_reported_to_client() {
        tracing::debug!(%connection_id, error = %err, "inbound message dropped");
        return None;
    }
    tracing::debug!(%connection_id, error = %err, "inbound message rejected");
    match encode_error(&err) {
        Ok(json) => Some(json),
        Err(encode_err) => {
            tracing::warn!(%connection_id, error = %encode_err, "failed to encode error frame");
            None
        }
    }
}

/// Sends one text frame. Returns `false` if the connection should close.
async fn send_text(
    ws_tx: &mut WsSender,
    text: String,
    send_timeout: Duration,
    connection_id: ConnectionId,
) -> bool {
    match tokio::time::timeout(send_timeout, ws_tx.send(Message::text(text))).await {
        Ok(Ok(())) => true,
        Ok(Err(err)) => {
            tracing::debug!(%connection_id, error = %err, "ws write failed");
            false
        }
        Err(_) => {
            tracing::warn!(
                %connection_id,
                timeout = ?send_timeout,
                "ws write timed out; dropping slow peer"
            );
            false
        }
    }
}
