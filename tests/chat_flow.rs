//! End-to-end chat flow against a real server on an ephemeral port.

#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use chat_gateway::api::build_app;
use chat_gateway::app_state::AppState;
use chat_gateway::config::ChatConfig;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

async fn spawn_server() -> SocketAddr {
    spawn_server_with(ChatConfig::default()).await
}

async fn spawn_server_with(config: ChatConfig) -> SocketAddr {
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("failed to bind test listener");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("listener has no local addr");
    };
    let app = build_app(AppState::new(config));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

async fn connect(addr: SocketAddr) -> Client {
    let Ok((client, _)) = connect_async(format!("ws://{addr}/ws")).await else {
        panic!("ws handshake failed");
    };
    client
}

async fn send(client: &mut Client, frame: Value) {
    if client.send(Message::text(frame.to_string())).await.is_err() {
        panic!("ws send failed");
    }
}

async fn send_raw(client: &mut Client, text: &str) {
    if client.send(Message::text(text.to_string())).await.is_err() {
        panic!("ws send failed");
    }
}

/// Next JSON text frame, skipping control frames.
async fn recv(client: &mut Client) -> Value {
    loop {
        let next = tokio::time::timeout(RECV_TIMEOUT, client.next()).await;
        let Ok(Some(Ok(msg))) = next else {
            panic!("no frame received in time");
        };
        if let Message::Text(text) = msg {
            let Ok(value) = serde_json::from_str::<Value>(text.as_str()) else {
                panic!("server sent invalid JSON: {}", text.as_str());
            };
            return value;
        }
    }
}

async fn get_json(addr: SocketAddr, path: &str) -> Value {
    let Ok(resp) = reqwest::get(format!("http://{addr}{path}")).await else {
        panic!("GET {path} failed");
    };
    let Ok(body) = resp.json::<Value>().await else {
        panic!("GET {path} returned invalid JSON");
    };
    body
}

/// Polls `/health` until the open connection count reaches `expected`.
async fn wait_for_connections(addr: SocketAddr, expected: u64) {
    for _ in 0..100 {
        let health = get_json(addr, "/health").await;
        if health["connections"].as_u64() == Some(expected) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("connection count never reached {expected}");
}

#[tokio::test]
async fn join_chat_leave_is_seen_by_peers() {
    let addr = spawn_server().await;
    let mut bob = connect(addr).await;
    let mut alice = connect(addr).await;
    wait_for_connections(addr, 2).await;
    assert_eq!(get_json(addr, "/health").await["subscribers"], 2);

    send(
        &mut alice,
        json!({"kind": "JOIN", "sender": "Alice", "content": "", "timestamp": "1999-01-01T00:00:00Z"}),
    )
    .await;

    let join = recv(&mut bob).await;
    assert_eq!(join["kind"], "JOIN");
    assert_eq!(join["sender"], "Alice");
    let Some(stamp) = join["timestamp"].as_str() else {
        panic!("timestamp missing");
    };
    assert!(stamp.ends_with('Z'));
    assert!(!stamp.starts_with("1999"));

    // The sender receives its own broadcast too.
    assert_eq!(recv(&mut alice).await["kind"], "JOIN");

    // Older browser clients used `type` instead of `kind`.
    send(
        &mut alice,
        json!({"type": "CHAT", "sender": "Alice", "content": "hi"}),
    )
    .await;
    let chat = recv(&mut bob).await;
    assert_eq!(chat["kind"], "CHAT");
    assert_eq!(chat["sender"], "Alice");
    assert_eq!(chat["content"], "hi");

    let participants = get_json(addr, "/api/v1/participants").await;
    assert_eq!(participants["count"], 1);
    let entry = &participants["participants"][0];
    assert_eq!(entry["sender"], "Alice");
    assert!(entry["connection_id"].as_str().is_some_and(|id| id.len() == 36));
    assert!(entry["connected_at"].as_str().is_some_and(|ts| ts.ends_with('Z')));

    let _ = alice.close(None).await;
    let leave = recv(&mut bob).await;
    assert_eq!(leave["kind"], "LEAVE");
    assert_eq!(leave["sender"], "Alice");
    assert!(leave.get("content").is_none());

    wait_for_connections(addr, 1).await;
    let health = get_json(addr, "/health").await;
    assert_eq!(health["participants"], 0);
    assert_eq!(health["status"], "healthy");
}

#[tokio::test]
async fn disconnect_before_join_broadcasts_nothing() {
    let addr = spawn_server().await;
    let mut bob = connect(addr).await;
    let mut ghost = connect(addr).await;
    wait_for_connections(addr, 2).await;

    let _ = ghost.close(None).await;
    wait_for_connections(addr, 1).await;

    let mut alice = connect(addr).await;
    send(&mut alice, json!({"kind": "JOIN", "sender": "Alice"})).await;

    // Had the ghost produced a LEAVE, bob would see it first.
    let first = recv(&mut bob).await;
    assert_eq!(first["kind"], "JOIN");
    assert_eq!(first["sender"], "Alice");
}

#[tokio::test]
async fn rejoin_changes_leave_name() {
    let addr = spawn_server().await;
    let mut bob = connect(addr).await;
    let mut alice = connect(addr).await;
    wait_for_connections(addr, 2).await;

    send(&mut alice, json!({"kind": "JOIN", "sender": "Alice"})).await;
    send(&mut alice, json!({"kind": "JOIN", "sender": "Alicia"})).await;
    assert_eq!(recv(&mut bob).await["sender"], "Alice");
    assert_eq!(recv(&mut bob).await["sender"], "Alicia");

    let _ = alice.close(None).await;
    let leave = recv(&mut bob).await;
    assert_eq!(leave["kind"], "LEAVE");
    assert_eq!(leave["sender"], "Alicia");
}

#[tokio::test]
async fn boundary_rejections_reply_to_sender_only() {
    let addr = spawn_server().await;
    let mut alice = connect(addr).await;

    send_raw(&mut alice, "definitely not json").await;
    let err = recv(&mut alice).await;
    assert_eq!(err["error"]["code"], 1001);

    send(&mut alice, json!({"kind": "LEAVE", "sender": "Alice"})).await;
    let err = recv(&mut alice).await;
    assert_eq!(err["error"]["code"], 1002);

    // Blank JOIN is dropped silently; the connection stays usable.
    send(&mut alice, json!({"kind": "JOIN", "sender": ""})).await;
    send(&mut alice, json!({"kind": "JOIN", "sender": "Alice"})).await;
    let join = recv(&mut alice).await;
    assert_eq!(join["kind"], "JOIN");
    assert_eq!(join["sender"], "Alice");
}

#[tokio::test]
async fn messages_from_one_sender_keep_their_order() {
    let addr = spawn_server().await;
    let mut bob = connect(addr).await;
    let mut alice = connect(addr).await;
    wait_for_connections(addr, 2).await;

    send(&mut alice, json!({"kind": "JOIN", "sender": "Alice"})).await;
    for i in 0..20 {
        send(&mut alice, json!({"kind": "CHAT", "content": i.to_string()})).await;
    }

    assert_eq!(recv(&mut bob).await["kind"], "JOIN");
    let mut last_stamp = String::new();
    for i in 0..20 {
        let chat = recv(&mut bob).await;
        assert_eq!(chat["content"], i.to_string());
        assert_eq!(chat["sender"], "Alice");
        let stamp = chat["timestamp"].as_str().unwrap_or_default().to_string();
        assert!(stamp >= last_stamp);
        last_stamp = stamp;
    }
}

#[tokio::test]
async fn binary_frames_are_ignored() {
    let addr = spawn_server().await;
    let mut alice = connect(addr).await;

    if alice.send(Message::binary(vec![0u8, 1, 2, 3])).await.is_err() {
        panic!("ws send failed");
    }
    send(&mut alice, json!({"kind": "JOIN", "sender": "Alice"})).await;

    // No error frame for the binary payload; the JOIN is the next frame.
    let join = recv(&mut alice).await;
    assert_eq!(join["kind"], "JOIN");
    assert_eq!(join["sender"], "Alice");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn stalled_reader_is_dropped_without_stalling_others() {
    let addr = spawn_server_with(ChatConfig {
        send_timeout: Duration::from_secs(1),
        broadcast_capacity: 32,
        ..ChatConfig::default()
    })
    .await;

    let mut bob = connect(addr).await;
    let mut slow = connect(addr).await;
    let flooder = connect(addr).await;
    wait_for_connections(addr, 3).await;

    // `slow` announces itself and never reads again.
    send(&mut slow, json!({"kind": "JOIN", "sender": "Slow"})).await;
    let join = recv(&mut bob).await;
    assert_eq!(join["kind"], "JOIN");
    assert_eq!(join["sender"], "Slow");

    let (mut flood_tx, mut flood_rx) = flooder.split();
    let drain = tokio::spawn(async move { while flood_rx.next().await.is_some() {} });
    let stop = Arc::new(AtomicBool::new(false));
    let flood = {
        let stop = Arc::clone(&stop);
        tokio::spawn(async move {
            let padding = "x".repeat(50_000);
            for i in 0..5000u32 {
                if stop.load(Ordering::Relaxed) {
                    break;
                }
                let frame = json!({"kind": "CHAT", "sender": "Flood", "content": format!("{i:06}{padding}")});
                if flood_tx.send(Message::text(frame.to_string())).await.is_err() {
                    break;
                }
            }
        })
    };

    let outcome = tokio::time::timeout(Duration::from_secs(60), async {
        let mut last_index: Option<u32> = None;
        let mut chats = 0usize;
        loop {
            let msg = recv(&mut bob).await;
            match msg["kind"].as_str() {
                Some("CHAT") => {
                    let Some(index) = msg["content"]
                        .as_str()
                        .and_then(|c| c.get(..6))
                        .and_then(|n| n.parse::<u32>().ok())
                    else {
                        panic!("unexpected chat content");
                    };
                    // Lag may skip messages but never reorders them.
                    assert!(last_index.is_none_or(|last| index > last));
                    last_index = Some(index);
                    chats += 1;
                }
                Some("LEAVE") => {
                    assert_eq!(msg["sender"], "Slow");
                    return chats;
                }
                other => panic!("unexpected frame kind {other:?}"),
            }
        }
    })
    .await;

    stop.store(true, Ordering::Relaxed);
    flood.abort();
    drain.abort();

    let Ok(chats) = outcome else {
        panic!("stalled peer was never dropped");
    };
    assert!(chats > 0, "reader saw no traffic before the stalled peer left");
    // The session is gone before its LEAVE goes out.
    assert_eq!(get_json(addr, "/api/v1/participants").await["count"], 0);
}
