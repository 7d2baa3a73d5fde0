//! Concurrent connection → display-name registry.
//!
//! [`SessionRegistry`] is the only shared mutable state in the gateway. It
//! records which display name each live connection announced so that the
//! LEAVE notification can be produced after the client is gone.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::ConnectionId;

/// Per-connection session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Connection this session belongs to.
    pub connection_id: ConnectionId,
    /// Display name bound by the latest JOIN, if any.
    pub username: Option<String>,
    /// Instant the connection was opened.
    pub connected_at: DateTime<Utc>,
}

/// Authoritative mapping from live connections to bound display names.
///
/// # Concurrency
///
/// All operations take the internal `RwLock` for their whole duration, so a
/// reader never observes a half-written entry. Callers never lock anything
/// themselves.
///
/// A connection must be [`open`](Self::open)ed before [`bind`](Self::bind)
/// records anything. Once [`remove`](Self::remove) has run, a late `bind`
/// for the same connection is ignored, so a closed connection can never
/// leave a stale entry behind.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<ConnectionId, Session>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a freshly opened connection with no bound name.
    ///
    /// Opening an already open connection keeps its existing binding.
    pub async fn open(&self, connection_id: ConnectionId) {
        let mut map = self.sessions.write().await;
        map.entry(connection_id).or_insert_with(|| Session {
            connection_id,
            username: None,
            connected_at: Utc::now(),
        });
    }

    /// Binds `username` to `connection_id`, overwriting any previous name.
    ///
    /// Returns `false` without recording anything if the connection is not
    /// open (never opened, or already removed).
    pub async fn bind(&self, connection_id: ConnectionId, username: impl Into<String>) -> bool {
        let mut map = self.sessions.write().await;
        match map.get_mut(&connection_id) {
            Some(session) => {
                session.username = Some(username.into());
                true
            }
            None => false,
        }
    }

    /// Returns the display name bound to `connection_id`, if any.
    pub async fn lookup(&self, connection_id: ConnectionId) -> Option<String> {
        let map = self.sessions.read().await;
        map.get(&connection_id)
            .and_then(|session| session.username.clone())
    }

    /// Forgets `connection_id`, returning the name it had bound.
    ///
    /// Removing an unknown connection is a no-op.
    pub async fn remove(&self, connection_id: ConnectionId) -> Option<String> {
        let mut map = self.sessions.write().await;
        map.remove(&connection_id)
            .and_then(|session| session.username)
    }

    /// Number of open connections, joined or not.
    pub async fn connection_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Number of open connections that have bound a display name.
    pub async fn participant_count(&self) -> usize {
        let map = self.sessions.read().await;
        map.values().filter(|s| s.username.is_some()).count()
    }

    /// Snapshot of all joined sessions, sorted by display name.
    ///
    /// Names are not unique; ties are ordered by connection time.
    pub async fn participants(&self) -> Vec<Session> {
        let map = self.sessions.read().await;
        let mut joined: Vec<Session> = map
            .values()
            .filter(|session| session.username.is_some())
            .cloned()
            .collect();
        joined.sort_by(|a, b| {
            a.username
                .cmp(&b.username)
                .then(a.connected_at.cmp(&b.connected_at))
        });
        joined
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
