//! Connection registry - every live viewer connection and its liveness.
//!
//! The registry is the exclusive owner of liveness state. Each entry
//! holds the unbounded sender feeding that connection's pump task, so
//! enqueueing a frame never blocks the caller; a dead peer surfaces as
//! a closed channel, which delivery treats as a per-recipient failure.

use std::collections::HashMap;

use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// Unique identifier for a viewer connection.
///
/// Generated server-side when a client connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Create a new random connection ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A frame queued for delivery to one connection.
///
/// The pump task maps frames onto transport messages; keeping the
/// registry off the transport type lets tests drive it with plain
/// channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    /// Serialized JSON message.
    Text(String),
    /// Liveness probe; the peer answers with a transport-level pong.
    Ping,
}

/// Per-connection state.
struct ConnectionEntry {
    tx: mpsc::UnboundedSender<OutboundFrame>,
    /// True if the peer responded since the last probe.
    alive: bool,
}

/// Registry of live connections.
///
/// # Thread Safety
///
/// Uses `RwLock` since broadcast reads vastly outnumber registration
/// churn; `sweep` takes the write lock once per interval.
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, ConnectionEntry>>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a new connection with liveness = true.
    ///
    /// The ID is freshly generated per connection, so a duplicate
    /// registration cannot occur by construction.
    pub async fn register(&self, id: ConnectionId, tx: mpsc::UnboundedSender<OutboundFrame>) {
        let mut connections = self.connections.write().await;
        connections.insert(id, ConnectionEntry { tx, alive: true });
    }

    /// Marks a connection as alive. Called on any probe response.
    pub async fn mark_alive(&self, id: &ConnectionId) {
        let mut connections = self.connections.write().await;
        if let Some(entry) = connections.get_mut(id) {
            entry.alive = true;
        }
    }

    /// Removes a connection. Called on transport close or error.
    ///
    /// Returns true if the connection was still registered.
    pub async fn unregister(&self, id: &ConnectionId) -> bool {
        let mut connections = self.connections.write().await;
        connections.remove(id).is_some()
    }

    /// One liveness round: evicts every connection that did not respond
    /// since the previous sweep, then probes the survivors.
    ///
    /// Dropping an entry closes its channel, which terminates the pump
    /// task and with it the transport. Returns the evicted IDs so the
    /// caller can clear their subscriptions.
    pub async fn sweep(&self) -> Vec<ConnectionId> {
        let mut connections = self.connections.write().await;

        let evicted: Vec<ConnectionId> = connections
            .iter()
            .filter(|(_, entry)| !entry.alive)
            .map(|(id, _)| *id)
            .collect();

        for id in &evicted {
            connections.remove(id);
        }

        for entry in connections.values_mut() {
            entry.alive = false;
            // A closed channel here is racing a disconnect; the pump
            // task's cleanup path will unregister it.
            let _ = entry.tx.send(OutboundFrame::Ping);
        }

        evicted
    }

    /// Enqueues a frame for one connection. Best-effort.
    ///
    /// Returns false if the connection is gone or its channel closed.
    pub async fn send_to(&self, id: &ConnectionId, frame: OutboundFrame) -> bool {
        let connections = self.connections.read().await;
        match connections.get(id) {
            Some(entry) => entry.tx.send(frame).is_ok(),
            None => false,
        }
    }

    /// Snapshot of every connected sender, for global broadcasts.
    pub async fn senders(&self) -> Vec<(ConnectionId, mpsc::UnboundedSender<OutboundFrame>)> {
        let connections = self.connections.read().await;
        connections
            .iter()
            .map(|(id, entry)| (*id, entry.tx.clone()))
            .collect()
    }

    /// Number of registered connections.
    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    /// True if no connections are registered.
    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }

    /// Drops every connection, closing all pump channels.
    ///
    /// Used on graceful shutdown; pump tasks answer a closed channel
    /// with a normal close frame.
    pub async fn close_all(&self) {
        let mut connections = self.connections.write().await;
        connections.clear();
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
