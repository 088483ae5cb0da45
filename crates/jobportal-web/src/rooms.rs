//! Room membership and fan-out for the push channel.
//!
//! Every WebSocket connection registers a bounded queue with the hub and
//! joins named rooms. Emitting to a room copies the event into the queue of
//! each member. Delivery is fire-and-forget: a full or closed queue drops the
//! event for that connection only.

use jobportal_core::push::ServerEvent;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};

/// Identifier of one live connection.
pub type ConnectionId = u64;

/// Default per-connection queue depth.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

#[derive(Default)]
struct HubInner {
    connections: HashMap<ConnectionId, mpsc::Sender<ServerEvent>>,
    rooms: HashMap<String, HashSet<ConnectionId>>,
    memberships: HashMap<ConnectionId, HashSet<String>>,
}

/// Registry of connections and the rooms they joined.
pub struct RoomHub {
    inner: RwLock<HubInner>,
    next_id: AtomicU64,
    queue_capacity: usize,
}

impl RoomHub {
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            inner: RwLock::new(HubInner::default()),
            next_id: AtomicU64::new(1),
            queue_capacity: queue_capacity.max(1),
        }
    }

    /// Register a connection and hand back the queue it should drain.
    pub async fn connect(&self) -> (ConnectionId, mpsc::Receiver<ServerEvent>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        let mut inner = self.inner.write().await;
        inner.connections.insert(id, tx);
        inner.memberships.insert(id, HashSet::new());
        (id, rx)
    }

    /// Add a connection to a room. Returns false for unknown connections.
    pub async fn join(&self, conn: ConnectionId, room: &str) -> bool {
        let mut inner = self.inner.write().await;
        let Some(joined) = inner.memberships.get_mut(&conn) else {
            return false;
        };
        joined.insert(room.to_string());
        inner.rooms.entry(room.to_string()).or_default().insert(conn);
        debug!(connection = conn, room = %room, "Joined room");
        true
    }

    /// Drop a connection from every room it joined.
    pub async fn disconnect(&self, conn: ConnectionId) {
        let mut inner = self.inner.write().await;
        inner.connections.remove(&conn);
        let joined = inner.memberships.remove(&conn).unwrap_or_default();
        for room in joined {
            if let Some(members) = inner.rooms.get_mut(&room) {
                members.remove(&conn);
                if members.is_empty() {
                    inner.rooms.remove(&room);
                }
            }
        }
        debug!(connection = conn, "Connection removed from hub");
    }

    /// Send an event to every member of `room`. Returns how many
    /// connections accepted it.
    pub async fn emit(&self, room: &str, event: ServerEvent) -> usize {
        let inner = self.inner.read().await;
        let Some(members) = inner.rooms.get(room) else {
            debug!(room = %room, "Emit to empty room");
            return 0;
        };

        let mut delivered = 0;
        for conn in members {
            let Some(tx) = inner.connections.get(conn) else {
                continue;
            };
            match tx.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(connection = conn, room = %room, "Connection queue full, event dropped");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!(connection = conn, room = %room, "Connection closed before delivery");
                }
            }
        }
        debug!(room = %room, delivered, "Emitted event");
        delivered
    }

    /// Send an event to one connection.
    pub async fn send_to(&self, conn: ConnectionId, event: ServerEvent) -> bool {
        let inner = self.inner.read().await;
        inner
            .connections
            .get(&conn)
            .map(|tx| tx.try_send(event).is_ok())
            .unwrap_or(false)
    }

    pub async fn room_size(&self, room: &str) -> usize {
        let inner = self.inner.read().await;
        inner.rooms.get(room).map_or(0, HashSet::len)
    }

    pub async fn connection_count(&self) -> usize {
        self.inner.read().await.connections.len()
    }
}

impl Default for RoomHub {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}
