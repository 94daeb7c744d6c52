//! The session manager: which connection is which player, in which room.
//!
//! A connection moves through three pools:
//!
//! ```text
//! register() ──→ [live] ──authenticate()──→ [lobby] ──associate()──→ [in room]
//!                                              ▲                         │
//!                                              └──── return_to_lobby() ──┘
//! dissociate() removes it from whichever pool it is in.
//! ```
//!
//! Both maps are `DashMap`s, so lookups from different connection tasks
//! never wait on a global lock.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use labyrinth_protocol::{PlayerId, RoomId};
use labyrinth_room::RoomManager;
use labyrinth_transport::ConnectionId;
use tokio::sync::mpsc;

use crate::{Identity, SessionError};

/// An encoded frame. Shared, so a broadcast encodes once.
pub type Payload = Arc<[u8]>;

/// Queue feeding one connection's writer task.
pub type Outbox = mpsc::UnboundedSender<Payload>;

struct ConnectionEntry {
    outbox: Outbox,
    identity: Option<Identity>,
    room: Option<RoomId>,
}

/// Tracks every live connection and the player it belongs to.
pub struct SessionManager {
    connections: DashMap<ConnectionId, ConnectionEntry>,
    /// Reverse index: each player has at most one live connection.
    players: DashMap<PlayerId, ConnectionId>,
    rooms: Arc<RoomManager>,
}

impl SessionManager {
    pub fn new(rooms: Arc<RoomManager>) -> Self {
        Self {
            connections: DashMap::new(),
            players: DashMap::new(),
            rooms,
        }
    }

    /// The room registry that disconnects are reported to.
    pub fn rooms(&self) -> &Arc<RoomManager> {
        &self.rooms
    }

    /// Adds a fresh, unauthenticated connection.
    pub fn register(&self, conn_id: ConnectionId, outbox: Outbox) {
        self.connections.insert(
            conn_id,
            ConnectionEntry {
                outbox,
                identity: None,
                room: None,
            },
        );
        tracing::debug!(%conn_id, "connection registered");
    }

    /// Binds a connection to a player after the handshake.
    ///
    /// # Errors
    /// `DoubleSession` if the player is already bound to another live
    /// connection.
    pub fn authenticate(&self, conn_id: ConnectionId, identity: Identity) -> Result<(), SessionError> {
        if !self.connections.contains_key(&conn_id) {
            return Err(SessionError::UnknownConnection(conn_id));
        }
        let player_id = identity.player_id;
        match self.players.entry(player_id) {
            Entry::Occupied(existing) if *existing.get() != conn_id => {
                return Err(SessionError::DoubleSession(player_id));
            }
            Entry::Occupied(_) => {}
            Entry::Vacant(slot) => {
                slot.insert(conn_id);
            }
        }

        match self.connections.get_mut(&conn_id) {
            Some(mut entry) => {
                entry.identity = Some(identity);
                tracing::info!(%conn_id, %player_id, "player authenticated");
                Ok(())
            }
            None => {
                // Torn down between the two lookups.
                self.players.remove_if(&player_id, |_, c| *c == conn_id);
                Err(SessionError::UnknownConnection(conn_id))
            }
        }
    }

    /// Moves an authenticated lobby connection into a room.
    ///
    /// # Errors
    /// `NotAuthenticated` before the handshake, `AlreadyInRoom` if the
    /// connection is already in a room.
    pub fn associate(&self, conn_id: ConnectionId, room_id: RoomId) -> Result<(), SessionError> {
        let mut entry = self
            .connections
            .get_mut(&conn_id)
            .ok_or(SessionError::UnknownConnection(conn_id))?;
        let player_id = entry
            .identity
            .as_ref()
            .map(|i| i.player_id)
            .ok_or(SessionError::NotAuthenticated(conn_id))?;
        if let Some(current) = entry.room {
            return Err(SessionError::AlreadyInRoom(player_id, current));
        }
        entry.room = Some(room_id);
        tracing::debug!(%conn_id, %player_id, %room_id, "associated with room");
        Ok(())
    }

    /// Puts a connection back in the lobby. Returns the room it left.
    pub fn return_to_lobby(&self, conn_id: ConnectionId) -> Option<RoomId> {
        let room = self.connections.get_mut(&conn_id)?.room.take();
        if let Some(room_id) = room {
            tracing::debug!(%conn_id, %room_id, "returned to lobby");
        }
        room
    }

    /// Forgets a connection entirely and reports the player's disconnect
    /// to the room it was in, if any.
    ///
    /// The player stays bound to this connection until the room has seen
    /// the disconnect, so a new connection for the same player cannot
    /// reconnect ahead of it.
    pub async fn dissociate(&self, conn_id: ConnectionId) {
        let Some((_, entry)) = self.connections.remove(&conn_id) else {
            return;
        };
        let Some(identity) = entry.identity else {
            tracing::debug!(%conn_id, "unauthenticated connection dropped");
            return;
        };
        let player_id = identity.player_id;

        if let Some(room_id) = entry.room {
            if let Err(e) = self.rooms.disconnect(room_id, player_id).await {
                tracing::debug!(%conn_id, %player_id, %room_id, error = %e, "room disconnect skipped");
            }
        }
        self.players.remove_if(&player_id, |_, c| *c == conn_id);
        tracing::info!(%conn_id, %player_id, room_id = ?entry.room, "connection dissociated");
    }

    pub fn room_of(&self, conn_id: ConnectionId) -> Option<RoomId> {
        self.connections.get(&conn_id).and_then(|e| e.room)
    }

    pub fn identity_of(&self, conn_id: ConnectionId) -> Option<Identity> {
        self.connections.get(&conn_id).and_then(|e| e.identity.clone())
    }

    /// The live connection bound to a player.
    pub fn connection_of(&self, player_id: PlayerId) -> Option<ConnectionId> {
        self.players.get(&player_id).map(|c| *c)
    }

    /// Queues a frame for one connection. Returns `false` if it is gone.
    pub fn send_to(&self, conn_id: ConnectionId, payload: Payload) -> bool {
        match self.connections.get(&conn_id) {
            Some(entry) => entry.outbox.send(payload).is_ok(),
            None => false,
        }
    }

    /// Queues a frame for a player's live connection only while that
    /// connection is associated with `room_id`.
    pub fn send_to_player_in(&self, player_id: PlayerId, room_id: RoomId, payload: Payload) -> bool {
        let Some(conn_id) = self.connection_of(player_id) else {
            return false;
        };
        match self.connections.get(&conn_id) {
            Some(entry) if entry.room == Some(room_id) => entry.outbox.send(payload).is_ok(),
            _ => false,
        }
    }

    /// Authenticated connections that are not in a room.
    pub fn lobby_connections(&self) -> Vec<ConnectionId> {
        self.connections
            .iter()
            .filter(|e| e.identity.is_some() && e.room.is_none())
            .map(|e| *e.key())
            .collect()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}
