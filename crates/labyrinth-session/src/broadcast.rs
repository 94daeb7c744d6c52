//! Background workers that fan room events out to connections.
//!
//! Room actors never touch sockets. They push [`RoomEvent`]s and
//! [`LobbyEvent`]s onto bounded channels, and these two workers turn them
//! into encoded frames on each connection's outbox.

use std::sync::Arc;

use labyrinth_protocol::{Codec, ProtocolError, ServerMessage};
use labyrinth_room::{LobbyEvent, RoomEvent, RoomManager};
use tokio::sync::mpsc;

use crate::{Payload, SessionManager};

/// Encodes a message into a shareable frame.
pub fn encode<C: Codec>(codec: &C, msg: &ServerMessage) -> Result<Payload, ProtocolError> {
    Ok(Arc::from(codec.encode(msg)?))
}

/// Encodes one page of the lobby listing.
pub fn encode_room_list<C: Codec>(
    codec: &C,
    rooms: &RoomManager,
    page: usize,
    size: usize,
) -> Result<Payload, ProtocolError> {
    let (rooms, page_info) = rooms.rooms_page(page, size);
    encode(codec, &ServerMessage::RoomListUpdate { rooms, page_info })
}

/// Delivers every state change to the connected players of the room.
///
/// The snapshot is encoded once per event. Players without a live
/// connection in this room are skipped; their reconnect triggers a fresh
/// broadcast.
pub async fn run_broadcast_worker<C: Codec>(
    sessions: Arc<SessionManager>,
    codec: Arc<C>,
    mut events: mpsc::Receiver<RoomEvent>,
) {
    tracing::debug!("broadcast worker started");
    while let Some(RoomEvent::StateChanged { room_id, snapshot }) = events.recv().await {
        let recipients: Vec<_> = snapshot.players.iter().map(|p| p.id).collect();
        let payload = match encode(codec.as_ref(), &ServerMessage::GameStateUpdate(snapshot)) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(%room_id, error = %e, "failed to encode state update");
                continue;
            }
        };

        let mut delivered = 0;
        for player_id in recipients {
            if sessions.send_to_player_in(player_id, room_id, Arc::clone(&payload)) {
                delivered += 1;
            } else {
                tracing::debug!(%room_id, %player_id, "no live connection in room, skipped");
            }
        }
        tracing::debug!(%room_id, delivered, "state broadcast");
    }
    tracing::debug!("broadcast worker stopped");
}

/// Pushes page 0 of the room list to every lobby connection whenever a
/// room appears, disappears, or changes its summary.
///
/// Refreshes that queue up while one is being sent are folded into it.
pub async fn run_lobby_worker<C: Codec>(
    sessions: Arc<SessionManager>,
    codec: Arc<C>,
    page_size: usize,
    mut events: mpsc::Receiver<LobbyEvent>,
) {
    tracing::debug!("lobby worker started");
    while events.recv().await.is_some() {
        while events.try_recv().is_ok() {}

        let payload = match encode_room_list(codec.as_ref(), sessions.rooms(), 0, page_size) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode room list");
                continue;
            }
        };
        for conn_id in sessions.lobby_connections() {
            if !sessions.send_to(conn_id, Arc::clone(&payload)) {
                tracing::debug!(%conn_id, "lobby connection gone, skipped");
            }
        }
    }
    tracing::debug!("lobby worker stopped");
}
