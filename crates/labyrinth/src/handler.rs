//! Per-connection handler: handshake, dispatch, and teardown.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Register the connection and start its writer task
//!   2. Receive `HANDSHAKE` → validate version → authenticate token
//!   3. Send `HANDSHAKE_ACK` and the first lobby page
//!   4. Loop: decode client messages → dispatch → reply to this connection
//!
//! Everything the server sends goes through the connection's outbox, so
//! direct replies and broadcasts never race for the socket.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use labyrinth_protocol::{
    ClientMessage, Codec, ErrorKind, PROTOCOL_VERSION, PlayerId, Position, ProtocolError, RoomId,
    ServerMessage,
};
use labyrinth_session::{
    Authenticator, Identity, Outbox, Payload, SessionError, SessionManager, encode, encode_room_list,
};
use labyrinth_transport::{Connection, ConnectionId, WebSocketConnection};
use tokio::sync::mpsc;

use crate::LabyrinthError;
use crate::server::ServerState;

/// Drop guard that dissociates the connection when the handler exits.
///
/// `Drop` is synchronous, so the async teardown runs in its own task.
struct SessionGuard {
    conn_id: ConnectionId,
    sessions: Arc<SessionManager>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let conn_id = self.conn_id;
        let sessions = Arc::clone(&self.sessions);
        tokio::spawn(async move {
            sessions.dissociate(conn_id).await;
        });
    }
}

/// The authenticated side of one connection.
struct Client<'a, A: Authenticator, C: Codec> {
    state: &'a ServerState<A, C>,
    conn_id: ConnectionId,
    outbox: &'a Outbox,
    identity: Identity,
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<A, C>(
    conn: WebSocketConnection,
    state: Arc<ServerState<A, C>>,
) -> Result<(), LabyrinthError>
where
    A: Authenticator,
    C: Codec,
{
    let conn = Arc::new(conn);
    let conn_id = conn.id();
    tracing::debug!(%conn_id, peer = %conn.peer_addr(), "handling new connection");

    let (outbox, outbox_rx) = mpsc::unbounded_channel();
    tokio::spawn(run_writer(Arc::clone(&conn), outbox_rx));
    state.sessions.register(conn_id, outbox.clone());
    let _guard = SessionGuard {
        conn_id,
        sessions: Arc::clone(&state.sessions),
    };

    // --- Step 1: Handshake ---
    let identity = perform_handshake(&conn, &state, &outbox).await?;
    let player_id = identity.player_id;

    let client = Client {
        state: &state,
        conn_id,
        outbox: &outbox,
        identity,
    };

    // --- Step 2: Message loop ---
    loop {
        let data = match tokio::time::timeout(state.config.idle_timeout, conn.recv()).await {
            Ok(Ok(Some(data))) => data,
            Ok(Ok(None)) => {
                tracing::info!(%player_id, "connection closed cleanly");
                break;
            }
            Ok(Err(e)) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                break;
            }
            Err(_) => {
                tracing::info!(%player_id, "connection idle, closing");
                break;
            }
        };

        let msg: ClientMessage = match state.codec.decode(&data) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "failed to decode message");
                client.send(&ServerMessage::error(ErrorKind::NullRequest, e.to_string()));
                continue;
            }
        };

        let kind = msg.kind();
        tracing::debug!(%player_id, %conn_id, message = kind, "dispatching");
        match client.dispatch(msg).await {
            Ok(replies) => {
                for reply in &replies {
                    client.send(reply);
                }
            }
            Err(e) => {
                tracing::debug!(%player_id, message = kind, error = %e, "request rejected");
                client.send(&ServerMessage::error(e.kind(), e.to_string()));
            }
        }
    }

    // _guard drops here → the session is dissociated and the room told.
    Ok(())
}

/// Drains the outbox onto the socket, then closes it.
async fn run_writer(conn: Arc<WebSocketConnection>, mut outbox: mpsc::UnboundedReceiver<Payload>) {
    let conn_id = conn.id();
    while let Some(payload) = outbox.recv().await {
        if let Err(e) = conn.send(&payload).await {
            tracing::debug!(%conn_id, error = %e, "send failed, writer stopping");
            break;
        }
    }
    let _ = conn.close().await;
}

/// Queues a message on an outbox. Encoding failures are logged and the
/// message is dropped.
fn push<C: Codec>(codec: &C, outbox: &Outbox, msg: &ServerMessage) {
    match encode(codec, msg) {
        Ok(payload) => {
            let _ = outbox.send(payload);
        }
        Err(e) => tracing::warn!(error = %e, "failed to encode reply"),
    }
}

/// Receives `HANDSHAKE`, validates it, authenticates the token, and
/// binds the player to this connection. On failure the client gets an
/// `ERROR_MESSAGE` before the connection closes.
async fn perform_handshake<A, C>(
    conn: &WebSocketConnection,
    state: &ServerState<A, C>,
    outbox: &Outbox,
) -> Result<Identity, LabyrinthError>
where
    A: Authenticator,
    C: Codec,
{
    let reject = |kind: ErrorKind, message: String| {
        push(state.codec.as_ref(), outbox, &ServerMessage::error(kind, message));
    };

    let data = match tokio::time::timeout(state.config.handshake_timeout, conn.recv()).await {
        Ok(Ok(Some(data))) => data,
        Ok(Ok(None)) => return Err(LabyrinthError::HandshakeAborted("closed before handshake")),
        Ok(Err(e)) => return Err(LabyrinthError::Transport(e)),
        Err(_) => return Err(LabyrinthError::HandshakeAborted("handshake timed out")),
    };

    let msg: ClientMessage = match state.codec.decode(&data) {
        Ok(msg) => msg,
        Err(e) => {
            reject(ErrorKind::NullRequest, e.to_string());
            return Err(e.into());
        }
    };

    let (version, token) = match msg {
        ClientMessage::Handshake { version, token } => (version, token),
        other => {
            reject(
                ErrorKind::Unauthorized,
                format!("expected HANDSHAKE, got {}", other.kind()),
            );
            let reason = "first message must be HANDSHAKE".to_string();
            return Err(ProtocolError::InvalidMessage(reason).into());
        }
    };

    if version != PROTOCOL_VERSION {
        let message = format!("version mismatch: expected {PROTOCOL_VERSION}, got {version}");
        reject(ErrorKind::ValidationError, message.clone());
        return Err(ProtocolError::InvalidMessage(message).into());
    }

    let identity = match state.auth.authenticate(&token).await {
        Ok(identity) => identity,
        Err(e) => {
            reject(e.kind(), e.to_string());
            return Err(e.into());
        }
    };

    if let Err(e) = state.sessions.authenticate(conn.id(), identity.clone()) {
        reject(e.kind(), e.to_string());
        return Err(e.into());
    }

    push(
        state.codec.as_ref(),
        outbox,
        &ServerMessage::HandshakeAck {
            player_id: identity.player_id,
            player_name: identity.name.clone(),
        },
    );
    match encode_room_list(state.codec.as_ref(), &state.rooms, 0, state.config.lobby_page_size) {
        Ok(payload) => {
            let _ = outbox.send(payload);
        }
        Err(e) => tracing::warn!(error = %e, "failed to encode room list"),
    }

    Ok(identity)
}

impl<A: Authenticator, C: Codec> Client<'_, A, C> {
    fn player_id(&self) -> PlayerId {
        self.identity.player_id
    }

    fn send(&self, msg: &ServerMessage) {
        push(self.state.codec.as_ref(), self.outbox, msg);
    }

    /// The room this connection is in, which must be `room_id`.
    fn require_room(&self, room_id: RoomId) -> Result<(), SessionError> {
        match self.state.sessions.room_of(self.conn_id) {
            Some(current) if current == room_id => Ok(()),
            _ => Err(SessionError::NotInRoom(self.player_id())),
        }
    }

    /// Fails if this connection is already in a room.
    fn require_lobby(&self) -> Result<(), SessionError> {
        match self.state.sessions.room_of(self.conn_id) {
            Some(current) => Err(SessionError::AlreadyInRoom(self.player_id(), current)),
            None => Ok(()),
        }
    }

    fn room_list(&self, page: usize, size: usize) -> ServerMessage {
        let (rooms, page_info) = self.state.rooms.rooms_page(page, size);
        ServerMessage::RoomListUpdate { rooms, page_info }
    }

    /// Applies one client message. Returns the replies for this
    /// connection; room state reaches every player through the broadcast
    /// worker.
    async fn dispatch(&self, msg: ClientMessage) -> Result<Vec<ServerMessage>, LabyrinthError> {
        let rooms = &self.state.rooms;
        let player_id = self.player_id();

        match msg {
            ClientMessage::Handshake { .. } => {
                Err(ProtocolError::InvalidMessage("handshake already completed".into()).into())
            }

            ClientMessage::CreateRoom {
                max_players,
                room_name,
            } => {
                self.require_lobby()?;
                let handle = rooms
                    .create_room(player_id, &self.identity.name, max_players, room_name.as_deref())
                    .await?;
                let room_id = handle.room_id();
                self.state.sessions.associate(self.conn_id, room_id)?;
                // The owner's first broadcast went out before the association.
                let snapshot = handle.snapshot().await?;
                Ok(vec![
                    ServerMessage::RoomCreated { room_id, player_id },
                    ServerMessage::GameStateUpdate(snapshot),
                ])
            }

            ClientMessage::JoinRoom { room_id } => {
                self.require_lobby()?;
                self.state.sessions.associate(self.conn_id, room_id)?;
                if let Err(e) = rooms.join(room_id, player_id, &self.identity.name).await {
                    self.state.sessions.return_to_lobby(self.conn_id);
                    return Err(e.into());
                }
                Ok(vec![ServerMessage::JoinSuccess { room_id }])
            }

            ClientMessage::ReconnectToRoom { room_id } => {
                let current = self.state.sessions.room_of(self.conn_id);
                if let Some(current) = current {
                    if current != room_id {
                        return Err(SessionError::AlreadyInRoom(player_id, current).into());
                    }
                }
                if current.is_none() {
                    self.state.sessions.associate(self.conn_id, room_id)?;
                }
                if let Err(e) = rooms.reconnect(room_id, player_id).await {
                    if current.is_none() {
                        self.state.sessions.return_to_lobby(self.conn_id);
                    }
                    return Err(e.into());
                }
                Ok(vec![ServerMessage::JoinSuccess { room_id }])
            }

            ClientMessage::LeaveRoom => {
                let room_id = self
                    .state
                    .sessions
                    .room_of(self.conn_id)
                    .ok_or(SessionError::NotInRoom(player_id))?;
                let left = rooms.leave(room_id, player_id).await;
                self.state.sessions.return_to_lobby(self.conn_id);
                match left {
                    // Already gone; the player is back in the lobby either way.
                    Ok(_) | Err(labyrinth_room::RoomError::NotFound(_)) => {}
                    Err(e) => return Err(e.into()),
                }
                Ok(vec![
                    ServerMessage::LeftRoom { room_id },
                    self.room_list(0, self.state.config.lobby_page_size),
                ])
            }

            ClientMessage::StartGame { room_id } => {
                self.require_room(room_id)?;
                rooms.get(room_id)?.start(player_id).await?;
                Ok(Vec::new())
            }

            ClientMessage::PlayerActionShift {
                room_id,
                shift_index,
                shift_direction,
            } => {
                self.require_room(room_id)?;
                rooms
                    .get(room_id)?
                    .shift(player_id, shift_index, shift_direction)
                    .await?;
                Ok(Vec::new())
            }

            ClientMessage::PlayerActionMove {
                room_id,
                target_x,
                target_y,
            } => {
                self.require_room(room_id)?;
                let outcome = rooms
                    .get(room_id)?
                    .move_player(player_id, Position::new(target_x, target_y))
                    .await?;
                if outcome.won {
                    tracing::info!(%room_id, %player_id, "game won");
                }
                Ok(Vec::new())
            }

            ClientMessage::GetRoomListRequest { page, size } => {
                let size = size.unwrap_or(self.state.config.lobby_page_size);
                Ok(vec![self.room_list(page, size)])
            }

            ClientMessage::GetReachableCells { room_id } => {
                self.require_room(room_id)?;
                let cells = rooms.get(room_id)?.reachable_cells(player_id).await?;
                Ok(vec![ServerMessage::ReachableCells { room_id, cells }])
            }

            ClientMessage::Ping { client_time } => Ok(vec![ServerMessage::Pong {
                client_time,
                server_time: unix_millis(),
            }]),
        }
    }
}

fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}
