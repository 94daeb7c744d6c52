//! `LabyrinthServer` builder and server loop.
//!
//! This is the entry point for running a labyrinth game server. It ties
//! together all the layers: transport → protocol → session → room.

use std::sync::Arc;
use std::time::Duration;

use labyrinth_board::BoardConfig;
use labyrinth_protocol::{Codec, JsonCodec};
use labyrinth_room::{LobbyEvent, ManagerConfig, RoomEvent, RoomEvents, RoomManager};
use labyrinth_session::{Authenticator, SessionManager, run_broadcast_worker, run_lobby_worker};
use labyrinth_transport::{Transport, WebSocketTransport};
use tokio::sync::mpsc;

use crate::handler::handle_connection;
use crate::{LabyrinthError, ServerConfig};

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState<A: Authenticator, C: Codec> {
    pub(crate) sessions: Arc<SessionManager>,
    pub(crate) rooms: Arc<RoomManager>,
    pub(crate) auth: A,
    pub(crate) codec: Arc<C>,
    pub(crate) config: ServerConfig,
}

/// Builder for configuring and starting a labyrinth server.
///
/// # Example
///
/// ```rust,ignore
/// use labyrinth::prelude::*;
///
/// let server = LabyrinthServerBuilder::new()
///     .bind("0.0.0.0:8080")
///     .build(my_auth)
///     .await?;
/// server.run().await
/// ```
pub struct LabyrinthServerBuilder {
    config: ServerConfig,
}

impl LabyrinthServerBuilder {
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
        }
    }

    /// Replaces every setting at once.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Sets the board layout. Validated in [`build`](Self::build).
    pub fn board(mut self, board: BoardConfig) -> Self {
        self.config.board = board;
        self
    }

    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.config.handshake_timeout = timeout;
        self
    }

    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.idle_timeout = timeout;
        self
    }

    pub fn lobby_page_size(mut self, size: usize) -> Self {
        self.config.lobby_page_size = size.max(1);
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.config.event_capacity = capacity.max(1);
        self
    }

    pub fn room_channel_size(mut self, size: usize) -> Self {
        self.config.room_channel_size = size.max(1);
        self
    }

    pub fn max_message_size(mut self, bytes: usize) -> Self {
        self.config.max_message_size = bytes.max(1);
        self
    }

    /// Validates the board, binds the listener, and wires the room
    /// registry to the session layer.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build<A: Authenticator>(
        self,
        auth: A,
    ) -> Result<LabyrinthServer<A, JsonCodec>, LabyrinthError> {
        let config = self.config;
        let (events, state_rx, lobby_rx) = RoomEvents::channel(config.event_capacity);
        let rooms = Arc::new(RoomManager::new(
            ManagerConfig {
                board: config.board.clone(),
                channel_size: config.room_channel_size,
            },
            events,
        )?);
        let transport = WebSocketTransport::bind(&config.bind_addr)
            .await?
            .with_max_message_size(config.max_message_size);
        let sessions = Arc::new(SessionManager::new(Arc::clone(&rooms)));

        let state = Arc::new(ServerState {
            sessions,
            rooms,
            auth,
            codec: Arc::new(JsonCodec),
            config,
        });

        Ok(LabyrinthServer {
            transport,
            state,
            state_rx,
            lobby_rx,
        })
    }
}

impl Default for LabyrinthServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound labyrinth server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct LabyrinthServer<A: Authenticator, C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<A, C>>,
    state_rx: mpsc::Receiver<RoomEvent>,
    lobby_rx: mpsc::Receiver<LobbyEvent>,
}

impl<A, C> LabyrinthServer<A, C>
where
    A: Authenticator,
    C: Codec,
{
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr, LabyrinthError> {
        Ok(self.transport.local_addr()?)
    }

    /// Number of live rooms.
    pub fn room_count(&self) -> usize {
        self.state.rooms.room_count()
    }

    /// Starts the broadcast and lobby workers, then accepts connections
    /// until the process is terminated. Each connection gets its own task.
    pub async fn run(mut self) -> Result<(), LabyrinthError> {
        tokio::spawn(run_broadcast_worker(
            Arc::clone(&self.state.sessions),
            Arc::clone(&self.state.codec),
            self.state_rx,
        ));
        tokio::spawn(run_lobby_worker(
            Arc::clone(&self.state.sessions),
            Arc::clone(&self.state.codec),
            self.state.config.lobby_page_size,
            self.lobby_rx,
        ));

        tracing::info!(addr = %self.state.config.bind_addr, "labyrinth server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
