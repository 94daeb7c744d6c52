//! Room actor: a Tokio task that owns one [`GameRoom`].
//!
//! All access goes through a bounded mpsc channel, so requests for the
//! same room are applied one at a time in arrival order while different
//! rooms never contend.

use std::sync::Arc;

use labyrinth_board::BoardConfig;
use labyrinth_protocol::{Direction, GameStateView, PlayerId, Position, RoomId, RoomSummary};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{mpsc, oneshot, watch};

use crate::events::{RoomEvent, RoomEvents};
use crate::game::{GameRoom, JoinOutcome, MoveOutcome};
use crate::{RoomConfig, RoomError};

type Reply<T> = oneshot::Sender<Result<T, RoomError>>;

/// Commands sent to a room actor. Each carries a reply channel.
pub(crate) enum RoomCommand {
    Join {
        player_id: PlayerId,
        name: String,
        reply: Reply<JoinOutcome>,
    },
    Reconnect {
        player_id: PlayerId,
        reply: Reply<()>,
    },
    /// Resolves to `true` when the roster is now empty.
    Leave {
        player_id: PlayerId,
        reply: Reply<bool>,
    },
    Disconnect {
        player_id: PlayerId,
        reply: Reply<()>,
    },
    Start {
        player_id: PlayerId,
        reply: Reply<()>,
    },
    Shift {
        player_id: PlayerId,
        index: i32,
        direction: Direction,
        reply: Reply<()>,
    },
    Move {
        player_id: PlayerId,
        target: Position,
        reply: Reply<MoveOutcome>,
    },
    Reachable {
        player_id: PlayerId,
        reply: Reply<Vec<Position>>,
    },
    Snapshot {
        reply: Reply<GameStateView>,
    },
    Shutdown,
}

/// Handle to a running room actor. Cheap to clone.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
    summary: watch::Receiver<RoomSummary>,
}

impl std::fmt::Debug for RoomCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Join { .. } => "Join",
            Self::Reconnect { .. } => "Reconnect",
            Self::Leave { .. } => "Leave",
            Self::Disconnect { .. } => "Disconnect",
            Self::Start { .. } => "Start",
            Self::Shift { .. } => "Shift",
            Self::Move { .. } => "Move",
            Self::Reachable { .. } => "Reachable",
            Self::Snapshot { .. } => "Snapshot",
            Self::Shutdown => "Shutdown",
        };
        f.write_str(name)
    }
}

impl RoomHandle {
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Latest lobby summary, published by the actor after each change.
    pub fn summary(&self) -> RoomSummary {
        self.summary.borrow().clone()
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(Reply<T>) -> RoomCommand,
    ) -> Result<T, RoomError> {
        let (reply, reply_rx) = oneshot::channel();
        self.sender
            .send(make(reply))
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?
    }

    pub async fn join(
        &self,
        player_id: PlayerId,
        name: impl Into<String>,
    ) -> Result<JoinOutcome, RoomError> {
        let name = name.into();
        self.request(|reply| RoomCommand::Join {
            player_id,
            name,
            reply,
        })
        .await
    }

    pub async fn reconnect(&self, player_id: PlayerId) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Reconnect { player_id, reply })
            .await
    }

    /// Returns `true` if the room is now empty and has closed.
    pub async fn leave(&self, player_id: PlayerId) -> Result<bool, RoomError> {
        self.request(|reply| RoomCommand::Leave { player_id, reply })
            .await
    }

    pub async fn disconnect(&self, player_id: PlayerId) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Disconnect { player_id, reply })
            .await
    }

    pub async fn start(&self, player_id: PlayerId) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Start { player_id, reply })
            .await
    }

    pub async fn shift(
        &self,
        player_id: PlayerId,
        index: i32,
        direction: Direction,
    ) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Shift {
            player_id,
            index,
            direction,
            reply,
        })
        .await
    }

    pub async fn move_player(
        &self,
        player_id: PlayerId,
        target: Position,
    ) -> Result<MoveOutcome, RoomError> {
        self.request(|reply| RoomCommand::Move {
            player_id,
            target,
            reply,
        })
        .await
    }

    pub async fn reachable_cells(&self, player_id: PlayerId) -> Result<Vec<Position>, RoomError> {
        self.request(|reply| RoomCommand::Reachable { player_id, reply })
            .await
    }

    pub async fn snapshot(&self) -> Result<GameStateView, RoomError> {
        self.request(|reply| RoomCommand::Snapshot { reply }).await
    }

    /// Tells the actor to stop.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }
}

/// The actor state. Runs inside a Tokio task.
struct RoomActor {
    game: GameRoom,
    rng: StdRng,
    /// Set once the last player leaves; every later request sees `NotFound`.
    closed: bool,
    events: RoomEvents,
    summary: watch::Sender<RoomSummary>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    async fn run(mut self) {
        let room_id = self.game.id();
        tracing::info!(%room_id, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            if matches!(cmd, RoomCommand::Shutdown) {
                tracing::info!(%room_id, "room shutting down");
                break;
            }
            tracing::debug!(%room_id, command = ?cmd, "room command");
            self.handle(cmd).await;
        }

        tracing::info!(%room_id, "room actor stopped");
    }

    fn open(&self) -> Result<&GameRoom, RoomError> {
        if self.closed {
            Err(RoomError::NotFound(self.game.id()))
        } else {
            Ok(&self.game)
        }
    }

    fn open_mut(&mut self) -> Result<(&mut GameRoom, &mut StdRng), RoomError> {
        if self.closed {
            Err(RoomError::NotFound(self.game.id()))
        } else {
            Ok((&mut self.game, &mut self.rng))
        }
    }

    /// Publishes the new state if the request succeeded, then replies, so
    /// the summary is current by the time the caller resumes.
    async fn respond<T>(&mut self, reply: Reply<T>, result: Result<T, RoomError>) {
        if result.is_ok() {
            self.publish().await;
        }
        let _ = reply.send(result);
    }

    async fn handle(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join {
                player_id,
                name,
                reply,
            } => {
                let result = self
                    .open_mut()
                    .and_then(|(game, rng)| game.join(player_id, &name, rng));
                self.respond(reply, result).await;
            }
            RoomCommand::Reconnect { player_id, reply } => {
                let result = self
                    .open_mut()
                    .and_then(|(game, _)| game.reconnect(player_id));
                self.respond(reply, result).await;
            }
            RoomCommand::Leave { player_id, reply } => {
                let result = self.open_mut().and_then(|(game, _)| game.leave(player_id));
                if let Ok(true) = result {
                    self.closed = true;
                    tracing::info!(room_id = %self.game.id(), "room empty, closing");
                }
                self.respond(reply, result).await;
            }
            RoomCommand::Disconnect { player_id, reply } => {
                let result = self
                    .open_mut()
                    .and_then(|(game, _)| game.disconnect(player_id));
                self.respond(reply, result).await;
            }
            RoomCommand::Start { player_id, reply } => {
                let result = self
                    .open_mut()
                    .and_then(|(game, rng)| game.start(player_id, rng));
                self.respond(reply, result).await;
            }
            RoomCommand::Shift {
                player_id,
                index,
                direction,
                reply,
            } => {
                let result = self
                    .open_mut()
                    .and_then(|(game, _)| game.shift(player_id, index, direction));
                if let Err(e) = &result {
                    tracing::debug!(room_id = %self.game.id(), %player_id, error = %e, "shift rejected");
                }
                self.respond(reply, result).await;
            }
            RoomCommand::Move {
                player_id,
                target,
                reply,
            } => {
                let result = self
                    .open_mut()
                    .and_then(|(game, _)| game.move_player(player_id, target));
                if let Err(e) = &result {
                    tracing::debug!(room_id = %self.game.id(), %player_id, error = %e, "move rejected");
                }
                self.respond(reply, result).await;
            }
            RoomCommand::Reachable { player_id, reply } => {
                let result = self
                    .open()
                    .and_then(|game| game.reachable_cells(player_id));
                let _ = reply.send(result);
            }
            RoomCommand::Snapshot { reply } => {
                let _ = reply.send(self.open().map(GameRoom::snapshot));
            }
            RoomCommand::Shutdown => {}
        }
    }

    /// Hands the new state to the broadcast worker and, if the lobby
    /// summary moved, refreshes the lobby.
    async fn publish(&mut self) {
        let room_id = self.game.id();
        let event = RoomEvent::StateChanged {
            room_id,
            snapshot: self.game.snapshot(),
        };
        if self.events.state_tx.send(event).await.is_err() {
            tracing::warn!(%room_id, "broadcast worker gone, state update dropped");
        }

        let summary = self.game.summary();
        if *self.summary.borrow() != summary {
            self.summary.send_replace(summary);
            self.events.refresh_lobby();
        }
    }
}

/// Spawns a room actor and returns a handle to it.
///
/// `channel_size` bounds the command queue; senders wait when it is full.
pub(crate) fn spawn_room(
    room_id: RoomId,
    config: RoomConfig,
    board: Arc<BoardConfig>,
    events: RoomEvents,
    channel_size: usize,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size.max(1));
    let game = GameRoom::new(room_id, config, board);
    let (summary_tx, summary_rx) = watch::channel(game.summary());

    let actor = RoomActor {
        game,
        rng: StdRng::from_rng(&mut rand::rng()),
        closed: false,
        events,
        summary: summary_tx,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: tx,
        summary: summary_rx,
    }
}
