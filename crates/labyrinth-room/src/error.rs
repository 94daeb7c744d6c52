//! Error types for the room layer.

use labyrinth_board::BoardError;
use labyrinth_protocol::{ErrorKind, GamePhase, PlayerId, Position, RoomId};

/// Errors that can occur during room operations.
///
/// Every variant is request-scoped: the room is left exactly as it was.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist (or was torn down).
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// No free seat.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// Seats are closed once the first turn is dealt.
    #[error("game in room {0} has already started")]
    GameAlreadyStarted(RoomId),

    #[error("it is not {player_id}'s turn in room {room_id}")]
    NotYourTurn { player_id: PlayerId, room_id: RoomId },

    /// The action is not legal in the current phase.
    #[error("cannot {action} during {phase}")]
    InvalidPhase { action: &'static str, phase: GamePhase },

    /// The destination is off the board or not connected to the player.
    #[error("cannot move from {from} to {to}")]
    InvalidMove { from: Position, to: Position },

    /// The player has no seat in this room.
    #[error("player {0} is not in room {1}")]
    NotInRoom(PlayerId, RoomId),

    /// A room must seat between 2 and the layout's base count.
    #[error("max players must be between 2 and {max}, got {requested}")]
    InvalidMaxPlayers { requested: usize, max: usize },

    #[error("room {0} needs at least 2 players to start")]
    NotEnoughPlayers(RoomId),

    /// Shift or layout failure from the board.
    #[error(transparent)]
    Board(#[from] BoardError),

    /// The room actor is gone or stopped answering.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}

impl RoomError {
    /// The wire error category for this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::RoomNotFound,
            Self::RoomFull(_) => ErrorKind::RoomIsFull,
            Self::GameAlreadyStarted(_) => ErrorKind::GameAlreadyStarted,
            Self::NotYourTurn { .. } => ErrorKind::NotYourTurn,
            Self::InvalidPhase { .. } => ErrorKind::InvalidPhaseForAction,
            Self::InvalidMove { .. } => ErrorKind::InvalidMove,
            Self::NotInRoom(..)
            | Self::InvalidMaxPlayers { .. }
            | Self::NotEnoughPlayers(_) => ErrorKind::ValidationError,
            Self::Board(e) => e.kind(),
            Self::Unavailable(_) => ErrorKind::UnknownError,
        }
    }
}
