//! Error types for the session layer.

use labyrinth_protocol::{ErrorKind, PlayerId, RoomId};
use labyrinth_room::RoomError;
use labyrinth_transport::ConnectionId;

/// Errors that can occur while tracking connections.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The [`Authenticator`](crate::Authenticator) rejected the token.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The player already has a live connection.
    #[error("player {0} is already connected")]
    DoubleSession(PlayerId),

    /// The connection has not finished the handshake.
    #[error("{0} is not authenticated")]
    NotAuthenticated(ConnectionId),

    /// The connection was never registered or has already gone.
    #[error("{0} is not registered")]
    UnknownConnection(ConnectionId),

    /// A connection sits in at most one room at a time.
    #[error("player {0} is already in room {1}")]
    AlreadyInRoom(PlayerId, RoomId),

    /// The connection is in the lobby, not a room.
    #[error("player {0} is not in a room")]
    NotInRoom(PlayerId),

    #[error(transparent)]
    Room(#[from] RoomError),
}

impl SessionError {
    /// The wire error category for this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AuthFailed(_) | Self::NotAuthenticated(_) => ErrorKind::Unauthorized,
            Self::DoubleSession(_) => ErrorKind::DoubleSessionAuthorized,
            Self::UnknownConnection(_) => ErrorKind::UnknownError,
            Self::AlreadyInRoom(..) | Self::NotInRoom(_) => ErrorKind::ValidationError,
            Self::Room(e) => e.kind(),
        }
    }
}
