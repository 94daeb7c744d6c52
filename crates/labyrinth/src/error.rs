//! Unified error type for the labyrinth server.

use labyrinth_board::BoardError;
use labyrinth_protocol::{ErrorKind, ProtocolError};
use labyrinth_room::RoomError;
use labyrinth_session::SessionError;
use labyrinth_transport::TransportError;

/// Top-level error that wraps every crate-specific error.
///
/// The `#[from]` attributes let `?` lift sub-crate errors directly.
#[derive(Debug, thiserror::Error)]
pub enum LabyrinthError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Board layout failed to load or validate.
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Room(#[from] RoomError),

    /// The peer went away or went quiet before completing the handshake.
    #[error("handshake aborted: {0}")]
    HandshakeAborted(&'static str),
}

impl LabyrinthError {
    /// The wire error category reported to the client.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Protocol(ProtocolError::Decode(_)) => ErrorKind::NullRequest,
            Self::Protocol(ProtocolError::InvalidMessage(_)) => ErrorKind::ValidationError,
            Self::Board(e) => e.kind(),
            Self::Session(e) => e.kind(),
            Self::Room(e) => e.kind(),
            Self::Transport(_) | Self::Protocol(_) | Self::HandshakeAborted(_) => {
                ErrorKind::UnknownError
            }
        }
    }
}
