//! Error types for the board layer.

use labyrinth_protocol::{Direction, ErrorKind, Position};

/// Errors raised by board mutation, queries, and layout loading.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// Shift index is even (a frozen line) or outside the board.
    #[error("cannot shift line {index} {direction}: index must be odd and in 0..{size}")]
    InvalidShift {
        index: i32,
        direction: Direction,
        size: usize,
    },

    /// A coordinate outside the grid.
    #[error("position {0} is outside the board")]
    OutOfBounds(Position),

    /// A movable cell lost its tile. Indicates a corrupted board.
    #[error("cell {0} has no tile")]
    MissingTile(Position),

    /// The layout configuration is unusable.
    #[error("invalid board config: {0}")]
    InvalidConfig(String),

    /// The layout file could not be read.
    #[error("failed to read board config: {0}")]
    Io(#[from] std::io::Error),

    /// The layout file is not valid JSON for a [`BoardConfig`](crate::BoardConfig).
    #[error("failed to parse board config: {0}")]
    Json(#[from] serde_json::Error),
}

impl BoardError {
    /// The wire error category for this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidShift { .. } => ErrorKind::InvalidShift,
            Self::OutOfBounds(_) => ErrorKind::InvalidMove,
            Self::InvalidConfig(_) => ErrorKind::ValidationError,
            Self::MissingTile(_) | Self::Io(_) | Self::Json(_) => ErrorKind::UnknownError,
        }
    }
}
