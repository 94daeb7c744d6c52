//! Wire protocol for the labyrinth server.
//!
//! This crate defines what clients and the server say to each other:
//!
//! - **Types** ([`PlayerId`], [`RoomId`], [`Direction`], [`GamePhase`],
//!   [`ErrorKind`], ...): values shared by every layer.
//! - **Messages** ([`ClientMessage`], [`ServerMessage`]): one tagged
//!   JSON object per frame.
//! - **Views** ([`GameStateView`], [`RoomSummary`], ...): read-only
//!   snapshots of room and board state.
//! - **Codec** ([`Codec`], [`JsonCodec`]): bytes in, messages out.
//!
//! ```text
//! Transport (bytes) -> Protocol (ClientMessage) -> Room (game rules)
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod codec;
mod error;
mod message;
mod types;
mod view;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use message::{ClientMessage, PROTOCOL_VERSION, ServerMessage};
pub use types::{
    AvatarType, Direction, ErrorKind, GamePhase, PlayerId, PlayerStatus, Position, RoomId,
    TileType,
};
pub use view::{
    BoardView, CellView, GameStateView, MarkerView, PageInfo, PlayerView, RoomSummary, TileView,
};
