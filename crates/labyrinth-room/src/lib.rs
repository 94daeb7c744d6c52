//! Game rooms for the labyrinth server.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns one
//! [`GameRoom`]: its roster, its board, and the turn state machine.
//! Requests to the same room are applied in order; different rooms never
//! share a lock.
//!
//! # Key types
//!
//! - [`GameRoom`]: the aggregate and its phase rules
//! - [`RoomManager`]: creates and destroys rooms, lists them for the lobby
//! - [`RoomHandle`]: sends commands to a running room actor
//! - [`RoomEvents`]: channels feeding the broadcast and lobby workers

mod config;
mod error;
mod events;
mod game;
mod manager;
mod player;
mod room;

pub use config::{DEFAULT_CHANNEL_SIZE, MIN_PLAYERS, ManagerConfig, RoomConfig};
pub use error::RoomError;
pub use events::{LobbyEvent, RoomEvent, RoomEvents};
pub use game::{GameRoom, JoinOutcome, MoveOutcome};
pub use manager::RoomManager;
pub use player::Player;
pub use room::RoomHandle;
