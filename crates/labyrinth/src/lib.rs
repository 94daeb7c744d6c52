//! # Labyrinth
//!
//! Real-time server for a multiplayer shifting-labyrinth board game.
//!
//! Players connect over WebSocket, authenticate with a token, browse a
//! paged lobby, and play in rooms of 2 to 4. Each room is a single Tokio
//! task that owns its board, so actions on one room are linearized while
//! different rooms never contend. Every state change is broadcast as a
//! full snapshot to the room's connected players.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use labyrinth::prelude::*;
//!
//! struct AnyToken;
//!
//! impl Authenticator for AnyToken {
//!     async fn authenticate(&self, token: &str) -> Result<Identity, SessionError> {
//!         let id = token.parse().map_err(|_| SessionError::AuthFailed(token.into()))?;
//!         Ok(Identity::new(PlayerId(id), format!("player-{id}")))
//!     }
//! }
//!
//! # async fn run() -> Result<(), LabyrinthError> {
//! let server = LabyrinthServerBuilder::new()
//!     .bind("0.0.0.0:8080")
//!     .build(AnyToken)
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod server;

pub use config::ServerConfig;
pub use error::LabyrinthError;
pub use server::{LabyrinthServer, LabyrinthServerBuilder};

/// Installs a `tracing` subscriber that honours `RUST_LOG`, defaulting to
/// `info`. Does nothing if a subscriber is already set.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .try_init();
}

pub mod prelude {
    pub use crate::{LabyrinthError, LabyrinthServer, LabyrinthServerBuilder, ServerConfig};
    pub use labyrinth_board::{BoardConfig, BoardError};
    pub use labyrinth_protocol::{
        ClientMessage, Direction, ErrorKind, GamePhase, PROTOCOL_VERSION, PlayerId, Position,
        RoomId, ServerMessage,
    };
    pub use labyrinth_session::{Authenticator, Identity, SessionError};
}
