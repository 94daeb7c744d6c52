//! Session layer for the labyrinth server.
//!
//! This crate maps ephemeral network connections to durable players and
//! rooms, and fans room state out to those connections:
//!
//! 1. **Authentication**: resolving a handshake token ([`Authenticator`])
//! 2. **Association**: which connection is which player, in which room
//!    ([`SessionManager`])
//! 3. **Broadcast**: background workers that deliver room snapshots and
//!    lobby listings ([`run_broadcast_worker`], [`run_lobby_worker`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Server (above)       ← dispatches client messages, owns the sockets
//!     ↕
//! Session (this crate) ← connection ↔ player ↔ room maps, fan-out
//!     ↕
//! Room (below)         ← game rooms, turn rules, room registry
//! ```

mod auth;
mod broadcast;
mod error;
mod manager;

pub use auth::{Authenticator, Identity};
pub use broadcast::{encode, encode_room_list, run_broadcast_worker, run_lobby_worker};
pub use error::SessionError;
pub use manager::{Outbox, Payload, SessionManager};
