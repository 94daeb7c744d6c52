//! Board model for the labyrinth server.
//!
//! A [`Board`] is a square grid of [`Cell`]s. Cells where both
//! coordinates are even are stationary; the rest hold movable [`Tile`]s
//! that slide one step whenever a row or column is [shifted](Board::shift).
//! Movement legality comes from [`Board::is_reachable`], a breadth-first
//! search over sides that are open on *both* ends.
//!
//! Boards are dealt from a [`BoardConfig`] by [`deal`].

mod board;
mod cell;
mod config;
mod error;
mod setup;
mod tile;

pub use board::Board;
pub use cell::Cell;
pub use config::{BaseConfig, BoardConfig, MAX_BASES, StationaryTileConfig};
pub use error::BoardError;
pub use setup::{DealtBoard, Seat, deal};
pub use tile::{Marker, Tile};
