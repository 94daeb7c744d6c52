//! Core value types shared by every layer: identities, compass
//! directions, tile kinds, phases, and the error taxonomy clients see.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A stable player identity, issued by the identity provider.
///
/// Stays the same across reconnects; a new socket gets a new
/// connection id but resolves to the same `PlayerId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A unique identifier for a game room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

/// A cell coordinate. `x` grows east, `y` grows south.
///
/// Signed so that out-of-range client input survives decoding and is
/// rejected by the board rather than by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring position one step in `direction`.
    pub fn step(self, direction: Direction) -> Self {
        Self::new(self.x + direction.dx(), self.y + direction.dy())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// A compass side. On the wire: `"NORTH"`, `"EAST"`, `"SOUTH"`, `"WEST"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All four directions, clockwise from north.
    pub const ALL: [Direction; 4] = [Self::North, Self::East, Self::South, Self::West];

    pub fn dx(self) -> i32 {
        match self {
            Self::East => 1,
            Self::West => -1,
            Self::North | Self::South => 0,
        }
    }

    pub fn dy(self) -> i32 {
        match self {
            Self::South => 1,
            Self::North => -1,
            Self::East | Self::West => 0,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// East or west: a row shift.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::East | Self::West)
    }

    /// North or south: a column shift.
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::North | Self::South)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "NORTH",
            Self::East => "EAST",
            Self::South => "SOUTH",
            Self::West => "WEST",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Tiles, phases, players
// ---------------------------------------------------------------------------

/// The shape of a tile. On the wire: `"STRAIGHT"`, `"CORNER"`, `"T_SHAPED"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TileType {
    Straight,
    Corner,
    TShaped,
}

impl TileType {
    /// Number of distinct orientations. A straight tile looks the same
    /// after a half turn, so it only has two.
    pub fn orientations(self) -> u8 {
        match self {
            Self::Straight => 2,
            Self::Corner | Self::TShaped => 4,
        }
    }
}

/// The turn/phase state of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    WaitingForPlayers,
    PlayerShift,
    PlayerMove,
    GameOver,
}

impl GamePhase {
    /// Returns `true` while a turn is in progress.
    pub fn is_active(self) -> bool {
        matches!(self, Self::PlayerShift | Self::PlayerMove)
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::WaitingForPlayers => "WAITING_FOR_PLAYERS",
            Self::PlayerShift => "PLAYER_SHIFT",
            Self::PlayerMove => "PLAYER_MOVE",
            Self::GameOver => "GAME_OVER",
        };
        f.write_str(name)
    }
}

/// Whether a roster member currently has a live connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerStatus {
    Connected,
    Disconnected,
}

/// The visual identity handed to a player when they take a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvatarType {
    Knight,
    Mage,
    Archer,
    Rogue,
}

impl AvatarType {
    /// Seat order: the first free avatar in this list is assigned.
    pub const ALL: [AvatarType; 4] = [Self::Knight, Self::Mage, Self::Archer, Self::Rogue];

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Knight => "Knight",
            Self::Mage => "Mage",
            Self::Archer => "Archer",
            Self::Rogue => "Rogue",
        }
    }

    pub fn image_name(self) -> &'static str {
        match self {
            Self::Knight => "knight.png",
            Self::Mage => "mage.png",
            Self::Archer => "archer.png",
            Self::Rogue => "rogue.png",
        }
    }

    pub fn color_hex(self) -> &'static str {
        match self {
            Self::Knight => "#C0C0C0",
            Self::Mage => "#0000FF",
            Self::Archer => "#008000",
            Self::Rogue => "#808080",
        }
    }
}

// ---------------------------------------------------------------------------
// ErrorKind
// ---------------------------------------------------------------------------

/// The error category reported to clients in `ERROR_MESSAGE`.
///
/// Every request-scoped failure in the server maps onto one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    UnknownError,
    ValidationError,
    Unauthorized,
    DoubleSessionAuthorized,
    NullRequest,
    RoomNotFound,
    RoomIsFull,
    GameAlreadyStarted,
    NotYourTurn,
    InvalidPhaseForAction,
    InvalidMove,
    InvalidShift,
}
