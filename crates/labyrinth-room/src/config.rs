//! Room and registry configuration.

use labyrinth_board::BoardConfig;
use serde::{Deserialize, Serialize};

use crate::RoomError;

/// Fewest seats a room may have; also the fewest players a game needs.
pub const MIN_PLAYERS: usize = 2;

/// Default command channel size for room actors.
pub const DEFAULT_CHANNEL_SIZE: usize = 64;

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Settings chosen by the player who creates a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    pub name: String,
    pub max_players: usize,
}

impl RoomConfig {
    /// Builds a config, naming the room "Room of {owner}" when `name`
    /// is missing or blank.
    pub fn new(owner_name: &str, name: Option<&str>, max_players: usize) -> Self {
        let name = match name.map(str::trim) {
            Some(n) if !n.is_empty() => n.to_owned(),
            _ => format!("Room of {owner_name}"),
        };
        Self { name, max_players }
    }

    /// Checks `max_players` fits between [`MIN_PLAYERS`] and `seats`.
    pub fn validate(&self, seats: usize) -> Result<(), RoomError> {
        if (MIN_PLAYERS..=seats).contains(&self.max_players) {
            Ok(())
        } else {
            Err(RoomError::InvalidMaxPlayers {
                requested: self.max_players,
                max: seats,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// ManagerConfig
// ---------------------------------------------------------------------------

/// Settings shared by every room the registry creates.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// The layout every game is dealt from.
    pub board: BoardConfig,
    /// Capacity of each room actor's command channel.
    pub channel_size: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            channel_size: DEFAULT_CHANNEL_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_blank_name_defaults_to_owner() {
        assert_eq!(RoomConfig::new("ada", None, 2).name, "Room of ada");
        assert_eq!(RoomConfig::new("ada", Some("   "), 2).name, "Room of ada");
        assert_eq!(RoomConfig::new("ada", Some(" Maze "), 2).name, "Maze");
    }

    #[test]
    fn test_validate_max_players_range() {
        assert!(RoomConfig::new("a", None, 2).validate(4).is_ok());
        assert!(RoomConfig::new("a", None, 4).validate(4).is_ok());
        assert!(RoomConfig::new("a", None, 1).validate(4).is_err());
        assert!(RoomConfig::new("a", None, 5).validate(4).is_err());
        assert!(RoomConfig::new("a", None, 3).validate(2).is_err());
    }

    #[test]
    fn test_manager_config_default() {
        let config = ManagerConfig::default();
        assert_eq!(config.channel_size, 64);
        assert_eq!(config.board.board_size, 7);
    }
}
