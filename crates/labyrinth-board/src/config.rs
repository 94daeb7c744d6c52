//! Board layout configuration.
//!
//! A layout names the board size, the player bases with their exits, and
//! the fixed tiles on stationary cells. It is read once at startup:
//!
//! ```json
//! {
//!   "boardSize": 7,
//!   "bases": [{"x": 0, "y": 0, "exits": ["EAST", "SOUTH"]}],
//!   "stationaryTiles": [{"x": 2, "y": 0, "type": "T_SHAPED", "orientation": 2}],
//!   "markerCount": 12
//! }
//! ```

use std::path::Path;

use labyrinth_protocol::{Direction, Position, TileType};
use serde::{Deserialize, Serialize};

use crate::BoardError;

/// Seats per room are capped by the avatar pool.
pub const MAX_BASES: usize = 4;

const DEFAULT_MARKER_COUNT: u32 = 12;

fn default_marker_count() -> u32 {
    DEFAULT_MARKER_COUNT
}

/// A player's home cell and its fixed exits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseConfig {
    pub x: i32,
    pub y: i32,
    pub exits: Vec<Direction>,
}

impl BaseConfig {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// A tile fixed to a stationary cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationaryTileConfig {
    pub x: i32,
    pub y: i32,
    #[serde(rename = "type")]
    pub tile_type: TileType,
    pub orientation: u8,
}

impl StationaryTileConfig {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// The full board layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardConfig {
    pub board_size: usize,
    pub bases: Vec<BaseConfig>,
    #[serde(default)]
    pub stationary_tiles: Vec<StationaryTileConfig>,
    #[serde(default = "default_marker_count")]
    pub marker_count: u32,
}

impl BoardConfig {
    /// Parses and validates a layout from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, BoardError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a layout file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, BoardError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        tracing::info!(
            path = %path.display(),
            size = config.board_size,
            bases = config.bases.len(),
            "board config loaded"
        );
        Ok(config)
    }

    /// How many seats this layout supports.
    pub fn seats(&self) -> usize {
        self.bases.len().min(MAX_BASES)
    }

    /// Checks the layout can produce a legal board.
    ///
    /// # Errors
    /// `InvalidConfig` naming the first problem found.
    pub fn validate(&self) -> Result<(), BoardError> {
        let size = self.board_size;
        if size < 3 || size % 2 == 0 {
            return Err(invalid(format!("board size {size} must be odd and at least 3")));
        }
        if self.bases.is_empty() {
            return Err(invalid("at least one base is required".into()));
        }
        if self.marker_count == 0 {
            return Err(invalid("marker count must be at least 1".into()));
        }

        let on_stationary_cell = |p: Position| {
            let n = size as i32;
            (0..n).contains(&p.x) && (0..n).contains(&p.y) && p.x % 2 == 0 && p.y % 2 == 0
        };

        let mut seen = Vec::new();
        for base in self.bases.iter().take(MAX_BASES) {
            let p = base.position();
            if !on_stationary_cell(p) {
                return Err(invalid(format!("base {p} is not a stationary cell")));
            }
            if seen.contains(&p) {
                return Err(invalid(format!("base {p} is listed twice")));
            }
            seen.push(p);
        }
        for tile in &self.stationary_tiles {
            let p = tile.position();
            if !on_stationary_cell(p) {
                return Err(invalid(format!("fixed tile {p} is not a stationary cell")));
            }
            if tile.orientation >= tile.tile_type.orientations() {
                return Err(invalid(format!(
                    "fixed tile {p} has orientation {} out of range",
                    tile.orientation
                )));
            }
        }
        Ok(())
    }
}

fn invalid(message: String) -> BoardError {
    BoardError::InvalidConfig(message)
}

impl Default for BoardConfig {
    /// The classic 7x7 layout: four corner bases and twelve fixed
    /// T-junctions on the remaining stationary cells.
    fn default() -> Self {
        use Direction::{East, North, South, West};

        let base = |x, y, exits: &[Direction]| BaseConfig {
            x,
            y,
            exits: exits.to_vec(),
        };
        let t = |x, y, orientation| StationaryTileConfig {
            x,
            y,
            tile_type: TileType::TShaped,
            orientation,
        };

        Self {
            board_size: 7,
            bases: vec![
                base(0, 0, &[East, South]),
                base(6, 0, &[West, South]),
                base(6, 6, &[West, North]),
                base(0, 6, &[East, North]),
            ],
            stationary_tiles: vec![
                t(2, 0, 2),
                t(4, 0, 2),
                t(0, 2, 1),
                t(0, 4, 1),
                t(6, 2, 3),
                t(6, 4, 3),
                t(2, 6, 0),
                t(4, 6, 0),
                t(2, 2, 1),
                t(4, 2, 2),
                t(2, 4, 0),
                t(4, 4, 3),
            ],
            marker_count: DEFAULT_MARKER_COUNT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = BoardConfig::default();
        config.validate().unwrap();
        assert_eq!(config.seats(), 4);
        assert_eq!(config.stationary_tiles.len(), 12);
    }

    #[test]
    fn test_from_json_str_applies_defaults() {
        let config = BoardConfig::from_json_str(
            r#"{"boardSize":5,"bases":[{"x":0,"y":0,"exits":["EAST","SOUTH"]}]}"#,
        )
        .unwrap();
        assert_eq!(config.board_size, 5);
        assert!(config.stationary_tiles.is_empty());
        assert_eq!(config.marker_count, 12);
    }

    #[test]
    fn test_from_json_str_reads_tile_type_field() {
        let config = BoardConfig::from_json_str(
            r#"{"boardSize":3,"bases":[{"x":0,"y":0,"exits":[]}],
                "stationaryTiles":[{"x":2,"y":2,"type":"CORNER","orientation":3}]}"#,
        )
        .unwrap();
        assert_eq!(config.stationary_tiles[0].tile_type, TileType::Corner);
    }

    #[test]
    fn test_validate_even_size_rejected() {
        let config = BoardConfig {
            board_size: 6,
            ..BoardConfig::default()
        };
        assert!(matches!(config.validate(), Err(BoardError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_base_on_movable_cell_rejected() {
        let mut config = BoardConfig::default();
        config.bases[0].x = 1;
        assert!(matches!(config.validate(), Err(BoardError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_straight_orientation_out_of_range_rejected() {
        let mut config = BoardConfig::default();
        config.stationary_tiles[0].tile_type = TileType::Straight;
        config.stationary_tiles[0].orientation = 2;
        assert!(matches!(config.validate(), Err(BoardError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_no_bases_rejected() {
        let config = BoardConfig {
            bases: Vec::new(),
            ..BoardConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_str_malformed_is_json_error() {
        assert!(matches!(
            BoardConfig::from_json_str("{"),
            Err(BoardError::Json(_))
        ));
    }
}
