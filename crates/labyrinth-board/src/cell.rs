//! Grid cells.

use labyrinth_protocol::{CellView, Direction, Position};

use crate::{Marker, Tile};

/// One square of the grid.
///
/// A stationary cell (both coordinates even) never moves. It either holds
/// a fixed tile or is bare with `fixed_open_sides` (a base). A movable
/// cell always holds a tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    position: Position,
    stationary: bool,
    pub tile: Option<Tile>,
    pub fixed_open_sides: Vec<Direction>,
    pub fixed_marker: Option<Marker>,
}

impl Cell {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            stationary: position.x % 2 == 0 && position.y % 2 == 0,
            tile: None,
            fixed_open_sides: Vec::new(),
            fixed_marker: None,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_stationary(&self) -> bool {
        self.stationary
    }

    /// The tile's open sides if the cell holds one, else the fixed exits.
    pub fn open_sides(&self) -> &[Direction] {
        match &self.tile {
            Some(tile) => tile.open_sides(),
            None => &self.fixed_open_sides,
        }
    }

    /// One-sided check. Passability also needs the neighbour to agree;
    /// see [`Board::is_connected`](crate::Board::is_connected).
    pub fn connects_to(&self, direction: Direction) -> bool {
        self.open_sides().contains(&direction)
    }

    /// The marker on the tile, falling back to one fixed to the cell.
    pub fn active_marker(&self) -> Option<&Marker> {
        self.tile
            .as_ref()
            .and_then(|t| t.marker.as_ref())
            .or(self.fixed_marker.as_ref())
    }

    pub fn remove_active_marker(&mut self) -> Option<Marker> {
        if let Some(marker) = self.tile.as_mut().and_then(|t| t.marker.take()) {
            return Some(marker);
        }
        self.fixed_marker.take()
    }

    pub fn to_view(&self) -> CellView {
        CellView {
            x: self.position.x,
            y: self.position.y,
            stationary: self.stationary,
            tile: self.tile.as_ref().map(Tile::to_view),
            marker: self.fixed_marker.as_ref().map(Marker::to_view),
            open_sides: self.open_sides().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use labyrinth_protocol::TileType;

    use super::*;

    #[test]
    fn test_new_stationary_only_on_even_even() {
        assert!(Cell::new(Position::new(0, 0)).is_stationary());
        assert!(Cell::new(Position::new(2, 4)).is_stationary());
        assert!(!Cell::new(Position::new(1, 2)).is_stationary());
        assert!(!Cell::new(Position::new(2, 3)).is_stationary());
    }

    #[test]
    fn test_open_sides_bare_cell_uses_fixed_exits() {
        let mut cell = Cell::new(Position::new(0, 0));
        cell.fixed_open_sides = vec![Direction::East, Direction::South];
        assert!(cell.connects_to(Direction::East));
        assert!(!cell.connects_to(Direction::North));
    }

    #[test]
    fn test_open_sides_tile_overrides_fixed_exits() {
        let mut cell = Cell::new(Position::new(0, 0));
        cell.fixed_open_sides = vec![Direction::East];
        cell.tile = Some(Tile::new(TileType::Straight, 0));
        assert!(!cell.connects_to(Direction::East));
        assert!(cell.connects_to(Direction::North));
    }

    #[test]
    fn test_remove_active_marker_prefers_tile() {
        let mut cell = Cell::new(Position::new(2, 2));
        let mut tile = Tile::new(TileType::Corner, 0);
        tile.marker = Some(Marker::new(1));
        cell.tile = Some(tile);
        cell.fixed_marker = Some(Marker::new(2));

        assert_eq!(cell.active_marker().map(|m| m.id), Some(1));
        assert_eq!(cell.remove_active_marker().map(|m| m.id), Some(1));
        assert_eq!(cell.active_marker().map(|m| m.id), Some(2));
        assert_eq!(cell.remove_active_marker().map(|m| m.id), Some(2));
        assert!(cell.remove_active_marker().is_none());
    }
}
