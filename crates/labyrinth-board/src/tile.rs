//! Tiles and the markers they carry.

use labyrinth_protocol::{Direction, MarkerView, PlayerId, TileType, TileView};

use Direction::{East, North, South, West};

/// A collectible goal token.
///
/// `id` never changes; `owner` is set once the marker is dealt to a
/// player as a target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Marker {
    pub id: u32,
    pub owner: Option<PlayerId>,
}

impl Marker {
    pub fn new(id: u32) -> Self {
        Self { id, owner: None }
    }

    pub fn to_view(&self) -> MarkerView {
        MarkerView {
            id: self.id,
            owner_id: self.owner,
        }
    }
}

/// A maze piece. Connectivity is a pure function of `(tile_type, orientation)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tile {
    tile_type: TileType,
    orientation: u8,
    pub marker: Option<Marker>,
}

impl Tile {
    /// Creates a tile. `orientation` is reduced modulo the number of
    /// orientations the type has.
    pub fn new(tile_type: TileType, orientation: u8) -> Self {
        Self {
            tile_type,
            orientation: orientation % tile_type.orientations(),
            marker: None,
        }
    }

    pub fn tile_type(&self) -> TileType {
        self.tile_type
    }

    pub fn orientation(&self) -> u8 {
        self.orientation
    }

    /// The compass sides this tile is open on.
    pub fn open_sides(&self) -> &'static [Direction] {
        match (self.tile_type, self.orientation) {
            (TileType::Straight, 0) => &[North, South],
            (TileType::Straight, _) => &[East, West],

            (TileType::Corner, 0) => &[North, East],
            (TileType::Corner, 1) => &[East, South],
            (TileType::Corner, 2) => &[South, West],
            (TileType::Corner, _) => &[West, North],

            (TileType::TShaped, 0) => &[North, East, West],
            (TileType::TShaped, 1) => &[North, East, South],
            (TileType::TShaped, 2) => &[East, South, West],
            (TileType::TShaped, _) => &[North, South, West],
        }
    }

    pub fn is_open(&self, direction: Direction) -> bool {
        self.open_sides().contains(&direction)
    }

    pub fn to_view(&self) -> TileView {
        TileView {
            tile_type: self.tile_type,
            orientation: self.orientation,
            open_sides: self.open_sides().to_vec(),
            marker: self.marker.as_ref().map(Marker::to_view),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_open_sides_alternate() {
        assert_eq!(Tile::new(TileType::Straight, 0).open_sides(), &[North, South]);
        assert_eq!(Tile::new(TileType::Straight, 1).open_sides(), &[East, West]);
    }

    #[test]
    fn test_new_reduces_orientation() {
        let tile = Tile::new(TileType::Straight, 3);
        assert_eq!(tile.orientation(), 1);
        assert_eq!(Tile::new(TileType::Corner, 6).orientation(), 2);
    }

    #[test]
    fn test_corner_open_sides_rotate_clockwise() {
        let sides: Vec<_> = (0..4)
            .map(|o| Tile::new(TileType::Corner, o).open_sides().to_vec())
            .collect();
        assert_eq!(sides[0], vec![North, East]);
        assert_eq!(sides[1], vec![East, South]);
        assert_eq!(sides[2], vec![South, West]);
        assert_eq!(sides[3], vec![West, North]);
    }

    #[test]
    fn test_t_shaped_has_three_sides_in_every_orientation() {
        for o in 0..4 {
            assert_eq!(Tile::new(TileType::TShaped, o).open_sides().len(), 3);
        }
        assert!(!Tile::new(TileType::TShaped, 0).is_open(South));
        assert!(!Tile::new(TileType::TShaped, 1).is_open(West));
        assert!(!Tile::new(TileType::TShaped, 2).is_open(North));
        assert!(!Tile::new(TileType::TShaped, 3).is_open(East));
    }

    #[test]
    fn test_to_view_carries_marker_owner() {
        let mut tile = Tile::new(TileType::Corner, 1);
        tile.marker = Some(Marker {
            id: 4,
            owner: Some(PlayerId(2)),
        });
        let view = tile.to_view();
        assert_eq!(view.open_sides, vec![East, South]);
        assert_eq!(view.marker.unwrap().owner_id, Some(PlayerId(2)));
    }
}
