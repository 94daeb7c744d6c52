//! The grid, the shift engine, and the reachability search.

use std::collections::VecDeque;

use labyrinth_protocol::{BoardView, Direction, Position};

use crate::{BoardError, Cell, Marker, Tile};

/// A square grid of cells plus the one tile held outside it.
///
/// Cells are stored row-major. Every movable cell holds exactly one
/// tile; only [`shift`](Board::shift) and board setup move tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
    extra_tile: Tile,
}

impl Board {
    /// Creates an empty `size x size` grid. Stationary flags are set from
    /// coordinates; no cell holds a tile yet.
    pub fn new(size: usize, extra_tile: Tile) -> Self {
        let n = size as i32;
        let cells = (0..n)
            .flat_map(|y| (0..n).map(move |x| Cell::new(Position::new(x, y))))
            .collect();
        Self {
            size,
            cells,
            extra_tile,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        let n = self.size as i32;
        (0..n).contains(&position.x) && (0..n).contains(&position.y)
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.in_bounds(position)
            .then(|| position.y as usize * self.size + position.x as usize)
    }

    pub fn cell(&self, position: Position) -> Option<&Cell> {
        self.index(position).map(|i| &self.cells[i])
    }

    pub fn cell_mut(&mut self, position: Position) -> Option<&mut Cell> {
        self.index(position).map(|i| &mut self.cells[i])
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn extra_tile(&self) -> &Tile {
        &self.extra_tile
    }

    /// Every tile in play: the ones on the grid followed by the extra tile.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.cells
            .iter()
            .filter_map(|c| c.tile.as_ref())
            .chain(std::iter::once(&self.extra_tile))
    }

    /// Finds a marker by id, on a tile, fixed to a cell, or on the extra tile.
    pub fn marker_mut(&mut self, id: u32) -> Option<&mut Marker> {
        let on_grid = self.cells.iter_mut().flat_map(|c| {
            let Cell {
                tile, fixed_marker, ..
            } = c;
            tile.as_mut()
                .and_then(|t| t.marker.as_mut())
                .into_iter()
                .chain(fixed_marker.as_mut())
        });
        on_grid
            .chain(self.extra_tile.marker.as_mut())
            .find(|m| m.id == id)
    }

    /// Returns `true` when `from` and its neighbour in `direction` both
    /// open toward each other. A one-sided opening is a wall.
    pub fn is_connected(&self, from: Position, direction: Direction) -> bool {
        let to = from.step(direction);
        match (self.cell(from), self.cell(to)) {
            (Some(a), Some(b)) => a.connects_to(direction) && b.connects_to(direction.opposite()),
            _ => false,
        }
    }

    // -----------------------------------------------------------------------
    // Shift engine
    // -----------------------------------------------------------------------

    /// Pushes the extra tile into line `index` from the side opposite to
    /// `direction`. The tile falling off the far edge becomes the new
    /// extra tile.
    ///
    /// `riders` are the positions of every player in the room. Those on
    /// the line move one step with it; a rider on the ejected cell wraps
    /// to the inserted cell.
    ///
    /// # Errors
    /// `InvalidShift` if `index` is even or outside the board. Nothing is
    /// mutated on error.
    pub fn shift<'a>(
        &mut self,
        index: i32,
        direction: Direction,
        riders: impl IntoIterator<Item = &'a mut Position>,
    ) -> Result<(), BoardError> {
        let n = self.size as i32;
        if index % 2 == 0 || !(0..n).contains(&index) {
            return Err(BoardError::InvalidShift {
                index,
                direction,
                size: self.size,
            });
        }

        // Leading edge first, trailing edge last.
        let line: Vec<Position> = match direction {
            Direction::East => (0..n).map(|x| Position::new(x, index)).collect(),
            Direction::West => (0..n).rev().map(|x| Position::new(x, index)).collect(),
            Direction::South => (0..n).map(|y| Position::new(index, y)).collect(),
            Direction::North => (0..n).rev().map(|y| Position::new(index, y)).collect(),
        };
        if let Some(bare) = line
            .iter()
            .find(|p| self.cell(**p).is_none_or(|c| c.tile.is_none()))
        {
            return Err(BoardError::MissingTile(*bare));
        }

        let mut carried = Some(self.extra_tile.clone());
        for position in &line {
            if let Some(i) = self.index(*position) {
                carried = std::mem::replace(&mut self.cells[i].tile, carried);
            }
        }
        if let Some(ejected) = carried {
            self.extra_tile = ejected;
        }

        for rider in riders {
            if direction.is_horizontal() && rider.y == index {
                rider.x = (rider.x + direction.dx()).rem_euclid(n);
            } else if direction.is_vertical() && rider.x == index {
                rider.y = (rider.y + direction.dy()).rem_euclid(n);
            }
        }

        tracing::debug!(index, %direction, "line shifted");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reachability
    // -----------------------------------------------------------------------

    /// Returns `true` if a path of mutually open sides leads from `from`
    /// to `to`. Staying put is always reachable.
    ///
    /// # Errors
    /// `OutOfBounds` if either endpoint is off the grid.
    pub fn is_reachable(&self, from: Position, to: Position) -> Result<bool, BoardError> {
        self.check_bounds(from)?;
        self.check_bounds(to)?;
        if from == to {
            return Ok(true);
        }
        Ok(self.search(from, Some(to)).contains(&to))
    }

    /// Every cell reachable from `from`, including `from` itself, in
    /// breadth-first order.
    pub fn reachable_from(&self, from: Position) -> Result<Vec<Position>, BoardError> {
        self.check_bounds(from)?;
        Ok(self.search(from, None))
    }

    fn check_bounds(&self, position: Position) -> Result<(), BoardError> {
        if self.in_bounds(position) {
            Ok(())
        } else {
            Err(BoardError::OutOfBounds(position))
        }
    }

    /// Breadth-first search, stopping early once `target` is visited.
    fn search(&self, from: Position, target: Option<Position>) -> Vec<Position> {
        let mut visited = vec![false; self.cells.len()];
        let mut order = Vec::new();
        let mut queue = VecDeque::from([from]);
        if let Some(i) = self.index(from) {
            visited[i] = true;
        }

        while let Some(current) = queue.pop_front() {
            order.push(current);
            if Some(current) == target {
                break;
            }
            for direction in Direction::ALL {
                if !self.is_connected(current, direction) {
                    continue;
                }
                let next = current.step(direction);
                if let Some(i) = self.index(next) {
                    if !visited[i] {
                        visited[i] = true;
                        queue.push_back(next);
                    }
                }
            }
        }
        order
    }

    pub fn to_view(&self) -> BoardView {
        BoardView {
            size: self.size,
            grid: self
                .cells
                .chunks(self.size.max(1))
                .map(|row| row.iter().map(Cell::to_view).collect())
                .collect(),
            extra_tile: self.extra_tile.to_view(),
        }
    }
}
