//! Dealing a fresh board for a game.

use labyrinth_protocol::{PlayerId, Position, TileType};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::{Board, BoardConfig, BoardError, Marker, Tile};

/// The movable tile mix for a 7x7 board: 13 straight, 15 corner, 6 T.
/// Other sizes keep the same proportions.
const TILE_MIX: [(TileType, usize); 3] = [
    (TileType::Straight, 13),
    (TileType::Corner, 15),
    (TileType::TShaped, 6),
];

/// What one player was dealt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub player_id: PlayerId,
    pub base: Position,
    pub targets: Vec<u32>,
}

/// A freshly dealt board with one seat per player, in roster order.
#[derive(Debug, Clone)]
pub struct DealtBoard {
    pub board: Board,
    pub seats: Vec<Seat>,
}

/// Lays out a board for `players`:
///
/// 1. the i-th player gets the i-th configured base;
/// 2. fixed tiles go on their stationary cells;
/// 3. a shuffled pool of movable tiles fills the movable cells row by
///    row, with one left over as the extra tile;
/// 4. markers are scattered over non-base cells and dealt evenly to
///    the players as targets.
///
/// # Errors
/// `InvalidConfig` if the layout fails validation or has fewer bases
/// than there are players.
pub fn deal<R: Rng + ?Sized>(
    config: &BoardConfig,
    players: &[PlayerId],
    rng: &mut R,
) -> Result<DealtBoard, BoardError> {
    config.validate()?;
    if players.len() > config.seats() {
        return Err(BoardError::InvalidConfig(format!(
            "layout has {} bases for {} players",
            config.seats(),
            players.len()
        )));
    }

    let size = config.board_size;
    let movable_cells = size * size - size.div_ceil(2).pow(2);
    let mut pool = movable_tiles(movable_cells + 1, rng);
    pool.shuffle(rng);
    let extra = pool
        .pop()
        .ok_or_else(|| BoardError::InvalidConfig("movable tile pool is empty".into()))?;
    let mut board = Board::new(size, extra);

    // Unseated bases keep their exits so paths through them stay open.
    let bases: Vec<Position> = config.bases.iter().map(|b| b.position()).collect();
    for base in &config.bases {
        if let Some(cell) = board.cell_mut(base.position()) {
            cell.fixed_open_sides = base.exits.clone();
        }
    }
    let mut seats: Vec<Seat> = players
        .iter()
        .zip(&bases)
        .map(|(player_id, base)| Seat {
            player_id: *player_id,
            base: *base,
            targets: Vec::new(),
        })
        .collect();

    for fixed in &config.stationary_tiles {
        if let Some(cell) = board.cell_mut(fixed.position()) {
            if cell.is_stationary() {
                cell.tile = Some(Tile::new(fixed.tile_type, fixed.orientation));
            }
        }
    }

    let mut pool = pool.into_iter();
    let movable: Vec<Position> = board
        .cells()
        .filter(|c| !c.is_stationary())
        .map(|c| c.position())
        .collect();
    for position in movable {
        if let Some(cell) = board.cell_mut(position) {
            cell.tile = pool.next();
        }
    }

    let placed = scatter_markers(&mut board, &bases, config.marker_count, rng);
    deal_targets(&mut board, &mut seats, placed, rng);

    tracing::debug!(size, players = players.len(), "board dealt");
    Ok(DealtBoard { board, seats })
}

/// Builds `count` tiles in the standard mix, each with a random orientation.
fn movable_tiles<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Tile> {
    let total: usize = TILE_MIX.iter().map(|(_, n)| n).sum();
    let straight = count * TILE_MIX[0].1 / total;
    let t_shaped = count * TILE_MIX[2].1 / total;
    let corner = count - straight - t_shaped;

    [
        (TileType::Straight, straight),
        (TileType::Corner, corner),
        (TileType::TShaped, t_shaped),
    ]
    .into_iter()
    .flat_map(|(tile_type, n)| std::iter::repeat_n(tile_type, n))
    .map(|tile_type| Tile::new(tile_type, rng.random_range(0..tile_type.orientations())))
    .collect()
}

/// Places markers on randomly chosen cells that are neither a base nor
/// walled in on all four sides. Returns the ids actually placed.
fn scatter_markers<R: Rng + ?Sized>(
    board: &mut Board,
    bases: &[Position],
    count: u32,
    rng: &mut R,
) -> Vec<u32> {
    let mut eligible: Vec<Position> = board
        .cells()
        .filter(|c| !c.open_sides().is_empty())
        .map(|c| c.position())
        .filter(|p| !bases.contains(p))
        .collect();
    eligible.shuffle(rng);

    let mut placed = Vec::new();
    for (id, position) in (0..count).zip(eligible) {
        let Some(cell) = board.cell_mut(position) else {
            continue;
        };
        match cell.tile.as_mut() {
            Some(tile) => tile.marker = Some(Marker::new(id)),
            None => cell.fixed_marker = Some(Marker::new(id)),
        }
        placed.push(id);
    }
    placed
}

/// Shuffles the placed markers and gives each seat an equal share,
/// recording the owner on the marker itself.
fn deal_targets<R: Rng + ?Sized>(
    board: &mut Board,
    seats: &mut [Seat],
    mut markers: Vec<u32>,
    rng: &mut R,
) {
    let Some(per_player) = markers.len().checked_div(seats.len()) else {
        return;
    };
    markers.shuffle(rng);

    let mut markers = markers.into_iter();
    for seat in seats.iter_mut() {
        for id in markers.by_ref().take(per_player) {
            if let Some(marker) = board.marker_mut(id) {
                marker.owner = Some(seat.player_id);
            }
            seat.targets.push(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn players(n: u64) -> Vec<PlayerId> {
        (1..=n).map(PlayerId).collect()
    }

    #[test]
    fn test_movable_tiles_standard_mix_for_seven() {
        let mut rng = StdRng::seed_from_u64(1);
        let tiles = movable_tiles(34, &mut rng);
        let mut counts: HashMap<TileType, usize> = HashMap::new();
        for tile in &tiles {
            *counts.entry(tile.tile_type()).or_default() += 1;
        }
        assert_eq!(counts[&TileType::Straight], 13);
        assert_eq!(counts[&TileType::Corner], 15);
        assert_eq!(counts[&TileType::TShaped], 6);
    }

    #[test]
    fn test_deal_fills_every_movable_cell() {
        let mut rng = StdRng::seed_from_u64(7);
        let dealt = deal(&BoardConfig::default(), &players(2), &mut rng).unwrap();
        assert!(
            dealt
                .board
                .cells()
                .filter(|c| !c.is_stationary())
                .all(|c| c.tile.is_some())
        );
        // 33 on the grid, 12 fixed, plus the extra tile.
        assert_eq!(dealt.board.tiles().count(), 33 + 12 + 1);
    }

    #[test]
    fn test_deal_assigns_bases_in_roster_order() {
        let mut rng = StdRng::seed_from_u64(3);
        let dealt = deal(&BoardConfig::default(), &players(3), &mut rng).unwrap();
        let bases: Vec<_> = dealt.seats.iter().map(|s| s.base).collect();
        assert_eq!(
            bases,
            vec![Position::new(0, 0), Position::new(6, 0), Position::new(6, 6)]
        );
        let home = dealt.board.cell(Position::new(0, 0)).unwrap();
        assert!(home.tile.is_none());
        assert_eq!(home.open_sides().len(), 2);
    }

    #[test]
    fn test_deal_splits_markers_evenly_and_records_owner() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut dealt = deal(&BoardConfig::default(), &players(4), &mut rng).unwrap();
        for seat in dealt.seats.clone() {
            assert_eq!(seat.targets.len(), 3);
            for id in seat.targets {
                let marker = dealt.board.marker_mut(id).expect("marker is on the board");
                assert_eq!(marker.owner, Some(seat.player_id));
            }
        }
    }

    #[test]
    fn test_deal_never_puts_marker_on_a_base() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let dealt = deal(&BoardConfig::default(), &players(4), &mut rng).unwrap();
            for seat in &dealt.seats {
                let cell = dealt.board.cell(seat.base).unwrap();
                assert!(cell.active_marker().is_none(), "seed {seed}");
            }
        }
    }

    #[test]
    fn test_deal_two_players_markers_avoid_walled_and_spare_bases() {
        let config = BoardConfig::default();
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let dealt = deal(&config, &players(2), &mut rng).unwrap();
            for cell in dealt.board.cells() {
                if cell.active_marker().is_none() {
                    continue;
                }
                assert!(!cell.open_sides().is_empty(), "seed {seed}: {:?}", cell.position());
                assert!(
                    config.bases.iter().all(|b| b.position() != cell.position()),
                    "seed {seed}: marker on base {:?}",
                    cell.position()
                );
            }
        }
    }

    #[test]
    fn test_deal_unseated_base_keeps_exits() {
        let mut rng = StdRng::seed_from_u64(4);
        let dealt = deal(&BoardConfig::default(), &players(2), &mut rng).unwrap();
        let spare = dealt.board.cell(Position::new(6, 6)).unwrap();
        assert!(spare.tile.is_none());
        assert_eq!(spare.open_sides().len(), 2);
    }

    #[test]
    fn test_deal_more_players_than_bases_rejected() {
        let mut config = BoardConfig::default();
        config.bases.truncate(2);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            deal(&config, &players(3), &mut rng),
            Err(BoardError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_deal_same_seed_same_board() {
        let a = deal(&BoardConfig::default(), &players(2), &mut StdRng::seed_from_u64(5)).unwrap();
        let b = deal(&BoardConfig::default(), &players(2), &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a.board, b.board);
        assert_eq!(a.seats, b.seats);
    }
}
