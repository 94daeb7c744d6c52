//! Integration tests for shifting and reachability on dealt boards.

use std::collections::HashMap;

use labyrinth_board::{Board, BoardConfig, BoardError, Tile, deal};
use labyrinth_protocol::{Direction, PlayerId, Position, TileType};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn dealt_board(seed: u64) -> Board {
    let mut rng = StdRng::seed_from_u64(seed);
    deal(&BoardConfig::default(), &[PlayerId(1), PlayerId(2)], &mut rng)
        .expect("default layout deals")
        .board
}

/// Multiset of (type, orientation, marker id) over the grid plus the extra tile.
fn tile_multiset(board: &Board) -> HashMap<(TileType, u8, Option<u32>), usize> {
    let mut counts = HashMap::new();
    for tile in board.tiles() {
        let key = (
            tile.tile_type(),
            tile.orientation(),
            tile.marker.as_ref().map(|m| m.id),
        );
        *counts.entry(key).or_default() += 1;
    }
    counts
}

#[test]
fn test_shift_preserves_tile_multiset() {
    let mut board = dealt_board(42);
    let before = tile_multiset(&board);

    for (index, direction) in [
        (1, Direction::East),
        (3, Direction::South),
        (5, Direction::West),
        (1, Direction::North),
        (3, Direction::East),
    ] {
        board.shift(index, direction, []).unwrap();
        assert_eq!(tile_multiset(&board), before, "after {index} {direction}");
    }
}

#[test]
fn test_shift_trailing_edge_player_wraps_to_leading_edge() {
    let mut board = dealt_board(1);
    let mut p1 = Position::new(6, 1);
    let mut p2 = Position::new(3, 1);

    board
        .shift(1, Direction::East, [&mut p1, &mut p2])
        .unwrap();

    assert_eq!(p1, Position::new(0, 1));
    assert_eq!(p2, Position::new(4, 1));
}

#[test]
fn test_shift_rider_stays_on_its_tile() {
    let mut board = dealt_board(9);
    let mut rider = Position::new(2, 3);
    let tile_before = board.cell(rider).unwrap().tile.clone();

    board.shift(3, Direction::West, [&mut rider]).unwrap();

    assert_eq!(rider, Position::new(1, 3));
    assert_eq!(board.cell(rider).unwrap().tile, tile_before);
}

#[test]
fn test_shift_ejected_tile_becomes_extra() {
    let mut board = dealt_board(2);
    let old_extra = board.extra_tile().clone();
    let ejected = board.cell(Position::new(5, 0)).unwrap().tile.clone().unwrap();

    board.shift(5, Direction::North, []).unwrap();

    assert_eq!(board.extra_tile(), &ejected);
    assert_eq!(board.cell(Position::new(5, 6)).unwrap().tile.as_ref(), Some(&old_extra));
}

#[test]
fn test_shift_even_index_rejected_and_board_unchanged() {
    for direction in Direction::ALL {
        let mut board = dealt_board(3);
        let before = board.clone();
        let mut player = Position::new(0, 0);

        let err = board.shift(0, direction, [&mut player]).unwrap_err();

        assert!(matches!(err, BoardError::InvalidShift { index: 0, .. }));
        assert_eq!(err.kind(), labyrinth_protocol::ErrorKind::InvalidShift);
        assert_eq!(board, before);
        assert_eq!(player, Position::new(0, 0));
    }
}

#[test]
fn test_one_sided_opening_is_not_passable() {
    // Corner open north-east beside a north-south straight.
    let mut board = Board::new(3, Tile::new(TileType::Corner, 0));
    board.cell_mut(Position::new(1, 1)).unwrap().tile = Some(Tile::new(TileType::Corner, 0));
    board.cell_mut(Position::new(2, 1)).unwrap().tile = Some(Tile::new(TileType::Straight, 0));

    assert!(board.cell(Position::new(1, 1)).unwrap().connects_to(Direction::East));
    assert!(!board.is_connected(Position::new(1, 1), Direction::East));
    assert!(!board.is_reachable(Position::new(1, 1), Position::new(2, 1)).unwrap());
    assert!(
        !board
            .reachable_from(Position::new(1, 1))
            .unwrap()
            .contains(&Position::new(2, 1))
    );
}

#[test]
fn test_mutual_opening_is_passable_both_ways() {
    let mut board = Board::new(3, Tile::new(TileType::Corner, 0));
    board.cell_mut(Position::new(1, 1)).unwrap().tile = Some(Tile::new(TileType::Corner, 0));
    board.cell_mut(Position::new(2, 1)).unwrap().tile = Some(Tile::new(TileType::Straight, 1));

    assert!(board.is_reachable(Position::new(1, 1), Position::new(2, 1)).unwrap());
    assert!(board.is_reachable(Position::new(2, 1), Position::new(1, 1)).unwrap());
}

#[test]
fn test_reachable_from_matches_pairwise_rule() {
    let board = dealt_board(17);
    let size = board.size() as i32;
    for y in 0..size {
        for x in 0..size {
            let a = Position::new(x, y);
            let reachable = board.reachable_from(a).unwrap();
            for direction in Direction::ALL {
                let b = a.step(direction);
                if !board.in_bounds(b) {
                    continue;
                }
                let both_open = board.cell(a).unwrap().connects_to(direction)
                    && board.cell(b).unwrap().connects_to(direction.opposite());
                if both_open {
                    assert!(reachable.contains(&b), "{a} -> {b}");
                }
                assert_eq!(board.is_connected(a, direction), both_open);
            }
        }
    }
}

#[test]
fn test_reachability_changes_after_shift() {
    // Two horizontal straights side by side connect; shifting the
    // column under one of them swaps in a vertical piece.
    let mut board = Board::new(3, Tile::new(TileType::Straight, 0));
    for x in 0..3 {
        board.cell_mut(Position::new(x, 1)).unwrap().tile = Some(Tile::new(TileType::Straight, 1));
    }
    for y in [0, 2] {
        board.cell_mut(Position::new(1, y)).unwrap().tile = Some(Tile::new(TileType::Straight, 1));
    }
    assert!(board.is_reachable(Position::new(0, 1), Position::new(2, 1)).unwrap());

    board.shift(1, Direction::South, []).unwrap();

    // (1,1) now holds what was at (1,0): still horizontal.
    assert!(board.is_reachable(Position::new(0, 1), Position::new(2, 1)).unwrap());

    board.shift(1, Direction::South, []).unwrap();

    // The vertical piece inserted first has reached (1,1).
    assert!(!board.is_reachable(Position::new(0, 1), Position::new(2, 1)).unwrap());
}
