//! Read-only snapshots of game state as they appear on the wire.
//!
//! The board and room crates build these; clients only ever see views,
//! never the live aggregates.

use serde::{Deserialize, Serialize};

use crate::{AvatarType, Direction, GamePhase, PlayerId, PlayerStatus, RoomId, TileType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerView {
    pub id: u32,
    pub owner_id: Option<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileView {
    #[serde(rename = "type")]
    pub tile_type: TileType,
    pub orientation: u8,
    pub open_sides: Vec<Direction>,
    pub marker: Option<MarkerView>,
}

/// One grid cell. `marker` is a marker fixed to a stationary cell; a
/// marker riding a tile appears under `tile.marker` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellView {
    pub x: i32,
    pub y: i32,
    pub stationary: bool,
    pub tile: Option<TileView>,
    pub marker: Option<MarkerView>,
    pub open_sides: Vec<Direction>,
}

/// The grid in row-major order: `grid[y][x]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub size: usize,
    pub grid: Vec<Vec<CellView>>,
    pub extra_tile: TileView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub avatar: AvatarType,
    pub color: String,
    pub status: PlayerStatus,
    pub current_x: i32,
    pub current_y: i32,
    pub base_x: Option<i32>,
    pub base_y: Option<i32>,
    pub collected_marker_ids: Vec<u32>,
    pub target_marker_ids: Vec<u32>,
}

/// The full room snapshot pushed in `GAME_STATE_UPDATE`.
///
/// `board` is `None` until the game starts; the layout is dealt at start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateView {
    pub room_id: RoomId,
    pub room_name: String,
    pub phase: GamePhase,
    pub current_player_id: Option<PlayerId>,
    pub players: Vec<PlayerView>,
    pub board: Option<BoardView>,
    pub winner_id: Option<PlayerId>,
    pub winner_name: Option<String>,
}

/// One lobby row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub room_id: RoomId,
    pub room_name: String,
    pub current_player_count: usize,
    pub max_players: usize,
    pub game_phase: GamePhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_elements: usize,
}

impl PageInfo {
    /// Builds paging metadata. `page_size` is clamped to at least 1.
    pub fn new(current_page: usize, page_size: usize, total_elements: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            current_page,
            page_size,
            total_pages: total_elements.div_ceil(page_size),
            total_elements,
        }
    }
}
