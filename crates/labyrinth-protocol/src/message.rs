//! Inbound and outbound message sum types.
//!
//! Every frame is one JSON object tagged by `"type"`:
//!
//! ```json
//! {"type":"PLAYER_ACTION_SHIFT","roomId":1,"shiftIndex":3,"shiftDirection":"EAST"}
//! ```

use serde::{Deserialize, Serialize};

use crate::{Direction, ErrorKind, GameStateView, PageInfo, PlayerId, Position, RoomId, RoomSummary};

/// The protocol version a client must announce in its handshake.
pub const PROTOCOL_VERSION: u32 = 1;

/// Messages a client sends to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum ClientMessage {
    /// First frame on every connection.
    Handshake { version: u32, token: String },
    CreateRoom {
        max_players: usize,
        #[serde(default)]
        room_name: Option<String>,
    },
    JoinRoom { room_id: RoomId },
    LeaveRoom,
    ReconnectToRoom { room_id: RoomId },
    StartGame { room_id: RoomId },
    PlayerActionShift {
        room_id: RoomId,
        shift_index: i32,
        shift_direction: Direction,
    },
    PlayerActionMove {
        room_id: RoomId,
        target_x: i32,
        target_y: i32,
    },
    GetRoomListRequest {
        #[serde(default)]
        page: usize,
        #[serde(default)]
        size: Option<usize>,
    },
    GetReachableCells { room_id: RoomId },
    Ping { client_time: i64 },
}

impl ClientMessage {
    /// Wire name of the message, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Handshake { .. } => "HANDSHAKE",
            Self::CreateRoom { .. } => "CREATE_ROOM",
            Self::JoinRoom { .. } => "JOIN_ROOM",
            Self::LeaveRoom => "LEAVE_ROOM",
            Self::ReconnectToRoom { .. } => "RECONNECT_TO_ROOM",
            Self::StartGame { .. } => "START_GAME",
            Self::PlayerActionShift { .. } => "PLAYER_ACTION_SHIFT",
            Self::PlayerActionMove { .. } => "PLAYER_ACTION_MOVE",
            Self::GetRoomListRequest { .. } => "GET_ROOM_LIST_REQUEST",
            Self::GetReachableCells { .. } => "GET_REACHABLE_CELLS",
            Self::Ping { .. } => "PING",
        }
    }
}

/// Messages the server sends to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum ServerMessage {
    HandshakeAck {
        player_id: PlayerId,
        player_name: String,
    },
    RoomCreated {
        room_id: RoomId,
        player_id: PlayerId,
    },
    JoinSuccess { room_id: RoomId },
    LeftRoom { room_id: RoomId },
    ErrorMessage {
        message: String,
        error_type: ErrorKind,
    },
    GameStateUpdate(GameStateView),
    RoomListUpdate {
        rooms: Vec<RoomSummary>,
        page_info: PageInfo,
    },
    ReachableCells {
        room_id: RoomId,
        cells: Vec<Position>,
    },
    Pong { client_time: i64, server_time: i64 },
}

impl ServerMessage {
    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::ErrorMessage {
            message: message.into(),
            error_type: kind,
        }
    }
}
