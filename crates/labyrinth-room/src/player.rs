//! A seat in a game room.

use labyrinth_protocol::{AvatarType, PlayerId, PlayerStatus, PlayerView, Position};

/// A roster entry. Survives disconnects; only an explicit leave removes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub avatar: AvatarType,
    pub status: PlayerStatus,
    pub position: Position,
    /// Home cell, dealt at game start.
    pub base: Option<Position>,
    pub targets: Vec<u32>,
    pub collected: Vec<u32>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, avatar: AvatarType) -> Self {
        Self {
            id,
            name: name.into(),
            avatar,
            status: PlayerStatus::Connected,
            position: Position::new(0, 0),
            base: None,
            targets: Vec::new(),
            collected: Vec::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status == PlayerStatus::Connected
    }

    /// Records a marker if it is one of this player's targets.
    /// Returns `true` if it was collected.
    pub fn collect(&mut self, marker_id: u32) -> bool {
        if self.targets.contains(&marker_id) && !self.collected.contains(&marker_id) {
            self.collected.push(marker_id);
            true
        } else {
            false
        }
    }

    /// Every target collected and standing on the base.
    pub fn is_ready_to_win(&self) -> bool {
        !self.targets.is_empty()
            && self.targets.iter().all(|t| self.collected.contains(t))
            && self.base == Some(self.position)
    }

    pub fn to_view(&self) -> PlayerView {
        PlayerView {
            id: self.id,
            name: self.name.clone(),
            avatar: self.avatar,
            color: self.avatar.color_hex().to_owned(),
            status: self.status,
            current_x: self.position.x,
            current_y: self.position.y,
            base_x: self.base.map(|b| b.x),
            base_y: self.base.map(|b| b.y),
            collected_marker_ids: self.collected.clone(),
            target_marker_ids: self.targets.clone(),
        }
    }
}
