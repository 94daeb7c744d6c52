//! Room manager: creates, tracks, and tears down room actors.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use labyrinth_board::BoardConfig;
use labyrinth_protocol::{PageInfo, PlayerId, RoomId, RoomSummary};

use crate::events::RoomEvents;
use crate::game::JoinOutcome;
use crate::room::spawn_room;
use crate::{ManagerConfig, RoomConfig, RoomError, RoomHandle};

/// The registry of live rooms.
///
/// Lookups clone the handle out of the map, so no shard lock is held
/// while waiting on a room actor.
pub struct RoomManager {
    rooms: DashMap<RoomId, RoomHandle>,
    next_id: AtomicU64,
    board: Arc<BoardConfig>,
    channel_size: usize,
    events: RoomEvents,
}

impl RoomManager {
    /// Creates an empty registry. Fails if the board layout is invalid.
    pub fn new(config: ManagerConfig, events: RoomEvents) -> Result<Self, RoomError> {
        config.board.validate()?;
        Ok(Self {
            rooms: DashMap::new(),
            next_id: AtomicU64::new(1),
            board: Arc::new(config.board),
            channel_size: config.channel_size,
            events,
        })
    }

    /// Seats available per room under the configured layout.
    pub fn seats(&self) -> usize {
        self.board.seats()
    }

    /// Creates a room and seats its owner in it.
    ///
    /// # Errors
    /// `InvalidMaxPlayers` if `max_players` is outside 2..=seats.
    pub async fn create_room(
        &self,
        owner_id: PlayerId,
        owner_name: &str,
        max_players: usize,
        name: Option<&str>,
    ) -> Result<RoomHandle, RoomError> {
        let config = RoomConfig::new(owner_name, name, max_players);
        config.validate(self.board.seats())?;

        let room_id = RoomId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let handle = spawn_room(
            room_id,
            config,
            Arc::clone(&self.board),
            self.events.clone(),
            self.channel_size,
        );
        // Not listed until the owner holds the first seat.
        if let Err(e) = handle.join(owner_id, owner_name).await {
            let _ = handle.shutdown().await;
            return Err(e);
        }
        self.rooms.insert(room_id, handle.clone());
        tracing::info!(%room_id, owner = %owner_id, max_players, "room created");
        self.events.refresh_lobby();
        Ok(handle)
    }

    /// Looks up a live room.
    pub fn get(&self, room_id: RoomId) -> Result<RoomHandle, RoomError> {
        self.rooms
            .get(&room_id)
            .map(|h| h.value().clone())
            .ok_or(RoomError::NotFound(room_id))
    }

    pub async fn join(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
        name: &str,
    ) -> Result<JoinOutcome, RoomError> {
        self.get(room_id)?.join(player_id, name).await
    }

    pub async fn reconnect(&self, room_id: RoomId, player_id: PlayerId) -> Result<(), RoomError> {
        self.get(room_id)?.reconnect(player_id).await
    }

    /// Removes a player's seat. Returns `true` if that emptied the room,
    /// in which case the room is gone from the registry.
    pub async fn leave(&self, room_id: RoomId, player_id: PlayerId) -> Result<bool, RoomError> {
        let emptied = self.get(room_id)?.leave(player_id).await?;
        if emptied {
            self.remove(room_id).await;
        }
        Ok(emptied)
    }

    /// Marks a player offline without freeing the seat.
    pub async fn disconnect(&self, room_id: RoomId, player_id: PlayerId) -> Result<(), RoomError> {
        self.get(room_id)?.disconnect(player_id).await
    }

    async fn remove(&self, room_id: RoomId) {
        if let Some((_, handle)) = self.rooms.remove(&room_id) {
            let _ = handle.shutdown().await;
            tracing::info!(%room_id, "room destroyed");
            self.events.refresh_lobby();
        }
    }

    /// One page of the lobby listing, ordered by room id.
    pub fn rooms_page(&self, page: usize, size: usize) -> (Vec<RoomSummary>, PageInfo) {
        let mut all: Vec<RoomSummary> = self.rooms.iter().map(|h| h.value().summary()).collect();
        all.sort_by_key(|s| s.room_id);

        let info = PageInfo::new(page, size, all.len());
        let rooms = all
            .into_iter()
            .skip(page.saturating_mul(info.page_size))
            .take(info.page_size)
            .collect();
        (rooms, info)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Stops every room actor and empties the registry.
    pub async fn shutdown(&self) {
        let ids: Vec<RoomId> = self.rooms.iter().map(|h| *h.key()).collect();
        for room_id in ids {
            if let Some((_, handle)) = self.rooms.remove(&room_id) {
                let _ = handle.shutdown().await;
            }
        }
        tracing::info!("all rooms shut down");
    }
}

#[cfg(test)]
mod tests {
    use labyrinth_protocol::GamePhase;

    use super::*;

    fn manager() -> RoomManager {
        let (events, _state_rx, _lobby_rx) = RoomEvents::channel(256);
        RoomManager::new(ManagerConfig::default(), events).unwrap()
    }

    #[tokio::test]
    async fn test_create_room_seats_owner() {
        let manager = manager();
        let handle = manager
            .create_room(PlayerId(1), "ada", 2, None)
            .await
            .unwrap();

        let view = handle.snapshot().await.unwrap();
        assert_eq!(view.room_name, "Room of ada");
        assert_eq!(view.players.len(), 1);
        assert_eq!(view.phase, GamePhase::WaitingForPlayers);
        assert_eq!(manager.room_count(), 1);
    }

    #[tokio::test]
    async fn test_create_room_invalid_max_players_rejected() {
        let manager = manager();
        for max in [0, 1, 5] {
            let err = manager
                .create_room(PlayerId(1), "ada", max, None)
                .await
                .unwrap_err();
            assert!(matches!(err, RoomError::InvalidMaxPlayers { .. }));
        }
        assert_eq!(manager.room_count(), 0);
    }

    #[tokio::test]
    async fn test_create_room_ids_are_sequential() {
        let manager = manager();
        let a = manager.create_room(PlayerId(1), "a", 2, None).await.unwrap();
        let b = manager.create_room(PlayerId(2), "b", 2, None).await.unwrap();
        assert_eq!(a.room_id(), RoomId(1));
        assert_eq!(b.room_id(), RoomId(2));
    }

    #[tokio::test]
    async fn test_create_room_owner_seated_before_listing() {
        let manager = manager();
        let handle = manager.create_room(PlayerId(1), "ada", 2, None).await.unwrap();

        // Whoever finds the room in the registry finds its owner already seated.
        let (rooms, _) = manager.rooms_page(0, 8);
        assert_eq!(rooms[0].current_player_count, 1);
        manager.join(handle.room_id(), PlayerId(2), "bob").await.unwrap();
        let view = handle.snapshot().await.unwrap();
        assert_eq!(view.players[0].id, PlayerId(1));
        assert_eq!(view.players.len(), 2);
    }

    #[tokio::test]
    async fn test_get_unknown_room_not_found() {
        let manager = manager();
        assert!(matches!(
            manager.get(RoomId(99)),
            Err(RoomError::NotFound(RoomId(99)))
        ));
    }

    #[tokio::test]
    async fn test_leave_last_player_removes_room() {
        let manager = manager();
        let handle = manager.create_room(PlayerId(1), "ada", 2, None).await.unwrap();
        let room_id = handle.room_id();

        assert!(manager.leave(room_id, PlayerId(1)).await.unwrap());
        assert_eq!(manager.room_count(), 0);
        assert!(matches!(
            manager.join(room_id, PlayerId(2), "bob").await,
            Err(RoomError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rooms_page_sorted_and_paged() {
        let manager = manager();
        for id in 1..=5 {
            manager
                .create_room(PlayerId(id), &format!("p{id}"), 2, None)
                .await
                .unwrap();
        }

        let (rooms, info) = manager.rooms_page(1, 2);
        let ids: Vec<RoomId> = rooms.iter().map(|r| r.room_id).collect();
        assert_eq!(ids, vec![RoomId(3), RoomId(4)]);
        assert_eq!(info.total_elements, 5);
        assert_eq!(info.total_pages, 3);

        let (rooms, _) = manager.rooms_page(7, 2);
        assert!(rooms.is_empty());
    }
}
