//! Channels from room actors to the session layer's workers.

use labyrinth_protocol::{GameStateView, RoomId};
use tokio::sync::mpsc;

/// Pushed to the broadcast worker after every successful mutation.
#[derive(Debug, Clone)]
pub enum RoomEvent {
    StateChanged {
        room_id: RoomId,
        snapshot: GameStateView,
    },
}

/// Pushed to the lobby worker when the room list may have changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobbyEvent {
    Refresh,
}

/// Producer halves shared by every room actor and the registry.
#[derive(Debug, Clone)]
pub struct RoomEvents {
    pub state_tx: mpsc::Sender<RoomEvent>,
    pub lobby_tx: mpsc::Sender<LobbyEvent>,
}

impl RoomEvents {
    /// Creates both bounded channels and returns the senders with the
    /// matching receivers.
    pub fn channel(
        capacity: usize,
    ) -> (Self, mpsc::Receiver<RoomEvent>, mpsc::Receiver<LobbyEvent>) {
        let (state_tx, state_rx) = mpsc::channel(capacity);
        let (lobby_tx, lobby_rx) = mpsc::channel(capacity);
        (Self { state_tx, lobby_tx }, state_rx, lobby_rx)
    }

    /// Asks the lobby worker for a refresh. A full channel already holds
    /// a pending refresh, so dropping this one loses nothing.
    pub fn refresh_lobby(&self) {
        if let Err(mpsc::error::TrySendError::Closed(_)) = self.lobby_tx.try_send(LobbyEvent::Refresh) {
            tracing::debug!("lobby worker gone, refresh dropped");
        }
    }
}
