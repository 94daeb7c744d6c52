//! Server configuration.

use std::time::Duration;

use labyrinth_board::BoardConfig;
use labyrinth_room::DEFAULT_CHANNEL_SIZE;
use labyrinth_transport::DEFAULT_MAX_MESSAGE_SIZE;

/// Everything the server needs besides an authenticator.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the WebSocket listener binds to.
    pub bind_addr: String,
    /// Board layout every game is dealt from.
    pub board: BoardConfig,
    /// How long a new connection has to send `HANDSHAKE`.
    pub handshake_timeout: Duration,
    /// Connections silent for this long are closed. Clients keep alive
    /// with `PING`.
    pub idle_timeout: Duration,
    /// Rooms per page in lobby listings.
    pub lobby_page_size: usize,
    /// Capacity of the state and lobby event channels.
    pub event_capacity: usize,
    /// Capacity of each room actor's command channel.
    pub room_channel_size: usize,
    /// Largest inbound client message in bytes.
    pub max_message_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            board: BoardConfig::default(),
            handshake_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            lobby_page_size: 8,
            event_capacity: 256,
            room_channel_size: DEFAULT_CHANNEL_SIZE,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_documented_values() {
        let config = ServerConfig::default();
        assert_eq!(config.handshake_timeout, Duration::from_secs(5));
        assert_eq!(config.idle_timeout, Duration::from_secs(60));
        assert_eq!(config.lobby_page_size, 8);
        assert_eq!(config.event_capacity, 256);
        assert_eq!(config.room_channel_size, 64);
        assert_eq!(config.board.seats(), 4);
    }
}
