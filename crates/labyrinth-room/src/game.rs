//! The game room aggregate: roster, board, and the turn state machine.
//!
//! ```text
//! WAITING_FOR_PLAYERS -> PLAYER_SHIFT -> PLAYER_MOVE -> PLAYER_SHIFT (next) -> ...
//!                              \______________\_______-> GAME_OVER
//! ```
//!
//! Every operation validates first and mutates second, so a rejected
//! request leaves the room untouched.

use std::sync::Arc;

use labyrinth_board::{Board, BoardConfig};
use labyrinth_protocol::{
    AvatarType, Direction, GamePhase, GameStateView, PlayerId, PlayerStatus, Position, RoomId,
    RoomSummary,
};
use rand::Rng;

use crate::config::MIN_PLAYERS;
use crate::{Player, RoomConfig, RoomError};

/// How a join request was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// A new seat was taken.
    Joined,
    /// A new seat was taken and it filled the room, starting the game.
    Started,
    /// The player already had a seat and is back online.
    Reconnected,
}

/// What a legal move did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub collected: Option<u32>,
    pub won: bool,
}

/// One game room. Owned by exactly one room actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRoom {
    id: RoomId,
    config: RoomConfig,
    board_config: Arc<BoardConfig>,
    players: Vec<Player>,
    board: Option<Board>,
    current: Option<usize>,
    phase: GamePhase,
    winner: Option<(PlayerId, String)>,
}

impl GameRoom {
    pub fn new(id: RoomId, config: RoomConfig, board_config: Arc<BoardConfig>) -> Self {
        Self {
            id,
            config,
            board_config,
            players: Vec::new(),
            board: None,
            current: None,
            phase: GamePhase::WaitingForPlayers,
            winner: None,
        }
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.current.and_then(|i| self.players.get(i))
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner.as_ref().map(|(id, _)| *id)
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= self.config.max_players
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    fn seat_of(&self, player_id: PlayerId) -> Result<usize, RoomError> {
        self.players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(RoomError::NotInRoom(player_id, self.id))
    }

    // -----------------------------------------------------------------------
    // Roster
    // -----------------------------------------------------------------------

    /// Seats a player, or marks them connected again if they already
    /// hold a seat. Filling the last seat starts the game.
    ///
    /// # Errors
    /// `GameAlreadyStarted` once the first turn is dealt, `RoomFull` if no
    /// seat is free.
    pub fn join<R: Rng + ?Sized>(
        &mut self,
        player_id: PlayerId,
        name: &str,
        rng: &mut R,
    ) -> Result<JoinOutcome, RoomError> {
        if let Some(player) = self.players.iter_mut().find(|p| p.id == player_id) {
            player.status = PlayerStatus::Connected;
            tracing::info!(room_id = %self.id, %player_id, "player rejoined");
            return Ok(JoinOutcome::Reconnected);
        }
        if self.phase != GamePhase::WaitingForPlayers {
            return Err(RoomError::GameAlreadyStarted(self.id));
        }
        if self.is_full() {
            return Err(RoomError::RoomFull(self.id));
        }
        let avatar = AvatarType::ALL
            .into_iter()
            .find(|a| self.players.iter().all(|p| p.avatar != *a))
            .ok_or(RoomError::RoomFull(self.id))?;

        self.players.push(Player::new(player_id, name, avatar));
        tracing::info!(
            room_id = %self.id,
            %player_id,
            avatar = avatar.display_name(),
            players = self.players.len(),
            "player joined"
        );

        if !self.is_full() {
            return Ok(JoinOutcome::Joined);
        }
        if let Err(e) = self.begin(rng) {
            self.players.pop();
            return Err(e);
        }
        self.apply_end_rule();
        Ok(JoinOutcome::Started)
    }

    /// Marks a seated player connected again. Position, targets, and
    /// avatar are untouched.
    pub fn reconnect(&mut self, player_id: PlayerId) -> Result<(), RoomError> {
        let index = self.seat_of(player_id)?;
        self.players[index].status = PlayerStatus::Connected;
        tracing::info!(room_id = %self.id, %player_id, "player reconnected");
        Ok(())
    }

    /// Gives up a seat for good. Returns `true` if the room is now empty.
    ///
    /// If the leaver held the turn, it passes to whoever now sits at the
    /// same roster index, starting with a shift.
    pub fn leave(&mut self, player_id: PlayerId) -> Result<bool, RoomError> {
        let index = self.seat_of(player_id)?;
        self.players.remove(index);

        if let Some(current) = self.current {
            if index < current {
                self.current = Some(current - 1);
            } else if index == current {
                if self.players.is_empty() {
                    self.current = None;
                } else {
                    self.current = Some(current % self.players.len());
                    self.phase = GamePhase::PlayerShift;
                }
            }
        }
        tracing::info!(
            room_id = %self.id,
            %player_id,
            players = self.players.len(),
            "player left"
        );

        self.apply_end_rule();
        Ok(self.players.is_empty())
    }

    /// Marks a player offline. The seat and the turn are kept so they
    /// can come back mid-game. No effect once the game is over.
    pub fn disconnect(&mut self, player_id: PlayerId) -> Result<(), RoomError> {
        let index = self.seat_of(player_id)?;
        if self.phase == GamePhase::GameOver {
            return Ok(());
        }
        self.players[index].status = PlayerStatus::Disconnected;
        tracing::info!(room_id = %self.id, %player_id, "player disconnected");
        self.apply_end_rule();
        Ok(())
    }

    /// Ends an active game that has fewer than two connected players.
    /// A lone survivor wins.
    fn apply_end_rule(&mut self) {
        if !self.phase.is_active() {
            return;
        }
        let mut connected = self.players.iter().filter(|p| p.is_connected());
        let first = connected.next();
        if connected.next().is_some() {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.current = None;
        self.winner = first.map(|p| (p.id, p.name.clone()));
        tracing::info!(
            room_id = %self.id,
            winner = ?self.winner(),
            "game over: not enough connected players"
        );
    }

    // -----------------------------------------------------------------------
    // Turns
    // -----------------------------------------------------------------------

    /// Starts the game on request of a seated player.
    ///
    /// # Errors
    /// `GameAlreadyStarted` unless waiting, `NotEnoughPlayers` below two.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        requester: PlayerId,
        rng: &mut R,
    ) -> Result<(), RoomError> {
        self.seat_of(requester)?;
        if self.phase != GamePhase::WaitingForPlayers {
            return Err(RoomError::GameAlreadyStarted(self.id));
        }
        if self.players.len() < MIN_PLAYERS {
            return Err(RoomError::NotEnoughPlayers(self.id));
        }
        self.begin(rng)?;
        self.apply_end_rule();
        Ok(())
    }

    /// Deals the board, seats everyone on their base, and picks a random
    /// first player.
    fn begin<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), RoomError> {
        let ids: Vec<PlayerId> = self.players.iter().map(|p| p.id).collect();
        let dealt = labyrinth_board::deal(&self.board_config, &ids, rng)?;

        for (player, seat) in self.players.iter_mut().zip(dealt.seats) {
            player.base = Some(seat.base);
            player.position = seat.base;
            player.targets = seat.targets;
            player.collected.clear();
        }
        self.board = Some(dealt.board);
        let first = rng.random_range(0..self.players.len());
        self.current = Some(first);
        self.phase = GamePhase::PlayerShift;
        self.winner = None;

        tracing::info!(
            room_id = %self.id,
            players = self.players.len(),
            first_player = %self.players[first].id,
            "game started"
        );
        Ok(())
    }

    /// Validates phase, then seat, then turn. Returns the mover's index.
    fn check_turn(
        &self,
        player_id: PlayerId,
        expected: GamePhase,
        action: &'static str,
    ) -> Result<usize, RoomError> {
        if self.phase != expected {
            return Err(RoomError::InvalidPhase {
                action,
                phase: self.phase,
            });
        }
        let index = self.seat_of(player_id)?;
        if self.current != Some(index) {
            return Err(RoomError::NotYourTurn {
                player_id,
                room_id: self.id,
            });
        }
        Ok(index)
    }

    /// Shifts a row or column for the current player and moves on to
    /// their move phase.
    pub fn shift(
        &mut self,
        player_id: PlayerId,
        index: i32,
        direction: Direction,
    ) -> Result<(), RoomError> {
        self.check_turn(player_id, GamePhase::PlayerShift, "shift")?;
        let board = self.board.as_mut().ok_or(RoomError::InvalidPhase {
            action: "shift",
            phase: self.phase,
        })?;
        board.shift(index, direction, self.players.iter_mut().map(|p| &mut p.position))?;
        self.phase = GamePhase::PlayerMove;
        tracing::debug!(room_id = %self.id, %player_id, index, %direction, "shift applied");
        Ok(())
    }

    /// Moves the current player to `target` if it is reachable, collects
    /// a target marker there, and either ends the game or passes the turn.
    /// A move to the player's own cell is a pass.
    pub fn move_player(
        &mut self,
        player_id: PlayerId,
        target: Position,
    ) -> Result<MoveOutcome, RoomError> {
        let index = self.check_turn(player_id, GamePhase::PlayerMove, "move")?;
        let board = self.board.as_mut().ok_or(RoomError::InvalidPhase {
            action: "move",
            phase: self.phase,
        })?;
        let from = self.players[index].position;
        let invalid = RoomError::InvalidMove { from, to: target };
        if !board.is_reachable(from, target).map_err(|_| invalid)? {
            return Err(RoomError::InvalidMove { from, to: target });
        }

        let mover = &mut self.players[index];
        let mut collected = None;
        if from != target {
            mover.position = target;
            if let Some(cell) = board.cell_mut(target) {
                if let Some(id) = cell.active_marker().map(|m| m.id) {
                    if mover.collect(id) {
                        cell.remove_active_marker();
                        collected = Some(id);
                        tracing::info!(room_id = %self.id, %player_id, marker = id, "marker collected");
                    }
                }
            }
        }

        if mover.is_ready_to_win() {
            self.winner = Some((mover.id, mover.name.clone()));
            self.phase = GamePhase::GameOver;
            self.current = None;
            tracing::info!(room_id = %self.id, %player_id, "player won");
            return Ok(MoveOutcome {
                collected,
                won: true,
            });
        }

        self.current = Some((index + 1) % self.players.len());
        self.phase = GamePhase::PlayerShift;
        Ok(MoveOutcome {
            collected,
            won: false,
        })
    }

    /// Cells the player could reach right now, for UI hints.
    pub fn reachable_cells(&self, player_id: PlayerId) -> Result<Vec<Position>, RoomError> {
        let index = self.seat_of(player_id)?;
        let board = self.board.as_ref().ok_or(RoomError::InvalidPhase {
            action: "query reachable cells",
            phase: self.phase,
        })?;
        Ok(board.reachable_from(self.players[index].position)?)
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    pub fn snapshot(&self) -> GameStateView {
        GameStateView {
            room_id: self.id,
            room_name: self.config.name.clone(),
            phase: self.phase,
            current_player_id: self.current_player().map(|p| p.id),
            players: self.players.iter().map(Player::to_view).collect(),
            board: self.board.as_ref().map(Board::to_view),
            winner_id: self.winner(),
            winner_name: self.winner.as_ref().map(|(_, name)| name.clone()),
        }
    }

    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            room_id: self.id,
            room_name: self.config.name.clone(),
            current_player_count: self.players.len(),
            max_players: self.config.max_players,
            game_phase: self.phase,
        }
    }
}
