//! Core game state machine.
//!
//! This module contains the `GameState` snapshot and the `TurnEngine` that owns it
//! and drives a game through its phases:
//!
//! ```text
//! Idle --start--> Active --move--> Resolving --> Active | GameOver
//! Active/GameOver --start--> Active
//! Active/Idle --abandon--> Idle
//! ```

use crate::actions::{EndReason, GameEvent, MoveRequest, RejectReason};
use crate::generator;
use crate::grid::{Grid, Position, CELL_COUNT, MIN_GROUP_SIZE};
use crate::matching::find_matches;
use crate::movement::{legal_moves, simulate_request, MoveResult};
use crate::player::{default_roster, Player, PlayerId, MAX_PLAYERS, MIN_PLAYERS};
use crate::scoring::{self, GameOutcome};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Game phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first game, or after one was abandoned
    Idle,

    /// Waiting for the current player to move
    Active,

    /// A move has been committed and is being played out; no new moves are taken
    Resolving,

    /// Game is over
    GameOver { outcome: GameOutcome },
}

/// Errors that can occur when issuing commands to the engine
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Player count must be between 2 and 4, got {0}")]
    InvalidPlayerCount(u8),

    #[error("No player with id {0}")]
    UnknownPlayer(PlayerId),

    #[error("A game is in progress")]
    GameInProgress,

    #[error("Invalid action for current phase")]
    InvalidPhase,

    #[error("Board holds {0} balls, at most 120 allowed")]
    OvercrowdedBoard(usize),
}

/// The complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// The board
    pub grid: Grid,
    /// All players, in turn order
    pub players: Vec<Player>,
    /// Player to move
    pub current_player: PlayerId,
    /// Current game phase
    pub phase: GamePhase,
    /// Number of completed moves plus one
    pub turn_number: u32,
}

impl GameState {
    fn idle(players: Vec<Player>, grid: Grid) -> Self {
        let current_player = players.first().map(|p| p.id).unwrap_or(1);
        Self {
            grid,
            players,
            current_player,
            phase: GamePhase::Idle,
            turn_number: 0,
        }
    }

    /// Get the number of players
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Get a player by ID
    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    fn get_player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Whether the current player can make a move right now
    pub fn is_accepting_moves(&self) -> bool {
        self.phase == GamePhase::Active
    }

    /// Check if the game is finished
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver { .. })
    }

    /// Get the final result if the game is finished
    pub fn get_outcome(&self) -> Option<&GameOutcome> {
        match &self.phase {
            GamePhase::GameOver { outcome } => Some(outcome),
            _ => None,
        }
    }

    /// Every move the current player could make
    pub fn valid_moves(&self) -> Vec<MoveRequest> {
        if !self.is_accepting_moves() {
            return Vec::new();
        }
        legal_moves(&self.grid)
    }

    /// Why the game would end on the current board, if it would
    pub fn end_condition(&self) -> Option<EndReason> {
        end_condition(&self.grid)
    }

    /// Award points to a player, returning the event describing it
    fn award(&mut self, player: PlayerId, points: u32) -> Option<GameEvent> {
        let total = self.get_player_mut(player)?.add_points(points);
        Some(GameEvent::PointsAwarded {
            player,
            points,
            total,
        })
    }
}

/// Whether a board is terminal, and why.
///
/// Only looks at the board, so it can be re-derived from any snapshot. Note that
/// "no matches possible" counts balls per color over the whole board and ignores
/// whether those balls could ever be pushed together.
pub fn end_condition(grid: &Grid) -> Option<EndReason> {
    if grid.is_cleared() {
        return Some(EndReason::BoardCleared);
    }
    if !grid.has_legal_move() {
        return Some(EndReason::NoMovesLeft);
    }
    if grid
        .color_counts()
        .values()
        .all(|count| *count < MIN_GROUP_SIZE)
    {
        return Some(EndReason::NoMatchesPossible);
    }
    None
}

/// A move played out on a board, before any scoring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMove {
    /// Board after pushing and removing matched balls
    pub grid: Grid,
    /// Slots a ball moved into
    pub moved: Vec<Position>,
    /// Balls removed as matches, row-major
    pub matches: Vec<Position>,
}

/// Push, detect matches, and clear them.
///
/// Rejections say why the board could not change.
pub fn resolve_move(grid: &Grid, request: &MoveRequest) -> Result<ResolvedMove, RejectReason> {
    if request.steps == 0 {
        return Err(RejectReason::ZeroSteps);
    }
    if !request.from.is_in_bounds() {
        return Err(RejectReason::OutOfBounds);
    }
    if grid.color_at(request.from).is_none() {
        return Err(RejectReason::EmptyOrigin);
    }

    let MoveResult {
        grid: mut pushed,
        moved,
        ..
    } = simulate_request(grid, request);
    if !moved {
        return Err(RejectReason::Blocked);
    }

    let moved = pushed.changed_positions(grid);
    let matches = find_matches(&pushed, moved.iter().copied());
    for pos in &matches {
        pushed.clear(*pos);
    }

    Ok(ResolvedMove {
        grid: pushed,
        moved,
        matches,
    })
}

/// Owns the game state and applies commands to it
#[derive(Debug, Clone)]
pub struct TurnEngine {
    state: GameState,
    rng: StdRng,
    /// Phase to enter once the move being resolved is finished
    pending: Option<GamePhase>,
}

impl TurnEngine {
    /// Create an idle engine for the given number of players
    pub fn new(player_count: u8) -> Result<Self, GameError> {
        Self::with_rng(player_count, StdRng::from_entropy())
    }

    /// Create an idle engine whose boards are reproducible from `seed`
    pub fn with_seed(player_count: u8, seed: u64) -> Result<Self, GameError> {
        Self::with_rng(player_count, StdRng::seed_from_u64(seed))
    }

    fn with_rng(player_count: u8, mut rng: StdRng) -> Result<Self, GameError> {
        check_player_count(player_count)?;
        let grid = generator::generate_with_rng(&mut rng);
        Ok(Self {
            state: GameState::idle(default_roster(player_count), grid),
            rng,
            pending: None,
        })
    }

    /// Read-only view of the game
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> &GamePhase {
        &self.state.phase
    }

    pub fn grid(&self) -> &Grid {
        &self.state.grid
    }

    pub fn players(&self) -> &[Player] {
        &self.state.players
    }

    pub fn current_player(&self) -> PlayerId {
        self.state.current_player
    }

    fn game_running(&self) -> bool {
        matches!(self.state.phase, GamePhase::Active | GamePhase::Resolving)
    }

    /// Change how many players take part. Resets the roster to default names.
    pub fn set_player_count(&mut self, player_count: u8) -> Result<(), GameError> {
        check_player_count(player_count)?;
        if self.game_running() {
            return Err(GameError::GameInProgress);
        }
        let grid = generator::generate_with_rng(&mut self.rng);
        self.state = GameState::idle(default_roster(player_count), grid);
        Ok(())
    }

    /// Rename a player between games
    pub fn set_player_name(&mut self, id: PlayerId, name: String) -> Result<(), GameError> {
        if self.game_running() {
            return Err(GameError::GameInProgress);
        }
        let player = self
            .state
            .get_player_mut(id)
            .ok_or(GameError::UnknownPlayer(id))?;
        player.name = name;
        Ok(())
    }

    /// Start a new game on a freshly generated board.
    ///
    /// Also restarts a game in progress, keeping names but zeroing scores. Refused
    /// only while a move is being resolved.
    pub fn start(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if self.state.phase == GamePhase::Resolving {
            return Err(GameError::GameInProgress);
        }
        let grid = generator::generate_with_rng(&mut self.rng);
        self.start_with_grid(grid)
    }

    /// Start a new game on a prepared board. At least one slot must be empty.
    pub fn start_with_grid(&mut self, grid: Grid) -> Result<Vec<GameEvent>, GameError> {
        if self.state.phase == GamePhase::Resolving {
            return Err(GameError::GameInProgress);
        }
        let balls = grid.ball_count();
        if balls >= CELL_COUNT {
            return Err(GameError::OvercrowdedBoard(balls));
        }

        for player in &mut self.state.players {
            player.score = 0;
        }
        let first_player = self.state.players.first().map(|p| p.id).unwrap_or(1);

        self.state.grid = grid;
        self.state.current_player = first_player;
        self.state.turn_number = 1;
        self.state.phase = GamePhase::Active;
        self.pending = None;

        info!(
            players = self.state.player_count(),
            balls = self.state.grid.ball_count(),
            "game started"
        );

        Ok(vec![GameEvent::GameStarted {
            players: self.state.players.iter().map(|p| p.id).collect(),
            first_player,
        }])
    }

    /// Throw away the current game and return to the pre-game roster
    pub fn abandon(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if !matches!(self.state.phase, GamePhase::Active | GamePhase::Idle) {
            return Err(GameError::InvalidPhase);
        }

        let player_count = self.state.player_count() as u8;
        let grid = generator::generate_with_rng(&mut self.rng);
        self.state = GameState::idle(default_roster(player_count), grid);
        self.pending = None;

        info!("game abandoned");
        Ok(vec![GameEvent::GameAbandoned])
    }

    /// What the board would look like after a move, without committing it
    pub fn preview_move(&self, request: &MoveRequest) -> MoveResult {
        simulate_request(&self.state.grid, request)
    }

    /// Apply a move and immediately finish resolving it
    pub fn attempt_move(&mut self, request: MoveRequest) -> Vec<GameEvent> {
        let was_active = self.state.is_accepting_moves();
        let events = self.begin_move(request);
        if was_active {
            self.finish_move();
        }
        events
    }

    /// Commit a move and leave the engine in `Resolving` until [`finish_move`] is called.
    ///
    /// The returned events describe the fully resolved move. Rejected moves change
    /// nothing and produce a single `MoveRejected` event.
    ///
    /// [`finish_move`]: TurnEngine::finish_move
    pub fn begin_move(&mut self, request: MoveRequest) -> Vec<GameEvent> {
        if !self.state.is_accepting_moves() {
            debug!(phase = ?self.state.phase, "move ignored, not accepting moves");
            return vec![GameEvent::MoveRejected {
                reason: RejectReason::NotAccepting,
            }];
        }

        let resolved = match resolve_move(&self.state.grid, &request) {
            Ok(resolved) => resolved,
            Err(reason) => {
                debug!(?request, ?reason, "move rejected");
                return vec![GameEvent::MoveRejected { reason }];
            }
        };

        self.state.phase = GamePhase::Resolving;
        let player = self.state.current_player;
        let mut events = Vec::new();

        debug!(
            player,
            ?request,
            moved = resolved.moved.len(),
            matched = resolved.matches.len(),
            "move committed"
        );

        events.push(GameEvent::BallsMoved {
            player,
            request,
            moved: resolved.moved,
        });
        self.state.grid = resolved.grid;

        if !resolved.matches.is_empty() {
            let points = scoring::match_points(&resolved.matches);
            events.push(GameEvent::MatchCleared {
                player,
                positions: resolved.matches,
            });
            events.extend(self.state.award(player, points));
        }

        let next_player = scoring::next_player(&self.state.players, player).unwrap_or(player);
        self.state.current_player = next_player;
        self.state.turn_number += 1;
        events.push(GameEvent::TurnEnded {
            player,
            next_player,
        });

        let next_phase = match self.state.end_condition() {
            None => GamePhase::Active,
            Some(reason) => {
                let (end_events, outcome) = self.end_game(reason);
                events.extend(end_events);
                GamePhase::GameOver { outcome }
            }
        };
        self.pending = Some(next_phase);

        events
    }

    /// Leave `Resolving` for the phase the last move led to.
    ///
    /// Returns `false` if no move was being resolved.
    pub fn finish_move(&mut self) -> bool {
        if self.state.phase != GamePhase::Resolving {
            return false;
        }
        match self.pending.take() {
            Some(phase) => {
                self.state.phase = phase;
                true
            }
            None => false,
        }
    }

    /// Sweep leftover balls to the player who made the last move and decide the result
    fn end_game(&mut self, reason: EndReason) -> (Vec<GameEvent>, GameOutcome) {
        let mut events = Vec::new();

        if reason != EndReason::BoardCleared {
            let swept = self.state.grid.occupied_positions();
            let last_mover =
                scoring::previous_player(&self.state.players, self.state.current_player);
            if let Some(player) = last_mover.filter(|_| !swept.is_empty()) {
                for pos in &swept {
                    self.state.grid.clear(*pos);
                }
                let points = scoring::sweep_points(&swept);
                events.push(GameEvent::BoardSwept {
                    player,
                    positions: swept,
                });
                events.extend(self.state.award(player, points));
            }
        }

        let outcome = scoring::resolve_outcome(&self.state.players);
        info!(?reason, ?outcome, "game over");
        events.push(GameEvent::GameEnded {
            reason,
            outcome: outcome.clone(),
        });

        (events, outcome)
    }
}

fn check_player_count(player_count: u8) -> Result<(), GameError> {
    if (MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
        Ok(())
    } else {
        Err(GameError::InvalidPlayerCount(player_count))
    }
}
