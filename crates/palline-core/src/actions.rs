//! Moves players can make and the events that result from them.

use crate::grid::Position;
use crate::movement::Axis;
use crate::player::PlayerId;
use crate::scoring::GameOutcome;
use serde::{Deserialize, Serialize};

/// A push request coming from the UI: drag the ball at `from` by `steps` cells.
///
/// The sign of `steps` is the direction along the axis (positive is right/down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRequest {
    pub from: Position,
    pub axis: Axis,
    pub steps: i32,
}

impl MoveRequest {
    pub fn new(from: Position, axis: Axis, steps: i32) -> Self {
        Self { from, axis, steps }
    }

    pub fn horizontal(from: Position, steps: i32) -> Self {
        Self::new(from, Axis::Horizontal, steps)
    }

    pub fn vertical(from: Position, steps: i32) -> Self {
        Self::new(from, Axis::Vertical, steps)
    }
}

/// Why a move request did not change the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// No game is running, or the previous move is still resolving
    NotAccepting,
    /// Zero steps requested
    ZeroSteps,
    /// The origin is off the board
    OutOfBounds,
    /// There is no ball at the origin
    EmptyOrigin,
    /// The cell in front of the ball is occupied or off the board
    Blocked,
}

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// No ball has an empty neighbor to move into
    NoMovesLeft,
    /// Every ball has been removed
    BoardCleared,
    /// No color has enough balls left to ever form a group
    NoMatchesPossible,
}

/// Events that occur as a result of commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new game began on a fresh board
    GameStarted {
        players: Vec<PlayerId>,
        first_player: PlayerId,
    },

    /// A move request was ignored
    MoveRejected { reason: RejectReason },

    /// Balls were pushed
    BallsMoved {
        player: PlayerId,
        request: MoveRequest,
        /// Slots a ball moved into
        moved: Vec<Position>,
    },

    /// Groups of same-colored balls were matched and removed, row-major order
    MatchCleared {
        player: PlayerId,
        positions: Vec<Position>,
    },

    /// A player's score went up
    PointsAwarded {
        player: PlayerId,
        points: u32,
        total: u32,
    },

    /// Turn passed to the next player
    TurnEnded {
        player: PlayerId,
        next_player: PlayerId,
    },

    /// The remaining balls were swept off the board at the end of the game
    BoardSwept {
        player: PlayerId,
        positions: Vec<Position>,
    },

    /// The game is over
    GameEnded {
        reason: EndReason,
        outcome: GameOutcome,
    },

    /// The game was abandoned and the roster reset
    GameAbandoned,
}
