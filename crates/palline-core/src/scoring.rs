//! Scoring rules: points for matches, the end-of-game sweep, and the final result.

use crate::grid::Position;
use crate::player::{Player, PlayerId, NO_PLAYER};
use serde::{Deserialize, Serialize};

/// Final result of a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    /// One player has the strictly highest score
    Winner { player: PlayerId, score: u32 },
    /// Several players share the highest score
    Tie { players: Vec<PlayerId>, score: u32 },
}

impl GameOutcome {
    /// The winning player's id, or [`NO_PLAYER`] for a tie
    pub fn winner_id(&self) -> PlayerId {
        match self {
            GameOutcome::Winner { player, .. } => *player,
            GameOutcome::Tie { .. } => NO_PLAYER,
        }
    }

    pub fn is_tie(&self) -> bool {
        matches!(self, GameOutcome::Tie { .. })
    }

    /// The top score
    pub fn score(&self) -> u32 {
        match self {
            GameOutcome::Winner { score, .. } | GameOutcome::Tie { score, .. } => *score,
        }
    }
}

/// Points for a set of matched positions: one per ball
pub fn match_points(matched: &[Position]) -> u32 {
    matched.len() as u32
}

/// Points for the balls swept off the board when the game ends: one per ball
pub fn sweep_points(swept: &[Position]) -> u32 {
    swept.len() as u32
}

/// The player who moves just before `current` in turn order.
///
/// Once the turn has advanced, this is whoever made the last move.
pub fn previous_player(players: &[Player], current: PlayerId) -> Option<PlayerId> {
    let index = players.iter().position(|p| p.id == current)?;
    let previous = (index + players.len() - 1) % players.len();
    Some(players[previous].id)
}

/// The player who moves just after `current` in turn order
pub fn next_player(players: &[Player], current: PlayerId) -> Option<PlayerId> {
    let index = players.iter().position(|p| p.id == current)?;
    Some(players[(index + 1) % players.len()].id)
}

/// Decide the winner from final scores. Sharing the top score is a tie.
pub fn resolve_outcome(players: &[Player]) -> GameOutcome {
    let top = players.iter().map(|p| p.score).max().unwrap_or(0);
    let leaders: Vec<PlayerId> = players
        .iter()
        .filter(|p| p.score == top)
        .map(|p| p.id)
        .collect();

    match leaders.as_slice() {
        [single] => GameOutcome::Winner {
            player: *single,
            score: top,
        },
        _ => GameOutcome::Tie {
            players: leaders,
            score: top,
        },
    }
}
