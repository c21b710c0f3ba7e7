//! AI Bot players for Palline.
//!
//! This module provides different difficulty levels of AI players:
//! - Easy: Random legal moves
//! - Medium: Greedy, takes whichever move scores the most right now
//! - Hard: Greedy with a one-move lookahead at the next player's best reply

use crate::actions::{EndReason, MoveRequest};
use crate::game::{end_condition, resolve_move, GameState};
use crate::grid::Grid;
use crate::movement::legal_moves;
use crate::player::PlayerId;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// How many of the best greedy candidates the hard bot looks ahead on
const HARD_LOOKAHEAD_CANDIDATES: usize = 8;

/// Bot difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotDifficulty {
    Easy,
    Medium,
    Hard,
}

/// A bot player that can decide on moves
pub struct Bot {
    pub player_id: PlayerId,
    pub difficulty: BotDifficulty,
    rng: StdRng,
}

impl Bot {
    pub fn new(player_id: PlayerId, difficulty: BotDifficulty) -> Self {
        Self {
            player_id,
            difficulty,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(player_id: PlayerId, difficulty: BotDifficulty, seed: u64) -> Self {
        Self {
            player_id,
            difficulty,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Choose a move, or `None` if it is not this bot's turn or nothing can move
    pub fn choose_move(&mut self, game: &GameState) -> Option<MoveRequest> {
        if game.current_player != self.player_id {
            return None;
        }

        let moves = game.valid_moves();
        if moves.is_empty() {
            return None;
        }

        match self.difficulty {
            BotDifficulty::Easy => moves.choose(&mut self.rng).copied(),
            BotDifficulty::Medium => self.choose_medium(&game.grid, &moves),
            BotDifficulty::Hard => self.choose_hard(&game.grid, &moves),
        }
    }

    /// Medium: highest immediate gain, random among equals
    fn choose_medium(&mut self, grid: &Grid, moves: &[MoveRequest]) -> Option<MoveRequest> {
        let scored: Vec<(MoveRequest, i64)> = moves
            .iter()
            .map(|m| (*m, immediate_gain(grid, m).0))
            .collect();
        self.pick_best(&scored)
    }

    /// Hard: immediate gain minus what the next player could take straight after
    fn choose_hard(&mut self, grid: &Grid, moves: &[MoveRequest]) -> Option<MoveRequest> {
        let mut candidates: Vec<(MoveRequest, i64, Option<Grid>)> = moves
            .iter()
            .map(|m| {
                let (gain, after) = immediate_gain(grid, m);
                (*m, gain, after)
            })
            .collect();

        // Shuffled first so ties at the cut-off are broken randomly
        candidates.shuffle(&mut self.rng);
        candidates.sort_by(|a, b| b.1.cmp(&a.1));
        candidates.truncate(HARD_LOOKAHEAD_CANDIDATES);

        let scored: Vec<(MoveRequest, i64)> = candidates
            .into_iter()
            .map(|(m, gain, after)| {
                let reply = after.as_ref().map(best_reply).unwrap_or(0);
                (m, gain.saturating_sub(reply))
            })
            .collect();
        self.pick_best(&scored)
    }

    fn pick_best(&mut self, scored: &[(MoveRequest, i64)]) -> Option<MoveRequest> {
        let best = scored.iter().map(|(_, score)| *score).max()?;
        let top: Vec<MoveRequest> = scored
            .iter()
            .filter(|(_, score)| *score == best)
            .map(|(m, _)| *m)
            .collect();
        top.choose(&mut self.rng).copied()
    }
}

/// Points the mover collects from a move, counting an end-of-game sweep.
///
/// Also returns the board after the move if the game would continue on it.
fn immediate_gain(grid: &Grid, request: &MoveRequest) -> (i64, Option<Grid>) {
    let Ok(resolved) = resolve_move(grid, request) else {
        return (i64::MIN, None);
    };

    let mut gain = resolved.matches.len() as i64;
    match end_condition(&resolved.grid) {
        None => (gain, Some(resolved.grid)),
        Some(EndReason::BoardCleared) => (gain, None),
        Some(_) => {
            gain += resolved.grid.ball_count() as i64;
            (gain, None)
        }
    }
}

/// The most the next player could score with one move on this board
fn best_reply(grid: &Grid) -> i64 {
    legal_moves(grid)
        .iter()
        .map(|m| immediate_gain(grid, m).0)
        .max()
        .unwrap_or(0)
        .max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::TurnEngine;
    use crate::grid::{BallColor, Position};

    fn engine_with(balls: &[(usize, usize, BallColor)]) -> TurnEngine {
        let mut grid = Grid::empty();
        for &(row, col, color) in balls {
            grid.place(Position::new(row, col), color);
        }
        let mut engine = TurnEngine::with_seed(2, 11).unwrap();
        engine.start_with_grid(grid).unwrap();
        engine
    }

    #[test]
    fn test_bot_creation() {
        let bot = Bot::new(1, BotDifficulty::Medium);
        assert_eq!(bot.player_id, 1);
        assert_eq!(bot.difficulty, BotDifficulty::Medium);
    }

    #[test]
    fn test_bot_waits_for_its_turn() {
        let mut engine = TurnEngine::with_seed(2, 11).unwrap();
        engine.start().unwrap();
        let mut bot = Bot::with_seed(2, BotDifficulty::Easy, 1);
        assert!(bot.choose_move(engine.state()).is_none());
    }

    #[test]
    fn test_easy_bot_chooses_legal_move() {
        let mut engine = TurnEngine::with_seed(2, 11).unwrap();
        engine.start().unwrap();
        let mut bot = Bot::with_seed(1, BotDifficulty::Easy, 1);

        let choice = bot.choose_move(engine.state()).unwrap();
        assert!(engine.state().valid_moves().contains(&choice));
        assert!(engine.preview_move(&choice).moved);
    }

    #[test]
    fn test_medium_bot_takes_the_match() {
        let engine = engine_with(&[
            (0, 0, BallColor::Red),
            (0, 2, BallColor::Red),
            (6, 3, BallColor::Blue),
            (9, 8, BallColor::Blue),
        ]);
        let mut bot = Bot::with_seed(1, BotDifficulty::Medium, 3);

        let choice = bot.choose_move(engine.state()).unwrap();
        let resolved = resolve_move(engine.grid(), &choice).unwrap();
        assert_eq!(resolved.matches.len(), 2);
    }

    #[test]
    fn test_hard_bot_counts_the_sweep() {
        // Any move ends the game (no color can ever match), so every move
        // sweeps all three balls to the mover
        let engine = engine_with(&[
            (0, 0, BallColor::Red),
            (4, 4, BallColor::Blue),
            (8, 8, BallColor::Green),
        ]);
        let state = engine.state();
        let mut bot = Bot::with_seed(1, BotDifficulty::Hard, 5);

        let choice = bot.choose_move(state).unwrap();
        assert_eq!(immediate_gain(engine.grid(), &choice).0, 3);
    }

    #[test]
    fn test_hard_bot_prefers_scoring() {
        let engine = engine_with(&[
            (0, 0, BallColor::Red),
            (0, 2, BallColor::Red),
            (6, 3, BallColor::Blue),
            (9, 8, BallColor::Blue),
            (3, 9, BallColor::Green),
            (7, 0, BallColor::Green),
        ]);
        let mut bot = Bot::with_seed(1, BotDifficulty::Hard, 9);

        let choice = bot.choose_move(engine.state()).unwrap();
        let resolved = resolve_move(engine.grid(), &choice).unwrap();
        assert!(!resolved.matches.is_empty());
    }
}
