//! Headless self-play: bots play whole games against each other.

use crate::config::SimConfig;
use anyhow::{anyhow, bail};
use palline_core::{Bot, EndReason, GameEvent, GameOutcome, PlayerId, TurnEngine, NO_PLAYER};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// How one game went
#[derive(Debug, Clone, Serialize)]
pub struct GameSummary {
    pub game: u32,
    pub seed: Option<u64>,
    pub turns: u32,
    pub end_reason: Option<EndReason>,
    pub outcome: Option<GameOutcome>,
    pub scores: Vec<u32>,
}

impl GameSummary {
    pub fn finished(&self) -> bool {
        self.outcome.is_some()
    }
}

/// Totals over a batch of games
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub games: u32,
    pub finished: u32,
    /// Games that hit the turn limit
    pub stalled: u32,
    pub ties: u32,
    pub wins: BTreeMap<PlayerId, u32>,
    pub end_reasons: BTreeMap<String, u32>,
    pub average_turns: f64,
}

/// Play a single game to the end or to the turn limit
pub fn play_game(config: &SimConfig, game: u32) -> anyhow::Result<GameSummary> {
    let seed = config.seed.map(|s| s.wrapping_add(game as u64));
    let mut engine = match seed {
        Some(seed) => TurnEngine::with_seed(config.players, seed)?,
        None => TurnEngine::new(config.players)?,
    };

    let mut bots: Vec<Bot> = engine
        .players()
        .iter()
        .map(|p| match seed {
            Some(seed) => Bot::with_seed(
                p.id,
                config.difficulty,
                seed.wrapping_mul(31).wrapping_add(p.id as u64),
            ),
            None => Bot::new(p.id, config.difficulty),
        })
        .collect();

    engine.start()?;

    let mut turns = 0;
    let mut end_reason = None;
    while !engine.state().is_finished() && turns < config.max_turns {
        let current = engine.current_player();
        let bot = bots
            .iter_mut()
            .find(|b| b.player_id == current)
            .ok_or_else(|| anyhow!("no bot for player {}", current))?;
        let request = bot
            .choose_move(engine.state())
            .ok_or_else(|| anyhow!("player {} has no move on an active board", current))?;

        for event in engine.attempt_move(request) {
            match event {
                GameEvent::MoveRejected { reason } => {
                    bail!("bot move {:?} was rejected: {:?}", request, reason)
                }
                GameEvent::GameEnded { reason, .. } => end_reason = Some(reason),
                _ => {}
            }
        }
        turns += 1;
    }

    let outcome = engine.state().get_outcome().cloned();
    if outcome.is_none() {
        warn!(game, turns, balls = engine.grid().ball_count(), "game stalled at turn limit");
    } else {
        debug!(game, turns, ?end_reason, ?outcome, "game finished");
    }

    Ok(GameSummary {
        game,
        seed,
        turns,
        end_reason,
        outcome,
        scores: engine.players().iter().map(|p| p.score).collect(),
    })
}

/// Play every game in the batch and tally the results
pub fn run(config: &SimConfig) -> anyhow::Result<RunSummary> {
    let mut summary = RunSummary::default();
    let mut total_turns = 0u64;

    for game in 0..config.games {
        let result = play_game(config, game)?;
        summary.games += 1;
        total_turns += result.turns as u64;

        match &result.outcome {
            Some(outcome) => {
                summary.finished += 1;
                match outcome.winner_id() {
                    NO_PLAYER => summary.ties += 1,
                    winner => *summary.wins.entry(winner).or_insert(0) += 1,
                }
            }
            None => summary.stalled += 1,
        }
        if let Some(reason) = result.end_reason {
            *summary
                .end_reasons
                .entry(format!("{:?}", reason))
                .or_insert(0) += 1;
        }
    }

    if summary.games > 0 {
        summary.average_turns = total_turns as f64 / summary.games as f64;
    }

    info!(
        games = summary.games,
        finished = summary.finished,
        stalled = summary.stalled,
        ties = summary.ties,
        "self-play complete"
    );
    Ok(summary)
}
