//! Runner configuration, read from the environment.

use palline_core::BotDifficulty;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Unknown bot difficulty {0:?}, expected easy, medium or hard")]
    UnknownDifficulty(String),
}

/// Settings for a batch of self-play games
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Number of games to play
    pub games: u32,
    /// Players per game
    pub players: u8,
    /// Base seed; game `n` uses `seed + n`. Unseeded runs use entropy.
    pub seed: Option<u64>,
    /// Difficulty of every bot
    pub difficulty: BotDifficulty,
    /// Turn limit after which a game counts as stalled
    pub max_turns: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            games: 10,
            players: 2,
            seed: None,
            difficulty: BotDifficulty::Medium,
            max_turns: 2000,
        }
    }
}

impl SimConfig {
    /// Read `PALLINE_GAMES`, `PALLINE_PLAYERS`, `PALLINE_SEED`, `PALLINE_BOT` and
    /// `PALLINE_MAX_TURNS`, falling back to defaults for anything unset
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let difficulty = match lookup("PALLINE_BOT") {
            Some(value) => parse_difficulty(&value)?,
            None => defaults.difficulty,
        };
        let seed = match lookup("PALLINE_SEED") {
            Some(value) => Some(parse_value("PALLINE_SEED", &value)?),
            None => None,
        };

        Ok(Self {
            games: parse_or("PALLINE_GAMES", lookup("PALLINE_GAMES"), defaults.games)?,
            players: parse_or("PALLINE_PLAYERS", lookup("PALLINE_PLAYERS"), defaults.players)?,
            seed,
            difficulty,
            max_turns: parse_or(
                "PALLINE_MAX_TURNS",
                lookup("PALLINE_MAX_TURNS"),
                defaults.max_turns,
            )?,
        })
    }
}

fn parse_value<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(value) => parse_value(name, &value),
        None => Ok(default),
    }
}

fn parse_difficulty(value: &str) -> Result<BotDifficulty, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "easy" => Ok(BotDifficulty::Easy),
        "medium" => Ok(BotDifficulty::Medium),
        "hard" => Ok(BotDifficulty::Hard),
        _ => Err(ConfigError::UnknownDifficulty(value.to_string())),
    }
}
