//! Players and the roster.

use serde::{Deserialize, Serialize};

/// Player identifier. Real players are numbered from 1 in turn order;
/// 0 is reserved as [`NO_PLAYER`].
pub type PlayerId = u8;

/// Sentinel id that never belongs to a real player (used for tied results)
pub const NO_PLAYER: PlayerId = 0;

/// Fewest players a game can have
pub const MIN_PLAYERS: u8 = 2;

/// Most players a game can have
pub const MAX_PLAYERS: u8 = 4;

/// A single player's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Player ID (1-4), also the turn order
    pub id: PlayerId,
    /// Display name
    pub name: String,
    /// Balls collected so far
    pub score: u32,
}

impl Player {
    /// Create a new player
    pub fn new(id: PlayerId, name: String) -> Self {
        Self { id, name, score: 0 }
    }

    /// Create a player with the default display name
    pub fn with_default_name(id: PlayerId) -> Self {
        Self::new(id, default_name(id))
    }

    /// Add points, returning the new total
    pub fn add_points(&mut self, points: u32) -> u32 {
        self.score += points;
        self.score
    }
}

/// Display name given to a player nobody has renamed
pub fn default_name(id: PlayerId) -> String {
    format!("Player {}", id)
}

/// A roster of `count` players with default names and zero scores
pub fn default_roster(count: u8) -> Vec<Player> {
    (1..=count).map(Player::with_default_name).collect()
}
