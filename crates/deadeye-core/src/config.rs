//! Turn configuration shared by the turn-based games
//!
//! Player count, darts per turn and how many opponents an encounter spawns.
//! Every setter clamps into the legal range instead of failing, the same way
//! the in-game settings buttons behave.

use serde::{Deserialize, Serialize};

/// Most actors a table supports
pub const MAX_PLAYERS: usize = 5;
/// Most darts in one turn
pub const MAX_DARTS_PER_TURN: u32 = 3;
/// Most opponents in one encounter
pub const MAX_TARGETS: usize = 3;

/// Turn and encounter sizing
///
/// # Example
///
/// ```
/// use deadeye_core::TurnConfig;
///
/// let config = TurnConfig::default()
///     .with_player_count(9)
///     .with_darts_per_turn(0)
///     .with_target_range(3, 1);
/// assert_eq!(config.player_count(), 5);
/// assert_eq!(config.darts_per_turn(), 1);
/// assert_eq!(config.target_range(), (1, 3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnConfig {
    player_count: usize,
    darts_per_turn: u32,
    min_targets: usize,
    max_targets: usize,
}

impl TurnConfig {
    /// Number of actors, clamped to `[1, MAX_PLAYERS]`
    pub fn with_player_count(mut self, n: usize) -> Self {
        self.player_count = n.clamp(1, MAX_PLAYERS);
        self
    }

    /// Darts per turn, clamped to `[1, MAX_DARTS_PER_TURN]`
    pub fn with_darts_per_turn(mut self, n: u32) -> Self {
        self.set_darts_per_turn(n);
        self
    }

    /// Opponents per encounter; both ends clamped to `[1, MAX_TARGETS]`
    /// and swapped if given backwards
    pub fn with_target_range(mut self, min: usize, max: usize) -> Self {
        let a = min.clamp(1, MAX_TARGETS);
        let b = max.clamp(1, MAX_TARGETS);
        self.min_targets = a.min(b);
        self.max_targets = a.max(b);
        self
    }

    /// Re-clamp every field (for values that came from a file)
    pub fn normalized(self) -> Self {
        let (min, max) = (self.min_targets, self.max_targets);
        let darts = self.darts_per_turn;
        let players = self.player_count;
        self.with_player_count(players)
            .with_darts_per_turn(darts)
            .with_target_range(min, max)
    }

    pub fn player_count(&self) -> usize {
        self.player_count
    }

    pub fn darts_per_turn(&self) -> u32 {
        self.darts_per_turn
    }

    /// Change darts per turn mid-game
    pub fn set_darts_per_turn(&mut self, n: u32) {
        self.darts_per_turn = n.clamp(1, MAX_DARTS_PER_TURN);
    }

    /// Nudge darts per turn by `delta`, clamped
    pub fn adjust_darts_per_turn(&mut self, delta: i32) {
        let next = i64::from(self.darts_per_turn) + i64::from(delta);
        self.set_darts_per_turn(next.clamp(0, i64::from(MAX_DARTS_PER_TURN)) as u32);
    }

    pub fn target_range(&self) -> (usize, usize) {
        (self.min_targets, self.max_targets)
    }
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            player_count: MAX_PLAYERS,
            darts_per_turn: MAX_DARTS_PER_TURN,
            min_targets: 1,
            max_targets: MAX_TARGETS,
        }
    }
}
