//! Persisted records: campaign progress and leaderboards
//!
//! These are plain data. Where they are stored is decided elsewhere; the
//! JSON field names match what browsers already have saved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entries kept per seed
pub const SEED_BOARD_CAP: usize = 10;
/// Entries kept on the all-time board
pub const ALL_TIME_CAP: usize = 50;

/// Campaign progress (unlocked and completed stages, earned currency)
///
/// Older saves used mission-flavoured keys; those are still read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    #[serde(default, alias = "crewRep")]
    pub earned_currency: u64,
    #[serde(default, alias = "unlockedMissions")]
    pub unlocked_stages: Vec<String>,
    #[serde(default, alias = "completedMissions")]
    pub completed_stages: Vec<String>,
}

impl ProgressRecord {
    /// Fresh progress with only `first_stage` unlocked
    pub fn new(first_stage: impl Into<String>) -> Self {
        Self {
            earned_currency: 0,
            unlocked_stages: vec![first_stage.into()],
            completed_stages: Vec::new(),
        }
    }

    pub fn is_unlocked(&self, stage: &str) -> bool {
        self.unlocked_stages.iter().any(|s| s == stage)
    }

    pub fn is_completed(&self, stage: &str) -> bool {
        self.completed_stages.iter().any(|s| s == stage)
    }

    /// Unlock a stage; returns true if it was newly unlocked
    pub fn unlock(&mut self, stage: &str) -> bool {
        if self.is_unlocked(stage) {
            return false;
        }
        self.unlocked_stages.push(stage.to_string());
        true
    }

    /// Record a completed stage, bank the reward and unlock `next`
    ///
    /// Returns the newly unlocked stage, if any.
    pub fn complete_stage(&mut self, stage: &str, reward: u64, next: Option<&str>) -> Option<String> {
        self.earned_currency += reward;
        if !self.is_completed(stage) {
            self.completed_stages.push(stage.to_string());
        }
        let next = next?;
        self.unlock(next).then(|| next.to_string())
    }
}

/// One finished game on a leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub player: String,
    pub score: i64,
    pub rounds: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    pub timestamp: DateTime<Utc>,
}

impl ScoreEntry {
    /// An entry stamped with the current time
    pub fn new(player: impl Into<String>, score: i64, rounds: u32) -> Self {
        Self {
            player: player.into(),
            score,
            rounds,
            seed: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// A capped list of scores, highest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
    cap: usize,
}

impl Leaderboard {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: Vec::new(),
            cap,
        }
    }

    /// Board for a single seed
    pub fn per_seed() -> Self {
        Self::new(SEED_BOARD_CAP)
    }

    /// The all-time board
    pub fn all_time() -> Self {
        Self::new(ALL_TIME_CAP)
    }

    /// Rebuild from stored entries, re-sorting and re-capping
    pub fn from_entries(entries: Vec<ScoreEntry>, cap: usize) -> Self {
        let mut board = Self::new(cap);
        for entry in entries {
            board.insert(entry);
        }
        board
    }

    /// Insert a score; returns its rank (0-based) if it made the cut
    ///
    /// Ties keep the earlier entry ahead.
    pub fn insert(&mut self, entry: ScoreEntry) -> Option<usize> {
        let rank = self.entries.partition_point(|e| e.score >= entry.score);
        if rank >= self.cap {
            return None;
        }
        self.entries.insert(rank, entry);
        self.entries.truncate(self.cap);
        Some(rank)
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ScoreEntry> {
        self.entries
    }

    pub fn best(&self) -> Option<&ScoreEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }
}
