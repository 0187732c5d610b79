//! Progress and leaderboard records over a storage medium.

use crate::error::Result;
use crate::medium::Storage;
use deadeye_core::{Leaderboard, ProgressRecord, ScoreEntry, ALL_TIME_CAP, SEED_BOARD_CAP};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Heist Crew campaign progress
pub const PROGRESS_KEY: &str = "heist_crew_progress";
/// Per-seed Station Siege board, suffixed with the seed
pub const SEED_BOARD_PREFIX: &str = "station_siege_scores_";
/// Station Siege all-time board
pub const ALL_TIME_KEY: &str = "station_siege_alltime";
/// Stage unlocked in a fresh campaign
pub const FIRST_STAGE: &str = "vault";

fn seed_key(seed: u32) -> String {
    format!("{}{}", SEED_BOARD_PREFIX, seed)
}

/// Record store for one medium.
///
/// The plain methods degrade: a failed read yields an empty record and a
/// failed write is logged, so a game never stops over persistence.
///
/// # Example
///
/// ```
/// use deadeye_core::ScoreEntry;
/// use deadeye_store::{MemoryStorage, Store};
///
/// let mut store = Store::new(MemoryStorage::new());
/// store.record_score(&ScoreEntry::new("Ada", 1200, 9).with_seed(42));
/// assert_eq!(store.leaderboard(42).best().map(|e| e.score), Some(1200));
/// assert_eq!(store.all_time().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Store<S> {
    medium: S,
}

impl<S: Storage> Store<S> {
    pub fn new(medium: S) -> Self {
        Self { medium }
    }

    pub fn medium(&self) -> &S {
        &self.medium
    }

    pub fn medium_mut(&mut self) -> &mut S {
        &mut self.medium
    }

    pub fn into_inner(self) -> S {
        self.medium
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.medium.get(key)? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let text = serde_json::to_string(value)?;
        self.medium.set(key, &text)
    }

    fn read_board(&self, key: &str, cap: usize) -> Result<Leaderboard> {
        let entries: Vec<ScoreEntry> = self.read(key)?.unwrap_or_default();
        Ok(Leaderboard::from_entries(entries, cap))
    }

    // =========================================================================
    // Progress
    // =========================================================================

    /// Saved progress, or `None` if nothing was ever saved
    pub fn try_load_progress(&self) -> Result<Option<ProgressRecord>> {
        let progress: Option<ProgressRecord> = self.read(PROGRESS_KEY)?;
        Ok(progress.map(|mut p| {
            if p.unlocked_stages.is_empty() {
                p.unlock(FIRST_STAGE);
            }
            p
        }))
    }

    /// Saved progress, falling back to a fresh campaign
    pub fn load_progress(&self) -> ProgressRecord {
        match self.try_load_progress() {
            Ok(Some(progress)) => progress,
            Ok(None) => ProgressRecord::new(FIRST_STAGE),
            Err(err) => {
                log::warn!("store: could not load progress, starting fresh: {}", err);
                ProgressRecord::new(FIRST_STAGE)
            }
        }
    }

    pub fn try_save_progress(&mut self, progress: &ProgressRecord) -> Result<()> {
        self.write(PROGRESS_KEY, progress)
    }

    /// Save progress; returns false if the medium refused it
    pub fn save_progress(&mut self, progress: &ProgressRecord) -> bool {
        match self.try_save_progress(progress) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("store: could not save progress: {}", err);
                false
            }
        }
    }

    /// Forget the campaign
    pub fn reset_progress(&mut self) -> bool {
        match self.medium.remove(PROGRESS_KEY) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("store: could not reset progress: {}", err);
                false
            }
        }
    }

    // =========================================================================
    // Leaderboards
    // =========================================================================

    pub fn try_leaderboard(&self, seed: u32) -> Result<Leaderboard> {
        self.read_board(&seed_key(seed), SEED_BOARD_CAP)
    }

    /// Top scores for one seed, empty if unreadable
    pub fn leaderboard(&self, seed: u32) -> Leaderboard {
        self.try_leaderboard(seed).unwrap_or_else(|err| {
            log::warn!("store: could not read board for seed {}: {}", seed, err);
            Leaderboard::per_seed()
        })
    }

    pub fn try_all_time(&self) -> Result<Leaderboard> {
        self.read_board(ALL_TIME_KEY, ALL_TIME_CAP)
    }

    /// Top scores across all seeds, empty if unreadable
    pub fn all_time(&self) -> Leaderboard {
        self.try_all_time().unwrap_or_else(|err| {
            log::warn!("store: could not read all-time board: {}", err);
            Leaderboard::all_time()
        })
    }

    /// Add a finished game to its seed's board and the all-time board
    ///
    /// Returns the entry's rank on the seed board (on the all-time board for
    /// entries without a seed), or `None` if it missed the cut. Seed boards
    /// store entries without the seed; the all-time board keeps it.
    pub fn try_record_score(&mut self, entry: &ScoreEntry) -> Result<Option<usize>> {
        let mut seed_rank = None;
        if let Some(seed) = entry.seed {
            let key = seed_key(seed);
            let mut board = self.read_board(&key, SEED_BOARD_CAP)?;
            let mut local = entry.clone();
            local.seed = None;
            seed_rank = board.insert(local);
            self.write(&key, board.entries())?;
        }

        let mut all_time = self.read_board(ALL_TIME_KEY, ALL_TIME_CAP)?;
        let all_time_rank = all_time.insert(entry.clone());
        self.write(ALL_TIME_KEY, all_time.entries())?;

        log::debug!(
            "store: recorded {} for {} (seed {:?})",
            entry.score,
            entry.player,
            entry.seed
        );
        Ok(if entry.seed.is_some() {
            seed_rank
        } else {
            all_time_rank
        })
    }

    /// Record a score, logging and dropping it if the medium fails
    pub fn record_score(&mut self, entry: &ScoreEntry) -> Option<usize> {
        match self.try_record_score(entry) {
            Ok(rank) => rank,
            Err(err) => {
                log::warn!("store: could not save score for {}: {}", entry.player, err);
                None
            }
        }
    }
}
