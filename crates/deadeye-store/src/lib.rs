//! DeadEye Store - Persistence for campaign progress and leaderboards
//!
//! Records are stored as JSON strings under fixed keys on a [`Storage`]
//! medium:
//! - `heist_crew_progress`: the Heist Crew campaign
//! - `station_siege_scores_{seed}`: top 10 Station Siege scores per seed
//! - `station_siege_alltime`: top 50 Station Siege scores overall
//!
//! [`Store`] never lets a broken medium stop a game. Read failures fall back
//! to empty records and write failures are logged and dropped; the `try_*`
//! methods expose the underlying errors for callers that want them.

mod error;
mod medium;
mod store;

pub use error::{Error, Result};
pub use medium::{FileStorage, MemoryStorage, Storage};
pub use store::{Store, ALL_TIME_KEY, FIRST_STAGE, PROGRESS_KEY, SEED_BOARD_PREFIX};
