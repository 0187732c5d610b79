//! DeadEye Core - Session runtime for dart-driven party games
//!
//! This crate provides the pieces every DeadEye game is built from:
//! - Dart events from the board relay (`DartEvent`, `Dart`, `Bed`)
//! - A seeded Mulberry32 RNG and shareable seed codes (`GameRng`)
//! - Ordered rule tables for scoring decisions (`RuleTable`)
//! - Target numbers, weak spots and sequences
//! - Bounded narrative feed and presentation commands (`Feed`, `Cmd`)
//! - The session state machine with pending transitions (`Session`, `Game`)
//! - Persisted records: campaign progress and leaderboards
//!
//! ## Playing a game
//!
//! A game implements [`Game`]; the caller owns a [`Session`] and drives it
//! with `start`, `handle_dart_throw`, `tick` and `advance`. Every call
//! returns an [`UpdateResult`] whose `Cmd` goes to a [`Presenter`].
//!
//! ## Journal Feature
//!
//! Enable the `journal` feature to record session inputs and replay them:
//! ```toml
//! deadeye-core = { version = "0.1", features = ["journal"] }
//! ```

mod actor;
mod cmd;
mod config;
mod dart;
mod error;
mod feed;
mod pool;
mod record;
mod rng;
mod rules;
pub mod runtime;
pub mod target;
pub mod time;

#[cfg(feature = "journal")]
pub mod journal;

pub use actor::{ActorId, Living, Roster};
pub use cmd::{Cmd, Cue, Presenter, Transition};
pub use config::{TurnConfig, MAX_DARTS_PER_TURN, MAX_PLAYERS, MAX_TARGETS};
pub use dart::{Bed, Dart, DartEvent, BULL_SEGMENT};
pub use error::{Error, Result};
pub use feed::{Feed, FeedEntry, Tone, DEFAULT_FEED_CAPACITY};
pub use pool::ResourcePool;
pub use record::{Leaderboard, ProgressRecord, ScoreEntry, ALL_TIME_CAP, SEED_BOARD_CAP};
pub use rng::{format_seed, parse_seed_input, random_seed, seed_from_str, GameRng};
pub use rules::{Rule, RuleTable, Verdict, FALLBACK_RULE};
pub use runtime::{Ctx, Game, Outcome, Phase, Rejection, Session, UpdateResult};
pub use target::{
    assign_unique, distinct_numbers, random_number, select_target, Selection, Sequence,
    SequenceStep, Targetable,
};
pub use time::{Countdown, CountdownEvent, Deferred, Millis};

#[cfg(feature = "journal")]
pub use journal::{replay, Input, Journal, JournalConfig, JournalEntry, DEFAULT_MAX_ENTRIES};
