//! Input journal for replay and score verification
//!
//! Sessions are deterministic given their seed and the ordered inputs they
//! saw. With the `journal` feature every session records those inputs, and
//! [`replay`] feeds them to a fresh session to rebuild the exact same state.
//! This is how a leaderboard entry can be checked against the seed it
//! claims.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut session: Session<Siege> = Session::new(parse_seed_input("ALPHA"));
//! session.start(SiegeConfig::default())?;
//! session.handle_dart_throw(DartEvent::triple(20));
//!
//! let copy: Session<Siege> = replay(session.journal().entries())?;
//! assert_eq!(copy.game().map(|g| g.score()), session.game().map(|g| g.score()));
//! ```

use crate::{runtime::Session, time::Millis, DartEvent, Error, Game, Result};
use serde::{Deserialize, Serialize};

/// A session input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Input<S> {
    Start { seed: u32, setup: S },
    Throw(DartEvent),
    Tick(Millis),
    Advance,
    Pause,
    Resume,
    Reset,
}

/// A recorded input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry<S> {
    /// Position in the journal
    pub seq: u64,
    /// Session time when the input arrived
    pub at_ms: Millis,
    pub input: Input<S>,
}

/// Default cap on recorded inputs, well past any single game
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Configuration for the journal
#[derive(Debug, Clone)]
pub struct JournalConfig {
    /// Whether recording is enabled
    pub recording_enabled: bool,
    /// Maximum number of entries to keep (0 = unlimited)
    pub max_entries: usize,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            recording_enabled: true,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

/// Ordered record of a session's inputs
#[derive(Debug, Clone)]
pub struct Journal<S> {
    config: JournalConfig,
    entries: Vec<JournalEntry<S>>,
    next_seq: u64,
    truncated: bool,
}

impl<S> Journal<S> {
    pub fn new() -> Self {
        Self::with_config(JournalConfig::default())
    }

    pub fn with_config(config: JournalConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
            next_seq: 0,
            truncated: false,
        }
    }

    pub fn config(&self) -> &JournalConfig {
        &self.config
    }

    /// Append an input
    ///
    /// Once `max_entries` is reached further inputs are dropped and the
    /// journal is marked truncated; a truncated journal cannot be replayed
    /// faithfully.
    pub fn record(&mut self, at_ms: Millis, input: Input<S>) {
        if !self.config.recording_enabled {
            return;
        }
        if self.config.max_entries > 0 && self.entries.len() >= self.config.max_entries {
            self.truncated = true;
            return;
        }
        self.entries.push(JournalEntry {
            seq: self.next_seq,
            at_ms,
            input,
        });
        self.next_seq += 1;
    }

    pub fn entries(&self) -> &[JournalEntry<S>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn start_recording(&mut self) {
        self.config.recording_enabled = true;
    }

    pub fn stop_recording(&mut self) {
        self.config.recording_enabled = false;
    }

    pub fn is_recording(&self) -> bool {
        self.config.recording_enabled
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_seq = 0;
        self.truncated = false;
    }
}

impl<S> Default for Journal<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Rebuild a session by feeding it recorded inputs
///
/// The first entry must be a `Start`; its seed seeds the new session.
pub fn replay<G: Game>(entries: &[JournalEntry<G::Setup>]) -> Result<Session<G>> {
    let seed = match entries.first().map(|e| &e.input) {
        Some(Input::Start { seed, .. }) => *seed,
        _ => return Err(Error::MissingConfig("journal does not begin with a start".into())),
    };

    let mut session = Session::new(seed);
    for entry in entries {
        match &entry.input {
            Input::Start { seed, setup } => {
                session.set_seed(*seed);
                session.start(setup.clone())?;
            }
            Input::Throw(event) => {
                session.handle_dart_throw(*event);
            }
            Input::Tick(ms) => {
                session.tick(*ms);
            }
            Input::Advance => {
                session.advance();
            }
            Input::Pause => {
                session.pause();
            }
            Input::Resume => {
                session.resume();
            }
            Input::Reset => {
                session.reset();
            }
        }
    }
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_sequence() {
        let mut journal: Journal<()> = Journal::new();
        journal.record(0, Input::Start { seed: 1, setup: () });
        journal.record(0, Input::Throw(DartEvent::single(7)));
        journal.record(500, Input::Tick(500));

        assert_eq!(journal.len(), 3);
        assert_eq!(journal.entries()[2].seq, 2);
        assert_eq!(journal.entries()[2].at_ms, 500);
    }

    #[test]
    fn test_stop_recording() {
        let mut journal: Journal<()> = Journal::new();
        journal.stop_recording();
        journal.record(0, Input::Advance);
        assert!(journal.is_empty());
        journal.start_recording();
        journal.record(0, Input::Advance);
        assert_eq!(journal.len(), 1);
    }

    #[test]
    fn test_default_journal_is_bounded() {
        let mut journal: Journal<()> = Journal::new();
        assert_eq!(journal.config().max_entries, DEFAULT_MAX_ENTRIES);
        for _ in 0..DEFAULT_MAX_ENTRIES + 5 {
            journal.record(0, Input::Advance);
        }
        assert_eq!(journal.len(), DEFAULT_MAX_ENTRIES);
        assert!(journal.is_truncated());
    }

    #[test]
    fn test_max_entries_truncates() {
        let mut journal: Journal<()> = Journal::with_config(JournalConfig {
            recording_enabled: true,
            max_entries: 2,
        });
        for _ in 0..3 {
            journal.record(0, Input::Advance);
        }
        assert_eq!(journal.len(), 2);
        assert!(journal.is_truncated());
    }

    #[test]
    fn test_entries_round_trip_through_ron() {
        let entry = JournalEntry {
            seq: 0,
            at_ms: 0,
            input: Input::Start { seed: 42, setup: 3u8 },
        };
        let text = ron::to_string(&entry).unwrap();
        let back: JournalEntry<u8> = ron::from_str(&text).unwrap();
        assert_eq!(back, entry);
    }
}
