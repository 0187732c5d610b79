//! Commands (presentation side effects) produced by a session
//!
//! Sessions never draw, play sounds or touch storage. Every update returns a
//! `Cmd` describing what changed and a [`Presenter`] decides what to do with
//! it. Delivery is fire and forget.

use crate::feed::FeedEntry;
use serde::{Deserialize, Serialize};

/// A command for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cmd {
    /// No operation
    None,

    /// Batch multiple commands
    Batch(Vec<Cmd>),

    /// A new feed line
    Log(FeedEntry),

    /// Play a feedback cue
    Cue(Cue),

    /// Big centered overlay text
    Announce(String),

    /// A HUD value changed
    Stat { key: String, value: i64 },

    /// The state machine moved
    Transition(Transition),
}

impl Default for Cmd {
    fn default() -> Self {
        Cmd::None
    }
}

/// Feedback categories a presenter maps to sounds or animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    Hit,
    Critical,
    Miss,
    Kill,
    PowerUp,
    Spell,
    Damage,
    Shield,
    Explosion,
    Alarm,
    Warning,
    Medal,
    Victory,
    Defeat,
}

impl Cue {
    /// The category string presenters key on
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Hit => "hit",
            Cue::Critical => "critical",
            Cue::Miss => "miss",
            Cue::Kill => "kill",
            Cue::PowerUp => "powerup",
            Cue::Spell => "spell",
            Cue::Damage => "damage",
            Cue::Shield => "shield",
            Cue::Explosion => "explosion",
            Cue::Alarm => "alarm",
            Cue::Warning => "warning",
            Cue::Medal => "medal",
            Cue::Victory => "victory",
            Cue::Defeat => "defeat",
        }
    }
}

/// State-change notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    Started { game: String },
    TurnChanged { actor: String },
    RoundStarted { round: u32 },
    RoundEnded { round: u32 },
    EncounterStarted { label: String },
    EncounterCleared { label: String },
    PhaseAdvanced { phase: u32 },
    Paused,
    Resumed,
    Won,
    Lost { reason: String },
    Reset,
}

impl Cmd {
    /// Create an empty command
    pub fn none() -> Self {
        Cmd::None
    }

    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        // Flatten nested batches and filter out None
        let mut flattened: Vec<Cmd> = cmds
            .into_iter()
            .flat_map(|cmd| match cmd {
                Cmd::None => vec![],
                Cmd::Batch(inner) => inner,
                other => vec![other],
            })
            .collect();

        match flattened.len() {
            0 => Cmd::None,
            1 => flattened.pop().unwrap_or(Cmd::None),
            _ => Cmd::Batch(flattened),
        }
    }

    pub fn cue(cue: Cue) -> Self {
        Cmd::Cue(cue)
    }

    pub fn announce(text: impl Into<String>) -> Self {
        Cmd::Announce(text.into())
    }

    pub fn stat(key: impl Into<String>, value: i64) -> Self {
        Cmd::Stat {
            key: key.into(),
            value,
        }
    }

    pub fn transition(transition: Transition) -> Self {
        Cmd::Transition(transition)
    }

    /// Check if this is a None command
    pub fn is_none(&self) -> bool {
        matches!(self, Cmd::None)
    }

    /// Every leaf command, in order
    pub fn iter(&self) -> Box<dyn Iterator<Item = &Cmd> + '_> {
        match self {
            Cmd::None => Box::new(std::iter::empty()),
            Cmd::Batch(cmds) => Box::new(cmds.iter().flat_map(|c| c.iter())),
            other => Box::new(std::iter::once(other)),
        }
    }

    /// Cues in this command, in order
    pub fn cues(&self) -> Vec<Cue> {
        self.iter()
            .filter_map(|c| match c {
                Cmd::Cue(cue) => Some(*cue),
                _ => None,
            })
            .collect()
    }

    /// Transitions in this command, in order
    pub fn transitions(&self) -> Vec<&Transition> {
        self.iter()
            .filter_map(|c| match c {
                Cmd::Transition(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    pub fn has_cue(&self, cue: Cue) -> bool {
        self.cues().contains(&cue)
    }
}

/// Renders session output
///
/// Implementations translate commands into whatever the front end needs
/// (DOM updates, terminal output, sounds). They must not call back into the
/// session while presenting.
pub trait Presenter {
    fn present(&mut self, cmd: &Cmd);

    /// Present every leaf of a (possibly batched) command
    fn present_all(&mut self, cmd: &Cmd) {
        for leaf in cmd.iter() {
            self.present(leaf);
        }
    }
}
