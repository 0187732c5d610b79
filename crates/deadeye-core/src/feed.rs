//! Narrative feed
//!
//! A bounded ring of the most recent lines the session produced. Old lines
//! fall off the front once capacity is reached; sequence numbers keep
//! increasing so a presenter can tell what it has already shown.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of lines kept
pub const DEFAULT_FEED_CAPACITY: usize = 50;

/// How a line should be styled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    Info,
    System,
    Success,
    Combat,
    Critical,
    Miss,
    Danger,
    Heal,
    Buff,
    PowerUp,
    Ability,
    Warning,
}

/// One line of narrative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub seq: u64,
    pub tone: Tone,
    pub text: String,
}

/// Bounded narrative log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feed {
    entries: VecDeque<FeedEntry>,
    capacity: usize,
    next_seq: u64,
}

impl Feed {
    /// Create a feed keeping at most `capacity` lines
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_seq: 0,
        }
    }

    /// Append a line, evicting the oldest when full
    pub fn push(&mut self, tone: Tone, text: impl Into<String>) -> FeedEntry {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        let entry = FeedEntry {
            seq: self.next_seq,
            tone,
            text: text.into(),
        };
        self.next_seq += 1;
        self.entries.push_back(entry.clone());
        entry
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &FeedEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&FeedEntry> {
        self.entries.back()
    }

    /// Lines with a sequence number of at least `seq`
    pub fn since(&self, seq: u64) -> impl Iterator<Item = &FeedEntry> {
        self.entries.iter().filter(move |e| e.seq >= seq)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total lines ever written, including evicted ones
    pub fn total_written(&self) -> u64 {
        self.next_seq
    }

    /// Whether any retained line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.text.contains(needle))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_seq = 0;
    }
}

impl Default for Feed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_latest() {
        let mut feed = Feed::default();
        feed.push(Tone::System, "The party enters the dungeon");
        feed.push(Tone::Combat, "TROY strikes true!");

        assert_eq!(feed.len(), 2);
        assert_eq!(feed.latest().unwrap().text, "TROY strikes true!");
        assert_eq!(feed.latest().unwrap().seq, 1);
        assert!(feed.contains("dungeon"));
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut feed = Feed::new(3);
        for i in 0..5 {
            feed.push(Tone::Info, format!("line {}", i));
        }

        assert_eq!(feed.len(), 3);
        let texts: Vec<_> = feed.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["line 2", "line 3", "line 4"]);
        assert_eq!(feed.total_written(), 5);
        assert_eq!(feed.since(4).count(), 1);
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut feed = Feed::new(0);
        feed.push(Tone::Info, "a");
        feed.push(Tone::Info, "b");
        assert_eq!(feed.len(), 1);
        assert_eq!(feed.capacity(), 1);
    }
}
