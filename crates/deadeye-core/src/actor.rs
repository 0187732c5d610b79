//! Actors and turn rotation
//!
//! Actors (heroes, crew, players) are never removed from a roster once the
//! game starts. A dead actor stays addressable so its stats can still be
//! summarized; rotation simply skips it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an actor within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u64);

impl ActorId {
    /// Create a new actor ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor:{}", self.0)
    }
}

/// Anything that can drop out of the rotation
pub trait Living {
    fn is_alive(&self) -> bool;
}

/// Ordered set of actors with a turn pointer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster<A> {
    actors: Vec<A>,
    current: usize,
}

impl<A: Living> Roster<A> {
    /// Create a roster; the first actor has the turn
    pub fn new(actors: Vec<A>) -> Self {
        Self { actors, current: 0 }
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Index of the actor whose turn it is
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&A> {
        self.actors.get(self.current)
    }

    pub fn current_mut(&mut self) -> Option<&mut A> {
        self.actors.get_mut(self.current)
    }

    pub fn get(&self, index: usize) -> Option<&A> {
        self.actors.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut A> {
        self.actors.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &A> {
        self.actors.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut A> {
        self.actors.iter_mut()
    }

    /// Living actors only
    pub fn living(&self) -> impl Iterator<Item = &A> {
        self.actors.iter().filter(|a| a.is_alive())
    }

    pub fn living_mut(&mut self) -> impl Iterator<Item = &mut A> {
        self.actors.iter_mut().filter(|a| a.is_alive())
    }

    pub fn living_count(&self) -> usize {
        self.living().count()
    }

    pub fn all_dead(&self) -> bool {
        self.living_count() == 0
    }

    /// The next living actor after the current one, wrapping around
    ///
    /// Returns the current actor when it is the only one alive and `None`
    /// when nobody is.
    pub fn next_living(&self) -> Option<usize> {
        let len = self.actors.len();
        (1..=len)
            .map(|step| (self.current + step) % len)
            .find(|&i| self.actors[i].is_alive())
    }

    /// Move the turn pointer to the next living actor
    pub fn advance(&mut self) -> Option<usize> {
        let next = self.next_living()?;
        self.current = next;
        Some(next)
    }

    /// Make sure the pointer rests on a living actor
    pub fn settle(&mut self) -> Option<usize> {
        match self.current() {
            Some(actor) if actor.is_alive() => Some(self.current),
            _ => self.advance(),
        }
    }

    /// Point the turn at `index` directly
    pub fn set_current(&mut self, index: usize) {
        if index < self.actors.len() {
            self.current = index;
        }
    }

    pub fn into_inner(self) -> Vec<A> {
        self.actors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Dummy(bool);

    impl Living for Dummy {
        fn is_alive(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn test_actor_id_display() {
        assert_eq!(ActorId::new(3).to_string(), "actor:3");
    }

    #[test]
    fn test_rotation_wraps() {
        let mut roster = Roster::new(vec![Dummy(true), Dummy(true), Dummy(true)]);
        assert_eq!(roster.advance(), Some(1));
        assert_eq!(roster.advance(), Some(2));
        assert_eq!(roster.advance(), Some(0));
    }

    #[test]
    fn test_rotation_skips_dead() {
        let mut roster = Roster::new(vec![Dummy(true), Dummy(false), Dummy(true), Dummy(false)]);
        for _ in 0..10 {
            let next = roster.advance().unwrap();
            assert!(roster.get(next).unwrap().is_alive());
        }
    }

    #[test]
    fn test_single_survivor() {
        let mut roster = Roster::new(vec![Dummy(false), Dummy(false), Dummy(true)]);
        roster.set_current(2);
        for _ in 0..5 {
            assert_eq!(roster.advance(), Some(2));
        }

        let mut roster = Roster::new(vec![Dummy(false), Dummy(true), Dummy(false)]);
        assert_eq!(roster.settle(), Some(1));
    }

    #[test]
    fn test_all_dead() {
        let mut roster = Roster::new(vec![Dummy(false), Dummy(false)]);
        assert!(roster.all_dead());
        assert_eq!(roster.advance(), None);
        assert_eq!(roster.current_index(), 0);

        let mut empty: Roster<Dummy> = Roster::new(Vec::new());
        assert_eq!(empty.advance(), None);
    }
}
