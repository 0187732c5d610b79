//! Pending transitions and countdowns
//!
//! Nothing in a session runs on a wall clock. Delays are explicit values
//! counted down by `Session::tick`, and a caller can always cut one short
//! with `Session::advance`.

use serde::{Deserialize, Serialize};

/// Milliseconds, the only time unit sessions know about
pub type Millis = u64;

/// A transition waiting to happen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deferred<P> {
    /// What to do when the wait is over
    pub action: P,
    /// Time left; `None` waits for the caller to advance
    pub due_in_ms: Option<Millis>,
}

impl<P> Deferred<P> {
    /// Resolve after `delay_ms`
    pub fn after(action: P, delay_ms: Millis) -> Self {
        Self {
            action,
            due_in_ms: Some(delay_ms),
        }
    }

    /// Resolve only on an explicit `advance()`
    pub fn on_advance(action: P) -> Self {
        Self {
            action,
            due_in_ms: None,
        }
    }

    /// Whether ticking can ever resolve this
    pub fn is_timed(&self) -> bool {
        self.due_in_ms.is_some()
    }

    /// Count down by up to `budget` ms, returning what is left of the budget
    /// once this one is due, or `None` if it is still waiting
    pub fn consume(&mut self, budget: Millis) -> Option<Millis> {
        let due = self.due_in_ms.as_mut()?;
        if *due <= budget {
            let left = budget - *due;
            *due = 0;
            Some(left)
        } else {
            *due -= budget;
            None
        }
    }
}

/// What a countdown reported after elapsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    Running,
    /// Crossed the warning threshold on this step
    Warning,
    /// Hit zero on this step
    Expired,
}

/// A mission clock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    remaining_ms: Millis,
    warn_at_ms: Millis,
    warned: bool,
}

impl Countdown {
    /// A countdown of `seconds` that warns at `warn_at_secs`
    pub fn from_secs(seconds: u64, warn_at_secs: u64) -> Self {
        Self {
            remaining_ms: seconds * 1000,
            warn_at_ms: warn_at_secs * 1000,
            warned: seconds <= warn_at_secs,
        }
    }

    pub fn remaining_ms(&self) -> Millis {
        self.remaining_ms
    }

    /// Whole seconds left, rounded up the way a HUD shows them
    pub fn remaining_secs(&self) -> u64 {
        self.remaining_ms.div_ceil(1000)
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_ms == 0
    }

    /// Add bonus time
    pub fn extend_secs(&mut self, seconds: u64) {
        self.remaining_ms += seconds * 1000;
        if self.remaining_ms > self.warn_at_ms {
            self.warned = false;
        }
    }

    /// Run the clock forward
    pub fn elapse(&mut self, elapsed_ms: Millis) -> CountdownEvent {
        if self.is_expired() {
            return CountdownEvent::Running;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
        if self.remaining_ms == 0 {
            CountdownEvent::Expired
        } else if !self.warned && self.remaining_ms <= self.warn_at_ms {
            self.warned = true;
            CountdownEvent::Warning
        } else {
            CountdownEvent::Running
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deferred_consume() {
        let mut pending = Deferred::after("next_room", 1200);
        assert_eq!(pending.consume(500), None);
        assert_eq!(pending.due_in_ms, Some(700));
        assert_eq!(pending.consume(1000), Some(300));
    }

    #[test]
    fn test_manual_deferred_never_ticks() {
        let mut pending = Deferred::on_advance("next_event");
        assert!(!pending.is_timed());
        assert_eq!(pending.consume(u64::MAX), None);
    }

    #[test]
    fn test_countdown_warning_and_expiry() {
        let mut clock = Countdown::from_secs(40, 30);
        assert_eq!(clock.elapse(5_000), CountdownEvent::Running);
        assert_eq!(clock.elapse(5_000), CountdownEvent::Warning);
        assert_eq!(clock.elapse(1_000), CountdownEvent::Running);
        assert_eq!(clock.remaining_secs(), 29);
        assert_eq!(clock.elapse(60_000), CountdownEvent::Expired);
        assert_eq!(clock.elapse(1_000), CountdownEvent::Running);
        assert!(clock.is_expired());
    }

    #[test]
    fn test_countdown_extend() {
        let mut clock = Countdown::from_secs(31, 30);
        assert_eq!(clock.elapse(1_500), CountdownEvent::Warning);
        clock.extend_secs(10);
        assert_eq!(clock.remaining_ms(), 39_500);
        assert_eq!(clock.elapse(10_000), CountdownEvent::Warning);
    }
}
