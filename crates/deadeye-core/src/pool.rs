//! Bounded resource pools (health, mana, shields, alert, time)
//!
//! Every mutation clamps the stored value to `[0, max]`. The raw result is
//! handed back so callers can read overkill before it is lost.

use serde::{Deserialize, Serialize};

/// A bounded integer resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePool {
    current: i64,
    max: i64,
}

impl ResourcePool {
    /// A full pool
    pub fn new(max: i64) -> Self {
        let max = max.max(0);
        Self { current: max, max }
    }

    /// An empty pool
    pub fn empty(max: i64) -> Self {
        Self {
            current: 0,
            max: max.max(0),
        }
    }

    /// A pool starting at `current` (clamped)
    pub fn with_current(current: i64, max: i64) -> Self {
        let mut pool = Self::empty(max);
        pool.set(current);
        pool
    }

    pub fn current(&self) -> i64 {
        self.current
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    /// Apply a signed delta and return the raw, unclamped result
    pub fn apply(&mut self, delta: i64) -> i64 {
        let raw = self.current.saturating_add(delta);
        self.current = raw.clamp(0, self.max);
        raw
    }

    /// Add to the pool, returning how much was actually gained
    pub fn add(&mut self, amount: i64) -> i64 {
        let before = self.current;
        self.apply(amount.max(0));
        self.current - before
    }

    /// Take from the pool, returning the overkill (how far below zero it went)
    pub fn sub(&mut self, amount: i64) -> i64 {
        let raw = self.apply(-amount.max(0));
        (-raw).max(0)
    }

    /// Overwrite the value (clamped)
    pub fn set(&mut self, value: i64) {
        self.current = value.clamp(0, self.max);
    }

    /// Refill to max
    pub fn fill(&mut self) {
        self.current = self.max;
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    pub fn is_full(&self) -> bool {
        self.current == self.max
    }

    /// Current as a fraction of max, 0.0 for a zero-capacity pool
    pub fn fraction(&self) -> f64 {
        if self.max == 0 {
            0.0
        } else {
            self.current as f64 / self.max as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamping() {
        let mut hp = ResourcePool::new(100);
        assert_eq!(hp.add(50), 0);
        assert_eq!(hp.current(), 100);

        assert_eq!(hp.sub(30), 0);
        assert_eq!(hp.current(), 70);
        assert_eq!(hp.add(50), 30);
        assert!(hp.is_full());
    }

    #[test]
    fn test_overkill() {
        let mut hp = ResourcePool::new(3);
        let overkill = hp.sub(6);
        assert_eq!(overkill, 3);
        assert_eq!(hp.current(), 0);
        assert!(hp.is_empty());
    }

    #[test]
    fn test_extreme_delta_saturates() {
        let mut shields = ResourcePool::with_current(50, 100);
        assert_eq!(shields.apply(i64::MAX), i64::MAX);
        assert_eq!(shields.current(), 100);
        assert_eq!(shields.apply(i64::MIN), i64::MIN + 100);
        assert!(shields.is_empty());
    }

    #[test]
    fn test_raw_apply() {
        let mut alert = ResourcePool::empty(100);
        assert_eq!(alert.apply(95), 95);
        assert_eq!(alert.apply(15), 110);
        assert_eq!(alert.current(), 100);
        assert_eq!(alert.apply(-200), -100);
        assert_eq!(alert.current(), 0);
    }

    #[test]
    fn test_invariant_under_random_mutation() {
        let mut rng = crate::GameRng::new(5);
        let mut pool = ResourcePool::with_current(40, 80);
        for _ in 0..500 {
            pool.apply(rng.range_i64(-60, 60));
            assert!(pool.current() >= 0 && pool.current() <= pool.max());
        }
    }

    #[test]
    fn test_fraction() {
        assert_eq!(ResourcePool::with_current(25, 100).fraction(), 0.25);
        assert_eq!(ResourcePool::new(0).fraction(), 0.0);
    }
}
