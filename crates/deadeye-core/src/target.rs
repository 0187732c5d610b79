//! Target numbers, target selection and sequences
//!
//! Opponents are bound to board numbers. While several are targetable at
//! once no two share a number; assignment retries a bounded number of times
//! and then scans for a free number, so with at most 20 targets it always
//! succeeds.

use crate::{Dart, GameRng};
use serde::{Deserialize, Serialize};

/// Lowest numbered bed
pub const MIN_NUMBER: u8 = 1;
/// Highest numbered bed
pub const MAX_NUMBER: u8 = 20;
/// Random draws before falling back to a scan
pub const MAX_ASSIGN_ATTEMPTS: usize = 50;

/// A uniformly random board number, 1..=20
pub fn random_number(rng: &mut GameRng) -> u8 {
    rng.index(usize::from(MAX_NUMBER)) as u8 + MIN_NUMBER
}

/// Draw a board number not in `used`
///
/// Tries random draws first, then scans for a free number starting from the
/// last draw. Only when all twenty numbers are taken does it hand back a
/// colliding number.
pub fn assign_unique(rng: &mut GameRng, used: &[u8]) -> u8 {
    let mut candidate = random_number(rng);
    for _ in 1..MAX_ASSIGN_ATTEMPTS {
        if !used.contains(&candidate) {
            return candidate;
        }
        candidate = random_number(rng);
    }
    if !used.contains(&candidate) {
        return candidate;
    }
    (0..MAX_NUMBER)
        .map(|offset| (candidate - MIN_NUMBER + offset) % MAX_NUMBER + MIN_NUMBER)
        .find(|n| !used.contains(n))
        .unwrap_or(candidate)
}

/// `count` distinct board numbers
pub fn distinct_numbers(rng: &mut GameRng, count: usize) -> Vec<u8> {
    let mut numbers = Vec::with_capacity(count);
    for _ in 0..count.min(usize::from(MAX_NUMBER)) {
        let n = assign_unique(rng, &numbers);
        numbers.push(n);
    }
    numbers
}

/// Something a dart can be aimed at
pub trait Targetable {
    /// The number currently bound to this target
    fn target_number(&self) -> Option<u8>;

    /// A number that hits this target critically
    fn weak_spot(&self) -> Option<u8> {
        None
    }

    /// Still in play
    fn is_targetable(&self) -> bool;
}

/// How a dart was matched to a target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Hit the target's bound number
    Exact(usize),
    /// Hit the target's weak spot
    WeakSpot(usize),
    /// Within tolerance of the bound number
    Near(usize),
    /// Nothing matched; the first targetable one takes it
    Fallback(usize),
}

impl Selection {
    pub fn index(&self) -> usize {
        match *self {
            Selection::Exact(i) | Selection::WeakSpot(i) | Selection::Near(i) | Selection::Fallback(i) => i,
        }
    }

    /// Whether the dart was aimed at this target at all
    pub fn is_specific(&self) -> bool {
        !matches!(self, Selection::Fallback(_))
    }
}

/// Decide which target a dart affects
///
/// Exact number, then weak spot, then the closest bound number within
/// `tolerance` (numbered beds only), then the first targetable one.
/// Returns `None` when nothing is targetable.
pub fn select_target<T: Targetable>(dart: &Dart, targets: &[T], tolerance: u8) -> Option<Selection> {
    let live = || targets.iter().enumerate().filter(|(_, t)| t.is_targetable());

    let number = dart.number();
    if let Some(n) = number {
        if let Some((i, _)) = live().find(|(_, t)| t.target_number() == Some(n)) {
            return Some(Selection::Exact(i));
        }
        if let Some((i, _)) = live().find(|(_, t)| t.weak_spot() == Some(n)) {
            return Some(Selection::WeakSpot(i));
        }
        let nearest = live()
            .filter_map(|(i, t)| t.target_number().map(|bound| (i, bound.abs_diff(n))))
            .filter(|&(_, distance)| distance <= tolerance)
            .min_by_key(|&(_, distance)| distance);
        if let Some((i, _)) = nearest {
            return Some(Selection::Near(i));
        }
    }
    live().next().map(|(i, _)| Selection::Fallback(i))
}

/// Result of feeding a number to a [`Sequence`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceStep {
    /// Correct number; `progress` of `len` done
    Advanced { progress: usize, len: usize },
    /// Correct number and that was the last one
    Completed,
    /// Not the expected number; `expected` is still awaited
    Wrong { expected: u8 },
}

/// Numbers that must be hit in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    numbers: Vec<u8>,
    progress: usize,
}

impl Sequence {
    pub fn new(numbers: Vec<u8>) -> Self {
        Self {
            numbers,
            progress: 0,
        }
    }

    /// A sequence of `len` distinct random numbers
    pub fn random(rng: &mut GameRng, len: usize) -> Self {
        Self::new(distinct_numbers(rng, len))
    }

    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn progress(&self) -> usize {
        self.progress
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    /// The number awaited next
    pub fn expected(&self) -> Option<u8> {
        self.numbers.get(self.progress).copied()
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= self.numbers.len()
    }

    /// Feed a hit number
    pub fn hit(&mut self, number: Option<u8>) -> SequenceStep {
        let Some(expected) = self.expected() else {
            return SequenceStep::Completed;
        };
        if number != Some(expected) {
            return SequenceStep::Wrong { expected };
        }
        self.progress += 1;
        if self.is_complete() {
            SequenceStep::Completed
        } else {
            SequenceStep::Advanced {
                progress: self.progress,
                len: self.numbers.len(),
            }
        }
    }

    /// Jump straight to the end
    pub fn complete(&mut self) {
        self.progress = self.numbers.len();
    }
}
