//! Dart events and the normalized dart they classify into
//!
//! The relay reports `(segment, multiplier, value)`. Segment 25 and segment 0
//! both mean "bull"; the inner (double) bull is always `multiplier == 2`.
//! Rules never look at raw segments, only at [`Bed`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Segment number the relay uses for the bull
pub const BULL_SEGMENT: u8 = 25;

/// A dart exactly as received from the relay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DartEvent {
    pub segment: u8,
    pub multiplier: u8,
    pub value: u32,
}

impl DartEvent {
    /// Create an event with an explicit value
    pub fn new(segment: u8, multiplier: u8, value: u32) -> Self {
        Self {
            segment,
            multiplier,
            value,
        }
    }

    /// Single of a numbered bed
    pub fn single(number: u8) -> Self {
        Self::new(number, 1, u32::from(number))
    }

    /// Double of a numbered bed
    pub fn double(number: u8) -> Self {
        Self::new(number, 2, u32::from(number) * 2)
    }

    /// Triple of a numbered bed
    pub fn triple(number: u8) -> Self {
        Self::new(number, 3, u32::from(number) * 3)
    }

    /// Outer bull
    pub fn bull() -> Self {
        Self::new(BULL_SEGMENT, 1, 25)
    }

    /// Inner bull
    pub fn double_bull() -> Self {
        Self::new(BULL_SEGMENT, 2, 50)
    }

    /// Normalize, or `None` for out-of-domain input
    pub fn classify(&self) -> Option<Dart> {
        Dart::try_from(*self).ok()
    }
}

/// Which bed of the board a dart landed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bed {
    /// Numbered segment 1..=20
    Number(u8),
    /// Bullseye; `double` is the inner bull
    Bull { double: bool },
}

/// A validated dart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dart {
    pub bed: Bed,
    pub multiplier: u8,
    pub value: u32,
}

impl Dart {
    /// The numbered segment, if any
    pub fn number(&self) -> Option<u8> {
        match self.bed {
            Bed::Number(n) => Some(n),
            Bed::Bull { .. } => None,
        }
    }

    /// Whether this dart hit numbered segment `n`
    pub fn hits(&self, n: u8) -> bool {
        self.number() == Some(n)
    }

    pub fn is_bull(&self) -> bool {
        matches!(self.bed, Bed::Bull { .. })
    }

    pub fn is_double_bull(&self) -> bool {
        matches!(self.bed, Bed::Bull { double: true })
    }

    pub fn is_double(&self) -> bool {
        self.multiplier == 2
    }

    pub fn is_triple(&self) -> bool {
        self.multiplier == 3
    }

    /// The raw segment as the relay would report it (bull = 25)
    pub fn segment(&self) -> u8 {
        self.number().unwrap_or(BULL_SEGMENT)
    }
}

impl TryFrom<DartEvent> for Dart {
    type Error = Error;

    fn try_from(event: DartEvent) -> Result<Self> {
        let invalid = || Error::InvalidDart {
            segment: event.segment,
            multiplier: event.multiplier,
        };
        if !(1..=3).contains(&event.multiplier) {
            return Err(invalid());
        }
        let bed = match event.segment {
            1..=20 => Bed::Number(event.segment),
            0 | BULL_SEGMENT if event.multiplier < 3 => Bed::Bull {
                double: event.multiplier == 2,
            },
            _ => return Err(invalid()),
        };
        Ok(Dart {
            bed,
            multiplier: event.multiplier,
            value: event.value,
        })
    }
}

impl fmt::Display for Dart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bed {
            Bed::Bull { double: true } => write!(f, "DOUBLE BULL"),
            Bed::Bull { double: false } => write!(f, "BULL"),
            Bed::Number(n) => match self.multiplier {
                3 => write!(f, "T{}", n),
                2 => write!(f, "D{}", n),
                _ => write!(f, "{}", n),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_beds() {
        let dart = DartEvent::triple(20).classify().unwrap();
        assert_eq!(dart.bed, Bed::Number(20));
        assert_eq!(dart.value, 60);
        assert!(dart.is_triple());
        assert!(dart.hits(20));
        assert_eq!(dart.to_string(), "T20");
    }

    #[test]
    fn test_bull_representation() {
        let outer = DartEvent::bull().classify().unwrap();
        assert_eq!(outer.bed, Bed::Bull { double: false });

        let inner = DartEvent::double_bull().classify().unwrap();
        assert!(inner.is_double_bull());

        // Segment 0 is the relay's other spelling of bull
        let zero = DartEvent::new(0, 2, 50).classify().unwrap();
        assert!(zero.is_double_bull());
        assert_eq!(zero.segment(), BULL_SEGMENT);
        assert_eq!(zero.number(), None);
    }

    #[test]
    fn test_invalid_events() {
        assert!(DartEvent::new(21, 1, 21).classify().is_none());
        assert!(DartEvent::new(5, 0, 0).classify().is_none());
        assert!(DartEvent::new(5, 4, 20).classify().is_none());
        assert!(DartEvent::new(25, 3, 75).classify().is_none());
        assert!(matches!(
            Dart::try_from(DartEvent::new(30, 1, 30)),
            Err(Error::InvalidDart { segment: 30, .. })
        ));
    }

    #[test]
    fn test_event_from_ron() {
        let event: DartEvent = ron::from_str("(segment: 7, multiplier: 2, value: 14)").unwrap();
        assert_eq!(event, DartEvent::double(7));
    }
}
