//! Hostiles, force fields and the alert cycle

use deadeye_core::{ResourcePool, Targetable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Steps from spawn to the station
pub const STEPS_TO_STATION: f64 = 6.0;

/// Where force fields can be placed, in steps from spawn
pub const FIELD_NEAREST_STEP: f64 = 1.6;
pub const FIELD_SPAN_STEPS: f64 = 3.25;
/// How close a hostile has to be for a force field to catch it
pub const FIELD_REACH_STEPS: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostileKind {
    Scout,
    Fighter,
    Frigate,
    /// Two numbers, hit in order
    Dreadnought,
    /// Steals an armory item instead of hitting shields
    HackerDrone,
}

impl HostileKind {
    pub fn name(&self) -> &'static str {
        match self {
            HostileKind::Scout => "Scout",
            HostileKind::Fighter => "Fighter",
            HostileKind::Frigate => "Frigate",
            HostileKind::Dreadnought => "Dreadnought",
            HostileKind::HackerDrone => "Hacker Drone",
        }
    }

    /// Steps advanced per round
    pub fn speed(&self) -> f64 {
        match self {
            HostileKind::Scout | HostileKind::Frigate => 1.0,
            HostileKind::Fighter | HostileKind::HackerDrone => 2.0,
            HostileKind::Dreadnought => 0.5,
        }
    }

    /// Health before the round scaling is applied
    ///
    /// `base` is the rolled value `ceil(r * (1 + round / 5))`.
    pub fn hp_for(&self, base: i64, round: u32) -> i64 {
        let hp = match self {
            HostileKind::Scout => base.min(6),
            HostileKind::Fighter => (base - 1).min(3).max(1),
            HostileKind::Frigate => (base + 2 + i64::from(round / 12)).min(9),
            HostileKind::HackerDrone => base.min(1),
            HostileKind::Dreadnought => 1,
        };
        hp.max(1)
    }
}

impl fmt::Display for HostileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hostile {
    pub id: u64,
    pub kind: HostileKind,
    /// Bound numbers; only dreadnoughts have more than one
    pub numbers: Vec<u8>,
    /// Index of the number to hit next
    pub next: usize,
    pub hp: ResourcePool,
    /// Steps travelled, 0 at spawn
    pub position: f64,
    /// Lateral placement in `[0, 1)` for presenters
    pub lane: f64,
    pub stunned: bool,
}

impl Hostile {
    pub fn is_alive(&self) -> bool {
        !self.hp.is_empty()
    }

    pub fn has_arrived(&self) -> bool {
        self.position >= STEPS_TO_STATION
    }

    /// Number the next hit has to land on
    pub fn current_number(&self) -> Option<u8> {
        self.numbers.get(self.next).copied()
    }

    /// Move one hit along a dreadnought's sequence; true when it is done
    pub fn advance_sequence(&mut self) -> bool {
        self.next += 1;
        self.next >= self.numbers.len()
    }
}

impl Targetable for Hostile {
    fn target_number(&self) -> Option<u8> {
        self.current_number()
    }

    fn is_targetable(&self) -> bool {
        self.is_alive() && !self.has_arrived()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceField {
    /// Distance from spawn, in steps
    pub at: f64,
    pub strength: u32,
}

impl ForceField {
    pub fn catches(&self, hostile: &Hostile) -> bool {
        self.strength > 0 && (hostile.position - self.at).abs() < FIELD_REACH_STEPS
    }
}

/// Threat level, cycling every `alert_cycle` rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertLevel {
    Warning,
    RedAlert,
    DeEscalating,
    AllClear,
}

impl AlertLevel {
    pub fn for_round(round: u32, cycle: u32) -> Self {
        match round % cycle.max(1) {
            3..=5 => AlertLevel::RedAlert,
            6..=8 => AlertLevel::DeEscalating,
            9..=11 => AlertLevel::AllClear,
            _ => AlertLevel::Warning,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AlertLevel::Warning => "WARNING",
            AlertLevel::RedAlert => "RED ALERT",
            AlertLevel::DeEscalating => "DE-ESCALATING",
            AlertLevel::AllClear => "ALL CLEAR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_cycle() {
        let levels: Vec<_> = (1..=12).map(|r| AlertLevel::for_round(r, 12)).collect();
        assert_eq!(levels[0], AlertLevel::Warning);
        assert_eq!(levels[2], AlertLevel::RedAlert);
        assert_eq!(levels[4], AlertLevel::RedAlert);
        assert_eq!(levels[5], AlertLevel::DeEscalating);
        assert_eq!(levels[8], AlertLevel::AllClear);
        assert_eq!(levels[11], AlertLevel::Warning);
        assert_eq!(AlertLevel::for_round(15, 12), AlertLevel::RedAlert);
    }

    #[test]
    fn test_hp_caps() {
        assert_eq!(HostileKind::Scout.hp_for(9, 20), 6);
        assert_eq!(HostileKind::Fighter.hp_for(1, 6), 1);
        assert_eq!(HostileKind::Fighter.hp_for(9, 20), 3);
        assert_eq!(HostileKind::Frigate.hp_for(1, 12), 4);
        assert_eq!(HostileKind::Frigate.hp_for(8, 30), 9);
        assert_eq!(HostileKind::HackerDrone.hp_for(4, 10), 1);
        // A zero roll still leaves something to shoot
        assert_eq!(HostileKind::Scout.hp_for(0, 1), 1);
    }

    #[test]
    fn test_force_field_reach() {
        let field = ForceField { at: 2.0, strength: 3 };
        let mut hostile = Hostile {
            id: 1,
            kind: HostileKind::Scout,
            numbers: vec![4],
            next: 0,
            hp: ResourcePool::new(2),
            position: 1.0,
            lane: 0.5,
            stunned: false,
        };
        assert!(!field.catches(&hostile));
        hostile.position = 2.0;
        assert!(field.catches(&hostile));
        let spent = ForceField { at: 2.0, strength: 0 };
        assert!(!spent.catches(&hostile));
    }
}
