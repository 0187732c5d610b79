//! Mission catalogue and crew roles

use deadeye_core::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Seconds left when the escape warning goes off
pub const WARNING_SECS: u64 = 30;

/// Crew role, fixed by seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Doubles buy time and hack twice
    Hacker,
    /// Triples finish the objective outright
    Infiltrator,
    /// Bullseyes blow the diamond cases open
    Demolitions,
}

impl Role {
    /// Roles in seat order
    pub const SEATS: [Role; 3] = [Role::Hacker, Role::Infiltrator, Role::Demolitions];

    pub fn name(&self) -> &'static str {
        match self {
            Role::Hacker => "HACKER",
            Role::Infiltrator => "INFILTRATOR",
            Role::Demolitions => "DEMOLITIONS",
        }
    }

    pub fn ability(&self) -> &'static str {
        match self {
            Role::Hacker => "System Bypass",
            Role::Infiltrator => "Stealth Mode",
            Role::Demolitions => "Explosive Charge",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mission identifiers, in unlock order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionId {
    #[default]
    Vault,
    DataBreach,
    Diamond,
    Casino,
    BigScore,
}

impl MissionId {
    pub const ORDER: [MissionId; 5] = [
        MissionId::Vault,
        MissionId::DataBreach,
        MissionId::Diamond,
        MissionId::Casino,
        MissionId::BigScore,
    ];

    /// Key used in saved progress
    pub fn as_str(&self) -> &'static str {
        match self {
            MissionId::Vault => "vault",
            MissionId::DataBreach => "databreach",
            MissionId::Diamond => "diamond",
            MissionId::Casino => "casino",
            MissionId::BigScore => "bigscore",
        }
    }

    /// The mission this one unlocks
    pub fn next(&self) -> Option<MissionId> {
        let index = Self::ORDER.iter().position(|m| m == self)?;
        Self::ORDER.get(index + 1).copied()
    }

    pub fn mission(&self) -> &'static Mission {
        match self {
            MissionId::Vault => &VAULT,
            MissionId::DataBreach => &DATA_BREACH,
            MissionId::Diamond => &DIAMOND,
            MissionId::Casino => &CASINO,
            MissionId::BigScore => &BIG_SCORE,
        }
    }
}

impl fmt::Display for MissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ORDER
            .iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| Error::UnknownStage(s.to_string()))
    }
}

/// What one leg of a mission asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegKind {
    /// Hit a random combination in order
    Combination { len: usize },
    /// Hack odd-numbered servers
    Servers { goal: i64 },
    /// Steal from the 15-20 cases
    Diamonds { goal: i64 },
    /// Sevens, double sevens and triples
    LuckySevens { goal: i64 },
    /// Final job, phase 1: a fixed combination
    FinalCombination { numbers: [u8; 3] },
    /// Final job, phase 2
    FinalServers { goal: i64 },
    /// Final job, phase 3
    FinalDiamonds { goal: i64 },
}

impl LegKind {
    /// Alert raised by a wrong dart
    pub fn penalty(&self) -> i64 {
        match self {
            LegKind::Combination { .. } | LegKind::FinalCombination { .. } => 10,
            LegKind::Servers { .. } => 15,
            LegKind::Diamonds { .. } => 5,
            LegKind::LuckySevens { .. } | LegKind::FinalDiamonds { .. } => 8,
            LegKind::FinalServers { .. } => 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mission {
    pub id: MissionId,
    pub name: &'static str,
    pub code: &'static str,
    pub time_limit_secs: u64,
    pub difficulty: u32,
    pub story: &'static str,
    pub objectives: &'static [&'static str],
    pub legs: &'static [LegKind],
    pub tips: &'static [&'static str],
}

impl Mission {
    /// Reputation for a successful run
    pub fn reward(&self, seconds_left: u64, alert: i64) -> u64 {
        let base = u64::from(self.difficulty) * 100;
        let time_bonus = if seconds_left > 60 { 100 } else { 50 };
        let alert_bonus = match alert {
            a if a < 30 => 100,
            a if a < 60 => 50,
            _ => 0,
        };
        base + time_bonus + alert_bonus
    }
}

pub static VAULT: Mission = Mission {
    id: MissionId::Vault,
    name: "THE VAULT JOB",
    code: "MISSION 01",
    time_limit_secs: 180,
    difficulty: 1,
    story: "The Central City Bank vault contains millions in untraceable credits. \
            The security system is cracked and the combination narrowed down to three \
            numbers. Hit them in sequence before the guards complete their patrol.",
    objectives: &[
        "Crack the vault combination (3 specific numbers in sequence)",
        "Each crew member takes turns throwing",
        "Wrong numbers increase alert level by 10%",
        "Complete sequence before timer expires",
    ],
    legs: &[LegKind::Combination { len: 3 }],
    tips: &[
        "Work together - communicate which numbers you're aiming for!",
        "Hackers get bonus time from doubles - use it wisely!",
        "Watch your alert level - too many misses and it's over!",
    ],
};

pub static DATA_BREACH: Mission = Mission {
    id: MissionId::DataBreach,
    name: "DATA BREACH",
    code: "MISSION 02",
    time_limit_secs: 240,
    difficulty: 2,
    story: "MegaCorp's mainframe holds the encryption keys to the city's financial \
            network. Hack 12 vulnerable servers, all marked with odd numbers. Even \
            servers have firewalls that trigger lockdown.",
    objectives: &[
        "Hack 12 servers by hitting odd numbers only",
        "Even numbers trigger firewall (+15% alert)",
        "Hackers: Doubles on odd numbers count as 2 servers",
        "Infiltrators: Triples instantly complete the objective",
    ],
    legs: &[LegKind::Servers { goal: 12 }],
    tips: &[
        "Odd numbers only! Even = bad news!",
        "Infiltrator triples are your ace in the hole",
        "Hackers can double your progress with... doubles!",
    ],
};

pub static DIAMOND: Mission = Mission {
    id: MissionId::Diamond,
    name: "DIAMOND DISTRICT",
    code: "MISSION 03",
    time_limit_secs: 300,
    difficulty: 3,
    story: "The Diamond District vault houses the rarest gems in the city. Steal \
            $50,000 worth from the high-security cases marked 15-20. Lower cases are \
            decoys rigged with alarms.",
    objectives: &[
        "Steal $50,000 worth of diamonds",
        "Hit segments 15-20 only (value x $100)",
        "Segments below 15 trigger alarms (+5% alert)",
        "Triples in the 15-20 zone earn bonus $500",
        "Bullseye: Explosive bonus $2000 for Demolitions!",
    ],
    legs: &[LegKind::Diamonds { goal: 50_000 }],
    tips: &[
        "High numbers = high value! Aim for 15-20!",
        "Triples are worth the risk for that bonus",
        "Demolitions bullseye = jackpot!",
    ],
};

pub static CASINO: Mission = Mission {
    id: MissionId::Casino,
    name: "CASINO ROYALE",
    code: "MISSION 04",
    time_limit_secs: 300,
    difficulty: 4,
    story: "The Neon Palace Casino runs a rigged operation and the crew is here to \
            beat the house at the Lucky Seven table. The security AI is watching.",
    objectives: &[
        "Score 30 successful hits on target numbers",
        "Singles on 7 count as 1 success",
        "Doubles on 7 count as 2 successes",
        "Any triple counts as 3 successes",
        "Wrong numbers increase alert by 8%",
    ],
    legs: &[LegKind::LuckySevens { goal: 30 }],
    tips: &[
        "Sevens and doubles of seven are your friends",
        "Triples on ANYTHING = 3 successes!",
        "Mix your targets to avoid detection patterns",
    ],
};

pub static BIG_SCORE: Mission = Mission {
    id: MissionId::BigScore,
    name: "THE BIG SCORE",
    code: "MISSION 05",
    time_limit_secs: 360,
    difficulty: 5,
    story: "The heist of a lifetime. The Platinum Reserve sits behind three layers: \
            the vault combination, the server firewall and the diamond laser grid.",
    objectives: &[
        "Phase 1: Hit sequence 7, 14, 20 in order",
        "Phase 2: Hit 8 odd numbers (server hack)",
        "Phase 3: Accumulate $30,000 from segments 15-20",
        "Complete all phases before time expires",
        "Alert level carries between phases!",
    ],
    legs: &[
        LegKind::FinalCombination { numbers: [7, 14, 20] },
        LegKind::FinalServers { goal: 8 },
        LegKind::FinalDiamonds { goal: 30_000 },
    ],
    tips: &[
        "This is everything you've learned combined!",
        "Stay calm and communicate with your crew",
        "Every role matters - work together!",
        "Don't rush - precision over speed!",
    ],
};
