//! DeadEye Games - The five dart party games
//!
//! Each game is a [`deadeye_core::Game`]: a rule table plus a state machine
//! that a [`deadeye_core::Session`] drives one dart at a time.
//!
//! - [`ZombieSlayer`]: hit the zombie's number before the horde gets through
//! - [`DungeonCrawl`]: a party of heroes clears three floors of monsters
//! - [`HeistCrew`]: a three-person crew works a five-mission campaign
//! - [`StationSiege`]: seeded tower defence, shareable by seed code
//! - [`DadBodOlympics`]: five silly events with medals and awards
//!
//! ## Example
//!
//! ```
//! use deadeye_core::{DartEvent, Session};
//! use deadeye_games::{ZombieConfig, ZombieSlayer};
//!
//! let mut session: Session<ZombieSlayer> = Session::new(42);
//! session.start(ZombieConfig::default()).unwrap();
//! let target = session.game().unwrap().targets()[0];
//! session.handle_dart_throw(DartEvent::single(target));
//! assert_eq!(session.game().unwrap().kills(), 1);
//! ```

mod dad_bod;
mod dungeon;
mod heist;
mod siege;
mod zombie;

pub use dad_bod::{
    Award, Call, Dad, DadBodConfig, DadBodOlympics, DadBodStep, DadStats, DartScore, Event,
    FinalResults, Medal, Placing, Scorecard, Scoring, Standing, DARTS_PER_PLAYER, EVENTS,
    MIN_PLAYERS, PUNCHLINE_TOTAL, RESULTS_DELAY_MS,
};
pub use dungeon::{
    BossKind, Buffs, DungeonConfig, DungeonCrawl, DungeonStep, DungeonSummary, Hero, HeroClass,
    HeroKind, HeroReport, HeroStats, Monster, MonsterKind, PowerUp, Spell, SpellEffect, BOSSES,
    FLOORS, FLOOR_MONSTERS, HEROES, POWER_UPS, ROOMS_PER_FLOOR, ROOM_CLEAR_DELAY_MS,
};
pub use heist::{
    CrewMember, HeistConfig, HeistCrew, HeistReport, HeistStep, Leg, LegKind, Mission, MissionId,
    Role, CREW_SIZE, MAX_ALERT,
};
pub use siege::{
    AlertLevel, Armory, ForceField, Hostile, HostileKind, Item, SiegeConfig, SiegeEvent,
    SiegeEventKind, SiegeStep, SiegeSummary, StationSiege, STEPS_TO_STATION,
};
pub use zombie::{Zombie, ZombieConfig, ZombieSlayer, ZombieStep, MAX_ZOMBIES};
