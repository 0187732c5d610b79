//! Station Siege
//!
//! Hostiles close on the station a few steps per round, each bound to a
//! number drawn from a shuffled pool. A round is three energy cells (darts).
//! Items in the armory fire when their number is hit. When the shields
//! reach zero the station is lost.
//!
//! Every roll comes from the session RNG in a fixed order, so two players
//! on the same seed who throw the same darts play the same siege.

mod armory;
mod hostile;

pub use armory::{Armory, Item};
pub use hostile::{AlertLevel, ForceField, Hostile, HostileKind, STEPS_TO_STATION};

use hostile::{FIELD_NEAREST_STEP, FIELD_SPAN_STEPS};

use chrono::{DateTime, Utc};
use deadeye_core::{
    select_target, Ctx, Cue, Dart, Game, Millis, ResourcePool, Result, RuleTable, ScoreEntry,
    Selection, Tone, Transition,
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Pause after the last energy cell before the round closes
pub const ROUND_END_DELAY_MS: Millis = 500;
/// Pause between rounds
pub const NEXT_ROUND_DELAY_MS: Millis = 1000;
/// Items stocked before the first dart
pub const STARTING_ITEMS: usize = 2;
pub const DREADNOUGHT_BONUS: i64 = 6;
pub const DREADNOUGHT_ITEMS: usize = 3;
/// Chance that any kill drops an item
pub const DROP_CHANCE: f64 = 0.4;

/// Station Siege settings
///
/// # Example
///
/// ```
/// use deadeye_games::SiegeConfig;
///
/// let config = SiegeConfig::default().with_player("  ").with_shields(40);
/// assert_eq!(config.player(), "Player");
/// assert_eq!(config.shields(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiegeConfig {
    player: String,
    shields: i64,
    max_shields: i64,
    energy_per_round: u32,
    armory_capacity: usize,
    max_hostiles: usize,
    alert_cycle: u32,
}

impl SiegeConfig {
    /// Name used on the leaderboard; blank means "Player"
    pub fn with_player(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        let name = name.trim();
        self.player = if name.is_empty() {
            "Player".to_string()
        } else {
            name.to_string()
        };
        self
    }

    /// Starting shields, clamped to `[1, max_shields]`
    pub fn with_shields(mut self, n: i64) -> Self {
        self.shields = n.clamp(1, self.max_shields.max(1));
        self
    }

    /// Energy cells per round, clamped to `[1, MAX_DARTS_PER_TURN]`
    pub fn with_energy_per_round(mut self, n: u32) -> Self {
        self.energy_per_round = n.clamp(1, deadeye_core::MAX_DARTS_PER_TURN);
        self
    }

    /// Hostiles on screen at once, clamped to `[1, 20]`
    pub fn with_max_hostiles(mut self, n: usize) -> Self {
        self.max_hostiles = n.clamp(1, 20);
        self
    }

    /// Re-clamp every field (for values that came from a file)
    pub fn normalized(mut self) -> Self {
        self.max_shields = self.max_shields.max(1);
        self.armory_capacity = self.armory_capacity.clamp(1, 20);
        self.alert_cycle = self.alert_cycle.max(1);
        let (player, shields, energy, hostiles) = (
            self.player.clone(),
            self.shields,
            self.energy_per_round,
            self.max_hostiles,
        );
        self.with_player(player)
            .with_shields(shields)
            .with_energy_per_round(energy)
            .with_max_hostiles(hostiles)
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn shields(&self) -> i64 {
        self.shields
    }

    pub fn max_shields(&self) -> i64 {
        self.max_shields
    }

    pub fn energy_per_round(&self) -> u32 {
        self.energy_per_round
    }

    pub fn armory_capacity(&self) -> usize {
        self.armory_capacity
    }

    pub fn max_hostiles(&self) -> usize {
        self.max_hostiles
    }

    pub fn alert_cycle(&self) -> u32 {
        self.alert_cycle
    }
}

impl Default for SiegeConfig {
    fn default() -> Self {
        Self {
            player: "Player".to_string(),
            shields: 5,
            max_shields: 10,
            energy_per_round: 3,
            armory_capacity: 6,
            max_hostiles: 8,
            alert_cycle: 12,
        }
    }
}

/// Something worth keeping in the game log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SiegeEventKind {
    GameStart { seed: u32 },
    HostileDestroyed { hostile: HostileKind, score: i64 },
    ShieldsHit { shields: i64 },
    ItemStolen { item: Item },
    ItemActivated { item: Item, number: u8 },
    GameOver { final_score: i64, rounds_played: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiegeEvent {
    pub time_ms: Millis,
    pub round: u32,
    #[serde(flatten)]
    pub kind: SiegeEventKind,
}

/// End-of-game report, shareable alongside the seed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiegeSummary {
    pub seed: u32,
    pub final_score: i64,
    pub rounds_played: u32,
    pub hostiles_destroyed: u32,
    pub duration_ms: Millis,
    pub events: Vec<SiegeEvent>,
    pub player: String,
    pub timestamp: DateTime<Utc>,
}

impl SiegeSummary {
    /// The leaderboard line for this game
    pub fn score_entry(&self) -> ScoreEntry {
        ScoreEntry::new(self.player.clone(), self.final_score, self.rounds_played)
            .with_seed(self.seed)
            .with_timestamp(self.timestamp)
    }
}

/// What the rule table sees for one dart
#[derive(Debug, Clone, Copy)]
struct Aim {
    dart: Dart,
    plasma: bool,
    item: Option<Item>,
    hostile: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shot {
    Burst { damage: i64 },
    Laser { damage: i64 },
    Activate { number: u8, item: Item, multiplier: u8 },
    Strike { hostile: usize, multiplier: u8 },
    Miss,
}

fn bull_power(dart: &Dart) -> i64 {
    if dart.is_double_bull() {
        2
    } else {
        1
    }
}

fn siege_rules() -> RuleTable<Aim, Shot> {
    RuleTable::<Aim, Shot>::new(|_| Shot::Miss)
        .rule(
            "plasma burst",
            |aim| aim.dart.is_bull() && aim.plasma,
            |aim| Shot::Burst {
                damage: bull_power(&aim.dart) * 3,
            },
        )
        .rule(
            "laser",
            |aim| aim.dart.is_bull(),
            |aim| Shot::Laser {
                damage: bull_power(&aim.dart),
            },
        )
        .rule(
            "armory",
            |aim| aim.item.is_some(),
            |aim| match (aim.dart.number(), aim.item) {
                (Some(number), Some(item)) => Shot::Activate {
                    number,
                    item,
                    multiplier: aim.dart.multiplier,
                },
                _ => Shot::Miss,
            },
        )
        .rule(
            "hostile",
            |aim| aim.hostile.is_some(),
            |aim| {
                aim.hostile.map_or(Shot::Miss, |hostile| Shot::Strike {
                    hostile,
                    multiplier: aim.dart.multiplier,
                })
            },
        )
}

/// Transitions Station Siege schedules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiegeStep {
    /// Energy is spent; close the round
    EndRound,
    /// Open the next round: hostiles advance and spawn
    StartRound,
}

/// Station Siege game state
#[derive(Debug, Clone)]
pub struct StationSiege {
    config: SiegeConfig,
    seed: u32,
    round: u32,
    score: i64,
    shields: ResourcePool,
    energy: u32,
    pool: VecDeque<u8>,
    hostiles: Vec<Hostile>,
    armory: Armory,
    fields: Vec<ForceField>,
    plasma: bool,
    emp_rounds: u32,
    next_id: u64,
    destroyed: u32,
    events: Vec<SiegeEvent>,
    summary: Option<SiegeSummary>,
    rules: RuleTable<Aim, Shot>,
}

impl StationSiege {
    pub fn config(&self) -> &SiegeConfig {
        &self.config
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn shields(&self) -> ResourcePool {
        self.shields
    }

    /// Energy cells left this round
    pub fn energy(&self) -> u32 {
        self.energy
    }

    pub fn hostiles(&self) -> &[Hostile] {
        &self.hostiles
    }

    pub fn armory(&self) -> &Armory {
        &self.armory
    }

    pub fn force_fields(&self) -> &[ForceField] {
        &self.fields
    }

    pub fn plasma_charged(&self) -> bool {
        self.plasma
    }

    /// Rounds of EMP left (0 when inactive)
    pub fn emp_rounds_left(&self) -> u32 {
        self.emp_rounds
    }

    pub fn alert(&self) -> AlertLevel {
        AlertLevel::for_round(self.round, self.config.alert_cycle)
    }

    /// Numbers not bound to a hostile, in draw order
    pub fn number_pool(&self) -> impl Iterator<Item = u8> + '_ {
        self.pool.iter().copied()
    }

    pub fn hostiles_destroyed(&self) -> u32 {
        self.destroyed
    }

    pub fn events(&self) -> &[SiegeEvent] {
        &self.events
    }

    /// Set once the station falls
    pub fn summary(&self) -> Option<&SiegeSummary> {
        self.summary.as_ref()
    }

    fn record(&mut self, kind: SiegeEventKind, ctx: &Ctx<'_, SiegeStep>) {
        self.events.push(SiegeEvent {
            time_ms: ctx.elapsed_ms(),
            round: self.round,
            kind,
        });
    }

    /// Take the next pool number that no armory item is sitting on
    fn draw_number(&mut self) -> Option<u8> {
        let index = self
            .pool
            .iter()
            .position(|n| !self.armory.contains(*n))?;
        self.pool.remove(index)
    }

    fn release(&mut self, numbers: &[u8]) {
        for &n in numbers {
            if !self.pool.contains(&n) {
                self.pool.push_back(n);
            }
        }
    }

    fn start_round(&mut self, ctx: &mut Ctx<'_, SiegeStep>) {
        self.energy = self.config.energy_per_round;

        if self.emp_rounds > 0 {
            self.emp_rounds -= 1;
            if self.emp_rounds == 0 {
                ctx.announce("EMP EFFECT ENDED");
                ctx.log(Tone::Info, "EMP effect ended");
            }
        }

        self.advance_hostiles(ctx);
        if ctx.is_over() {
            return;
        }
        self.spawn(ctx);
        self.update_alert(ctx);

        log::debug!(
            "siege: round {} started with {} hostiles",
            self.round,
            self.hostiles.len()
        );
        ctx.transition(Transition::RoundStarted { round: self.round });
        ctx.stat("round", i64::from(self.round));
        ctx.stat("energy", i64::from(self.energy));
    }

    fn update_alert(&self, ctx: &mut Ctx<'_, SiegeStep>) {
        let level = self.alert();
        let cycle = self.config.alert_cycle;
        if level == AlertLevel::RedAlert && self.round % cycle == 3 {
            ctx.cue(Cue::Alarm);
            ctx.announce("RED ALERT! HEAVY HOSTILES INCOMING!");
        }
        if AlertLevel::for_round(self.round.saturating_sub(1), cycle) != level {
            ctx.log(Tone::Warning, format!("Alert status: {}", level.label()));
        }
    }

    fn spawn(&mut self, ctx: &mut Ctx<'_, SiegeStep>) {
        let level = self.alert();
        if level == AlertLevel::AllClear {
            return;
        }
        let mut count = 1 + (self.round / 7) as usize;
        if level == AlertLevel::RedAlert {
            count += 1;
        }
        let room = self.config.max_hostiles.saturating_sub(self.hostiles.len());
        for _ in 0..count.min(room) {
            if !self.spawn_one(ctx) {
                break;
            }
        }
    }

    fn roll_kind(&self, ctx: &mut Ctx<'_, SiegeStep>) -> HostileKind {
        let round = self.round;
        let r = f64::from(round);
        if round >= 5 && self.alert() == AlertLevel::RedAlert && ctx.rng.chance(0.1) {
            // One dreadnought at a time; a second roll stays a scout
            let present = self
                .hostiles
                .iter()
                .any(|h| h.kind == HostileKind::Dreadnought);
            if present {
                HostileKind::Scout
            } else {
                HostileKind::Dreadnought
            }
        } else if round >= 3 && ctx.rng.chance(0.15) {
            HostileKind::HackerDrone
        } else if round >= 4 && ctx.rng.chance(0.25 + r / 60.0) {
            HostileKind::Frigate
        } else if round >= 6 && ctx.rng.chance(0.75 - r / 40.0) {
            HostileKind::Fighter
        } else {
            HostileKind::Scout
        }
    }

    fn spawn_one(&mut self, ctx: &mut Ctx<'_, SiegeStep>) -> bool {
        if self.pool.is_empty() {
            return false;
        }
        let kind = self.roll_kind(ctx);
        let Some(first) = self.draw_number() else {
            return false;
        };

        let hp = if kind == HostileKind::Dreadnought {
            1
        } else {
            let scale = 1.0 + f64::from(self.round) / 5.0;
            let base = (ctx.rng.next_f64() * scale).ceil() as i64;
            kind.hp_for(base, self.round)
        };

        let mut numbers = vec![first];
        if kind == HostileKind::Dreadnought {
            if let Some(second) = self.draw_number() {
                numbers.push(second);
            }
            ctx.cue(Cue::Alarm);
            ctx.announce("DREADNOUGHT DETECTED!");
        }

        let lane = ctx.rng.next_f64();
        self.next_id += 1;
        ctx.log(
            Tone::Danger,
            format!("{} inbound on {}", kind.name(), first),
        );
        self.hostiles.push(Hostile {
            id: self.next_id,
            kind,
            numbers,
            next: 0,
            hp: ResourcePool::new(hp),
            position: 0.0,
            lane,
            stunned: self.emp_rounds > 0,
        });
        true
    }

    fn advance_hostiles(&mut self, ctx: &mut Ctx<'_, SiegeStep>) {
        for i in 0..self.hostiles.len() {
            if ctx.is_over() {
                break;
            }

            let (blocked, dead) = {
                let Some(hostile) = self.hostiles.get_mut(i) else {
                    continue;
                };
                if !hostile.is_alive() {
                    continue;
                }
                if hostile.stunned {
                    hostile.stunned = false;
                    continue;
                }
                let mut blocked = false;
                for field in self.fields.iter_mut() {
                    if field.catches(hostile) {
                        field.strength -= 1;
                        hostile.hp.sub(1);
                        blocked = true;
                        if !hostile.is_alive() {
                            break;
                        }
                    }
                }
                (blocked, !hostile.is_alive())
            };

            if dead {
                ctx.log(Tone::Buff, "Force field took one out!");
                self.destroy(i, 0, ctx);
                continue;
            }
            if blocked {
                continue;
            }

            let lane = ctx.rng.next_f64();
            let arrived = match self.hostiles.get_mut(i) {
                Some(hostile) => {
                    hostile.position += hostile.kind.speed();
                    hostile.lane = lane;
                    hostile.has_arrived()
                }
                None => false,
            };
            if arrived {
                self.reach_station(i, ctx);
            }
        }

        self.fields.retain(|f| f.strength > 0);
        self.sweep();
    }

    fn reach_station(&mut self, index: usize, ctx: &mut Ctx<'_, SiegeStep>) {
        let Some(hostile) = self.hostiles.get(index) else {
            return;
        };
        let kind = hostile.kind;
        let numbers = hostile.numbers.clone();

        if kind == HostileKind::HackerDrone && !self.armory.is_empty() {
            let slot = ctx.rng.index(self.armory.len());
            if let Some((number, item)) = self.armory.take_index(slot) {
                ctx.cue(Cue::Alarm);
                ctx.announce("ITEM STOLEN BY HACKER!");
                ctx.log(
                    Tone::Danger,
                    format!("Hacker drone stole the {} on {}", item.name(), number),
                );
                self.record(SiegeEventKind::ItemStolen { item }, ctx);
            }
        } else {
            self.shields.sub(1);
            let shields = self.shields.current();
            ctx.cue(Cue::Damage);
            ctx.announce("SHIELDS HIT!");
            ctx.log(
                Tone::Danger,
                format!("{} hit the shields! {} left", kind.name(), shields),
            );
            ctx.stat("shields", shields);
            self.record(SiegeEventKind::ShieldsHit { shields }, ctx);
        }

        self.release(&numbers);
        if self.shields.is_empty() {
            self.game_over(ctx);
        }
    }

    /// Drop hostiles that died or reached the station
    fn sweep(&mut self) {
        self.hostiles.retain(|h| h.is_alive() && !h.has_arrived());
    }

    fn destroy(&mut self, index: usize, overkill: i64, ctx: &mut Ctx<'_, SiegeStep>) {
        let Some(hostile) = self.hostiles.get_mut(index) else {
            return;
        };
        hostile.hp.set(0);
        let kind = hostile.kind;
        let worth = hostile.hp.max();
        let numbers = hostile.numbers.clone();

        self.score += worth;
        self.destroyed += 1;
        self.release(&numbers);
        ctx.cue(Cue::Explosion);
        ctx.log(
            Tone::Success,
            format!("{} DESTROYED! +{}", kind.name().to_uppercase(), worth),
        );
        self.record(
            SiegeEventKind::HostileDestroyed {
                hostile: kind,
                score: self.score,
            },
            ctx,
        );

        for _ in 0..overkill {
            self.add_power_up(ctx);
        }
        if ctx.rng.chance(DROP_CHANCE) {
            self.add_power_up(ctx);
        }
        if kind == HostileKind::Dreadnought {
            self.score += DREADNOUGHT_BONUS;
            ctx.announce(format!("DREADNOUGHT DESTROYED! +{} BONUS", DREADNOUGHT_BONUS));
            for _ in 0..DREADNOUGHT_ITEMS {
                self.add_power_up(ctx);
            }
        }
        ctx.stat("score", self.score);
    }

    fn add_power_up(&mut self, ctx: &mut Ctx<'_, SiegeStep>) {
        if self.armory.is_full() {
            self.shields.add(1);
            ctx.log(Tone::Buff, "+1 SHIELD (ARMORY FULL)");
            ctx.stat("shields", self.shields.current());
            return;
        }

        let taken: Vec<u8> = self
            .hostiles
            .iter()
            .flat_map(|h| h.numbers.iter().copied())
            .chain(self.armory.numbers())
            .collect();
        let free: Vec<u8> = (1..=20).filter(|n| !taken.contains(n)).collect();
        let Some(&number) = ctx.rng.pick(&free) else {
            return;
        };
        let item = ctx.rng.pick(&Item::ALL).copied().unwrap_or(Item::ShieldCell);

        if self.armory.stock(number, item) {
            ctx.cue(Cue::PowerUp);
            ctx.log(Tone::PowerUp, format!("{} ready on {}", item.name(), number));
        }
    }

    fn activate(&mut self, number: u8, item: Item, multiplier: u8, ctx: &mut Ctx<'_, SiegeStep>) {
        if self.armory.take(number).is_none() {
            return;
        }
        ctx.cue(Cue::PowerUp);
        self.record(SiegeEventKind::ItemActivated { item, number }, ctx);

        match item {
            Item::Plasma => {
                self.plasma = true;
                ctx.announce("PLASMA CHARGED!");
                ctx.log(Tone::PowerUp, "Plasma charged: next hit x3");
            }
            Item::Emp => {
                self.emp_rounds = if multiplier >= 2 { 2 } else { 1 };
                for hostile in &mut self.hostiles {
                    hostile.stunned = true;
                }
                ctx.announce("EMP ACTIVATED!");
                ctx.log(
                    Tone::PowerUp,
                    format!("EMP: hostiles stunned for {} round(s)", self.emp_rounds),
                );
            }
            Item::ForceField => {
                let strength = 3 + ctx.rng.index(3) as u32;
                let at = FIELD_NEAREST_STEP + ctx.rng.next_f64() * FIELD_SPAN_STEPS;
                self.fields.push(ForceField { at, strength });
                ctx.cue(Cue::Shield);
                ctx.announce("FORCE FIELD DEPLOYED!");
                ctx.log(Tone::PowerUp, format!("Force field up, strength {}", strength));
            }
            Item::ShieldCell => {
                let restore = (1 + ctx.rng.index(2) as i64) * i64::from(multiplier);
                self.shields.add(restore);
                ctx.cue(Cue::Shield);
                ctx.announce(format!("+{} SHIELDS RESTORED!", restore));
                ctx.log(Tone::Heal, format!("+{} shields restored", restore));
                ctx.stat("shields", self.shields.current());
            }
        }
    }

    fn plasma_burst(&mut self, damage: i64, ctx: &mut Ctx<'_, SiegeStep>) {
        self.plasma = false;
        ctx.cue(Cue::Explosion);
        ctx.announce("PLASMA BURST!");
        ctx.log(Tone::Critical, format!("PLASMA BURST! {} damage to every hostile", damage));

        for i in 0..self.hostiles.len() {
            let dead = match self.hostiles.get_mut(i) {
                Some(h) if h.kind != HostileKind::Dreadnought && h.is_alive() => {
                    h.hp.sub(damage);
                    self.score += damage.min(h.hp.max());
                    !h.is_alive()
                }
                _ => false,
            };
            if dead {
                self.destroy(i, 0, ctx);
            }
        }
    }

    fn laser(&mut self, damage: i64, ctx: &mut Ctx<'_, SiegeStep>) {
        if self.hostiles.is_empty() {
            ctx.log(Tone::Miss, "Laser fired into empty space");
            return;
        }
        let i = ctx.rng.index(self.hostiles.len());
        let Some(hostile) = self.hostiles.get_mut(i) else {
            return;
        };
        hostile.hp.sub(damage);
        self.score += damage.min(hostile.hp.max());
        let name = hostile.kind.name();
        let dead = !hostile.is_alive();

        ctx.cue(Cue::Hit);
        ctx.log(Tone::Combat, format!("Laser hits the {} for {}", name, damage));
        if dead {
            self.destroy(i, 0, ctx);
        }
    }

    fn strike(&mut self, index: usize, multiplier: u8, ctx: &mut Ctx<'_, SiegeStep>) {
        let mut damage = i64::from(multiplier);
        if self.plasma {
            damage *= 3;
            self.plasma = false;
            ctx.announce("PLASMA SHOT!");
        }
        let emp = self.emp_rounds > 0;
        let Some(hostile) = self.hostiles.get_mut(index) else {
            return;
        };
        if emp || hostile.stunned {
            damage *= 2;
        }
        ctx.cue(Cue::Hit);

        if hostile.kind == HostileKind::Dreadnought {
            let done = hostile.advance_sequence();
            let next = hostile.current_number();
            if done {
                self.destroy(index, 0, ctx);
            } else if let Some(next) = next {
                ctx.announce(format!("DREADNOUGHT: HIT {} NEXT!", next));
                ctx.log(Tone::Combat, format!("Dreadnought armor cracked, hit {} next", next));
            }
            return;
        }

        let overkill = hostile.hp.sub(damage);
        self.score += damage.min(hostile.hp.max());
        let name = hostile.kind.name();
        let dead = !hostile.is_alive();
        if dead {
            self.destroy(index, overkill, ctx);
        } else {
            ctx.log(Tone::Combat, format!("{} takes {} damage", name, damage));
        }
    }

    fn sector_clear(&mut self, ctx: &mut Ctx<'_, SiegeStep>) {
        let bonus = self.energy;
        self.energy = 0;
        ctx.announce(format!("SECTOR CLEAR! +{} BONUS ITEMS", bonus));
        ctx.log(Tone::Success, format!("SECTOR CLEAR! +{} BONUS ITEMS", bonus));
        for _ in 0..bonus {
            self.add_power_up(ctx);
        }
    }

    fn game_over(&mut self, ctx: &mut Ctx<'_, SiegeStep>) {
        self.record(
            SiegeEventKind::GameOver {
                final_score: self.score,
                rounds_played: self.round,
            },
            ctx,
        );
        self.summary = Some(SiegeSummary {
            seed: self.seed,
            final_score: self.score,
            rounds_played: self.round,
            hostiles_destroyed: self.destroyed,
            duration_ms: ctx.elapsed_ms(),
            events: self.events.clone(),
            player: self.config.player.clone(),
            timestamp: Utc::now(),
        });
        log::info!(
            "siege: station lost in round {} with {} points (seed {})",
            self.round,
            self.score,
            self.seed
        );
        ctx.cue(Cue::Defeat);
        ctx.announce("STATION LOST");
        ctx.log(
            Tone::Danger,
            format!("GAME OVER - {} points in {} rounds", self.score, self.round),
        );
        ctx.lose("shields depleted");
    }
}

impl Game for StationSiege {
    type Setup = SiegeConfig;
    type Pending = SiegeStep;
    const NAME: &'static str = "Station Siege";

    fn setup(config: SiegeConfig, ctx: &mut Ctx<'_, SiegeStep>) -> Result<Self> {
        let config = config.normalized();
        let seed = ctx.rng.seed();

        let mut numbers: Vec<u8> = (1..=20).collect();
        ctx.rng.shuffle(&mut numbers);

        let mut game = Self {
            shields: ResourcePool::with_current(config.shields, config.max_shields),
            energy: config.energy_per_round,
            armory: Armory::new(config.armory_capacity),
            config,
            seed,
            round: 1,
            score: 0,
            pool: numbers.into(),
            hostiles: Vec::new(),
            fields: Vec::new(),
            plasma: false,
            emp_rounds: 0,
            next_id: 0,
            destroyed: 0,
            events: Vec::new(),
            summary: None,
            rules: siege_rules(),
        };

        game.record(SiegeEventKind::GameStart { seed }, ctx);
        ctx.log(
            Tone::System,
            format!("Defend the station! Seed {}", deadeye_core::format_seed(seed)),
        );
        game.start_round(ctx);
        for _ in 0..STARTING_ITEMS {
            game.add_power_up(ctx);
        }
        ctx.announce("ARMORY STOCKED!");
        Ok(game)
    }

    fn throw(&mut self, dart: Dart, ctx: &mut Ctx<'_, SiegeStep>) {
        if self.energy == 0 {
            return;
        }
        self.energy -= 1;

        let item = dart.number().and_then(|n| self.armory.get(n));
        let hostile = match select_target(&dart, &self.hostiles, 0) {
            Some(Selection::Exact(i)) => Some(i),
            _ => None,
        };
        let verdict = self.rules.evaluate(&Aim {
            dart,
            plasma: self.plasma,
            item,
            hostile,
        });
        log::debug!("siege: {} -> {}", dart, verdict.rule);

        let destroyed_before = self.destroyed;
        match verdict.outcome {
            Shot::Burst { damage } => self.plasma_burst(damage, ctx),
            Shot::Laser { damage } => self.laser(damage, ctx),
            Shot::Activate {
                number,
                item,
                multiplier,
            } => self.activate(number, item, multiplier, ctx),
            Shot::Strike {
                hostile,
                multiplier,
            } => self.strike(hostile, multiplier, ctx),
            Shot::Miss => {
                ctx.cue(Cue::Miss);
                ctx.log(Tone::Miss, format!("{}: MISS", dart));
            }
        }
        self.sweep();

        if self.destroyed > destroyed_before && self.hostiles.is_empty() && self.energy > 0 {
            self.sector_clear(ctx);
        }
        ctx.stat("score", self.score);
        ctx.stat("energy", i64::from(self.energy));

        if self.energy == 0 {
            ctx.transition(Transition::RoundEnded { round: self.round });
            ctx.defer(SiegeStep::EndRound, ROUND_END_DELAY_MS);
        }
    }

    fn resolve(&mut self, step: SiegeStep, ctx: &mut Ctx<'_, SiegeStep>) {
        match step {
            SiegeStep::EndRound => {
                self.round += 1;
                ctx.defer(SiegeStep::StartRound, NEXT_ROUND_DELAY_MS);
            }
            SiegeStep::StartRound => self.start_round(ctx),
        }
    }

    fn score(&self) -> i64 {
        self.score
    }
}
