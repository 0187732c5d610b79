//! Dungeon Crawl
//!
//! Up to five heroes fight through three floors of five rooms each; the
//! fifth room on every floor holds the boss. Each hero throws a set number
//! of darts per turn. Monsters are bound to numbers and have a weak spot;
//! a bullseye casts the hero's spell when there is mana for it.
//!
//! The order of the strike rules is the game balance:
//!
//! 1. bullseye with enough mana casts the spell
//! 2. a monster's number or weak spot hits for double (weak spot doubles
//!    again and crits)
//! 3. within two of a monster's number grazes for 1.5x
//! 4. bullseye without mana (Fire Mage 3x, others 2x, +10 mana)
//! 5. triple (Blade Master 3x), 6. double (Ranger 2x)
//! 7. 15-20 (Storm Caller 1.5x), 8. 10-14
//! 9. anything else is a weak swing for half and the monster hits back

mod bestiary;

pub use bestiary::{
    BossKind, HeroClass, HeroKind, MonsterKind, PowerUp, Spell, SpellEffect, BOSSES, FLOORS,
    FLOOR_MONSTERS, HEROES, POWER_UPS, ROOMS_PER_FLOOR,
};

use bestiary::{COUNTER_LINES, CRITICAL_LINES, HIT_LINES, KILL_LINES, MISS_LINES};
use deadeye_core::{
    assign_unique, random_number, select_target, ActorId, Ctx, Cue, Dart, Game, GameRng, Living,
    Millis, ResourcePool, Result, Roster, RuleTable, Selection, Targetable, Tone, Transition,
    TurnConfig, MAX_PLAYERS,
};
use serde::{Deserialize, Serialize};

/// How far from a monster's number still counts as a graze
pub const GRAZE_TOLERANCE: u8 = 2;
/// Pause between a cleared room and the next one
pub const ROOM_CLEAR_DELAY_MS: Millis = 1200;
/// Mana a bullseye gives back when the spell could not be cast
pub const BULL_MANA_REFUND: i64 = 10;
/// Rest between floors
pub const FLOOR_REST_HP: i64 = 40;
pub const FLOOR_REST_MANA: i64 = 20;

/// Dungeon Crawl settings
///
/// # Example
///
/// ```
/// use deadeye_games::DungeonConfig;
///
/// let config = DungeonConfig::default()
///     .with_player_count(2)
///     .with_darts_per_turn(9)
///     .with_hero_names(["Troy", ""]);
/// assert_eq!(config.turn().player_count(), 2);
/// assert_eq!(config.turn().darts_per_turn(), 3);
/// assert_eq!(config.hero_name(0), "TROY");
/// assert_eq!(config.hero_name(1), "DEANO");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    turn: TurnConfig,
    hero_names: Vec<String>,
}

impl DungeonConfig {
    /// Heroes in the party, clamped to `[1, 5]`
    pub fn with_player_count(mut self, n: usize) -> Self {
        self.turn = self.turn.with_player_count(n);
        self
    }

    /// Darts per hero turn, clamped to `[1, 3]`
    pub fn with_darts_per_turn(mut self, n: u32) -> Self {
        self.turn = self.turn.with_darts_per_turn(n);
        self
    }

    /// Monsters per regular room, clamped to `[1, 3]`
    pub fn with_creature_range(mut self, min: usize, max: usize) -> Self {
        self.turn = self.turn.with_target_range(min, max);
        self
    }

    /// Custom names, by seat; blanks keep the default name
    pub fn with_hero_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hero_names = names.into_iter().map(Into::into).take(MAX_PLAYERS).collect();
        self
    }

    pub fn normalized(mut self) -> Self {
        self.turn = self.turn.normalized();
        self.hero_names.truncate(MAX_PLAYERS);
        self
    }

    pub fn turn(&self) -> &TurnConfig {
        &self.turn
    }

    /// Display name for a seat (upper-cased, default when blank)
    pub fn hero_name(&self, seat: usize) -> String {
        match self.hero_names.get(seat).map(|n| n.trim()) {
            Some(name) if !name.is_empty() => name.to_uppercase(),
            _ => HEROES
                .get(seat)
                .map(|h| h.default_name.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Per-hero counters for the end screen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroStats {
    pub damage_dealt: i64,
    pub kills: u32,
    pub criticals: u32,
    pub misses: u32,
    pub spells_cast: u32,
    pub gold_earned: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hero {
    pub id: ActorId,
    pub name: String,
    pub kind: HeroKind,
    pub spell: Spell,
    pub hp: ResourcePool,
    pub mana: ResourcePool,
    pub alive: bool,
    pub stats: HeroStats,
}

impl Hero {
    fn new(seat: usize, class: &HeroClass, name: String) -> Self {
        Self {
            id: ActorId::new(seat as u64),
            name,
            kind: class.kind,
            spell: class.spell,
            hp: ResourcePool::new(class.max_hp),
            mana: ResourcePool::new(class.max_mana),
            alive: true,
            stats: HeroStats::default(),
        }
    }

    pub fn can_cast(&self) -> bool {
        self.mana.current() >= self.spell.mana_cost
    }
}

impl Living for Hero {
    fn is_alive(&self) -> bool {
        self.alive
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Monster {
    pub name: &'static str,
    pub taunt: &'static str,
    pub hp: ResourcePool,
    pub damage: i64,
    pub gold: i64,
    pub drop_chance: f64,
    pub target: u8,
    pub weak_spot: u8,
    pub boss: bool,
}

impl Monster {
    fn new(kind: &MonsterKind, target: u8, weak_spot: u8, boss: bool) -> Self {
        Self {
            name: kind.name,
            taunt: kind.taunt,
            hp: ResourcePool::new(kind.hp),
            damage: kind.damage,
            gold: kind.gold,
            drop_chance: kind.drop_chance,
            target,
            weak_spot,
            boss,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.hp.is_empty()
    }
}

impl Targetable for Monster {
    fn target_number(&self) -> Option<u8> {
        Some(self.target)
    }

    fn weak_spot(&self) -> Option<u8> {
        Some(self.weak_spot)
    }

    fn is_targetable(&self) -> bool {
        self.is_alive()
    }
}

/// One-shot party buffs from drops
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buffs {
    pub bonus_damage: i64,
    pub shield: u32,
    pub spell_boost: i64,
}

impl Default for Buffs {
    fn default() -> Self {
        Self {
            bonus_damage: 0,
            shield: 0,
            spell_boost: 1,
        }
    }
}

/// What the strike rules see
#[derive(Debug, Clone, Copy)]
struct Strike {
    dart: Dart,
    kind: HeroKind,
    can_cast: bool,
    selection: Option<Selection>,
    on_weak_spot: bool,
}

impl Strike {
    fn value(&self) -> i64 {
        i64::from(self.dart.value)
    }

    fn is(&self, kind: HeroKind) -> bool {
        self.kind == kind
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Direct,
    WeakSpot,
    Graze,
    Bull,
    Triple,
    Double,
    High,
    Medium,
    Weak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Blow {
    Spell,
    Strike {
        style: Style,
        damage: i64,
        critical: bool,
    },
}

fn strike(style: Style, damage: i64, critical: bool) -> Blow {
    Blow::Strike {
        style,
        damage,
        critical,
    }
}

fn strike_rules() -> RuleTable<Strike, Blow> {
    RuleTable::<Strike, Blow>::new(|s| strike(Style::Weak, s.value() / 2, false))
        .rule("spell", |s| s.dart.is_bull() && s.can_cast, |_| Blow::Spell)
        .rule(
            "direct",
            |s| matches!(s.selection, Some(Selection::Exact(_) | Selection::WeakSpot(_))),
            |s| {
                if s.on_weak_spot {
                    strike(Style::WeakSpot, s.value() * 4, true)
                } else {
                    strike(Style::Direct, s.value() * 2, false)
                }
            },
        )
        .rule(
            "graze",
            |s| matches!(s.selection, Some(Selection::Near(_))),
            |s| strike(Style::Graze, s.value() * 3 / 2, false),
        )
        .rule(
            "bull",
            |s| s.dart.is_bull(),
            |s| {
                let factor = if s.is(HeroKind::FireMage) { 3 } else { 2 };
                strike(Style::Bull, s.value() * factor, true)
            },
        )
        .rule(
            "triple",
            |s| s.dart.is_triple(),
            |s| {
                if s.is(HeroKind::BladeMaster) {
                    strike(Style::Triple, s.value() * 3, true)
                } else {
                    strike(Style::Triple, s.value(), false)
                }
            },
        )
        .rule(
            "double",
            |s| s.dart.is_double(),
            |s| {
                if s.is(HeroKind::Ranger) {
                    strike(Style::Double, s.value() * 2, true)
                } else {
                    strike(Style::Double, s.value(), false)
                }
            },
        )
        .rule(
            "high",
            |s| matches!(s.dart.number(), Some(15..=20)),
            |s| {
                if s.is(HeroKind::StormCaller) {
                    strike(Style::High, s.value() * 3 / 2, false)
                } else {
                    strike(Style::High, s.value(), false)
                }
            },
        )
        .rule(
            "medium",
            |s| matches!(s.dart.number(), Some(10..=14)),
            |s| strike(Style::Medium, s.value(), false),
        )
}

/// Transitions Dungeon Crawl schedules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DungeonStep {
    /// Move on from a cleared room (next room, next floor or victory)
    RoomCleared,
}

/// A hero's line on the end screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeroReport {
    pub name: String,
    pub kind: HeroKind,
    pub alive: bool,
    pub stats: HeroStats,
}

/// End-of-run numbers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DungeonSummary {
    pub victory: bool,
    pub floor: u32,
    pub rooms_cleared: u32,
    pub gold: i64,
    pub spells_cast: u32,
    /// Sorted by damage dealt, highest first
    pub heroes: Vec<HeroReport>,
    pub mvp: Option<String>,
    pub defeated_by: Option<String>,
}

/// Dungeon Crawl game state
#[derive(Debug, Clone)]
pub struct DungeonCrawl {
    config: DungeonConfig,
    party: Roster<Hero>,
    monsters: Vec<Monster>,
    floor: u32,
    room: u32,
    gold: i64,
    darts_left: u32,
    buffs: Buffs,
    won: bool,
    rules: RuleTable<Strike, Blow>,
}

impl DungeonCrawl {
    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    pub fn party(&self) -> &Roster<Hero> {
        &self.party
    }

    pub fn current_hero(&self) -> Option<&Hero> {
        self.party.current()
    }

    pub fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    pub fn living_monsters(&self) -> impl Iterator<Item = &Monster> {
        self.monsters.iter().filter(|m| m.is_alive())
    }

    pub fn floor(&self) -> u32 {
        self.floor
    }

    pub fn room(&self) -> u32 {
        self.room
    }

    pub fn is_boss_room(&self) -> bool {
        self.room == ROOMS_PER_FLOOR
    }

    pub fn gold(&self) -> i64 {
        self.gold
    }

    pub fn darts_left(&self) -> u32 {
        self.darts_left
    }

    pub fn buffs(&self) -> &Buffs {
        &self.buffs
    }

    /// Change darts per turn from the in-game settings (clamped to 1..=3)
    ///
    /// Takes effect from the next turn.
    pub fn adjust_darts_per_turn(&mut self, delta: i32) {
        self.config.turn.adjust_darts_per_turn(delta);
    }

    pub fn summary(&self) -> DungeonSummary {
        let mut heroes: Vec<HeroReport> = self
            .party
            .iter()
            .map(|h| HeroReport {
                name: h.name.clone(),
                kind: h.kind,
                alive: h.alive,
                stats: h.stats.clone(),
            })
            .collect();
        heroes.sort_by(|a, b| b.stats.damage_dealt.cmp(&a.stats.damage_dealt));

        let defeated_by = if self.party.all_dead() {
            self.living_monsters()
                .next()
                .or_else(|| self.monsters.first())
                .map(|m| m.name.to_string())
        } else {
            None
        };

        DungeonSummary {
            victory: self.won,
            floor: self.floor,
            rooms_cleared: if self.won {
                FLOORS * ROOMS_PER_FLOOR
            } else {
                (self.floor - 1) * ROOMS_PER_FLOOR + self.room - 1
            },
            gold: self.gold,
            spells_cast: heroes.iter().map(|h| h.stats.spells_cast).sum(),
            mvp: heroes.first().map(|h| h.name.clone()),
            heroes,
            defeated_by,
        }
    }

    fn living_monster_count(&self) -> usize {
        self.living_monsters().count()
    }

    fn enter_room(&mut self, ctx: &mut Ctx<'_, DungeonStep>) {
        let floor = (self.floor - 1) as usize;
        self.monsters.clear();

        if self.is_boss_room() {
            let Some(boss) = BOSSES.get(floor).copied() else {
                return;
            };
            let target = assign_unique(ctx.rng, &[boss.weak_spot]);
            self.monsters
                .push(Monster::new(&boss.monster, target, boss.weak_spot, true));
            ctx.log(
                Tone::Danger,
                format!("BOSS ROOM! {} appears!", boss.monster.name),
            );
            ctx.cue(Cue::Alarm);
        } else {
            let Some(table) = FLOOR_MONSTERS.get(floor).copied() else {
                return;
            };
            let (min, max) = self.config.turn.target_range();
            let count = ctx.rng.range_i64(min as i64, max as i64);
            for _ in 0..count {
                let Some(kind) = ctx.rng.pick(&table) else {
                    break;
                };
                let weak_spot = random_number(ctx.rng);
                let used: Vec<u8> = self.monsters.iter().map(|m| m.target).collect();
                let target = assign_unique(ctx.rng, &used);
                self.monsters
                    .push(Monster::new(kind, target, weak_spot, false));
            }

            match self.monsters.as_slice() {
                [only] => ctx.log(Tone::Info, format!("{} blocks the path!", only.name)),
                all => {
                    ctx.log(Tone::Info, format!("{} creatures appear!", all.len()));
                    for m in all {
                        ctx.log(Tone::Info, format!("  {}", m.name));
                    }
                }
            }
        }

        if let Some(taunt) = ctx.rng.pick(&self.monsters).map(|m| m.taunt) {
            ctx.log(Tone::Info, format!("\"{}\"", taunt));
        }
        ctx.transition(Transition::EncounterStarted {
            label: format!("floor {} room {}", self.floor, self.room),
        });
    }

    fn cast_spell(&mut self, ctx: &mut Ctx<'_, DungeonStep>) {
        let boost = self.buffs.spell_boost;
        let Some(hero) = self.party.current_mut() else {
            return;
        };
        let spell = hero.spell;
        hero.mana.sub(spell.mana_cost);
        hero.stats.spells_cast += 1;
        let hero_name = hero.name.clone();

        ctx.log(Tone::Ability, format!("{} casts {}!", hero_name, spell.name));
        ctx.cue(Cue::Spell);
        if boost > 1 {
            ctx.log(Tone::Buff, "Ancient Tome DOUBLES the spell power!");
            self.buffs.spell_boost = 1;
        }

        match spell.effect {
            SpellEffect::HealParty(amount) => {
                for hero in self.party.living_mut() {
                    hero.hp.add(amount);
                }
                ctx.log(
                    Tone::Heal,
                    format!("{} heals all heroes for {} HP!", spell.name, amount),
                );
            }
            SpellEffect::Damage(base) => {
                let living: Vec<usize> = (0..self.monsters.len())
                    .filter(|&i| self.monsters[i].is_alive())
                    .collect();
                if living.is_empty() {
                    return;
                }
                let each = base * boost / living.len() as i64;
                for i in living {
                    self.monsters[i].hp.sub(each);
                    if let Some(hero) = self.party.current_mut() {
                        hero.stats.damage_dealt += each;
                    }
                    if !self.monsters[i].is_alive() {
                        self.defeat(i, ctx);
                    }
                }
                ctx.log(
                    Tone::Ability,
                    format!("{} ({} damage to each enemy!)", spell.description, each),
                );
            }
        }
    }

    fn land(
        &mut self,
        style: Style,
        damage: i64,
        critical: bool,
        target: usize,
        dart: &Dart,
        ctx: &mut Ctx<'_, DungeonStep>,
    ) {
        let good = style != Style::Weak;
        let Some(hero) = self.party.current_mut() else {
            return;
        };
        if style == Style::Bull {
            hero.mana.add(BULL_MANA_REFUND);
            ctx.log(Tone::Ability, format!("+{} Mana restored!", BULL_MANA_REFUND));
        }
        if !good {
            hero.stats.misses += 1;
        }
        let hero_name = hero.name.clone();
        let kind = hero.kind;

        let mut damage = damage;
        if damage > 0 && self.buffs.bonus_damage > 0 {
            damage += self.buffs.bonus_damage;
            ctx.log(
                Tone::Buff,
                format!("Power Scroll adds +{} damage!", self.buffs.bonus_damage),
            );
            self.buffs.bonus_damage = 0;
        }

        let Some(monster) = self.monsters.get_mut(target) else {
            return;
        };
        let line = strike_line(style, kind, &hero_name, monster.name, dart.value, ctx.rng);
        let tone = if critical {
            Tone::Critical
        } else if good {
            Tone::Combat
        } else {
            Tone::Miss
        };

        if damage > 0 {
            monster.hp.sub(damage);
            if let Some(hero) = self.party.current_mut() {
                hero.stats.damage_dealt += damage;
                if critical {
                    hero.stats.criticals += 1;
                }
            }
            ctx.log(tone, format!("{} ({} damage to {})", line, damage, monster.name));
        } else {
            ctx.log(tone, line);
        }
        ctx.cue(match (critical, good) {
            (true, _) => Cue::Critical,
            (false, true) => Cue::Hit,
            (false, false) => Cue::Miss,
        });

        if !self.monsters[target].is_alive() {
            self.defeat(target, ctx);
        } else if !good {
            self.counterattack(target, ctx);
        }
    }

    fn defeat(&mut self, index: usize, ctx: &mut Ctx<'_, DungeonStep>) {
        let Some(monster) = self.monsters.get(index) else {
            return;
        };
        let (name, gold, drop_chance) = (monster.name, monster.gold, monster.drop_chance);

        self.gold += gold;
        if let Some(hero) = self.party.current_mut() {
            hero.stats.gold_earned += gold;
            hero.stats.kills += 1;
        }

        let line = pick_line(ctx.rng, &KILL_LINES).replace("{monster}", name);
        ctx.log(Tone::Success, format!("{} (+{} gold)", line, gold));
        ctx.cue(Cue::Kill);
        ctx.stat("gold", self.gold);

        if ctx.rng.chance(drop_chance) {
            self.drop_power_up(ctx);
        }

        if self.living_monster_count() == 0 {
            ctx.transition(Transition::EncounterCleared {
                label: format!("floor {} room {}", self.floor, self.room),
            });
            ctx.defer(DungeonStep::RoomCleared, ROOM_CLEAR_DELAY_MS);
        }
    }

    fn drop_power_up(&mut self, ctx: &mut Ctx<'_, DungeonStep>) {
        let Some(&power) = ctx.rng.pick(&POWER_UPS) else {
            return;
        };
        ctx.log(Tone::PowerUp, format!("{} dropped!", power.name()));
        ctx.cue(Cue::PowerUp);

        match power {
            PowerUp::Heal(amount) => {
                if let Some(hero) = self.potion_target(|h| !h.hp.is_full()) {
                    hero.hp.add(amount);
                    let text = format!("{} drinks the potion! +{} HP", hero.name, amount);
                    ctx.log(Tone::Heal, text);
                }
            }
            PowerUp::Mana(amount) => {
                if let Some(hero) = self.potion_target(|h| !h.mana.is_full()) {
                    hero.mana.add(amount);
                    let text = format!("{} absorbs the crystal! +{} Mana", hero.name, amount);
                    ctx.log(Tone::Heal, text);
                }
            }
            PowerUp::HealAll(amount) => {
                for hero in self.party.living_mut() {
                    hero.hp.add(amount);
                }
                ctx.log(Tone::Heal, format!("All heroes healed for {} HP!", amount));
            }
            PowerUp::ManaAll(amount) => {
                for hero in self.party.living_mut() {
                    hero.mana.add(amount);
                }
                ctx.log(Tone::Heal, format!("All heroes gain {} Mana!", amount));
            }
            PowerUp::BonusDamage(amount) => {
                self.buffs.bonus_damage = amount;
                ctx.log(
                    Tone::Buff,
                    format!("Next attack will deal +{} bonus damage!", amount),
                );
            }
            PowerUp::Shield(blocks) => {
                self.buffs.shield = blocks;
                ctx.log(Tone::Buff, "Shield will block the next monster attack!");
            }
            PowerUp::Gold(amount) => {
                self.gold += amount;
                ctx.log(Tone::PowerUp, format!("Found {} bonus gold!", amount));
                ctx.stat("gold", self.gold);
            }
            PowerUp::SpellBoost(factor) => {
                self.buffs.spell_boost = factor;
                ctx.log(Tone::Buff, "Next spell will deal DOUBLE damage!");
            }
        }
    }

    /// First living hero that needs it, else the current hero if alive
    fn potion_target(&mut self, needs: impl Fn(&Hero) -> bool) -> Option<&mut Hero> {
        let index = self
            .party
            .iter()
            .position(|h| h.alive && needs(h))
            .unwrap_or(self.party.current_index());
        self.party.get_mut(index).filter(|h| h.alive)
    }

    fn counterattack(&mut self, index: usize, ctx: &mut Ctx<'_, DungeonStep>) {
        let Some(monster) = self.monsters.get(index) else {
            return;
        };
        let (monster_name, mut damage) = (monster.name, monster.damage);

        if self.buffs.shield > 0 {
            self.buffs.shield -= 1;
            ctx.log(Tone::Buff, "Shield Rune blocks the attack!");
            ctx.cue(Cue::Shield);
            return;
        }

        let Some(hero) = self.party.current_mut() else {
            return;
        };
        if hero.kind == HeroKind::Tank {
            damage /= 2;
            ctx.log(
                Tone::Ability,
                format!("{}'s SHIELD WALL absorbs half the damage!", hero.name),
            );
        }
        hero.hp.sub(damage);

        let line = pick_line(ctx.rng, &COUNTER_LINES)
            .replace("{monster}", monster_name)
            .replace("{hero}", &hero.name);
        ctx.log(
            Tone::Danger,
            format!("{} ({} damage to {})", line, damage, hero.name),
        );
        ctx.cue(Cue::Damage);

        if hero.hp.is_empty() {
            hero.alive = false;
            ctx.log(Tone::Danger, format!("{} has fallen!", hero.name));
            if self.party.all_dead() {
                self.game_over(ctx);
            }
        }
    }

    fn end_of_turn(&mut self, ctx: &mut Ctx<'_, DungeonStep>) {
        if self.living_monster_count() == 0 {
            return;
        }
        let hero_down = !self.party.current().is_some_and(|h| h.alive);
        if self.darts_left == 0 || hero_down {
            self.next_hero(ctx);
        }
    }

    fn next_hero(&mut self, ctx: &mut Ctx<'_, DungeonStep>) {
        if self.party.advance().is_none() {
            return;
        }
        self.darts_left = self.config.turn.darts_per_turn();
        self.reassign_targets(ctx.rng);

        if let Some(hero) = self.party.current() {
            ctx.log(Tone::Info, format!("{}'s turn!", hero.name));
            ctx.transition(Transition::TurnChanged {
                actor: hero.name.clone(),
            });
        }
    }

    /// Fresh, distinct numbers for every living monster
    fn reassign_targets(&mut self, rng: &mut GameRng) {
        for i in 0..self.monsters.len() {
            if !self.monsters[i].is_alive() {
                continue;
            }
            let mut others: Vec<u8> = self
                .monsters
                .iter()
                .enumerate()
                .filter(|(j, m)| *j != i && m.is_alive())
                .map(|(_, m)| m.target)
                .collect();
            if self.monsters[i].boss {
                others.push(self.monsters[i].weak_spot);
            }
            self.monsters[i].target = assign_unique(rng, &others);
        }
    }

    fn victory(&mut self, ctx: &mut Ctx<'_, DungeonStep>) {
        self.won = true;
        let summary = self.summary();
        ctx.announce("VICTORY!");
        ctx.log(
            Tone::Success,
            format!(
                "The dungeon is conquered! {} rooms, {} spells, {} gold",
                summary.rooms_cleared, summary.spells_cast, summary.gold
            ),
        );
        if let Some(mvp) = &summary.mvp {
            ctx.log(Tone::Success, format!("MVP: {}", mvp));
        }
        ctx.cue(Cue::Victory);
        ctx.win();
    }

    fn game_over(&mut self, ctx: &mut Ctx<'_, DungeonStep>) {
        let summary = self.summary();
        ctx.announce("GAME OVER");
        ctx.log(
            Tone::Danger,
            format!(
                "The party has fallen on floor {} after {} rooms",
                summary.floor, summary.rooms_cleared
            ),
        );
        ctx.cue(Cue::Defeat);
        let reason = match summary.defeated_by {
            Some(name) => format!("defeated by {}", name),
            None => "the party has fallen".to_string(),
        };
        ctx.lose(reason);
    }
}

fn pick_line(rng: &mut GameRng, lines: &[&'static str]) -> &'static str {
    rng.pick(lines).copied().unwrap_or_default()
}

fn strike_line(
    style: Style,
    kind: HeroKind,
    hero: &str,
    monster: &str,
    value: u32,
    rng: &mut GameRng,
) -> String {
    let line = match (style, kind) {
        (Style::Direct, _) => pick_line(rng, &HIT_LINES).to_string(),
        (Style::WeakSpot, _) => pick_line(rng, &CRITICAL_LINES).to_string(),
        (Style::Weak, _) => pick_line(rng, &MISS_LINES).to_string(),
        (Style::Graze, _) => format!("{{hero}} grazes {}! Close enough!", monster),
        (Style::Bull, HeroKind::FireMage) => {
            "{hero}'s FIREBALL! The bullseye erupts in flame!".to_string()
        }
        (Style::Bull, _) => "{hero} hits the bullseye! (Not enough mana for spell)".to_string(),
        (Style::Triple, HeroKind::BladeMaster) => {
            "{hero}'s CRITICAL STRIKE! Triple damage unleashed!".to_string()
        }
        (Style::Triple, _) => "{hero} lands a powerful triple!".to_string(),
        (Style::Double, HeroKind::Ranger) => {
            "{hero}'s PRECISION SHOT! Double finds the mark!".to_string()
        }
        (Style::Double, _) => "{hero} scores a double!".to_string(),
        (Style::High, HeroKind::StormCaller) => {
            "{hero}'s CHAIN LIGHTNING! High number chains bonus damage!".to_string()
        }
        (Style::High, _) => "{hero} lands a solid hit!".to_string(),
        (Style::Medium, _) => format!("{{hero}} hits for {}!", value),
    };
    line.replace("{hero}", hero)
}

impl Game for DungeonCrawl {
    type Setup = DungeonConfig;
    type Pending = DungeonStep;
    const NAME: &'static str = "Dungeon Crawl";

    fn setup(config: DungeonConfig, ctx: &mut Ctx<'_, DungeonStep>) -> Result<Self> {
        let config = config.normalized();
        let heroes: Vec<Hero> = HEROES
            .iter()
            .take(config.turn.player_count())
            .enumerate()
            .map(|(seat, class)| Hero::new(seat, class, config.hero_name(seat)))
            .collect();

        ctx.log(Tone::System, "The party enters the Dungeon of Darts...");
        ctx.log(Tone::System, "Floor 1 - The Basement of Mild Inconvenience");
        ctx.log(
            Tone::Info,
            format!(
                "TIP: Each hero gets {} darts per turn!",
                config.turn.darts_per_turn()
            ),
        );
        ctx.log(Tone::Info, "TIP: Hit BULLSEYE to cast your hero's spell!");

        let mut game = Self {
            darts_left: config.turn.darts_per_turn(),
            config,
            party: Roster::new(heroes),
            monsters: Vec::new(),
            floor: 1,
            room: 1,
            gold: 0,
            buffs: Buffs::default(),
            won: false,
            rules: strike_rules(),
        };
        game.enter_room(ctx);
        Ok(game)
    }

    fn throw(&mut self, dart: Dart, ctx: &mut Ctx<'_, DungeonStep>) {
        if self.living_monster_count() == 0 {
            return;
        }
        let Some(hero) = self.party.current() else {
            return;
        };

        let selection = select_target(&dart, &self.monsters, GRAZE_TOLERANCE);
        let on_weak_spot = match selection {
            Some(Selection::Exact(i) | Selection::WeakSpot(i)) => self
                .monsters
                .get(i)
                .is_some_and(|m| dart.number() == Some(m.weak_spot)),
            _ => false,
        };
        let aim = Strike {
            dart,
            kind: hero.kind,
            can_cast: hero.can_cast(),
            selection,
            on_weak_spot,
        };

        let verdict = self.rules.evaluate(&aim);
        log::debug!("dungeon: {} by {} -> {}", dart, hero.name, verdict.rule);
        match verdict.outcome {
            Blow::Spell => self.cast_spell(ctx),
            Blow::Strike {
                style,
                damage,
                critical,
            } => {
                if let Some(target) = selection.map(|s| s.index()) {
                    self.land(style, damage, critical, target, &dart, ctx);
                }
            }
        }

        if ctx.is_over() {
            return;
        }
        self.darts_left = self.darts_left.saturating_sub(1);
        self.end_of_turn(ctx);
    }

    fn resolve(&mut self, step: DungeonStep, ctx: &mut Ctx<'_, DungeonStep>) {
        match step {
            DungeonStep::RoomCleared => {
                if self.is_boss_room() {
                    if self.floor >= FLOORS {
                        self.victory(ctx);
                        return;
                    }
                    self.floor += 1;
                    self.room = 1;
                    ctx.log(Tone::Success, format!("FLOOR {} CLEARED!", self.floor - 1));
                    ctx.log(Tone::System, format!("Descending to Floor {}...", self.floor));
                    for hero in self.party.living_mut() {
                        hero.hp.add(FLOOR_REST_HP);
                        hero.mana.add(FLOOR_REST_MANA);
                    }
                    ctx.log(
                        Tone::Heal,
                        format!(
                            "The party rests: +{} HP, +{} Mana!",
                            FLOOR_REST_HP, FLOOR_REST_MANA
                        ),
                    );
                    ctx.transition(Transition::PhaseAdvanced { phase: self.floor });
                } else {
                    self.room += 1;
                }
                self.darts_left = self.config.turn.darts_per_turn();
                self.enter_room(ctx);
            }
        }
    }

    fn score(&self) -> i64 {
        self.gold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deadeye_core::{DartEvent, Phase, Session};

    fn started(config: DungeonConfig) -> Session<DungeonCrawl> {
        let mut session = Session::new(99);
        session.start(config).unwrap();
        session
    }

    fn solo() -> DungeonConfig {
        DungeonConfig::default()
            .with_player_count(1)
            .with_creature_range(1, 1)
    }

    /// A number that is nobody's target, weak spot or graze
    fn blank_number(game: &DungeonCrawl) -> Option<u8> {
        (1..=9).find(|&n| {
            game.living_monsters().all(|m| {
                m.target.abs_diff(n) > GRAZE_TOLERANCE && m.weak_spot != n
            })
        })
    }

    fn evaluate(dart: DartEvent, kind: HeroKind, can_cast: bool, selection: Option<Selection>) -> Blow {
        let aim = Strike {
            dart: dart.classify().unwrap(),
            kind,
            can_cast,
            selection,
            on_weak_spot: false,
        };
        strike_rules().evaluate(&aim).outcome
    }

    #[test]
    fn test_boss_target_never_lands_on_weak_spot() {
        let mut session = started(solo());
        let game = session.game_mut().unwrap();
        game.monsters.clear();
        game.monsters
            .push(Monster::new(&BOSSES[0].monster, 1, BOSSES[0].weak_spot, true));

        let mut rng = GameRng::new(1);
        for _ in 0..500 {
            game.reassign_targets(&mut rng);
            let boss = &game.monsters[0];
            assert_ne!(boss.target, boss.weak_spot);
        }
    }

    #[test]
    fn test_rule_order() {
        let table = strike_rules();
        let names: Vec<_> = table.names().collect();
        assert_eq!(
            names,
            vec!["spell", "direct", "graze", "bull", "triple", "double", "high", "medium"]
        );

        // Bull with mana casts, without mana is a class strike
        let sel = Some(Selection::Fallback(0));
        assert_eq!(evaluate(DartEvent::bull(), HeroKind::Tank, true, sel), Blow::Spell);
        assert_eq!(
            evaluate(DartEvent::bull(), HeroKind::FireMage, false, sel),
            strike(Style::Bull, 75, true)
        );
        assert_eq!(
            evaluate(DartEvent::double_bull(), HeroKind::Tank, false, sel),
            strike(Style::Bull, 100, true)
        );

        // An exact hit on a triple beats the triple rule
        assert_eq!(
            evaluate(DartEvent::triple(5), HeroKind::BladeMaster, false, Some(Selection::Exact(0))),
            strike(Style::Direct, 30, false)
        );
        assert_eq!(
            evaluate(DartEvent::triple(5), HeroKind::BladeMaster, false, sel),
            strike(Style::Triple, 45, true)
        );
        assert_eq!(
            evaluate(DartEvent::double(8), HeroKind::Ranger, false, sel),
            strike(Style::Double, 32, true)
        );
        assert_eq!(
            evaluate(DartEvent::single(17), HeroKind::StormCaller, false, sel),
            strike(Style::High, 25, false)
        );
        assert_eq!(
            evaluate(DartEvent::single(12), HeroKind::Tank, false, sel),
            strike(Style::Medium, 12, false)
        );
        assert_eq!(
            evaluate(DartEvent::single(7), HeroKind::Tank, false, sel),
            strike(Style::Weak, 3, false)
        );
        assert_eq!(
            evaluate(DartEvent::single(7), HeroKind::Tank, false, Some(Selection::Near(0))),
            strike(Style::Graze, 10, false)
        );
    }

    #[test]
    fn test_weak_spot_quadruples() {
        let aim = Strike {
            dart: DartEvent::single(6).classify().unwrap(),
            kind: HeroKind::Tank,
            can_cast: false,
            selection: Some(Selection::WeakSpot(0)),
            on_weak_spot: true,
        };
        assert_eq!(
            strike_rules().evaluate(&aim).outcome,
            strike(Style::WeakSpot, 24, true)
        );
    }

    #[test]
    fn test_first_room() {
        let session = started(DungeonConfig::default());
        let game = session.game().unwrap();
        assert_eq!(game.floor(), 1);
        assert_eq!(game.room(), 1);
        assert_eq!(game.party().len(), 5);
        assert_eq!(game.darts_left(), 3);

        let count = game.monsters().len();
        assert!((1..=3).contains(&count));
        let mut targets: Vec<u8> = game.monsters().iter().map(|m| m.target).collect();
        targets.sort();
        targets.dedup();
        assert_eq!(targets.len(), count);
    }

    #[test]
    fn test_turn_passes_after_allotment() {
        let mut session = started(
            DungeonConfig::default()
                .with_player_count(2)
                .with_darts_per_turn(1),
        );
        assert_eq!(session.game().unwrap().party().current_index(), 0);

        // A 10-14 hit never draws a counterattack
        let n = (10..=14)
            .find(|&n| {
                session
                    .game()
                    .unwrap()
                    .living_monsters()
                    .all(|m| m.target.abs_diff(n) > GRAZE_TOLERANCE && m.weak_spot != n)
            });
        if let Some(n) = n {
            let result = session.handle_dart_throw(DartEvent::single(n));
            let game = session.game().unwrap();
            if game.living_monsters().count() > 0 {
                assert_eq!(game.party().current_index(), 1);
                assert_eq!(game.darts_left(), 1);
                assert!(result
                    .cmd
                    .transitions()
                    .iter()
                    .any(|t| matches!(t, Transition::TurnChanged { .. })));
            }
        }
    }

    #[test]
    fn test_weak_swing_draws_counterattack() {
        let mut session = started(solo());
        let game = session.game().unwrap();
        let Some(n) = blank_number(game) else {
            return;
        };
        let monster_damage = game.monsters()[0].damage;
        let hp_before = game.party().get(0).unwrap().hp.current();

        session.handle_dart_throw(DartEvent::single(n));
        let game = session.game().unwrap();
        let hero = game.party().get(0).unwrap();
        assert_eq!(hero.stats.misses, 1);
        if game.monsters()[0].is_alive() {
            assert_eq!(hero.hp.current(), hp_before - monster_damage);
        }
    }

    #[test]
    fn test_shield_blocks_counterattack() {
        let mut session = started(solo());
        let Some(n) = blank_number(session.game().unwrap()) else {
            return;
        };
        session.game_mut().unwrap().buffs.shield = 1;
        let hp_before = session.game().unwrap().party().get(0).unwrap().hp.current();

        let result = session.handle_dart_throw(DartEvent::single(n));
        let game = session.game().unwrap();
        if game.monsters()[0].is_alive() {
            assert!(result.cmd.has_cue(Cue::Shield));
            assert_eq!(game.buffs().shield, 0);
            assert_eq!(game.party().get(0).unwrap().hp.current(), hp_before);
        }
    }

    #[test]
    fn test_spell_consumes_mana_and_boost() {
        let mut session = started(solo());
        session.game_mut().unwrap().buffs.spell_boost = 2;

        session.handle_dart_throw(DartEvent::bull());
        let game = session.game().unwrap();
        let hero = game.party().get(0).unwrap();
        assert_eq!(hero.mana.current(), 50 - 25);
        assert_eq!(hero.stats.spells_cast, 1);
        assert_eq!(game.buffs().spell_boost, 1);
        // BLADE FURY, doubled, into a single monster
        assert_eq!(hero.stats.damage_dealt, 160);
    }

    #[test]
    fn test_bonus_damage_is_consumed() {
        let mut session = started(solo());
        session.game_mut().unwrap().buffs.bonus_damage = 50;
        let target = session.game().unwrap().monsters()[0].target;

        session.handle_dart_throw(DartEvent::single(target));
        assert!(session.feed().contains("Power Scroll adds +50 damage!"));
        let game = session.game().unwrap();
        let dealt = game.party().get(0).unwrap().stats.damage_dealt;
        assert!(dealt == i64::from(target) * 2 + 50 || dealt == i64::from(target) * 4 + 50);
    }

    #[test]
    fn test_room_clear_waits_then_advances() {
        let mut session = started(solo());
        for _ in 0..40 {
            if session.phase() != Phase::InRound {
                break;
            }
            let target = session.game().unwrap().monsters()[0].target;
            session.handle_dart_throw(DartEvent::triple(target));
        }
        assert_eq!(session.phase(), Phase::Pending);
        assert_eq!(session.game().unwrap().room(), 1);

        session.tick(ROOM_CLEAR_DELAY_MS);
        let game = session.game().unwrap();
        assert_eq!(game.room(), 2);
        assert!(game.living_monsters().count() >= 1);
        assert!(game.gold() > 0);
    }

    #[test]
    fn test_party_wipe_is_terminal() {
        let mut session = started(solo());
        for _ in 0..200 {
            if session.phase().is_terminal() {
                break;
            }
            if session.phase() == Phase::Pending {
                session.advance();
                continue;
            }
            let game = session.game().unwrap();
            match blank_number(game) {
                Some(n) => {
                    session.handle_dart_throw(DartEvent::single(n));
                }
                None => break,
            }
        }
        if session.phase() == Phase::Lost {
            let summary = session.game().unwrap().summary();
            assert!(!summary.victory);
            assert!(summary.defeated_by.is_some());
            assert_eq!(
                session.handle_dart_throw(DartEvent::single(1)).rejected,
                Some(deadeye_core::Rejection::GameOver)
            );
        }
    }

    #[test]
    fn test_in_game_darts_clamp() {
        let mut session = started(DungeonConfig::default());
        let game = session.game_mut().unwrap();
        game.adjust_darts_per_turn(5);
        assert_eq!(game.config().turn().darts_per_turn(), 3);
        game.adjust_darts_per_turn(-7);
        assert_eq!(game.config().turn().darts_per_turn(), 1);
    }
}
