//! Static tables: hero classes, monsters, bosses and drops

use serde::{Deserialize, Serialize};

/// Floors in the dungeon
pub const FLOORS: u32 = 3;
/// Rooms per floor; the last one is the boss room
pub const ROOMS_PER_FLOOR: u32 = 5;

/// Hero class, which decides the bonus rule a hero benefits from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeroKind {
    /// Triples strike for 3x
    BladeMaster,
    /// Takes half damage
    Tank,
    /// Bullseye without mana burns for 3x
    FireMage,
    /// Doubles always crit
    Ranger,
    /// 15-20 chain for 1.5x
    StormCaller,
}

impl HeroKind {
    pub fn title(&self) -> &'static str {
        match self {
            HeroKind::BladeMaster => "The Blade Master",
            HeroKind::Tank => "The Tank",
            HeroKind::FireMage => "The Fire Mage",
            HeroKind::Ranger => "The Ranger",
            HeroKind::StormCaller => "The Storm Caller",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpellEffect {
    /// Split across every living monster
    Damage(i64),
    /// Heal every living hero
    HealParty(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spell {
    pub name: &'static str,
    pub mana_cost: i64,
    pub effect: SpellEffect,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeroClass {
    /// Name used when the player leaves theirs blank
    pub default_name: &'static str,
    pub kind: HeroKind,
    pub max_hp: i64,
    pub max_mana: i64,
    pub spell: Spell,
}

/// The five heroes, in seat order
pub const HEROES: [HeroClass; 5] = [
    HeroClass {
        default_name: "TROY",
        kind: HeroKind::BladeMaster,
        max_hp: 100,
        max_mana: 50,
        spell: Spell {
            name: "BLADE FURY",
            mana_cost: 25,
            effect: SpellEffect::Damage(80),
            description: "Unleash a whirlwind of steel!",
        },
    },
    HeroClass {
        default_name: "DEANO",
        kind: HeroKind::Tank,
        max_hp: 150,
        max_mana: 40,
        spell: Spell {
            name: "FORTRESS",
            mana_cost: 20,
            effect: SpellEffect::HealParty(40),
            description: "Heal all heroes for 40 HP!",
        },
    },
    HeroClass {
        default_name: "DAVE",
        kind: HeroKind::FireMage,
        max_hp: 80,
        max_mana: 80,
        spell: Spell {
            name: "INFERNO",
            mana_cost: 35,
            effect: SpellEffect::Damage(120),
            description: "Rain fire from the heavens!",
        },
    },
    HeroClass {
        default_name: "JACK",
        kind: HeroKind::Ranger,
        max_hp: 90,
        max_mana: 60,
        spell: Spell {
            name: "ARROW STORM",
            mana_cost: 30,
            effect: SpellEffect::Damage(100),
            description: "A hail of deadly arrows!",
        },
    },
    HeroClass {
        default_name: "MICK",
        kind: HeroKind::StormCaller,
        max_hp: 85,
        max_mana: 70,
        spell: Spell {
            name: "THUNDERSTRIKE",
            mana_cost: 30,
            effect: SpellEffect::Damage(110),
            description: "Call down the thunder!",
        },
    },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonsterKind {
    pub name: &'static str,
    pub hp: i64,
    pub damage: i64,
    pub gold: i64,
    pub drop_chance: f64,
    pub taunt: &'static str,
}

const fn monster(
    name: &'static str,
    hp: i64,
    damage: i64,
    gold: i64,
    drop_chance: f64,
    taunt: &'static str,
) -> MonsterKind {
    MonsterKind {
        name,
        hp,
        damage,
        gold,
        drop_chance,
        taunt,
    }
}

/// Regular monsters, one table per floor
pub const FLOOR_MONSTERS: [[MonsterKind; 5]; 3] = [
    [
        monster("Barry the Confused Goblin", 60, 15, 20, 0.4, "Wait, which end of the sword do I hold?"),
        monster("Kevin the Accountant Skeleton", 50, 12, 15, 0.35, "Your taxes are OVERDUE!"),
        monster("Susan from HR (Zombie)", 70, 18, 25, 0.45, "Did you fill out the incident report?"),
        monster("Gary the Slime (Middle Management)", 40, 10, 10, 0.3, "Let's circle back on this attack..."),
        monster("Derek the Disappointed Dad Spider", 55, 14, 18, 0.4, "I'm not angry, just disappointed."),
    ],
    [
        monster("Chad the Gym Bro Orc", 120, 25, 40, 0.5, "Do you even LIFT, bro?!"),
        monster("Karen the Banshee", 90, 30, 45, 0.45, "I WANT TO SPEAK TO YOUR DUNGEON MASTER!"),
        monster("Trevor the Troll (IT Support)", 140, 22, 50, 0.5, "Have you tried turning yourself off and on?"),
        monster("Brenda's Book Club Basilisk", 100, 28, 35, 0.45, "This month we're reading... YOUR OBITUARY!"),
        monster("Uncle Terry the Drunk Minotaur", 130, 32, 55, 0.55, "Back in MY day, adventurers had RESPECT!"),
    ],
    [
        monster("Gerald the HOA Dragon", 180, 38, 80, 0.6, "Your lawn is 2mm too tall! PREPARE TO DIE!"),
        monster("Darren the Crypto Bro Demon", 160, 35, 70, 0.55, "Have you heard about this thing called DungeonCoin?"),
        monster("Cheryl the PTA Vampire", 150, 33, 65, 0.55, "The bake sale needs YOUR BLOOD... I mean cookies!"),
        monster("Big Dave's Evil Twin", 170, 40, 75, 0.6, "I'm Dave but EVIL! And I use the WRONG BBQ sauce!"),
        monster("Sharon (Everyone's Ex)", 200, 42, 100, 0.7, "We need to TALK about our RELATIONSHIP!"),
    ],
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossKind {
    pub monster: MonsterKind,
    /// Fixed weak spot
    pub weak_spot: u8,
}

/// One boss per floor; bosses always drop
pub const BOSSES: [BossKind; 3] = [
    BossKind {
        monster: monster(
            "MEGA KAREN - Regional Manager of Pain",
            200,
            30,
            100,
            1.0,
            "I've filed a complaint with the DARK LORD!",
        ),
        weak_spot: 20,
    },
    BossKind {
        monster: monster(
            "BOOMER THE DESTROYER - Back In My Day...",
            350,
            40,
            200,
            1.0,
            "You millennials wouldn't last ONE DAY in a REAL dungeon!",
        ),
        weak_spot: 19,
    },
    BossKind {
        monster: monster(
            "THE MOTHER-IN-LAW - Final Form",
            500,
            50,
            500,
            1.0,
            "Why can't you be more like your SISTER'S adventuring party?!",
        ),
        weak_spot: 18,
    },
];

/// Monster drops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUp {
    /// HP for the first wounded hero
    Heal(i64),
    /// Mana for the first drained hero
    Mana(i64),
    HealAll(i64),
    /// Added to the next damaging hit
    BonusDamage(i64),
    /// Blocks this many counterattacks
    Shield(u32),
    ManaAll(i64),
    Gold(i64),
    /// Multiplies the next spell
    SpellBoost(i64),
}

impl PowerUp {
    pub fn name(&self) -> &'static str {
        match self {
            PowerUp::Heal(_) => "Health Potion",
            PowerUp::Mana(_) => "Mana Crystal",
            PowerUp::HealAll(_) => "Mega Potion",
            PowerUp::BonusDamage(_) => "Power Scroll",
            PowerUp::Shield(_) => "Shield Rune",
            PowerUp::ManaAll(_) => "Mana Fountain",
            PowerUp::Gold(_) => "Lucky Charm",
            PowerUp::SpellBoost(_) => "Ancient Tome",
        }
    }
}

/// Drop table, equally weighted
pub const POWER_UPS: [PowerUp; 8] = [
    PowerUp::Heal(30),
    PowerUp::Mana(25),
    PowerUp::HealAll(20),
    PowerUp::BonusDamage(50),
    PowerUp::Shield(1),
    PowerUp::ManaAll(15),
    PowerUp::Gold(50),
    PowerUp::SpellBoost(2),
];

pub(crate) const HIT_LINES: [&str; 5] = [
    "{hero} lands a solid blow!",
    "{hero} strikes true!",
    "{hero} connects with deadly precision!",
    "{hero} smashes the target!",
    "THWACK! {hero} hits hard!",
];

pub(crate) const MISS_LINES: [&str; 5] = [
    "{hero} swings wildly and misses!",
    "{hero}'s attack goes wide!",
    "{hero} trips over their own feet!",
    "{hero} hits nothing but air!",
    "The monster laughs at {hero}'s attempt!",
];

pub(crate) const CRITICAL_LINES: [&str; 4] = [
    "CRITICAL HIT! {hero} is on FIRE!",
    "{hero} finds the weak spot! DEVASTATING!",
    "BOOM! {hero} unleashes their full power!",
    "{hero} channels their inner legend!",
];

pub(crate) const KILL_LINES: [&str; 4] = [
    "{monster} explodes into gold coins!",
    "{monster} lets out a final cry and dissolves!",
    "VICTORY! {monster} has been vanquished!",
    "{monster} drops to the ground defeated!",
];

pub(crate) const COUNTER_LINES: [&str; 3] = [
    "{monster} strikes back at {hero}!",
    "{monster} retaliates with fury!",
    "{hero} takes a hit from {monster}!",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boss_weak_spots_descend() {
        let spots: Vec<u8> = BOSSES.iter().map(|b| b.weak_spot).collect();
        assert_eq!(spots, vec![20, 19, 18]);
        assert!(BOSSES.iter().all(|b| b.monster.drop_chance >= 1.0));
    }

    #[test]
    fn test_only_the_tank_heals() {
        let healers: Vec<_> = HEROES
            .iter()
            .filter(|h| matches!(h.spell.effect, SpellEffect::HealParty(_)))
            .map(|h| h.kind)
            .collect();
        assert_eq!(healers, vec![HeroKind::Tank]);
    }
}
