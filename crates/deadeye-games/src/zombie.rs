//! Zombie Slayer
//!
//! One or two zombies shamble toward the board, each bound to a number.
//! Hitting a zombie's number drops it for `points_per_hit × multiplier` and
//! it gets back up with a fresh number after a short delay. Anything else is
//! a miss; enough misses and the horde wins.

use deadeye_core::{
    assign_unique, select_target, ActorId, Ctx, Cue, Dart, Game, Millis, Result, RuleTable,
    Selection, Targetable, Tone, Transition,
};
use serde::{Deserialize, Serialize};

/// Most zombies on screen at once
pub const MAX_ZOMBIES: usize = 2;

/// Zombie Slayer settings
///
/// # Example
///
/// ```
/// use deadeye_games::ZombieConfig;
///
/// let config = ZombieConfig::default().with_zombies(4).with_max_misses(0);
/// assert_eq!(config.zombies(), 2);
/// assert_eq!(config.max_misses(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZombieConfig {
    zombies: usize,
    max_misses: u32,
    points_per_hit: i64,
    respawn_delay_ms: Millis,
}

impl ZombieConfig {
    /// Zombies on screen, clamped to `[1, MAX_ZOMBIES]`
    pub fn with_zombies(mut self, n: usize) -> Self {
        self.zombies = n.clamp(1, MAX_ZOMBIES);
        self
    }

    /// Misses allowed before the game ends (at least 1)
    pub fn with_max_misses(mut self, n: u32) -> Self {
        self.max_misses = n.max(1);
        self
    }

    pub fn with_points_per_hit(mut self, points: i64) -> Self {
        self.points_per_hit = points.max(0);
        self
    }

    pub fn with_respawn_delay_ms(mut self, ms: Millis) -> Self {
        self.respawn_delay_ms = ms;
        self
    }

    /// Re-clamp every field (for values that came from a file)
    pub fn normalized(self) -> Self {
        let (zombies, misses, points) = (self.zombies, self.max_misses, self.points_per_hit);
        self.with_zombies(zombies)
            .with_max_misses(misses)
            .with_points_per_hit(points)
    }

    pub fn zombies(&self) -> usize {
        self.zombies
    }

    pub fn max_misses(&self) -> u32 {
        self.max_misses
    }

    pub fn points_per_hit(&self) -> i64 {
        self.points_per_hit
    }

    pub fn respawn_delay_ms(&self) -> Millis {
        self.respawn_delay_ms
    }
}

impl Default for ZombieConfig {
    fn default() -> Self {
        Self {
            zombies: 1,
            max_misses: 3,
            points_per_hit: 100,
            respawn_delay_ms: 500,
        }
    }
}

/// A zombie and the number that kills it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zombie {
    pub id: ActorId,
    pub target: u8,
    /// False between a kill and the respawn
    pub standing: bool,
}

impl Targetable for Zombie {
    fn target_number(&self) -> Option<u8> {
        Some(self.target)
    }

    fn is_targetable(&self) -> bool {
        self.standing
    }
}

/// What the rule table sees for one dart
#[derive(Debug, Clone, Copy)]
struct Aim {
    dart: Dart,
    zombie: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shot {
    Kill { zombie: usize, multiplier: u8 },
    Miss,
}

fn zombie_rules() -> RuleTable<Aim, Shot> {
    RuleTable::<Aim, Shot>::new(|_| Shot::Miss).rule(
        "kill",
        |aim| aim.zombie.is_some(),
        |aim| {
            aim.zombie.map_or(Shot::Miss, |zombie| Shot::Kill {
                zombie,
                multiplier: aim.dart.multiplier,
            })
        },
    )
}

/// Transitions Zombie Slayer schedules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZombieStep {
    /// The zombie at this index gets back up
    Respawn(usize),
}

/// Zombie Slayer game state
#[derive(Debug, Clone)]
pub struct ZombieSlayer {
    config: ZombieConfig,
    zombies: Vec<Zombie>,
    score: i64,
    kills: u32,
    misses: u32,
    rules: RuleTable<Aim, Shot>,
}

impl ZombieSlayer {
    pub fn config(&self) -> &ZombieConfig {
        &self.config
    }

    pub fn zombies(&self) -> &[Zombie] {
        &self.zombies
    }

    /// Numbers of the zombies currently standing
    pub fn targets(&self) -> Vec<u8> {
        self.zombies
            .iter()
            .filter(|z| z.standing)
            .map(|z| z.target)
            .collect()
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    fn kill(&mut self, index: usize, multiplier: u8, ctx: &mut Ctx<'_, ZombieStep>) {
        let points = self.config.points_per_hit * i64::from(multiplier);
        self.score += points;
        self.kills += 1;

        let others: Vec<u8> = self
            .zombies
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, z)| z.target)
            .collect();
        let next = assign_unique(ctx.rng, &others);
        if let Some(zombie) = self.zombies.get_mut(index) {
            zombie.standing = false;
            zombie.target = next;
        }

        let text = if multiplier > 1 {
            format!("{}X HIT! +{}", multiplier, points)
        } else {
            format!("HIT! +{}", points)
        };
        ctx.log(Tone::Success, text);
        ctx.cue(Cue::Kill);
        ctx.stat("score", self.score);
        ctx.stat("kills", i64::from(self.kills));
        ctx.defer(ZombieStep::Respawn(index), self.config.respawn_delay_ms);
    }

    fn miss(&mut self, dart: &Dart, ctx: &mut Ctx<'_, ZombieStep>) {
        self.misses += 1;
        log::debug!("zombie: miss on {} (targets {:?})", dart, self.targets());
        ctx.log(Tone::Miss, "MISS!");
        ctx.cue(Cue::Miss);
        ctx.stat("misses", i64::from(self.misses));
        if self.misses >= self.config.max_misses {
            ctx.log(
                Tone::Danger,
                format!("GAME OVER - {} kills, {} points", self.kills, self.score),
            );
            ctx.cue(Cue::Defeat);
            ctx.lose("the horde got through");
        }
    }
}

impl Game for ZombieSlayer {
    type Setup = ZombieConfig;
    type Pending = ZombieStep;
    const NAME: &'static str = "Zombie Slayer";

    fn setup(config: ZombieConfig, ctx: &mut Ctx<'_, ZombieStep>) -> Result<Self> {
        let config = config.normalized();
        let mut zombies = Vec::with_capacity(config.zombies);
        for i in 0..config.zombies {
            let used: Vec<u8> = zombies.iter().map(|z: &Zombie| z.target).collect();
            zombies.push(Zombie {
                id: ActorId::new(i as u64),
                target: assign_unique(ctx.rng, &used),
                standing: true,
            });
        }

        ctx.log(Tone::System, "START!");
        for zombie in &zombies {
            ctx.transition(Transition::EncounterStarted {
                label: format!("zombie {}", zombie.target),
            });
        }

        Ok(Self {
            config,
            zombies,
            score: 0,
            kills: 0,
            misses: 0,
            rules: zombie_rules(),
        })
    }

    fn throw(&mut self, dart: Dart, ctx: &mut Ctx<'_, ZombieStep>) {
        // Only exact numbers kill; the fallback target is not a hit here
        let zombie = match select_target(&dart, &self.zombies, 0) {
            Some(Selection::Exact(i)) => Some(i),
            _ => None,
        };
        let verdict = self.rules.evaluate(&Aim { dart, zombie });
        match verdict.outcome {
            Shot::Kill { zombie, multiplier } => self.kill(zombie, multiplier, ctx),
            Shot::Miss => self.miss(&dart, ctx),
        }
    }

    fn resolve(&mut self, step: ZombieStep, ctx: &mut Ctx<'_, ZombieStep>) {
        match step {
            ZombieStep::Respawn(index) => {
                if let Some(zombie) = self.zombies.get_mut(index) {
                    zombie.standing = true;
                    ctx.transition(Transition::EncounterStarted {
                        label: format!("zombie {}", zombie.target),
                    });
                }
            }
        }
    }

    fn score(&self) -> i64 {
        self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deadeye_core::{DartEvent, Phase, Rejection, Session};

    fn started(config: ZombieConfig) -> Session<ZombieSlayer> {
        let mut session = Session::new(1234);
        session.start(config).unwrap();
        session
    }

    fn target(session: &Session<ZombieSlayer>) -> u8 {
        session.game().unwrap().zombies()[0].target
    }

    fn off_target(session: &Session<ZombieSlayer>) -> u8 {
        let taken = session.game().unwrap().targets();
        (1..=20).find(|n| !taken.contains(n)).unwrap()
    }

    #[test]
    fn test_double_kill_scores_200() {
        let mut session = started(ZombieConfig::default());
        let t = target(&session);

        let result = session.handle_dart_throw(DartEvent::double(t));
        let game = session.game().unwrap();
        assert_eq!(game.score(), 200);
        assert_eq!(game.kills(), 1);
        assert_eq!(game.misses(), 0);
        assert!(result.cmd.has_cue(Cue::Kill));
        assert!(session.feed().contains("2X HIT! +200"));
    }

    #[test]
    fn test_three_misses_lose_once() {
        let mut session = started(ZombieConfig::default());
        let t = target(&session);
        session.handle_dart_throw(DartEvent::double(t));
        session.tick(500);
        assert_eq!(session.phase(), Phase::InRound);

        let mut losses = 0;
        for _ in 0..4 {
            let miss = off_target(&session);
            let result = session.handle_dart_throw(DartEvent::single(miss));
            losses += result
                .cmd
                .transitions()
                .iter()
                .filter(|t| matches!(t, Transition::Lost { .. }))
                .count();
        }
        assert_eq!(losses, 1);
        assert_eq!(session.phase(), Phase::Lost);
        assert_eq!(session.game().unwrap().misses(), 3);
        assert_eq!(session.game().unwrap().score(), 200);
    }

    #[test]
    fn test_darts_rejected_while_respawning() {
        let mut session = started(ZombieConfig::default());
        let t = target(&session);
        session.handle_dart_throw(DartEvent::single(t));
        assert!(!session.game().unwrap().zombies()[0].standing);

        let result = session.handle_dart_throw(DartEvent::single(1));
        assert_eq!(result.rejected, Some(Rejection::PendingTransition));
        assert_eq!(session.game().unwrap().misses(), 0);

        session.tick(499);
        assert_eq!(session.phase(), Phase::Pending);
        session.tick(1);
        assert!(session.game().unwrap().zombies()[0].standing);
    }

    #[test]
    fn test_bull_is_a_miss() {
        let mut session = started(ZombieConfig::default());
        session.handle_dart_throw(DartEvent::double_bull());
        assert_eq!(session.game().unwrap().misses(), 1);
    }

    #[test]
    fn test_two_zombies_have_distinct_numbers() {
        for seed in 0..50 {
            let mut session: Session<ZombieSlayer> = Session::new(seed);
            session.start(ZombieConfig::default().with_zombies(2)).unwrap();
            let targets = session.game().unwrap().targets();
            assert_eq!(targets.len(), 2);
            assert_ne!(targets[0], targets[1]);
        }
    }

    #[test]
    fn test_second_zombie_still_standing_during_respawn() {
        let mut session = started(ZombieConfig::default().with_zombies(2));
        let first = session.game().unwrap().zombies()[0].target;
        session.handle_dart_throw(DartEvent::triple(first));
        let game = session.game().unwrap();
        assert_eq!(game.score(), 300);
        assert_eq!(game.targets().len(), 1);

        session.advance();
        let game = session.game().unwrap();
        let targets = game.targets();
        assert_eq!(targets.len(), 2);
        assert_ne!(targets[0], targets[1]);
    }

    #[test]
    fn test_config_from_ron() {
        let config: ZombieConfig = ron::from_str("(zombies: 2, max_misses: 5)").unwrap();
        assert_eq!(config.zombies(), 2);
        assert_eq!(config.max_misses(), 5);
        assert_eq!(config.points_per_hit(), 100);
    }
}
