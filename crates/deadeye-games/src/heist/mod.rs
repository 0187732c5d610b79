//! Heist Crew
//!
//! A cooperative game for three: Hacker, Infiltrator and Demolitions take
//! turns, one dart each, against a mission clock and a shared alert level.
//! Missions unlock in order and pay out crew reputation.
//!
//! A mission is made of one or more legs (the final job has three). Every
//! leg kind has its own rule table; a wrong dart raises the alert by the
//! leg's penalty. After each dart the mission is checked for success
//! before the alert is checked for failure, so the dart that finishes the
//! job wins it even if it also maxed the alert.

mod missions;

pub use missions::{LegKind, Mission, MissionId, Role};

use missions::WARNING_SECS;

use deadeye_core::{
    ActorId, Countdown, CountdownEvent, Ctx, Cue, Dart, Error, Game, GameRng, Living, Millis,
    ProgressRecord, ResourcePool, Result, Roster, RuleTable, Sequence, Tone, Transition,
};
use serde::{Deserialize, Serialize};

/// Crew size
pub const CREW_SIZE: usize = 3;
/// Alert that blows the job
pub const MAX_ALERT: i64 = 100;
/// Alert at which security starts closing in
pub const HIGH_ALERT: i64 = 70;
/// Bonus seconds from a Hacker double on a combination
pub const HACKER_TIME_BONUS_SECS: u64 = 10;

/// Heist Crew settings
///
/// The crew's saved progress travels with the config so that locked
/// missions can be refused at start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeistConfig {
    crew: Vec<String>,
    mission: MissionId,
    progress: ProgressRecord,
}

impl HeistConfig {
    /// Crew names in seat order: Hacker, Infiltrator, Demolitions
    pub fn with_crew<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.crew = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_mission(mut self, mission: MissionId) -> Self {
        self.mission = mission;
        self
    }

    pub fn with_progress(mut self, progress: ProgressRecord) -> Self {
        self.progress = progress;
        self
    }

    pub fn crew(&self) -> &[String] {
        &self.crew
    }

    pub fn mission(&self) -> MissionId {
        self.mission
    }

    pub fn progress(&self) -> &ProgressRecord {
        &self.progress
    }
}

impl Default for HeistConfig {
    fn default() -> Self {
        Self {
            crew: Vec::new(),
            mission: MissionId::Vault,
            progress: ProgressRecord::new(MissionId::Vault.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrewMember {
    pub id: ActorId,
    pub name: String,
    pub role: Role,
    pub score: i64,
}

impl Living for CrewMember {
    fn is_alive(&self) -> bool {
        true
    }
}

/// What the leg rules see
#[derive(Debug, Clone, Copy)]
struct Attempt {
    dart: Dart,
    role: Role,
    /// Next combination number, on combination legs
    expected: Option<u8>,
}

impl Attempt {
    fn on_combination(&self) -> bool {
        self.expected.is_some() && self.dart.number() == self.expected
    }

    fn odd(&self) -> bool {
        matches!(self.dart.number(), Some(n) if n % 2 == 1)
    }

    fn high(&self) -> bool {
        matches!(self.dart.number(), Some(15..=20))
    }

    fn multiplier(&self) -> i64 {
        i64::from(self.dart.multiplier)
    }

    fn cash(&self) -> i64 {
        i64::from(self.dart.value) * 100
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Play {
    /// Objective moved forward by `gain`
    Progress {
        gain: i64,
        points: i64,
        bonus_secs: u64,
    },
    /// A role ability finished the leg outright
    Complete { points: i64 },
    /// Wrong target; the leg's penalty goes on the alert
    Alarm,
}

fn progress(gain: i64, points: i64) -> Play {
    Play::Progress {
        gain,
        points,
        bonus_secs: 0,
    }
}

fn leg_rules(kind: LegKind) -> RuleTable<Attempt, Play> {
    let table = RuleTable::<Attempt, Play>::new(|_| Play::Alarm);
    match kind {
        LegKind::Combination { .. } => table
            .rule(
                "infiltrator_triple",
                |a| a.on_combination() && a.role == Role::Infiltrator && a.dart.is_triple(),
                |a| Play::Complete {
                    points: 100 * a.multiplier(),
                },
            )
            .rule(
                "hacker_double",
                |a| a.on_combination() && a.role == Role::Hacker && a.dart.is_double(),
                |a| Play::Progress {
                    gain: 1,
                    points: 100 * a.multiplier(),
                    bonus_secs: HACKER_TIME_BONUS_SECS,
                },
            )
            .rule("correct", |a| a.on_combination(), |a| progress(1, 100 * a.multiplier())),
        LegKind::Servers { .. } => table
            .rule(
                "infiltrator_triple",
                |a| a.odd() && a.role == Role::Infiltrator && a.dart.is_triple(),
                |_| Play::Complete { points: 0 },
            )
            .rule(
                "hacker_double",
                |a| a.odd() && a.role == Role::Hacker && a.dart.is_double(),
                |a| progress(2, 50 * a.multiplier() * 2),
            )
            .rule("odd", |a| a.odd(), |a| progress(1, 50 * a.multiplier())),
        LegKind::Diamonds { .. } => table
            .rule(
                "demolitions_bull",
                |a| a.dart.is_bull() && a.role == Role::Demolitions,
                |_| progress(2000, 2000),
            )
            .rule("bull", |a| a.dart.is_bull(), |_| progress(500, 500))
            .rule(
                "high_triple",
                |a| a.high() && a.dart.is_triple(),
                |a| progress(a.cash() + 500, a.cash() + 500),
            )
            .rule("high", |a| a.high(), |a| progress(a.cash(), a.cash())),
        LegKind::LuckySevens { .. } => table
            .rule(
                "single_seven",
                |a| a.dart.hits(7) && a.dart.multiplier == 1,
                |_| progress(1, 100),
            )
            .rule(
                "double_seven",
                |a| a.dart.hits(7) && a.dart.is_double(),
                |_| progress(2, 200),
            )
            .rule(
                "infiltrator_triple",
                |a| a.dart.is_triple() && a.role == Role::Infiltrator,
                |_| Play::Complete { points: 300 },
            )
            .rule("triple", |a| a.dart.is_triple(), |_| progress(3, 300)),
        LegKind::FinalCombination { .. } => table.rule(
            "correct",
            |a| a.on_combination(),
            |a| progress(1, 100 * a.multiplier()),
        ),
        LegKind::FinalServers { .. } => {
            table.rule("odd", |a| a.odd(), |a| progress(1, 50 * a.multiplier()))
        }
        LegKind::FinalDiamonds { .. } => {
            table.rule("high", |a| a.high(), |a| progress(a.cash(), a.cash()))
        }
    }
}

/// One objective of a mission
#[derive(Debug, Clone)]
pub struct Leg {
    kind: LegKind,
    sequence: Option<Sequence>,
    progress: i64,
    goal: i64,
    rules: RuleTable<Attempt, Play>,
}

impl Leg {
    fn new(kind: LegKind, rng: &mut GameRng) -> Self {
        let (sequence, goal) = match kind {
            LegKind::Combination { len } => (Some(Sequence::random(rng, len)), len as i64),
            LegKind::FinalCombination { numbers } => {
                (Some(Sequence::new(numbers.to_vec())), numbers.len() as i64)
            }
            LegKind::Servers { goal }
            | LegKind::Diamonds { goal }
            | LegKind::LuckySevens { goal }
            | LegKind::FinalServers { goal }
            | LegKind::FinalDiamonds { goal } => (None, goal),
        };
        Self {
            kind,
            sequence,
            progress: 0,
            goal,
            rules: leg_rules(kind),
        }
    }

    pub fn kind(&self) -> LegKind {
        self.kind
    }

    /// The combination, on combination legs
    pub fn sequence(&self) -> Option<&Sequence> {
        self.sequence.as_ref()
    }

    pub fn progress(&self) -> i64 {
        self.progress
    }

    pub fn goal(&self) -> i64 {
        self.goal
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= self.goal
    }

    fn expected(&self) -> Option<u8> {
        self.sequence.as_ref().and_then(|s| s.expected())
    }

    fn gain(&mut self, gain: i64, number: Option<u8>) {
        match self.sequence.as_mut() {
            Some(sequence) => {
                sequence.hit(number);
                self.progress = sequence.progress() as i64;
            }
            None => self.progress = (self.progress + gain).min(self.goal),
        }
    }

    fn complete(&mut self) {
        if let Some(sequence) = self.sequence.as_mut() {
            sequence.complete();
        }
        self.progress = self.goal;
    }
}

/// Debrief after a mission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeistReport {
    pub mission: MissionId,
    pub success: bool,
    pub reason: String,
    pub time_taken_secs: u64,
    pub seconds_left: u64,
    pub alert: i64,
    pub team_score: i64,
    pub darts_thrown: u32,
    /// Reputation earned (zero on failure)
    pub reward: u64,
    pub unlocked: Option<MissionId>,
}

/// Heist Crew never schedules transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeistStep {}

/// Heist Crew game state
#[derive(Debug, Clone)]
pub struct HeistCrew {
    mission: &'static Mission,
    crew: Roster<CrewMember>,
    legs: Vec<Leg>,
    leg: usize,
    alert: ResourcePool,
    clock: Countdown,
    darts_thrown: u32,
    progress: ProgressRecord,
    report: Option<HeistReport>,
}

impl HeistCrew {
    pub fn mission(&self) -> &'static Mission {
        self.mission
    }

    pub fn crew(&self) -> &Roster<CrewMember> {
        &self.crew
    }

    pub fn active_member(&self) -> Option<&CrewMember> {
        self.crew.current()
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// The leg being worked on (the last one once the job is done)
    pub fn current_leg(&self) -> Option<&Leg> {
        self.legs.get(self.leg).or_else(|| self.legs.last())
    }

    pub fn alert(&self) -> i64 {
        self.alert.current()
    }

    pub fn clock(&self) -> &Countdown {
        &self.clock
    }

    pub fn darts_thrown(&self) -> u32 {
        self.darts_thrown
    }

    /// Saved progress, updated when a mission succeeds
    pub fn progress(&self) -> &ProgressRecord {
        &self.progress
    }

    pub fn report(&self) -> Option<&HeistReport> {
        self.report.as_ref()
    }

    pub fn team_score(&self) -> i64 {
        self.crew.iter().map(|m| m.score).sum()
    }

    fn is_accomplished(&self) -> bool {
        self.legs.iter().all(|l| l.is_complete())
    }

    fn narrate(
        leg: &Leg,
        rule: &str,
        name: &str,
        dart: &Dart,
        points: i64,
        ctx: &mut Ctx<'_, HeistStep>,
    ) {
        let number = dart.segment();
        let ability = match (leg.kind, rule) {
            (LegKind::Combination { .. }, "hacker_double") => {
                Some(format!("HACKER BONUS: +{} seconds!", HACKER_TIME_BONUS_SECS))
            }
            (LegKind::Combination { .. }, "infiltrator_triple") => {
                Some("INFILTRATOR SPECIAL: Sequence auto-completed!".to_string())
            }
            (LegKind::Servers { .. }, "hacker_double") => {
                Some("HACKER BONUS: Double hack! +2 servers!".to_string())
            }
            (LegKind::Servers { .. }, "infiltrator_triple") => {
                Some("INFILTRATOR SPECIAL: All servers hacked!".to_string())
            }
            (LegKind::Diamonds { .. }, "demolitions_bull") => {
                Some("DEMOLITIONS SPECIAL: EXPLOSIVE BONUS! +$2000!".to_string())
            }
            (LegKind::LuckySevens { .. }, "infiltrator_triple") => {
                Some("INFILTRATOR SPECIAL: Casino defeated!".to_string())
            }
            _ => None,
        };

        let line = match leg.kind {
            LegKind::Combination { .. } => Some(format!(
                "{} hit {}! Combination progress: {}/{}",
                name, number, leg.progress, leg.goal
            )),
            LegKind::Servers { .. } if rule != "infiltrator_triple" => Some(format!(
                "{} hacked server {}! Progress: {}/{}",
                name, number, leg.progress, leg.goal
            )),
            LegKind::Diamonds { .. } => match rule {
                "bull" => Some("Bullseye! +$500!".to_string()),
                "demolitions_bull" => None,
                _ => {
                    if rule == "high_triple" {
                        ctx.log(Tone::Success, "Triple bonus! +$500!");
                    }
                    Some(format!(
                        "{} stole diamonds worth ${}! Total: ${}/${}",
                        name, points, leg.progress, leg.goal
                    ))
                }
            },
            LegKind::LuckySevens { .. } => Some(match rule {
                "single_seven" => format!("{} hit lucky 7! +1 success", name),
                "double_seven" => format!("{} hit double 7! +2 successes", name),
                _ => format!("{} hit triple {}! +3 successes", name, number),
            }),
            LegKind::FinalCombination { .. } => Some(format!(
                "Phase 1: Hit {}! Progress: {}/{}",
                number, leg.progress, leg.goal
            )),
            LegKind::FinalServers { .. } => Some(format!(
                "Phase 2: Server hacked! Progress: {}/{}",
                leg.progress, leg.goal
            )),
            LegKind::FinalDiamonds { .. } => Some(format!(
                "Phase 3: +${}! Total: ${}/${}",
                points, leg.progress, leg.goal
            )),
            LegKind::Servers { .. } => None,
        };

        if let Some(line) = line {
            ctx.log(Tone::Success, line);
        }
        if let Some(ability) = ability {
            ctx.log(Tone::Ability, ability);
        }
    }

    fn alarm_line(leg: &Leg, name: &str, dart: &Dart, expected: Option<u8>) -> String {
        let penalty = leg.kind.penalty();
        match leg.kind {
            LegKind::Combination { .. } => format!(
                "{} hit {}, needed {}. Alert +{}%!",
                name,
                dart,
                expected.map(|n| n.to_string()).unwrap_or_default(),
                penalty
            ),
            LegKind::Servers { .. } => format!("{} hit firewall! Alert +{}%!", name, penalty),
            LegKind::Diamonds { .. } => format!("{} triggered alarm! Alert +{}%!", name, penalty),
            LegKind::LuckySevens { .. } => format!("{} wrong pattern! Alert +{}%!", name, penalty),
            LegKind::FinalCombination { .. } => "Phase 1: Wrong number!".to_string(),
            LegKind::FinalServers { .. } => "Phase 2: Firewall triggered!".to_string(),
            LegKind::FinalDiamonds { .. } => "Phase 3: Wrong case!".to_string(),
        }
    }

    fn finish(&mut self, success: bool, reason: &str, ctx: &mut Ctx<'_, HeistStep>) {
        let seconds_left = self.clock.remaining_secs();
        let mut report = HeistReport {
            mission: self.mission.id,
            success,
            reason: reason.to_string(),
            time_taken_secs: self.mission.time_limit_secs.saturating_sub(seconds_left),
            seconds_left,
            alert: self.alert.current(),
            team_score: self.team_score(),
            darts_thrown: self.darts_thrown,
            reward: 0,
            unlocked: None,
        };

        if success {
            report.reward = self.mission.reward(seconds_left, report.alert);
            let next = self.mission.id.next();
            let unlocked = self.progress.complete_stage(
                self.mission.id.as_str(),
                report.reward,
                next.map(|m| m.as_str()),
            );
            report.unlocked = unlocked.and_then(|id| id.parse().ok());

            ctx.announce("MISSION COMPLETE!");
            ctx.log(
                Tone::Success,
                format!("{} complete! +{} crew rep", self.mission.name, report.reward),
            );
            if let Some(next) = report.unlocked {
                ctx.log(
                    Tone::System,
                    format!("MISSION UNLOCKED: {}", next.mission().name),
                );
            }
            ctx.cue(Cue::Victory);
            log::info!(
                "heist: {} complete, reward {}",
                self.mission.id,
                report.reward
            );
            self.report = Some(report);
            ctx.win();
        } else {
            ctx.announce("MISSION FAILED");
            ctx.log(Tone::Danger, format!("MISSION FAILED: {}", reason));
            ctx.cue(Cue::Defeat);
            self.report = Some(report);
            ctx.lose(reason);
        }
    }
}

impl Game for HeistCrew {
    type Setup = HeistConfig;
    type Pending = HeistStep;
    const NAME: &'static str = "Heist Crew";
    const FEED_CAPACITY: usize = 10;

    fn setup(config: HeistConfig, ctx: &mut Ctx<'_, HeistStep>) -> Result<Self> {
        let names: Vec<&str> = config
            .crew
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .collect();
        if names.len() < CREW_SIZE {
            return Err(Error::MissingConfig(format!(
                "a heist crew needs {} named members, got {}",
                CREW_SIZE,
                names.len()
            )));
        }

        let mission = config.mission.mission();
        if !config.progress.is_unlocked(mission.id.as_str()) {
            return Err(Error::Locked(mission.id.as_str().to_string()));
        }

        let crew = names
            .iter()
            .zip(Role::SEATS)
            .enumerate()
            .map(|(seat, (name, role))| CrewMember {
                id: ActorId::new(seat as u64),
                name: name.to_string(),
                role,
                score: 0,
            })
            .collect();
        let legs: Vec<Leg> = mission.legs.iter().map(|&k| Leg::new(k, ctx.rng)).collect();

        ctx.announce("HEIST STARTED!");
        ctx.log(Tone::System, format!("{}: {}", mission.code, mission.name));
        ctx.log(Tone::System, "HEIST INITIATED! Good luck, crew!");
        if let Some(sequence) = legs.first().and_then(|l| l.sequence()) {
            let numbers: Vec<String> = sequence.numbers().iter().map(|n| n.to_string()).collect();
            ctx.log(Tone::Info, format!("Combination: {}", numbers.join(" - ")));
        }

        Ok(Self {
            mission,
            crew: Roster::new(crew),
            legs,
            leg: 0,
            alert: ResourcePool::empty(MAX_ALERT),
            clock: Countdown::from_secs(mission.time_limit_secs, WARNING_SECS),
            darts_thrown: 0,
            progress: config.progress,
            report: None,
        })
    }

    fn throw(&mut self, dart: Dart, ctx: &mut Ctx<'_, HeistStep>) {
        self.darts_thrown += 1;
        let Some(member) = self.crew.current() else {
            return;
        };
        let (name, role) = (member.name.clone(), member.role);
        let Some(leg) = self.legs.get_mut(self.leg) else {
            return;
        };

        let expected = leg.expected();
        let attempt = Attempt {
            dart,
            role,
            expected,
        };
        let verdict = leg.rules.evaluate(&attempt);
        log::debug!("heist: {} by {} -> {}", dart, name, verdict.rule);

        let points = match verdict.outcome {
            Play::Progress {
                gain,
                points,
                bonus_secs,
            } => {
                leg.gain(gain, dart.number());
                if bonus_secs > 0 {
                    self.clock.extend_secs(bonus_secs);
                }
                ctx.cue(Cue::Hit);
                points
            }
            Play::Complete { points } => {
                leg.complete();
                ctx.cue(Cue::Critical);
                points
            }
            Play::Alarm => {
                let before = self.alert.current();
                self.alert.add(leg.kind.penalty());
                ctx.log(Tone::Miss, Self::alarm_line(leg, &name, &dart, expected));
                ctx.cue(Cue::Miss);
                if before < HIGH_ALERT && self.alert.current() >= HIGH_ALERT {
                    ctx.cue(Cue::Alarm);
                }
                ctx.stat("alert", self.alert.current());
                0
            }
        };

        if verdict.outcome != Play::Alarm {
            Self::narrate(leg, verdict.rule, &name, &dart, points, ctx);
            if let Some(member) = self.crew.current_mut() {
                member.score += points;
            }
            ctx.stat("team_score", self.team_score());
        }

        let leg_done = self.legs.get(self.leg).is_some_and(|l| l.is_complete());
        if leg_done && self.leg + 1 < self.legs.len() {
            self.leg += 1;
            ctx.log(
                Tone::System,
                format!(
                    "PHASE {} COMPLETE! Moving to Phase {}...",
                    self.leg,
                    self.leg + 1
                ),
            );
            ctx.announce(format!("PHASE {} DONE!", self.leg));
            ctx.transition(Transition::PhaseAdvanced {
                phase: self.leg as u32 + 1,
            });
        }

        self.crew.advance();
        if let Some(next) = self.crew.current() {
            ctx.transition(Transition::TurnChanged {
                actor: next.name.clone(),
            });
        }

        if self.is_accomplished() {
            if self.legs.len() > 1 {
                ctx.log(
                    Tone::System,
                    format!("PHASE {} COMPLETE! THE BIG SCORE IS YOURS!", self.legs.len()),
                );
            }
            self.finish(true, "Objective complete!", ctx);
        } else if self.alert.current() >= MAX_ALERT {
            self.finish(false, "Alert level reached 100%!", ctx);
        }
    }

    fn resolve(&mut self, step: HeistStep, _ctx: &mut Ctx<'_, HeistStep>) {
        match step {}
    }

    fn elapse(&mut self, elapsed_ms: Millis, ctx: &mut Ctx<'_, HeistStep>) {
        match self.clock.elapse(elapsed_ms) {
            CountdownEvent::Running => {}
            CountdownEvent::Warning => {
                ctx.announce(format!("{} SECONDS!", WARNING_SECS));
                ctx.log(
                    Tone::Warning,
                    format!(
                        "{} seconds remaining! Escape timer activated!",
                        WARNING_SECS
                    ),
                );
                ctx.cue(Cue::Warning);
            }
            CountdownEvent::Expired => self.finish(false, "Time ran out!", ctx),
        }
    }

    fn score(&self) -> i64 {
        self.team_score()
    }
}
