//! Dad Bod Olympics
//!
//! Two to five dads, five events, three darts each per event. Each event
//! scores darts its own way and has one bonus shot. After the last dad of an
//! event throws, the event closes, medals go out (3/2/1 points) and the
//! table waits for the host to move on. Most medal points after five events
//! wins, and everyone gets an award of some kind.

use deadeye_core::{
    ActorId, Bed, Ctx, Cue, Dart, Game, GameRng, Living, Millis, Result, Roster, RuleTable, Tone,
    Transition, MAX_PLAYERS,
};
use serde::{Deserialize, Serialize};

pub const DARTS_PER_PLAYER: u32 = 3;
pub const MIN_PLAYERS: usize = 2;
/// Pause after the last dart of an event before the results
pub const RESULTS_DELAY_MS: Millis = 1500;
/// What the Dad Joke Delivery is aiming for
pub const PUNCHLINE_TOTAL: i64 = 50;

/// How an event turns a dart into points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scoring {
    /// Face value
    Highest,
    /// Even numbers and bulls only
    EvenOnly,
    /// 10-20 full, under 10 half, bull burnt
    BbqZone,
    /// Closest total to 50
    Punchline,
    /// Doubles and triples only
    MultiplesOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub name: &'static str,
    pub description: &'static str,
    pub target: &'static str,
    pub scoring: Scoring,
    pub bonus_text: &'static str,
    pub bonus: i64,
}

impl Event {
    /// Whether this dart earns the event's bonus on its own
    ///
    /// The punchline bonus depends on the whole turn and is checked when
    /// the third dart lands.
    pub fn is_bonus_dart(&self, dart: &Dart) -> bool {
        match self.scoring {
            Scoring::Highest => dart.hits(20) && dart.is_triple(),
            Scoring::EvenOnly => dart.is_bull(),
            Scoring::BbqZone => dart.hits(15) && dart.is_triple(),
            Scoring::Punchline => false,
            Scoring::MultiplesOnly => dart.is_double_bull(),
        }
    }
}

pub static EVENTS: [Event; 5] = [
    Event {
        name: "THE RECLINER RUSH",
        description: "Race to your favourite chair before someone else takes it! \
                      Hit the HIGHEST numbers.",
        target: "Aim HIGH! Highest total score wins.",
        scoring: Scoring::Highest,
        bonus_text: "TRIPLE 20 = You knocked the dog off the couch! +50 bonus!",
        bonus: 50,
    },
    Event {
        name: "LAWN MOWER GRAND PRIX",
        description: "Navigate your mower in perfect lines! Hit EVEN numbers only.",
        target: "Only EVEN numbers count! Odd numbers = 0 points!",
        scoring: Scoring::EvenOnly,
        bonus_text: "BULLSEYE = Perfect stripes! The neighbours are jealous! +100 bonus!",
        bonus: 100,
    },
    Event {
        name: "BBQ MASTER CHEF",
        description: "Cook the perfect snag! 10-20 is medium-rare. Under 10 is raw.",
        target: "10-20 = Full points | Under 10 = Half points | Bullseye = BURNT!",
        scoring: Scoring::BbqZone,
        bonus_text: "TRIPLE 15 = Perfectly cooked! Wife approves! +75 bonus!",
        bonus: 75,
    },
    Event {
        name: "THE DAD JOKE DELIVERY",
        description: "Timing is everything! Three darts that add up to exactly 50.",
        target: "Get as CLOSE to 50 total as possible! Exact 50 = PERFECT PUNCHLINE!",
        scoring: Scoring::Punchline,
        bonus_text: "EXACTLY 50! PERFECT DAD JOKE TIMING! +150!",
        bonus: 150,
    },
    Event {
        name: "REMOTE CONTROL RAGE",
        description: "Find the remote in the couch cushions! Hit DOUBLES and TRIPLES.",
        target: "DOUBLES = 2x points | TRIPLES = 3x points | Singles = 0!",
        scoring: Scoring::MultiplesOnly,
        bonus_text: "DOUBLE BULL = Found the remote AND a $20 note! +200 bonus!",
        bonus: 200,
    },
];

const GREAT: &[&str] = &[
    "Still got it!",
    "The old fella's not dead yet!",
    "That's what 48 years of practice looks like!",
    "The knees might hurt but the arm's still golden!",
];

const GOOD: &[&str] = &[
    "Not bad for an old bloke!",
    "Respectable! Very respectable!",
    "That'll do, mate!",
    "Solid as a station wagon!",
];

const BAD: &[&str] = &[
    "Did you forget your glasses?",
    "That throw had 'I need a nap' energy!",
    "Mate, was that arm asleep?",
    "Time for another beer and try again!",
];

const MISSED: &[&str] = &[
    "Your kids throw better than that!",
    "Did you close your eyes?",
    "Maybe stick to lawn bowls?",
    "Even your dad jokes land better than that!",
];

/// Dad Bod Olympics settings
///
/// # Example
///
/// ```
/// use deadeye_games::DadBodConfig;
///
/// let config = DadBodConfig::default().with_player_count(3).with_names(["Gaz", " "]);
/// assert_eq!(config.player_count(), 3);
/// assert_eq!(config.name(0), "Gaz");
/// assert_eq!(config.name(1), "Dad 2");
/// assert_eq!(config.name(2), "Dad 3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DadBodConfig {
    players: usize,
    names: Vec<String>,
}

impl DadBodConfig {
    /// Dads at the oche, clamped to `[MIN_PLAYERS, MAX_PLAYERS]`
    pub fn with_player_count(mut self, n: usize) -> Self {
        self.players = n.clamp(MIN_PLAYERS, MAX_PLAYERS);
        self
    }

    /// Names by seat; blanks become "Dad N"
    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = names.into_iter().map(Into::into).take(MAX_PLAYERS).collect();
        self
    }

    pub fn normalized(self) -> Self {
        let players = self.players;
        let mut config = self.with_player_count(players);
        config.names.truncate(MAX_PLAYERS);
        config
    }

    pub fn player_count(&self) -> usize {
        self.players
    }

    pub fn name(&self, seat: usize) -> String {
        match self.names.get(seat).map(|n| n.trim()) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Dad {}", seat + 1),
        }
    }
}

impl Default for DadBodConfig {
    fn default() -> Self {
        Self {
            players: MAX_PLAYERS,
            names: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DadStats {
    pub total_score: i64,
    pub bullseyes: u32,
    pub triples: u32,
    pub doubles: u32,
    /// Darts that scored nothing
    pub misses: u32,
    /// Events won
    pub golds: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dad {
    pub id: ActorId,
    pub name: String,
    pub medal_points: u32,
    pub stats: DadStats,
}

impl Living for Dad {
    fn is_alive(&self) -> bool {
        true
    }
}

/// How a dart was called
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Call {
    Points,
    Straight,
    Crooked,
    Burnt,
    Cooked,
    Undercooked,
    Multiple,
    Chips,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DartScore {
    pub dart: Dart,
    pub points: i64,
    pub call: Call,
}

impl DartScore {
    fn describe(&self) -> String {
        let points = self.points;
        match self.call {
            Call::Points => format!("{} points", points),
            Call::Straight => format!("{} - Nice straight line!", points),
            Call::Crooked => "ODD NUMBER - You went crooked!".to_string(),
            Call::Burnt => "BURNT IT! No points!".to_string(),
            Call::Cooked => format!("{} - Perfectly cooked!", points),
            Call::Undercooked => format!("{} - Bit undercooked!", points),
            Call::Multiple if self.dart.is_triple() => format!("TRIPLE! {} points!", points),
            Call::Multiple => format!("DOUBLE! {} points!", points),
            Call::Chips => "SINGLE - Found old chips instead!".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Throw {
    dart: Dart,
    scoring: Scoring,
}

impl Throw {
    fn value(&self) -> i64 {
        i64::from(self.dart.value)
    }

    fn is_even(&self) -> bool {
        matches!(self.dart.bed, Bed::Number(n) if n % 2 == 0) || self.dart.is_bull()
    }
}

fn scored(throw: &Throw, points: i64, call: Call) -> DartScore {
    DartScore {
        dart: throw.dart,
        points,
        call,
    }
}

fn event_rules() -> RuleTable<Throw, DartScore> {
    RuleTable::<Throw, DartScore>::new(|t| scored(t, t.value(), Call::Points))
        .rule(
            "straight",
            |t| t.scoring == Scoring::EvenOnly && t.is_even(),
            |t| scored(t, t.value(), Call::Straight),
        )
        .rule(
            "crooked",
            |t| t.scoring == Scoring::EvenOnly,
            |t| scored(t, 0, Call::Crooked),
        )
        .rule(
            "burnt",
            |t| t.scoring == Scoring::BbqZone && t.dart.is_bull(),
            |t| scored(t, 0, Call::Burnt),
        )
        .rule(
            "cooked",
            |t| t.scoring == Scoring::BbqZone && t.dart.number().is_some_and(|n| n >= 10),
            |t| scored(t, t.value(), Call::Cooked),
        )
        .rule(
            "undercooked",
            |t| t.scoring == Scoring::BbqZone,
            |t| scored(t, t.value() / 2, Call::Undercooked),
        )
        .rule(
            "multiple",
            |t| t.scoring == Scoring::MultiplesOnly && t.dart.multiplier >= 2,
            |t| scored(t, t.value(), Call::Multiple),
        )
        .rule(
            "chips",
            |t| t.scoring == Scoring::MultiplesOnly,
            |t| scored(t, 0, Call::Chips),
        )
}

/// One dad's darts in the current event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scorecard {
    pub darts: Vec<DartScore>,
    pub total: i64,
    pub bonus: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub const PODIUM: [Medal; 3] = [Medal::Gold, Medal::Silver, Medal::Bronze];

    pub fn points(&self) -> u32 {
        match self {
            Medal::Gold => 3,
            Medal::Silver => 2,
            Medal::Bronze => 1,
        }
    }
}

/// A dad's finish in one event, best first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placing {
    pub seat: usize,
    pub player: String,
    pub round_score: i64,
    pub bonus: i64,
    pub final_score: i64,
    pub medal: Option<Medal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub player: String,
    pub medal_points: u32,
    pub stats: DadStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Award {
    pub title: &'static str,
    pub player: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalResults {
    /// By medal points, ties in seat order
    pub standings: Vec<Standing>,
    pub awards: Vec<Award>,
}

/// Transitions Dad Bod Olympics schedules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DadBodStep {
    /// Everyone has thrown; hand out medals
    EndEvent,
    /// The host moved on from the results
    NextEvent,
}

#[derive(Debug, Clone)]
pub struct DadBodOlympics {
    config: DadBodConfig,
    dads: Roster<Dad>,
    event: usize,
    darts_thrown: u32,
    cards: Vec<Scorecard>,
    results: Vec<Placing>,
    finals: Option<FinalResults>,
    rules: RuleTable<Throw, DartScore>,
}

impl DadBodOlympics {
    pub fn config(&self) -> &DadBodConfig {
        &self.config
    }

    pub fn dads(&self) -> &Roster<Dad> {
        &self.dads
    }

    pub fn current_dad(&self) -> Option<&Dad> {
        self.dads.current()
    }

    pub fn event(&self) -> &'static Event {
        &EVENTS[self.event.min(EVENTS.len() - 1)]
    }

    /// 1-based
    pub fn event_number(&self) -> u32 {
        self.event as u32 + 1
    }

    /// Darts the current dad has thrown this turn
    pub fn darts_thrown(&self) -> u32 {
        self.darts_thrown
    }

    pub fn scorecard(&self, seat: usize) -> Option<&Scorecard> {
        self.cards.get(seat)
    }

    /// Placings of the last event that finished
    pub fn results(&self) -> &[Placing] {
        &self.results
    }

    pub fn final_results(&self) -> Option<&FinalResults> {
        self.finals.as_ref()
    }

    fn start_event(&mut self, ctx: &mut Ctx<'_, DadBodStep>) {
        self.cards = vec![Scorecard::default(); self.dads.len()];
        self.darts_thrown = 0;
        self.dads.set_current(0);

        let event = self.event();
        let number = self.event_number();
        ctx.announce(format!("EVENT {}: {}", number, event.name));
        ctx.log(Tone::System, format!("EVENT {}: {}", number, event.name));
        ctx.log(Tone::Info, event.target);
        ctx.transition(Transition::RoundStarted { round: number });
        if let Some(dad) = self.dads.current() {
            ctx.transition(Transition::TurnChanged {
                actor: dad.name.clone(),
            });
        }
    }

    fn record(&mut self, seat: usize, score: DartScore) {
        if let Some(card) = self.cards.get_mut(seat) {
            card.total += score.points;
            card.darts.push(score);
        }
        if let Some(dad) = self.dads.get_mut(seat) {
            let stats = &mut dad.stats;
            stats.total_score += score.points;
            if score.dart.is_bull() {
                stats.bullseyes += 1;
            }
            match score.dart.multiplier {
                3 => stats.triples += 1,
                2 => stats.doubles += 1,
                _ => {}
            }
            if score.points == 0 {
                stats.misses += 1;
            }
        }
    }

    fn end_turn(&mut self, seat: usize, ctx: &mut Ctx<'_, DadBodStep>) {
        let event = self.event();
        if event.scoring == Scoring::Punchline {
            if let Some(card) = self.cards.get_mut(seat) {
                if card.total == PUNCHLINE_TOTAL {
                    card.bonus += event.bonus;
                    ctx.cue(Cue::PowerUp);
                    ctx.log(Tone::Buff, event.bonus_text);
                }
            }
        }

        self.darts_thrown = 0;
        if seat + 1 >= self.dads.len() {
            ctx.transition(Transition::RoundEnded {
                round: self.event_number(),
            });
            ctx.defer(DadBodStep::EndEvent, RESULTS_DELAY_MS);
            return;
        }

        self.dads.set_current(seat + 1);
        if let Some(dad) = self.dads.current() {
            ctx.log(Tone::Info, format!("{}'s turn!", dad.name));
            ctx.transition(Transition::TurnChanged {
                actor: dad.name.clone(),
            });
        }
    }

    fn place(&mut self, ctx: &mut Ctx<'_, DadBodStep>) {
        let event = self.event();
        let mut placings: Vec<Placing> = self
            .dads
            .iter()
            .zip(&self.cards)
            .enumerate()
            .map(|(seat, (dad, card))| {
                let final_score = if event.scoring == Scoring::Punchline {
                    let exact = card.total == PUNCHLINE_TOTAL;
                    1000 - (PUNCHLINE_TOTAL - card.total).abs() + if exact { event.bonus } else { 0 }
                } else {
                    card.total + card.bonus
                };
                Placing {
                    seat,
                    player: dad.name.clone(),
                    round_score: card.total,
                    bonus: card.bonus,
                    final_score,
                    medal: None,
                }
            })
            .collect();

        // Stable: ties keep seat order
        placings.sort_by(|a, b| b.final_score.cmp(&a.final_score));

        for (placing, medal) in placings.iter_mut().zip(Medal::PODIUM) {
            placing.medal = Some(medal);
            if let Some(dad) = self.dads.get_mut(placing.seat) {
                dad.medal_points += medal.points();
                if medal == Medal::Gold {
                    dad.stats.golds += 1;
                }
            }
        }

        ctx.cue(Cue::Medal);
        for (rank, placing) in placings.iter().enumerate() {
            let shown = if event.scoring == Scoring::Punchline {
                match (PUNCHLINE_TOTAL - placing.round_score).abs() {
                    0 => format!("{} (PERFECT!)", placing.round_score),
                    off => format!("{} ({} off)", placing.round_score, off),
                }
            } else {
                placing.final_score.to_string()
            };
            ctx.log(
                Tone::Success,
                format!("{}. {} - {}", rank + 1, placing.player, shown),
            );
        }
        if let Some(winner) = placings.first() {
            ctx.announce(format!("{} TAKES GOLD!", winner.player));
        }
        for dad in self.dads.iter() {
            ctx.stat(&format!("medals.{}", dad.name), i64::from(dad.medal_points));
        }

        log::debug!("dad bod: event {} placings {:?}", self.event_number(), placings);
        self.results = placings;
    }

    fn finish(&mut self, ctx: &mut Ctx<'_, DadBodStep>) {
        let mut standings: Vec<Standing> = self
            .dads
            .iter()
            .map(|dad| Standing {
                player: dad.name.clone(),
                medal_points: dad.medal_points,
                stats: dad.stats.clone(),
            })
            .collect();
        standings.sort_by(|a, b| b.medal_points.cmp(&a.medal_points));

        let awards = awards(&standings);
        if let Some(champion) = standings.first() {
            ctx.announce(format!("{} IS THE DAD BOD CHAMPION!", champion.player));
            ctx.log(
                Tone::Success,
                format!("{} wins with {} medal points", champion.player, champion.medal_points),
            );
        }
        for award in &awards {
            ctx.log(
                Tone::Info,
                format!("{}: {} ({})", award.title, award.player, award.reason),
            );
        }
        ctx.cue(Cue::Victory);
        self.finals = Some(FinalResults { standings, awards });
        ctx.win();
    }
}

fn plural(n: u32) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// First standing with the highest `key`
fn top_by(standings: &[Standing], key: impl Fn(&DadStats) -> u32) -> Option<(&Standing, u32)> {
    standings.iter().fold(None, |best, s| {
        let value = key(&s.stats);
        match best {
            Some((_, top)) if top >= value => best,
            _ => Some((s, value)),
        }
    })
}

fn awards(standings: &[Standing]) -> Vec<Award> {
    let mut awards = Vec::new();

    if let Some((s, n)) = top_by(standings, |st| st.bullseyes).filter(|(_, n)| *n > 0) {
        awards.push(Award {
            title: "EAGLE EYE AWARD",
            player: s.player.clone(),
            reason: format!("{} bullseye{}!", n, plural(n)),
        });
    }
    if let Some((s, n)) = top_by(standings, |st| st.triples).filter(|(_, n)| *n > 0) {
        awards.push(Award {
            title: "TRIPLE THREAT",
            player: s.player.clone(),
            reason: format!("{} triple{} hit!", n, plural(n)),
        });
    }
    if let Some((s, n)) = top_by(standings, |st| st.misses).filter(|(_, n)| *n > 0) {
        awards.push(Award {
            title: "NEEDS NEW GLASSES",
            player: s.player.clone(),
            reason: format!("{} zero-pointers!", n),
        });
    }
    if let Some(last) = standings.last() {
        awards.push(Award {
            title: "PARTICIPATION TROPHY",
            player: last.player.clone(),
            reason: "You showed up! That's something!".to_string(),
        });
    }
    awards
}

fn commentary(rng: &mut GameRng, points: i64) -> &'static str {
    let lines = match points {
        p if p >= 40 => GREAT,
        p if p >= 20 => GOOD,
        p if p > 0 => BAD,
        _ => MISSED,
    };
    rng.pick(lines).copied().unwrap_or_default()
}

impl Game for DadBodOlympics {
    type Setup = DadBodConfig;
    type Pending = DadBodStep;
    const NAME: &'static str = "Dad Bod Olympics";

    fn setup(config: DadBodConfig, ctx: &mut Ctx<'_, DadBodStep>) -> Result<Self> {
        let config = config.normalized();
        let dads: Vec<Dad> = (0..config.player_count())
            .map(|seat| Dad {
                id: ActorId::new(seat as u64),
                name: config.name(seat),
                medal_points: 0,
                stats: DadStats::default(),
            })
            .collect();

        let names: Vec<&str> = dads.iter().map(|d| d.name.as_str()).collect();
        log::info!("dad bod: players {:?}", names);
        ctx.log(Tone::System, "LET THE GAMES BEGIN!");

        let mut game = Self {
            config,
            dads: Roster::new(dads),
            event: 0,
            darts_thrown: 0,
            cards: Vec::new(),
            results: Vec::new(),
            finals: None,
            rules: event_rules(),
        };
        game.start_event(ctx);
        Ok(game)
    }

    fn throw(&mut self, dart: Dart, ctx: &mut Ctx<'_, DadBodStep>) {
        let seat = self.dads.current_index();
        let event = self.event();
        let score = self.rules.evaluate(&Throw {
            dart,
            scoring: event.scoring,
        });
        let score = score.outcome;
        self.record(seat, score);

        if event.is_bonus_dart(&dart) {
            if let Some(card) = self.cards.get_mut(seat) {
                card.bonus += event.bonus;
            }
            ctx.cue(Cue::PowerUp);
            ctx.announce(event.bonus_text);
            ctx.log(Tone::Buff, event.bonus_text);
        }

        let line = commentary(ctx.rng, score.points);
        let name = self.dads.get(seat).map(|d| d.name.clone()).unwrap_or_default();
        if score.points > 0 {
            ctx.cue(if score.points >= 40 { Cue::Critical } else { Cue::Hit });
            ctx.log(Tone::Success, format!("{}: {} - {}", name, score.describe(), line));
        } else {
            ctx.cue(Cue::Miss);
            ctx.log(Tone::Miss, format!("{}: {} - {}", name, score.describe(), line));
        }
        if let Some(card) = self.cards.get(seat) {
            ctx.stat(&format!("round.{}", name), card.total);
        }

        self.darts_thrown += 1;
        if self.darts_thrown >= DARTS_PER_PLAYER {
            self.end_turn(seat, ctx);
        }
    }

    fn resolve(&mut self, step: DadBodStep, ctx: &mut Ctx<'_, DadBodStep>) {
        match step {
            DadBodStep::EndEvent => {
                self.place(ctx);
                ctx.await_caller(DadBodStep::NextEvent);
            }
            DadBodStep::NextEvent => {
                if self.event + 1 >= EVENTS.len() {
                    self.finish(ctx);
                } else {
                    self.event += 1;
                    self.start_event(ctx);
                }
            }
        }
    }

    /// The leader's medal points
    fn score(&self) -> i64 {
        self.dads
            .iter()
            .map(|d| i64::from(d.medal_points))
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deadeye_core::{DartEvent, Phase, Rejection, Session};

    fn started(players: usize) -> Session<DadBodOlympics> {
        let mut session = Session::new(48);
        session
            .start(DadBodConfig::default().with_player_count(players))
            .unwrap();
        session
    }

    fn game(session: &Session<DadBodOlympics>) -> &DadBodOlympics {
        session.game().unwrap()
    }

    /// Each dad throws their three darts, then the event closes
    fn play_event(session: &mut Session<DadBodOlympics>, turns: &[[DartEvent; 3]]) {
        for turn in turns {
            for dart in turn {
                assert!(!session.handle_dart_throw(*dart).is_rejected());
            }
        }
        session.tick(RESULTS_DELAY_MS);
    }

    fn single_score(scoring: Scoring, event: DartEvent) -> DartScore {
        event_rules()
            .evaluate(&Throw {
                dart: event.classify().unwrap(),
                scoring,
            })
            .outcome
    }

    #[test]
    fn test_event_scoring_rules() {
        assert_eq!(single_score(Scoring::Highest, DartEvent::triple(20)).points, 60);

        assert_eq!(single_score(Scoring::EvenOnly, DartEvent::single(7)).points, 0);
        assert_eq!(single_score(Scoring::EvenOnly, DartEvent::double(8)).points, 16);
        assert_eq!(single_score(Scoring::EvenOnly, DartEvent::bull()).points, 25);

        let burnt = single_score(Scoring::BbqZone, DartEvent::double_bull());
        assert_eq!((burnt.points, burnt.call), (0, Call::Burnt));
        assert_eq!(single_score(Scoring::BbqZone, DartEvent::single(12)).points, 12);
        assert_eq!(single_score(Scoring::BbqZone, DartEvent::triple(3)).points, 4);

        assert_eq!(single_score(Scoring::MultiplesOnly, DartEvent::single(20)).points, 0);
        assert_eq!(single_score(Scoring::MultiplesOnly, DartEvent::triple(5)).points, 15);
        assert_eq!(single_score(Scoring::MultiplesOnly, DartEvent::bull()).points, 0);
        assert_eq!(single_score(Scoring::MultiplesOnly, DartEvent::double_bull()).points, 50);
    }

    #[test]
    fn test_bonus_darts() {
        let t20 = DartEvent::triple(20).classify().unwrap();
        let t15 = DartEvent::triple(15).classify().unwrap();
        let zero_bull = DartEvent::new(0, 2, 50).classify().unwrap();
        assert!(EVENTS[0].is_bonus_dart(&t20));
        assert!(!EVENTS[0].is_bonus_dart(&t15));
        assert!(EVENTS[1].is_bonus_dart(&zero_bull));
        assert!(EVENTS[2].is_bonus_dart(&t15));
        assert!(!EVENTS[3].is_bonus_dart(&t20));
        assert!(EVENTS[4].is_bonus_dart(&zero_bull));
    }

    #[test]
    fn test_default_names() {
        let session = started(3);
        let names: Vec<_> = game(&session).dads().iter().map(|d| d.name.clone()).collect();
        assert_eq!(names, vec!["Dad 1", "Dad 2", "Dad 3"]);
        assert_eq!(game(&session).dads().len(), 3);
    }

    #[test]
    fn test_turns_rotate_after_three_darts() {
        let mut session = started(2);
        for _ in 0..3 {
            session.handle_dart_throw(DartEvent::single(5));
        }
        assert_eq!(game(&session).current_dad().unwrap().name, "Dad 2");
        assert_eq!(game(&session).darts_thrown(), 0);
        assert_eq!(game(&session).scorecard(0).unwrap().total, 15);

        for _ in 0..3 {
            session.handle_dart_throw(DartEvent::single(1));
        }
        assert_eq!(session.phase(), Phase::Pending);
        let result = session.handle_dart_throw(DartEvent::single(20));
        assert_eq!(result.rejected, Some(Rejection::PendingTransition));
    }

    #[test]
    fn test_results_wait_for_the_host() {
        let mut session = started(2);
        play_event(
            &mut session,
            &[
                [DartEvent::single(1); 3],
                [DartEvent::triple(20), DartEvent::single(1), DartEvent::single(1)],
            ],
        );

        // Medals are out but the next event needs an explicit advance
        assert_eq!(session.phase(), Phase::Pending);
        let results = game(&session).results();
        assert_eq!(results[0].player, "Dad 2");
        assert_eq!(results[0].final_score, 62 + 50);
        assert_eq!(results[0].medal, Some(Medal::Gold));
        assert_eq!(results[1].medal, Some(Medal::Silver));
        assert_eq!(game(&session).dads().get(1).unwrap().medal_points, 3);
        assert_eq!(game(&session).dads().get(1).unwrap().stats.golds, 1);

        session.tick(60_000);
        assert_eq!(game(&session).event_number(), 1);
        session.advance();
        assert_eq!(session.phase(), Phase::InRound);
        assert_eq!(game(&session).event_number(), 2);
        assert_eq!(game(&session).current_dad().unwrap().name, "Dad 1");
        assert_eq!(game(&session).scorecard(1).unwrap().total, 0);
    }

    #[test]
    fn test_ties_keep_seat_order() {
        let mut session = started(4);
        let same = [DartEvent::single(10); 3];
        play_event(&mut session, &[same, same, same, same]);
        let results = game(&session).results();
        let seats: Vec<_> = results.iter().map(|p| p.seat).collect();
        assert_eq!(seats, vec![0, 1, 2, 3]);
        assert_eq!(results[3].medal, None);
    }

    #[test]
    fn test_punchline_closest_to_fifty() {
        let mut session = started(3);
        let filler = [DartEvent::single(1); 3];
        for _ in 0..3 {
            play_event(&mut session, &[filler, filler, filler]);
            session.advance();
        }
        assert_eq!(game(&session).event().scoring, Scoring::Punchline);

        play_event(
            &mut session,
            &[
                [DartEvent::single(20), DartEvent::single(20), DartEvent::single(10)],
                [DartEvent::triple(20), DartEvent::single(1), DartEvent::single(1)],
                [DartEvent::single(15), DartEvent::single(15), DartEvent::single(15)],
            ],
        );
        let results = game(&session).results();
        assert_eq!(results[0].seat, 0);
        assert_eq!(results[0].final_score, 1000 + 150);
        assert_eq!(results[0].bonus, 150);
        assert_eq!(results[1].seat, 2);
        assert_eq!(results[1].final_score, 995);
        assert_eq!(results[2].final_score, 988);
        assert!(session.feed().contains("50 (PERFECT!)"));
    }

    #[test]
    fn test_five_events_crown_a_champion() {
        let mut session = started(3);
        let bullish = [DartEvent::double_bull(), DartEvent::triple(20), DartEvent::double(20)];
        let steady = [DartEvent::single(18); 3];
        let wayward = [DartEvent::single(3), DartEvent::new(25, 1, 25), DartEvent::single(1)];

        for event in 0..5 {
            play_event(&mut session, &[bullish, steady, wayward]);
            session.advance();
            if event < 4 {
                assert_eq!(session.phase(), Phase::InRound);
            }
        }

        assert_eq!(session.phase(), Phase::Won);
        let finals = game(&session).final_results().unwrap();
        assert_eq!(finals.standings.len(), 3);
        assert_eq!(finals.standings[0].player, "Dad 1");
        assert!(finals.standings[0].medal_points >= finals.standings[1].medal_points);

        let titles: Vec<_> = finals.awards.iter().map(|a| a.title).collect();
        assert!(titles.contains(&"EAGLE EYE AWARD"));
        assert!(titles.contains(&"TRIPLE THREAT"));
        let trophy = finals.awards.last().unwrap();
        assert_eq!(trophy.title, "PARTICIPATION TROPHY");
        assert_eq!(trophy.player, finals.standings[2].player);
        assert_eq!(game(&session).score(), i64::from(finals.standings[0].medal_points));
    }

    #[test]
    fn test_awards_skip_zero_counts() {
        let standings = vec![
            Standing {
                player: "A".into(),
                medal_points: 6,
                stats: DadStats {
                    triples: 2,
                    ..DadStats::default()
                },
            },
            Standing {
                player: "B".into(),
                medal_points: 3,
                stats: DadStats {
                    triples: 2,
                    misses: 1,
                    ..DadStats::default()
                },
            },
        ];
        let awards = awards(&standings);
        let titles: Vec<_> = awards.iter().map(|a| a.title).collect();
        assert_eq!(
            titles,
            vec!["TRIPLE THREAT", "NEEDS NEW GLASSES", "PARTICIPATION TROPHY"]
        );
        assert_eq!(awards[0].player, "A");
        assert_eq!(awards[0].reason, "2 triples hit!");
        assert_eq!(awards[1].reason, "1 zero-pointers!");
    }
}
