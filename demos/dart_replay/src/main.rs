//! Dart Replay
//!
//! Plays a scripted sequence of throws against one of the DeadEye games and
//! prints the narrative as it happens.
//! - Scripts are RON files (see `data/`)
//! - Throws can be literal darts, raw relay JSON, or `Aim(n)` to let the
//!   replay throw at whatever the game wants hit next
//! - Set `DEADEYE_SAVE_DIR` to keep heist progress and siege scores between
//!   runs
//!
//! ```text
//! RUST_LOG=debug cargo run -p dart_replay -- demos/dart_replay/data/siege_alpha.ron
//! ```

use deadeye_core::{
    format_seed, parse_seed_input, Cmd, DartEvent, Game, Presenter, Session, Tone, Transition,
};
use deadeye_games::{
    DadBodConfig, DadBodOlympics, DungeonConfig, DungeonCrawl, HeistConfig, HeistCrew, LegKind,
    SiegeConfig, StationSiege, ZombieConfig, ZombieSlayer,
};
use deadeye_store::{FileStorage, MemoryStorage, Storage, Store};
use deadeye_wire::{pump, DartSource, LineSource, ScriptSource};
use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Bound on transitions resolved between two throws
const MAX_SETTLE_STEPS: usize = 16;

/// A replay script loaded from RON
#[derive(Debug, Deserialize)]
struct Script {
    /// Seed code or any text; text is hashed
    seed: String,
    game: GameSetup,
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
enum GameSetup {
    Zombie(ZombieConfig),
    Dungeon(DungeonConfig),
    Heist(HeistConfig),
    Siege(SiegeConfig),
    DadBod(DadBodConfig),
}

#[derive(Debug, Deserialize)]
enum Step {
    Single(u8),
    Double(u8),
    Triple(u8),
    Bull,
    DoubleBull,
    /// Segment, multiplier, value exactly as the relay would send them
    Raw(u8, u8, u32),
    /// One relay JSON message
    Relay(String),
    /// Settle pending transitions and throw at the game's next target, n times
    Aim(u32),
    Tick(u64),
    Advance,
    Pause,
    Resume,
}

/// What the replay needs to know about a game beyond [`Game`]
trait Replay: Game {
    /// The dart a sensible player would throw next
    fn aim(&self) -> Option<DartEvent>;

    /// Print the outcome and persist whatever the game keeps
    fn debrief<S: Storage>(&self, store: &mut Store<S>);
}

impl Replay for ZombieSlayer {
    fn aim(&self) -> Option<DartEvent> {
        self.targets().first().map(|n| DartEvent::single(*n))
    }

    fn debrief<S: Storage>(&self, _store: &mut Store<S>) {
        println!(
            "Zombies slain: {}  Misses: {}  Score: {}",
            self.kills(),
            self.misses(),
            self.score()
        );
    }
}

impl Replay for DungeonCrawl {
    fn aim(&self) -> Option<DartEvent> {
        self.living_monsters()
            .next()
            .map(|m| DartEvent::single(m.target))
    }

    fn debrief<S: Storage>(&self, _store: &mut Store<S>) {
        let summary = self.summary();
        println!(
            "{} on floor {} after {} rooms, {} gold",
            if summary.victory { "Victory" } else { "Defeat" },
            summary.floor,
            summary.rooms_cleared,
            summary.gold
        );
        for hero in &summary.heroes {
            println!("  {:?}", hero);
        }
        if let Some(mvp) = &summary.mvp {
            println!("MVP: {}", mvp);
        }
    }
}

impl Replay for HeistCrew {
    fn aim(&self) -> Option<DartEvent> {
        let leg = self.current_leg()?;
        let number = match leg.kind() {
            LegKind::Combination { .. } | LegKind::FinalCombination { .. } => {
                leg.sequence()?.expected()?
            }
            LegKind::Servers { .. } | LegKind::FinalServers { .. } => 13,
            LegKind::Diamonds { .. } | LegKind::FinalDiamonds { .. } => 20,
            LegKind::LuckySevens { .. } => 7,
        };
        Some(DartEvent::single(number))
    }

    fn debrief<S: Storage>(&self, store: &mut Store<S>) {
        if let Some(report) = self.report() {
            println!("{:#?}", report);
        }
        if store.save_progress(self.progress()) {
            println!("Crew rep: {}", self.progress().earned_currency);
        }
    }
}

impl Replay for StationSiege {
    fn aim(&self) -> Option<DartEvent> {
        self.hostiles()
            .iter()
            .filter(|h| h.is_alive() && !h.has_arrived())
            .find_map(|h| h.current_number())
            .map(DartEvent::single)
    }

    fn debrief<S: Storage>(&self, store: &mut Store<S>) {
        println!(
            "Round {}  Shields {}  Destroyed {}  Score {}",
            self.round(),
            self.shields().current(),
            self.hostiles_destroyed(),
            self.score()
        );
        let Some(summary) = self.summary() else {
            return;
        };
        if let Some(rank) = store.record_score(&summary.score_entry()) {
            println!("New #{} for seed {}", rank + 1, format_seed(summary.seed));
        }
        for (i, entry) in store.leaderboard(summary.seed).entries().iter().enumerate() {
            println!(
                "  {:>2}. {:<12} {:>6}  ({} rounds)",
                i + 1,
                entry.player,
                entry.score,
                entry.rounds
            );
        }
    }
}

impl Replay for DadBodOlympics {
    fn aim(&self) -> Option<DartEvent> {
        Some(DartEvent::triple(20))
    }

    fn debrief<S: Storage>(&self, _store: &mut Store<S>) {
        let Some(results) = self.final_results() else {
            println!("Event {} of 5 in progress", self.event_number());
            return;
        };
        for (i, standing) in results.standings.iter().enumerate() {
            println!(
                "  {}. {} ({} medal points)",
                i + 1,
                standing.player,
                standing.medal_points
            );
        }
        for award in &results.awards {
            println!("  {}: {}", award.title, award.player);
        }
    }
}

/// Prints commands to stdout
struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn present(&mut self, cmd: &Cmd) {
        match cmd {
            Cmd::Log(entry) => {
                let marker = match entry.tone {
                    Tone::Danger | Tone::Critical => "!!",
                    Tone::Success | Tone::PowerUp | Tone::Heal => "++",
                    Tone::Miss => "--",
                    Tone::System => "##",
                    _ => "  ",
                };
                println!("{} {}", marker, entry.text);
            }
            Cmd::Announce(text) => println!("\n    >>> {} <<<\n", text),
            Cmd::Transition(Transition::RoundStarted { round }) => {
                println!("---- round {} ----", round)
            }
            Cmd::Transition(Transition::TurnChanged { actor }) => println!("   ({} to throw)", actor),
            Cmd::Transition(Transition::Lost { reason }) => println!("LOST: {}", reason),
            Cmd::Transition(Transition::Won) => println!("WON!"),
            _ => log::trace!("{:?}", cmd),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let script = load_script(std::env::args().nth(1).as_deref())?;
    let seed = parse_seed_input(&script.seed);

    match std::env::var("DEADEYE_SAVE_DIR") {
        Ok(dir) => {
            let mut store = Store::new(FileStorage::new(dir));
            let game = match script.game {
                GameSetup::Heist(config) => {
                    GameSetup::Heist(config.with_progress(store.load_progress()))
                }
                other => other,
            };
            run(seed, game, &script.steps, &mut store)
        }
        Err(_) => run(seed, script.game, &script.steps, &mut Store::new(MemoryStorage::new())),
    }
}

fn load_script(arg: Option<&str>) -> Result<Script, Box<dyn Error>> {
    let paths = match arg {
        Some(path) => vec![path.to_string()],
        None => vec![
            "demos/dart_replay/data/siege_alpha.ron".to_string(),
            "data/siege_alpha.ron".to_string(),
        ],
    };

    for path in &paths {
        if Path::new(path).exists() {
            let content = fs::read_to_string(path)?;
            return Ok(ron::from_str(&content)?);
        }
    }

    Err(format!("Could not find script: {}", paths.join(", ")).into())
}

fn run<S: Storage>(
    seed: u32,
    game: GameSetup,
    steps: &[Step],
    store: &mut Store<S>,
) -> Result<(), Box<dyn Error>> {
    match game {
        GameSetup::Zombie(config) => play::<ZombieSlayer, S>(seed, config, steps, store),
        GameSetup::Dungeon(config) => play::<DungeonCrawl, S>(seed, config, steps, store),
        GameSetup::Heist(config) => play::<HeistCrew, S>(seed, config, steps, store),
        GameSetup::Siege(config) => play::<StationSiege, S>(seed, config, steps, store),
        GameSetup::DadBod(config) => play::<DadBodOlympics, S>(seed, config, steps, store),
    }
}

fn play<G: Replay, S: Storage>(
    seed: u32,
    setup: G::Setup,
    steps: &[Step],
    store: &mut Store<S>,
) -> Result<(), Box<dyn Error>> {
    println!("==== {} (seed {}) ====", G::NAME, format_seed(seed));
    let mut presenter = ConsolePresenter;
    let mut session: Session<G> = Session::new(seed);
    presenter.present_all(&session.start(setup)?.cmd);

    for (i, step) in steps.iter().enumerate() {
        if session.phase().is_terminal() {
            log::info!("{} is over, {} steps left unplayed", G::NAME, steps.len() - i);
            break;
        }
        match step {
            Step::Single(n) => throw(&mut session, &mut presenter, DartEvent::single(*n))?,
            Step::Double(n) => throw(&mut session, &mut presenter, DartEvent::double(*n))?,
            Step::Triple(n) => throw(&mut session, &mut presenter, DartEvent::triple(*n))?,
            Step::Bull => throw(&mut session, &mut presenter, DartEvent::bull())?,
            Step::DoubleBull => throw(&mut session, &mut presenter, DartEvent::double_bull())?,
            Step::Raw(segment, multiplier, value) => throw(
                &mut session,
                &mut presenter,
                DartEvent::new(*segment, *multiplier, *value),
            )?,
            Step::Relay(json) => {
                let mut source = LineSource::new(Cursor::new(json.as_bytes()));
                pump_from(&mut session, &mut presenter, &mut source)?;
            }
            Step::Aim(times) => {
                for _ in 0..*times {
                    settle(&mut session, &mut presenter);
                    if session.phase().is_terminal() {
                        break;
                    }
                    match session.game().and_then(|g| g.aim()) {
                        Some(dart) => throw(&mut session, &mut presenter, dart)?,
                        None => log::debug!("{}: nothing to aim at", G::NAME),
                    }
                }
            }
            Step::Tick(ms) => presenter.present_all(&session.tick(*ms).cmd),
            Step::Advance => presenter.present_all(&session.advance().cmd),
            Step::Pause => presenter.present_all(&session.pause().cmd),
            Step::Resume => presenter.present_all(&session.resume().cmd),
        }
    }

    println!("==== {:?} after {} darts ====", session.phase(), session.darts_applied());
    if let Some(game) = session.game() {
        game.debrief(store);
    }
    Ok(())
}

fn throw<G: Game>(
    session: &mut Session<G>,
    presenter: &mut ConsolePresenter,
    dart: DartEvent,
) -> Result<(), Box<dyn Error>> {
    pump_from(session, presenter, &mut ScriptSource::new([dart]))
}

fn pump_from<G: Game>(
    session: &mut Session<G>,
    presenter: &mut ConsolePresenter,
    source: &mut dyn DartSource,
) -> Result<(), Box<dyn Error>> {
    let stats = pump(source, session, presenter)?;
    if stats.rejected > 0 {
        println!("   ({} dart(s) not counted)", stats.rejected);
    }
    Ok(())
}

/// Resolve whatever is holding the session so the next dart counts
fn settle<G: Game>(session: &mut Session<G>, presenter: &mut ConsolePresenter) {
    for _ in 0..MAX_SETTLE_STEPS {
        if session.pending().is_none() || session.phase().is_terminal() {
            return;
        }
        presenter.present_all(&session.advance().cmd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_scripts_parse() {
        let scripts = [
            include_str!("../data/siege_alpha.ron"),
            include_str!("../data/heist_vault.ron"),
            include_str!("../data/dad_bod.ron"),
            include_str!("../data/zombie.ron"),
            include_str!("../data/dungeon.ron"),
        ];
        for text in scripts {
            let script: Script = ron::from_str(text).unwrap();
            assert!(!script.steps.is_empty());
        }
    }

    #[test]
    fn test_heist_script_plays_to_a_result() {
        let script: Script = ron::from_str(include_str!("../data/heist_vault.ron")).unwrap();
        let GameSetup::Heist(config) = script.game else {
            panic!("expected a heist script");
        };
        let mut store = Store::new(MemoryStorage::new());
        play::<HeistCrew, _>(parse_seed_input(&script.seed), config, &script.steps, &mut store)
            .unwrap();
        assert!(store.load_progress().is_completed("vault"));
    }
}
