//! Game sessions
//!
//! A [`Session`] owns everything one game needs: the game state itself, its
//! seeded RNG, the narrative feed and any pending transition. The caller
//! drives it with four inputs (start, dart, tick, advance) and renders the
//! `Cmd` each returns.
//!
//! ```text
//!  Idle ──start──▶ Setup ──▶ InRound ◀──────────────┐
//!                              │  dart               │ tick / advance
//!                              ├──defer──▶ Pending ──┘
//!                              ├──win────▶ Won
//!                              └──lose───▶ Lost
//!  (any) ──reset──▶ Idle
//! ```
//!
//! Darts are processed one at a time and to completion. While a transition
//! is pending (a room clearing, a round ending) darts are rejected rather
//! than queued, so a dart can never land half way through a transition.

use crate::{
    feed::{Feed, Tone},
    time::{Deferred, Millis},
    Cmd, Cue, Dart, DartEvent, GameRng, Result, Transition,
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[cfg(feature = "journal")]
use crate::journal::{Input, Journal};

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// No game loaded
    Idle,
    /// Configuration being validated
    Setup,
    /// Accepting darts
    InRound,
    /// A transition is waiting for time or the caller
    Pending,
    Won,
    Lost,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Won | Phase::Lost)
    }
}

/// Why an input was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    NotStarted,
    Paused,
    PendingTransition,
    GameOver,
    NothingPending,
}

/// Result of feeding one input to a session
#[derive(Debug, Clone, Default)]
pub struct UpdateResult {
    /// Commands for the presenter
    pub cmd: Cmd,
    /// Set when the input was ignored
    pub rejected: Option<Rejection>,
}

impl UpdateResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a command
    pub fn with_cmd(cmd: Cmd) -> Self {
        Self { cmd, rejected: None }
    }

    pub fn rejected(reason: Rejection) -> Self {
        Self {
            cmd: Cmd::None,
            rejected: Some(reason),
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.rejected.is_some()
    }
}

/// How a game ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost(String),
}

/// What a game can touch while handling an input
pub struct Ctx<'a, P> {
    /// The session's seeded RNG; every roll goes through it
    pub rng: &'a mut GameRng,
    feed: &'a mut Feed,
    elapsed_ms: Millis,
    cmds: Vec<Cmd>,
    deferred: Vec<Deferred<P>>,
    outcome: Option<Outcome>,
}

impl<'a, P> Ctx<'a, P> {
    fn new(rng: &'a mut GameRng, feed: &'a mut Feed, elapsed_ms: Millis) -> Self {
        Self {
            rng,
            feed,
            elapsed_ms,
            cmds: Vec::new(),
            deferred: Vec::new(),
            outcome: None,
        }
    }

    /// Append a feed line and emit it
    pub fn log(&mut self, tone: Tone, text: impl Into<String>) {
        let entry = self.feed.push(tone, text);
        self.cmds.push(Cmd::Log(entry));
    }

    pub fn cue(&mut self, cue: Cue) {
        self.cmds.push(Cmd::Cue(cue));
    }

    pub fn announce(&mut self, text: impl Into<String>) {
        self.cmds.push(Cmd::announce(text));
    }

    pub fn stat(&mut self, key: &str, value: i64) {
        self.cmds.push(Cmd::stat(key, value));
    }

    pub fn transition(&mut self, transition: Transition) {
        self.cmds.push(Cmd::Transition(transition));
    }

    /// Emit any command
    pub fn emit(&mut self, cmd: Cmd) {
        self.cmds.push(cmd);
    }

    /// Resolve `action` after `delay_ms`; darts are rejected until then
    pub fn defer(&mut self, action: P, delay_ms: Millis) {
        self.deferred.push(Deferred::after(action, delay_ms));
    }

    /// Resolve `action` only when the caller advances
    pub fn await_caller(&mut self, action: P) {
        self.deferred.push(Deferred::on_advance(action));
    }

    /// End the game as a win (first terminal call sticks)
    pub fn win(&mut self) {
        if self.outcome.is_none() {
            self.outcome = Some(Outcome::Won);
        }
    }

    /// End the game as a loss (first terminal call sticks)
    pub fn lose(&mut self, reason: impl Into<String>) {
        if self.outcome.is_none() {
            self.outcome = Some(Outcome::Lost(reason.into()));
        }
    }

    /// Whether this step already decided the game
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Session time when the input arrived
    pub fn elapsed_ms(&self) -> Millis {
        self.elapsed_ms
    }
}

/// A dart game driven by a session
pub trait Game: Sized {
    /// Start-of-game configuration
    type Setup: Clone + std::fmt::Debug;
    /// Transitions this game schedules
    type Pending: Clone + std::fmt::Debug;

    /// Display name
    const NAME: &'static str;
    /// Feed lines kept
    const FEED_CAPACITY: usize = crate::feed::DEFAULT_FEED_CAPACITY;

    /// Validate configuration and build the first encounter
    fn setup(setup: Self::Setup, ctx: &mut Ctx<'_, Self::Pending>) -> Result<Self>;

    /// Apply one valid dart
    fn throw(&mut self, dart: Dart, ctx: &mut Ctx<'_, Self::Pending>);

    /// An out-of-domain event; ignored unless a game counts it
    fn invalid_throw(&mut self, _event: DartEvent, _ctx: &mut Ctx<'_, Self::Pending>) {}

    /// Carry out a transition whose wait is over
    fn resolve(&mut self, pending: Self::Pending, ctx: &mut Ctx<'_, Self::Pending>);

    /// Wall time passed while in round (countdowns)
    fn elapse(&mut self, _elapsed_ms: Millis, _ctx: &mut Ctx<'_, Self::Pending>) {}

    /// Headline score for summaries
    fn score(&self) -> i64;
}

/// One game session, owned by the caller
#[derive(Debug, Clone)]
pub struct Session<G: Game> {
    seed: u32,
    rng: GameRng,
    game: Option<G>,
    phase: Phase,
    paused: bool,
    feed: Feed,
    pending: VecDeque<Deferred<G::Pending>>,
    elapsed_ms: Millis,
    darts_applied: u64,
    #[cfg(feature = "journal")]
    journal: Journal<G::Setup>,
}

impl<G: Game> Session<G> {
    /// Create an idle session that will play with `seed`
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            rng: GameRng::new(seed),
            game: None,
            phase: Phase::Idle,
            paused: false,
            feed: Feed::new(G::FEED_CAPACITY),
            pending: VecDeque::new(),
            elapsed_ms: 0,
            darts_applied: 0,
            #[cfg(feature = "journal")]
            journal: Journal::new(),
        }
    }

    /// Create an idle session with a fresh random seed
    pub fn with_random_seed() -> Self {
        Self::new(crate::rng::random_seed())
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Seed used by the next `start`
    pub fn set_seed(&mut self, seed: u32) {
        self.seed = seed;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The running game, if any
    pub fn game(&self) -> Option<&G> {
        self.game.as_ref()
    }

    /// Mutable access for settings screens (darts per turn and the like)
    ///
    /// Changes made here bypass the terminal checks; use it only for
    /// configuration, never for scoring.
    pub fn game_mut(&mut self) -> Option<&mut G> {
        self.game.as_mut()
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn rng(&self) -> &GameRng {
        &self.rng
    }

    /// The transition currently holding the session, if any
    pub fn pending(&self) -> Option<&Deferred<G::Pending>> {
        self.pending.front()
    }

    /// Session time counted by `tick`
    pub fn elapsed_ms(&self) -> Millis {
        self.elapsed_ms
    }

    /// Darts that reached the rules
    pub fn darts_applied(&self) -> u64 {
        self.darts_applied
    }

    #[cfg(feature = "journal")]
    pub fn journal(&self) -> &Journal<G::Setup> {
        &self.journal
    }

    /// Start a game, replacing whatever was running
    ///
    /// On a configuration error the session is left idle.
    pub fn start(&mut self, setup: G::Setup) -> Result<UpdateResult> {
        #[cfg(feature = "journal")]
        {
            self.journal.clear();
            self.journal.record(0, Input::Start { seed: self.seed, setup: setup.clone() });
        }

        self.discard();
        self.phase = Phase::Setup;

        let mut ctx = Ctx::new(&mut self.rng, &mut self.feed, 0);
        match G::setup(setup, &mut ctx) {
            Ok(game) => {
                ctx.cmds.insert(
                    0,
                    Cmd::Transition(Transition::Started {
                        game: G::NAME.to_string(),
                    }),
                );
                let Ctx {
                    cmds,
                    deferred,
                    outcome,
                    ..
                } = ctx;
                self.game = Some(game);
                self.phase = Phase::InRound;
                log::info!("{}: started with seed {}", G::NAME, self.seed);
                Ok(self.settle(cmds, deferred, outcome))
            }
            Err(err) => {
                drop(ctx);
                log::warn!("{}: start rejected: {}", G::NAME, err);
                self.discard();
                Err(err)
            }
        }
    }

    /// Feed one dart from the relay
    pub fn handle_dart_throw(&mut self, event: DartEvent) -> UpdateResult {
        #[cfg(feature = "journal")]
        self.journal.record(self.elapsed_ms, Input::Throw(event));

        if let Some(reason) = self.gate() {
            log::debug!("{}: dart {:?} rejected ({:?})", G::NAME, event, reason);
            return UpdateResult::rejected(reason);
        }
        if !self.pending.is_empty() {
            log::debug!("{}: dart {:?} rejected during transition", G::NAME, event);
            return UpdateResult::rejected(Rejection::PendingTransition);
        }

        match event.classify() {
            Some(dart) => {
                self.darts_applied += 1;
                self.run(|game, ctx| game.throw(dart, ctx))
            }
            None => {
                log::debug!("{}: invalid dart {:?}", G::NAME, event);
                self.run(|game, ctx| game.invalid_throw(event, ctx))
            }
        }
    }

    /// Let time pass: runs countdowns and resolves due transitions
    pub fn tick(&mut self, elapsed_ms: Millis) -> UpdateResult {
        #[cfg(feature = "journal")]
        self.journal.record(self.elapsed_ms, Input::Tick(elapsed_ms));

        if let Some(reason) = self.gate() {
            return UpdateResult::rejected(reason);
        }
        self.elapsed_ms += elapsed_ms;

        let mut cmds = Vec::new();
        if self.pending.is_empty() {
            cmds.push(self.run(|game, ctx| game.elapse(elapsed_ms, ctx)).cmd);
        }

        let mut budget = elapsed_ms;
        while !self.phase.is_terminal() {
            let Some(front) = self.pending.front_mut() else {
                break;
            };
            match front.consume(budget) {
                Some(left) => {
                    budget = left;
                    cmds.push(self.resolve_front().cmd);
                }
                None => break,
            }
        }

        UpdateResult::with_cmd(Cmd::batch(cmds))
    }

    /// Resolve the pending transition now, whatever its delay
    pub fn advance(&mut self) -> UpdateResult {
        #[cfg(feature = "journal")]
        self.journal.record(self.elapsed_ms, Input::Advance);

        if let Some(reason) = self.gate() {
            return UpdateResult::rejected(reason);
        }
        if self.pending.is_empty() {
            return UpdateResult::rejected(Rejection::NothingPending);
        }
        self.resolve_front()
    }

    /// Stop accepting darts and counting time
    pub fn pause(&mut self) -> UpdateResult {
        #[cfg(feature = "journal")]
        self.journal.record(self.elapsed_ms, Input::Pause);

        if self.game.is_none() || self.phase.is_terminal() || self.paused {
            return UpdateResult::new();
        }
        self.paused = true;
        log::debug!("{}: paused", G::NAME);
        UpdateResult::with_cmd(Cmd::Transition(Transition::Paused))
    }

    pub fn resume(&mut self) -> UpdateResult {
        #[cfg(feature = "journal")]
        self.journal.record(self.elapsed_ms, Input::Resume);

        if !self.paused {
            return UpdateResult::new();
        }
        self.paused = false;
        log::debug!("{}: resumed", G::NAME);
        UpdateResult::with_cmd(Cmd::Transition(Transition::Resumed))
    }

    /// Drop all session state and return to idle
    pub fn reset(&mut self) -> UpdateResult {
        #[cfg(feature = "journal")]
        self.journal.record(self.elapsed_ms, Input::Reset);

        self.discard();
        log::debug!("{}: reset", G::NAME);
        UpdateResult::with_cmd(Cmd::Transition(Transition::Reset))
    }

    fn discard(&mut self) {
        self.game = None;
        self.phase = Phase::Idle;
        self.paused = false;
        self.rng = GameRng::new(self.seed);
        self.feed = Feed::new(G::FEED_CAPACITY);
        self.pending.clear();
        self.elapsed_ms = 0;
        self.darts_applied = 0;
    }

    /// Reason the session cannot take input right now
    fn gate(&self) -> Option<Rejection> {
        if self.game.is_none() {
            Some(Rejection::NotStarted)
        } else if self.phase.is_terminal() {
            Some(Rejection::GameOver)
        } else if self.paused {
            Some(Rejection::Paused)
        } else {
            None
        }
    }

    fn resolve_front(&mut self) -> UpdateResult {
        match self.pending.pop_front() {
            Some(deferred) => {
                log::debug!("{}: resolving {:?}", G::NAME, deferred.action);
                self.run(|game, ctx| game.resolve(deferred.action, ctx))
            }
            None => UpdateResult::rejected(Rejection::NothingPending),
        }
    }

    fn run(&mut self, f: impl FnOnce(&mut G, &mut Ctx<'_, G::Pending>)) -> UpdateResult {
        let Some(game) = self.game.as_mut() else {
            return UpdateResult::rejected(Rejection::NotStarted);
        };
        let mut ctx = Ctx::new(&mut self.rng, &mut self.feed, self.elapsed_ms);
        f(game, &mut ctx);
        let Ctx {
            cmds,
            deferred,
            outcome,
            ..
        } = ctx;
        self.settle(cmds, deferred, outcome)
    }

    /// Fold a step's effects back into the session
    fn settle(
        &mut self,
        mut cmds: Vec<Cmd>,
        deferred: Vec<Deferred<G::Pending>>,
        outcome: Option<Outcome>,
    ) -> UpdateResult {
        match outcome {
            Some(Outcome::Won) => {
                self.pending.clear();
                self.phase = Phase::Won;
                cmds.push(Cmd::Transition(Transition::Won));
                log::info!("{}: won", G::NAME);
            }
            Some(Outcome::Lost(reason)) => {
                self.pending.clear();
                self.phase = Phase::Lost;
                log::info!("{}: lost ({})", G::NAME, reason);
                cmds.push(Cmd::Transition(Transition::Lost { reason }));
            }
            None => {
                self.pending.extend(deferred);
                self.phase = if self.pending.is_empty() {
                    Phase::InRound
                } else {
                    Phase::Pending
                };
            }
        }
        UpdateResult::with_cmd(Cmd::batch(cmds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    /// Hit the number on the card; three wrong darts lose, five hits win
    #[derive(Debug, Clone)]
    struct Card {
        target: u8,
        hits: u32,
        misses: u32,
        clock_ms: Millis,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum CardStep {
        Redraw,
        Intermission,
    }

    impl Game for Card {
        type Setup = Option<u8>;
        type Pending = CardStep;
        const NAME: &'static str = "card";

        fn setup(setup: Self::Setup, ctx: &mut Ctx<'_, CardStep>) -> Result<Self> {
            let target = setup.ok_or_else(|| Error::MissingConfig("target".into()))?;
            ctx.log(Tone::System, format!("Hit {}", target));
            Ok(Card {
                target,
                hits: 0,
                misses: 0,
                clock_ms: 0,
            })
        }

        fn throw(&mut self, dart: Dart, ctx: &mut Ctx<'_, CardStep>) {
            if dart.hits(self.target) {
                self.hits += 1;
                ctx.cue(Cue::Hit);
                if self.hits >= 5 {
                    ctx.win();
                } else if self.hits == 2 {
                    ctx.await_caller(CardStep::Intermission);
                } else {
                    ctx.defer(CardStep::Redraw, 500);
                }
            } else {
                self.misses += 1;
                ctx.cue(Cue::Miss);
                if self.misses >= 3 {
                    ctx.lose("three misses");
                }
            }
        }

        fn resolve(&mut self, pending: CardStep, ctx: &mut Ctx<'_, CardStep>) {
            match pending {
                CardStep::Redraw => self.target = self.target % 20 + 1,
                CardStep::Intermission => ctx.announce("Back to it"),
            }
        }

        fn elapse(&mut self, elapsed_ms: Millis, _ctx: &mut Ctx<'_, CardStep>) {
            self.clock_ms += elapsed_ms;
        }

        fn score(&self) -> i64 {
            i64::from(self.hits)
        }
    }

    fn started() -> Session<Card> {
        let mut session = Session::new(1);
        session.start(Some(7)).unwrap();
        session
    }

    #[test]
    fn test_start_requires_config() {
        let mut session: Session<Card> = Session::new(1);
        assert!(matches!(session.start(None), Err(Error::MissingConfig(_))));
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.game().is_none());
    }

    #[test]
    fn test_start_emits_started() {
        let mut session: Session<Card> = Session::new(1);
        let result = session.start(Some(7)).unwrap();
        assert!(matches!(
            result.cmd.transitions().first(),
            Some(Transition::Started { .. })
        ));
        assert_eq!(session.phase(), Phase::InRound);
        assert_eq!(session.feed().len(), 1);
    }

    #[test]
    fn test_darts_rejected_when_idle() {
        let mut session: Session<Card> = Session::new(1);
        let result = session.handle_dart_throw(DartEvent::single(7));
        assert_eq!(result.rejected, Some(Rejection::NotStarted));
    }

    #[test]
    fn test_pending_transition_rejects_darts() {
        let mut session = started();
        session.handle_dart_throw(DartEvent::single(7));
        assert_eq!(session.phase(), Phase::Pending);

        let result = session.handle_dart_throw(DartEvent::single(8));
        assert_eq!(result.rejected, Some(Rejection::PendingTransition));
        assert_eq!(session.game().unwrap().target, 7);

        session.tick(300);
        assert_eq!(session.phase(), Phase::Pending);
        session.tick(300);
        assert_eq!(session.phase(), Phase::InRound);
        assert_eq!(session.game().unwrap().target, 8);
    }

    #[test]
    fn test_manual_transition_needs_advance() {
        let mut session = started();
        session.handle_dart_throw(DartEvent::single(7));
        session.advance();
        session.handle_dart_throw(DartEvent::single(8));

        // Second hit waits for the caller
        session.tick(60_000);
        assert_eq!(session.phase(), Phase::Pending);
        let result = session.advance();
        assert!(result.cmd.iter().any(|c| matches!(c, Cmd::Announce(_))));
        assert_eq!(session.phase(), Phase::InRound);
        assert_eq!(session.advance().rejected, Some(Rejection::NothingPending));
    }

    #[test]
    fn test_terminal_is_sticky() {
        let mut session = started();
        for _ in 0..3 {
            session.handle_dart_throw(DartEvent::single(1));
        }
        assert_eq!(session.phase(), Phase::Lost);

        let result = session.handle_dart_throw(DartEvent::single(7));
        assert_eq!(result.rejected, Some(Rejection::GameOver));
        assert_eq!(session.game().unwrap().hits, 0);
        assert_eq!(session.game().unwrap().misses, 3);
    }

    #[test]
    fn test_loss_emitted_once() {
        let mut session = started();
        let mut losses = 0;
        for _ in 0..6 {
            let result = session.handle_dart_throw(DartEvent::single(1));
            losses += result
                .cmd
                .transitions()
                .iter()
                .filter(|t| matches!(t, Transition::Lost { .. }))
                .count();
        }
        assert_eq!(losses, 1);
    }

    #[test]
    fn test_invalid_dart_is_noop() {
        let mut session = started();
        let result = session.handle_dart_throw(DartEvent::new(42, 1, 42));
        assert!(!result.is_rejected());
        assert!(result.cmd.is_none());
        assert_eq!(session.darts_applied(), 0);
    }

    #[test]
    fn test_pause_blocks_input_and_time() {
        let mut session = started();
        session.pause();
        assert_eq!(
            session.handle_dart_throw(DartEvent::single(7)).rejected,
            Some(Rejection::Paused)
        );
        session.tick(1000);
        assert_eq!(session.elapsed_ms(), 0);

        session.resume();
        session.tick(1000);
        assert_eq!(session.elapsed_ms(), 1000);
        assert_eq!(session.game().unwrap().clock_ms, 1000);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut session = started();
        session.handle_dart_throw(DartEvent::single(7));
        session.reset();
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.pending().is_none());
        assert!(session.feed().is_empty());
        assert!(session.game().is_none());
    }

    #[test]
    fn test_win() {
        let mut session = started();
        let mut target = 7;
        for _ in 0..5 {
            session.handle_dart_throw(DartEvent::single(target));
            session.advance();
            target = session.game().unwrap().target;
        }
        assert_eq!(session.phase(), Phase::Won);
        assert_eq!(session.game().unwrap().score(), 5);
    }
}
