//! Relay traffic pumped into a live session

use deadeye_core::{Cmd, Cue, Presenter, Session};
use deadeye_games::{ZombieConfig, ZombieSlayer};
use deadeye_wire::{pump, LineSource, PumpStats};
use std::io::Cursor;

#[derive(Default)]
struct Recorder {
    cues: Vec<Cue>,
    announcements: Vec<String>,
}

impl Presenter for Recorder {
    fn present(&mut self, cmd: &Cmd) {
        match cmd {
            Cmd::Cue(cue) => self.cues.push(*cue),
            Cmd::Announce(text) => self.announcements.push(text.clone()),
            _ => {}
        }
    }
}

fn caller_line(n: u8, multiplier: u8, dart: u8) -> String {
    format!(
        r#"{{"event":"dart{}-thrown","player":"Ada","game":{{"fieldNumber":{},"fieldMultiplier":{},"dartValue":{},"dartNumber":{}}}}}"#,
        dart,
        n,
        multiplier,
        u32::from(n) * u32::from(multiplier),
        dart
    )
}

#[test]
fn test_relay_kill_then_pending_rejects() {
    let mut session: Session<ZombieSlayer> = Session::new(42);
    session.start(ZombieConfig::default()).unwrap();
    let target = session.game().unwrap().targets()[0];

    let traffic = [
        r#"{"event":"subscribe","client":"DeadEyeGames"}"#.to_string(),
        caller_line(target, 3, 1),
        caller_line(target, 1, 2),
    ]
    .join("\n");
    let mut source = LineSource::new(Cursor::new(traffic));
    let mut presenter = Recorder::default();

    let stats = pump(&mut source, &mut session, &mut presenter).unwrap();
    assert_eq!(
        stats,
        PumpStats {
            received: 2,
            applied: 1,
            rejected: 1,
        }
    );
    assert_eq!(session.game().unwrap().kills(), 1);
    assert!(!presenter.cues.is_empty());
    assert_eq!(source.skipped(), 0);
}

#[test]
fn test_paused_session_rejects_relay() {
    let mut session: Session<ZombieSlayer> = Session::new(7);
    session.start(ZombieConfig::default()).unwrap();
    session.pause();

    let mut source = LineSource::new(Cursor::new(caller_line(20, 1, 1)));
    let stats = pump(&mut source, &mut session, &mut Recorder::default()).unwrap();
    assert_eq!(stats.rejected, 1);
    assert_eq!(session.darts_applied(), 0);
}
