//! Finished games written to and read back from a store

use deadeye_core::{DartEvent, Phase, Session};
use deadeye_games::{HeistConfig, HeistCrew, MissionId, SiegeConfig, StationSiege};
use deadeye_store::{MemoryStorage, Store};

fn crack_vault(config: HeistConfig) -> Session<HeistCrew> {
    let mut session: Session<HeistCrew> = Session::new(3);
    session.start(config).unwrap();
    let combination = session.game().unwrap().legs()[0]
        .sequence()
        .unwrap()
        .numbers()
        .to_vec();
    for n in combination {
        session.handle_dart_throw(DartEvent::single(n));
    }
    session
}

/// Throw only at empty numbers until the station falls
fn lose_siege(session: &mut Session<StationSiege>) {
    for _ in 0..1_000 {
        if session.phase().is_terminal() {
            return;
        }
        if session.pending().is_some() {
            session.tick(2_000);
            continue;
        }
        let game = session.game().unwrap();
        let free = (1..=20).find(|n| {
            !game.armory().contains(*n) && !game.hostiles().iter().any(|h| h.numbers.contains(n))
        });
        match free {
            Some(n) => session.handle_dart_throw(DartEvent::single(n)),
            None => session.tick(2_000),
        };
    }
}

#[test]
fn test_campaign_progress_survives_save() {
    let mut store = Store::new(MemoryStorage::new());
    let config = HeistConfig::default()
        .with_crew(["Ada", "Bo", "Cy"])
        .with_progress(store.load_progress());

    let session = crack_vault(config);
    assert_eq!(session.phase(), Phase::Won);
    let game = session.game().unwrap();
    assert!(store.save_progress(game.progress()));

    let progress = store.load_progress();
    assert!(progress.is_completed("vault"));
    assert!(progress.is_unlocked("databreach"));
    assert_eq!(
        progress.earned_currency,
        game.report().map(|r| r.reward).unwrap_or_default()
    );

    let mut next = Session::<HeistCrew>::new(4);
    let config = HeistConfig::default()
        .with_crew(["Ada", "Bo", "Cy"])
        .with_mission(MissionId::DataBreach)
        .with_progress(progress);
    assert!(next.start(config).is_ok());
}

#[test]
fn test_locked_mission_stays_locked_after_reload() {
    let store = Store::new(MemoryStorage::new());
    let mut session = Session::<HeistCrew>::new(4);
    let config = HeistConfig::default()
        .with_crew(["Ada", "Bo", "Cy"])
        .with_mission(MissionId::Casino)
        .with_progress(store.load_progress());
    assert!(session.start(config).is_err());
    assert_eq!(session.phase(), Phase::Idle);
}

#[test]
fn test_siege_summary_lands_on_both_boards() {
    let mut store = Store::new(MemoryStorage::new());
    let mut session: Session<StationSiege> = Session::new(777);
    session
        .start(SiegeConfig::default().with_player("Ada").with_shields(1))
        .unwrap();
    lose_siege(&mut session);
    assert_eq!(session.phase(), Phase::Lost);

    let summary = session.game().unwrap().summary().unwrap();
    assert_eq!(summary.seed, 777);
    let rank = store.record_score(&summary.score_entry());
    assert_eq!(rank, Some(0));

    let board = store.leaderboard(777);
    let best = board.best().unwrap();
    assert_eq!(best.player, "Ada");
    assert_eq!(best.score, summary.final_score);
    assert_eq!(best.rounds, summary.rounds_played);
    assert_eq!(store.all_time().best().and_then(|e| e.seed), Some(777));
}
