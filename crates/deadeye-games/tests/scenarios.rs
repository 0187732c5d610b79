//! Whole-game scenarios driven through a session

use deadeye_core::{format_seed, parse_seed_input, DartEvent, Phase, ProgressRecord, Session};
use deadeye_games::{HeistConfig, HeistCrew, MissionId, SiegeConfig, StationSiege};

fn heist_session(mission: MissionId) -> Session<HeistCrew> {
    let mut progress = ProgressRecord::new(MissionId::Vault.as_str());
    progress.unlock(mission.as_str());
    let config = HeistConfig::default()
        .with_crew(["Ada", "Bo", "Cy"])
        .with_mission(mission)
        .with_progress(progress);
    let mut session = Session::new(9);
    session.start(config).unwrap();
    session
}

/// Aim at the first hostile still on the board, or let the round play out
fn play_siege(session: &mut Session<StationSiege>, until_round: u32) {
    for _ in 0..500 {
        if session.phase().is_terminal() {
            return;
        }
        let game = session.game().unwrap();
        if game.round() >= until_round {
            return;
        }
        if session.pending().is_some() {
            session.tick(2_000);
            continue;
        }
        let target = game
            .hostiles()
            .iter()
            .filter(|h| h.is_alive() && !h.has_arrived())
            .find_map(|h| h.current_number());
        match target {
            Some(n) => session.handle_dart_throw(DartEvent::single(n)),
            None => session.tick(2_000),
        };
    }
}

#[test]
fn test_big_score_campaign_finale() {
    let mut session = heist_session(MissionId::BigScore);

    for n in [7, 14, 20] {
        session.handle_dart_throw(DartEvent::single(n));
    }
    assert_eq!(session.game().unwrap().current_leg().unwrap().goal(), 8);

    for _ in 0..8 {
        session.handle_dart_throw(DartEvent::single(13));
    }
    assert_eq!(session.game().unwrap().current_leg().unwrap().goal(), 30_000);

    for _ in 0..15 {
        session.handle_dart_throw(DartEvent::single(20));
    }

    assert_eq!(session.phase(), Phase::Won);
    let game = session.game().unwrap();
    let report = game.report().unwrap();
    assert!(report.success);
    assert_eq!(report.alert, 0);
    assert_eq!(report.darts_thrown, 26);
    assert!(report.reward > 0);
    assert_eq!(report.unlocked, None);
    assert!(game.progress().is_completed("bigscore"));
    assert!(session.feed().contains("THE BIG SCORE IS YOURS"));
}

#[test]
fn test_big_score_wrong_number_raises_alert() {
    let mut session = heist_session(MissionId::BigScore);
    session.handle_dart_throw(DartEvent::single(8));

    let game = session.game().unwrap();
    assert_eq!(game.alert(), 10);
    assert_eq!(game.current_leg().unwrap().progress(), 0);
    assert!(session.feed().contains("Phase 1: Wrong number!"));
}

#[test]
fn test_seed_code_replays_same_siege() {
    let seed = parse_seed_input("ALPHA");
    assert_eq!(parse_seed_input(&format_seed(seed)), seed);

    let mut first: Session<StationSiege> = Session::new(seed);
    let mut second: Session<StationSiege> = Session::new(parse_seed_input(&format_seed(seed)));
    first.start(SiegeConfig::default()).unwrap();
    second.start(SiegeConfig::default()).unwrap();

    play_siege(&mut first, 6);
    play_siege(&mut second, 6);

    let (a, b) = (first.game().unwrap(), second.game().unwrap());
    assert_eq!(a.round(), b.round());
    assert_eq!(a.hostiles(), b.hostiles());
    assert_eq!(a.armory(), b.armory());
    assert_eq!(a.shields(), b.shields());
    assert_eq!(a.hostiles_destroyed(), b.hostiles_destroyed());
    assert_eq!(a.events(), b.events());
}

#[test]
fn test_other_seed_deals_other_hostiles() {
    let mut alpha: Session<StationSiege> = Session::new(parse_seed_input("ALPHA"));
    let mut bravo: Session<StationSiege> = Session::new(parse_seed_input("BRAVO"));
    alpha.start(SiegeConfig::default()).unwrap();
    bravo.start(SiegeConfig::default()).unwrap();

    let numbers = |s: &Session<StationSiege>| {
        let game = s.game().unwrap();
        let mut numbers: Vec<u8> = game.hostiles().iter().flat_map(|h| h.numbers.clone()).collect();
        numbers.extend(game.armory().numbers());
        numbers
    };
    assert_ne!(numbers(&alpha), numbers(&bravo));
}

#[cfg(feature = "journal")]
mod journal {
    use super::*;
    use deadeye_core::replay;

    #[test]
    fn test_replayed_siege_matches_live_game() {
        let mut live: Session<StationSiege> = Session::new(parse_seed_input("ALPHA"));
        live.start(SiegeConfig::default().with_player("Ada")).unwrap();
        play_siege(&mut live, 4);

        let copy: Session<StationSiege> = replay(live.journal().entries()).unwrap();
        let (a, b) = (live.game().unwrap(), copy.game().unwrap());
        assert_eq!(copy.seed(), live.seed());
        assert_eq!(a.round(), b.round());
        assert_eq!(a.hostiles(), b.hostiles());
        assert_eq!(a.events(), b.events());
        assert_eq!(copy.elapsed_ms(), live.elapsed_ms());
    }

    #[test]
    fn test_replayed_heist_keeps_report() {
        let mut live = heist_session(MissionId::Vault);
        for _ in 0..12 {
            live.handle_dart_throw(DartEvent::bull());
        }
        assert_eq!(live.phase(), Phase::Lost);

        let copy: Session<HeistCrew> = replay(live.journal().entries()).unwrap();
        assert_eq!(copy.phase(), Phase::Lost);
        assert_eq!(
            copy.game().unwrap().report().map(|r| r.alert),
            live.game().unwrap().report().map(|r| r.alert)
        );
    }
}
