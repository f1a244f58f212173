use std::collections::HashSet;
use std::path::PathBuf;

use draft_sim::analysis::Recommender;
use draft_sim::data::load_dataset;
use draft_sim::draft::RolePick;
use draft_sim::history::DraftExport;
use draft_sim::oracle::HeuristicOracle;
use draft_sim::{
    DraftData, DraftEngine, GameController, GameMode, InvalidAction, Phase, Role,
    ScoringConfig, Side,
};

const BANS: [u32; 10] = [157, 238, 61, 18, 11, 201, 22, 64, 67, 53];

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_data() -> DraftData {
    DraftData::load(&fixture_dir(), ScoringConfig::default()).unwrap()
}

fn banned_engine() -> DraftEngine {
    let mut engine = DraftEngine::new(Side::Blue);
    for id in BANS {
        engine.try_ban(id, None).unwrap();
    }
    engine
}

#[test]
fn test_fixture_data_loads() {
    let data = load_data();
    assert_eq!(data.directory.len(), 40);
    assert!(!data.synergy.is_empty());
    assert!(!data.matchup.is_empty());
}

#[test]
fn test_ban_phase_then_first_pick() {
    let data = load_data();
    let oracle = HeuristicOracle::default();
    let mut engine = banned_engine();

    assert_eq!(engine.current_phase(), Phase::Pick);
    assert_eq!(engine.current_side(), Some(Side::Blue));

    engine.try_pick(222, "Jinx", Role::Bottom, None).unwrap();
    assert_eq!(
        engine.vacant_roles(Side::Blue),
        vec![Role::Top, Role::Jungle, Role::Middle, Role::Utility]
    );
    assert_eq!(engine.current_side(), Some(Side::Red));

    let recs = Recommender::new(&data, &oracle).recommend(engine.state(), Side::Blue, 5);
    assert!(!recs.is_empty() && recs.len() <= 5);
    for (i, rec) in recs.iter().enumerate() {
        assert_eq!(rec.rank, i + 1);
        assert_ne!(rec.role, Role::Bottom);
        assert!(!BANS.contains(&rec.champion_id));
        assert_ne!(rec.champion_id, 222);
    }
    for pair in recs.windows(2) {
        assert!(pair[0].total_score >= pair[1].total_score);
    }
}

#[test]
fn test_matchup_rates_are_complementary() {
    let data = load_data();
    let dataset = load_dataset(&fixture_dir()).unwrap();
    let min_games = data.scoring.min_pair_games;

    for rec in dataset.matchups.iter().filter(|r| r.pick_count >= min_games) {
        let a = RolePick::new(rec.champion_a, rec.role_a);
        let b = RolePick::new(rec.champion_b, rec.role_b);
        let sum = data.matchup.score(a, b) + data.matchup.score(b, a);
        assert!((sum - 1.0).abs() < 1e-9, "{:?} vs {:?}", a, b);
    }
}

#[test]
fn test_recommendations_are_deterministic() {
    let data = load_data();
    let oracle = HeuristicOracle::default();
    let mut engine = banned_engine();
    engine.try_pick(222, "Jinx", Role::Bottom, None).unwrap();

    let recommender = Recommender::new(&data, &oracle);
    let first = recommender.recommend(engine.state(), Side::Red, 5);
    let second = recommender.recommend(engine.state(), Side::Red, 5);
    assert_eq!(first, second);
}

#[test]
fn test_low_pick_rate_roles_are_not_candidates() {
    let data = load_data();
    let oracle = HeuristicOracle::default();
    let engine = banned_engine();

    let candidates = Recommender::new(&data, &oracle).candidates(engine.state(), Side::Blue);
    assert!(candidates
        .iter()
        .any(|c| c.champion_id == 81 && c.role == Role::Bottom));
    assert!(!candidates
        .iter()
        .any(|c| c.champion_id == 81 && c.role == Role::Middle));
}

#[test]
fn test_wrong_side_leaves_state_untouched() {
    let mut engine = DraftEngine::new(Side::Blue);
    let before = engine.state().clone();

    let err = engine.try_ban(86, Some(Side::Red)).unwrap_err();
    assert!(matches!(err, InvalidAction::WrongTurn { .. }));
    assert_eq!(engine.state(), &before);

    let err = engine.try_pick(86, "Garen", Role::Top, None).unwrap_err();
    assert_eq!(err, InvalidAction::BansIncomplete);
    assert_eq!(engine.state(), &before);
}

#[test]
fn test_wrong_side_pick_in_pick_phase_is_rejected() {
    let mut engine = banned_engine();
    assert_eq!(engine.current_side(), Some(Side::Blue));
    let before = engine.state().clone();

    assert!(!engine.apply_pick(222, "Jinx", Role::Bottom, Some(Side::Red)));
    assert_eq!(engine.state(), &before);
    assert_eq!(engine.current_side(), Some(Side::Blue));
}

#[test]
fn test_ai_drafts_both_sides_to_completion() {
    let data = load_data();
    let oracle = HeuristicOracle::default();
    let mut game = GameController::new(&data, &oracle, GameMode::AiVsAi, Side::Blue);

    let mut turns = 0;
    while game.is_ai_turn() {
        assert!(game.ai_turn().is_some());
        turns += 1;
        assert!(turns <= 20);
    }

    assert!(game.is_complete());
    assert_eq!(turns, 20);
    assert_eq!(game.actions().len(), 20);

    let state = game.state();
    let mut seen = HashSet::new();
    for side in [Side::Blue, Side::Red] {
        let team = state.team(side);
        assert_eq!(team.bans().len(), 5);
        assert_eq!(team.picks().len(), 5);
        let roles: HashSet<Role> = team.picks().iter().map(|p| p.role).collect();
        assert_eq!(roles.len(), 5);
        for id in team.bans().iter().copied().chain(team.picks().iter().map(|p| p.champion_id)) {
            assert!(seen.insert(id), "champion {} used twice", id);
        }
    }
}

#[test]
fn test_export_round_trip_through_history_dir() {
    let data = load_data();
    let oracle = HeuristicOracle::default();
    let mut game = GameController::new(&data, &oracle, GameMode::AiVsAi, Side::Blue);
    while game.ai_turn().is_some() {}

    let dir = tempfile::tempdir().unwrap();
    let export = game.export();
    let path = export.write_to(&dir.path().join("history")).unwrap();
    assert!(path.exists());

    let loaded = DraftExport::load(&path).unwrap();
    assert_eq!(loaded.actions.len(), 20);
    assert!(loaded.draft.is_complete);
    let prediction = loaded.prediction.unwrap();
    assert!((prediction.blue + prediction.red - 1.0).abs() < 1e-9);
    assert_eq!(loaded.metadata.mode, GameMode::AiVsAi);
}
