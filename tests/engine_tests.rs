// Simulation engine behaviour over many trials
mod common;

use common::{balanced_roster, default_minutes, team};
use nba_predictor::simulation::{Matchup, SequenceRandom, Side};
use nba_predictor::{EngineConfig, LiveGameState, PlayerRecord, RandomSource, SimulationEngine};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn symmetric_roster() -> Vec<PlayerRecord> {
    let mut roster = balanced_roster("Home", 14.0);
    roster.extend(balanced_roster("Away", 14.0));
    roster
}

fn live_state(period: &str, seconds: u32, home: u32, away: u32) -> LiveGameState {
    LiveGameState {
        period: period.to_string(),
        seconds_remaining: seconds,
        home_score: home,
        away_score: away,
    }
}

#[test]
fn test_gaussian_draws_match_requested_moments() {
    let mut rng = StdRng::seed_from_u64(123);
    let n = 50_000;
    let draws: Vec<f64> = (0..n).map(|_| rng.gaussian(20.0, 3.0)).collect();

    let mean = draws.iter().sum::<f64>() / n as f64;
    let variance = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;

    assert!((mean - 20.0).abs() < 0.1, "mean {}", mean);
    assert!((variance.sqrt() - 3.0).abs() < 0.1, "stdev {}", variance.sqrt());
    assert!(draws.iter().all(|x| x.is_finite()));
}

#[test]
fn test_simulated_games_never_end_tied() {
    let roster = symmetric_roster();
    let home = team("Home", 100.0);
    let away = team("Away", 100.0);
    let hm = default_minutes("Home", &roster);
    let am = default_minutes("Away", &roster);

    let engine = SimulationEngine::with_default_config();
    let matchup = engine.matchup(&home, &away, &roster, &hm, &am);
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..5_000 {
        let score = engine.simulate_game(&matchup, &mut rng);
        assert_ne!(score.home_score, score.away_score);
    }
}

#[test]
fn test_symmetric_matchup_is_close_to_even() {
    let roster = symmetric_roster();
    let home = team("Home", 100.0);
    let away = team("Away", 100.0);
    let hm = default_minutes("Home", &roster);
    let am = default_minutes("Away", &roster);

    let engine = SimulationEngine::with_default_config();
    let matchup = engine.matchup(&home, &away, &roster, &hm, &am);
    let result = engine
        .predict(&matchup, Some(4_000), Some(2024), None)
        .expect("prediction should succeed");

    assert!(
        (0.40..=0.60).contains(&result.home_win_probability),
        "home win probability {} not near even",
        result.home_win_probability
    );
    assert!((result.home_win_probability + result.away_win_probability - 1.0).abs() < 1e-9);
    assert!((result.avg_home_score - result.avg_away_score).abs() < 3.0);
    // 8 x 14 points, neutral defense
    assert!((result.avg_home_score - 112.0).abs() < 3.0);
}

#[test]
fn test_defense_factor_scales_opponent_scoring() {
    let roster = symmetric_roster();
    let home = team("Home", 90.0);
    let away = team("Away", 110.0);
    let hm = default_minutes("Home", &roster);
    let am = default_minutes("Away", &roster);

    // Each side is scaled by league average / opponent rating
    let matchup = Matchup::new(&home, &away, &roster, &hm, &am, 100.0);
    assert!((matchup.home_factor - 100.0 / 110.0).abs() < 1e-12);
    assert!((matchup.away_factor - 100.0 / 90.0).abs() < 1e-12);
    assert!(matchup.expected_side_points(Side::Home) < matchup.expected_side_points(Side::Away));

    let engine = SimulationEngine::with_default_config();
    let matchup = engine.matchup(&home, &away, &roster, &hm, &am);
    let result = engine
        .predict(&matchup, Some(2_000), Some(11), None)
        .expect("prediction should succeed");

    assert!(result.away_win_probability > 0.9);
    assert!(result.avg_home_score < result.avg_away_score);
}

#[test]
fn test_fixed_seed_reproduces_prediction_on_both_paths() {
    let roster = symmetric_roster();
    let home = team("Home", 100.0);
    let away = team("Away", 104.0);
    let hm = default_minutes("Home", &roster);
    let am = default_minutes("Away", &roster);

    for parallel in [false, true] {
        let engine = SimulationEngine::new(EngineConfig {
            parallel,
            ..EngineConfig::default()
        });
        let matchup = engine.matchup(&home, &away, &roster, &hm, &am);
        let first = engine.predict(&matchup, Some(500), Some(99), None).unwrap();
        let second = engine.predict(&matchup, Some(500), Some(99), None).unwrap();
        assert_eq!(first, second, "parallel = {}", parallel);
    }
}

#[test]
fn test_histogram_counts_every_trial() {
    let roster = symmetric_roster();
    let home = team("Home", 100.0);
    let away = team("Away", 100.0);
    let hm = default_minutes("Home", &roster);
    let am = default_minutes("Away", &roster);

    let engine = SimulationEngine::with_default_config();
    let matchup = engine.matchup(&home, &away, &roster, &hm, &am);
    let result = engine.predict(&matchup, Some(750), Some(3), None).unwrap();

    let dist = &result.distribution;
    assert_eq!(dist.labels.len(), dist.home.len());
    assert_eq!(dist.home.len(), dist.away.len());
    assert_eq!(dist.home.iter().sum::<u32>(), 750);
    assert_eq!(dist.away.iter().sum::<u32>(), 750);
}

#[test]
fn test_zero_simulations_is_rejected() {
    let roster = symmetric_roster();
    let home = team("Home", 100.0);
    let away = team("Away", 100.0);
    let hm = default_minutes("Home", &roster);
    let am = default_minutes("Away", &roster);

    let engine = SimulationEngine::with_default_config();
    let matchup = engine.matchup(&home, &away, &roster, &hm, &am);

    assert!(engine.predict(&matchup, Some(0), Some(1), None).is_err());
    assert!(engine
        .predict_live(&matchup, &live_state("Q2", 300, 40, 38), Some(0), Some(1))
        .is_err());
}

#[test]
fn test_expired_clock_returns_final_score_without_draws() {
    let roster = symmetric_roster();
    let home = team("Home", 100.0);
    let away = team("Away", 100.0);
    let hm = default_minutes("Home", &roster);
    let am = default_minutes("Away", &roster);

    let engine = SimulationEngine::with_default_config();
    let matchup = engine.matchup(&home, &away, &roster, &hm, &am);
    let mut rng = SequenceRandom::new(vec![0.3, 0.7]);

    let result = engine
        .simulate_live_game(1_000, &matchup, &live_state("Q4", 0, 101, 99), &mut rng)
        .unwrap();

    assert!(result.is_final());
    assert_eq!(result.home_win_probability, 1.0);
    assert_eq!(result.away_win_probability, 0.0);
    assert_eq!(result.simulations, 0);
    assert_eq!(rng.draws(), 0);
}

#[test]
fn test_late_lead_is_nearly_certain() {
    let roster = symmetric_roster();
    let home = team("Home", 100.0);
    let away = team("Away", 100.0);
    let hm = default_minutes("Home", &roster);
    let am = default_minutes("Away", &roster);

    let engine = SimulationEngine::with_default_config();
    let matchup = engine.matchup(&home, &away, &roster, &hm, &am);

    let late = engine
        .predict_live(&matchup, &live_state("4", 30, 110, 90), Some(1_000), Some(5))
        .unwrap();
    assert!(late.home_win_probability > 0.99);
    assert!((late.remaining_minutes - 0.5).abs() < 1e-9);

    // A small lead with a full second half to play is far from safe
    let early = engine
        .predict_live(&matchup, &live_state("Q3", 720, 55, 45), Some(1_000), Some(5))
        .unwrap();
    assert!(early.home_win_probability > 0.5);
    assert!(early.home_win_probability < 0.97);
    assert!((early.remaining_minutes - 24.0).abs() < 1e-9);
}

#[test]
fn test_overtime_remaining_time() {
    let roster = symmetric_roster();
    let home = team("Home", 100.0);
    let away = team("Away", 100.0);
    let hm = default_minutes("Home", &roster);
    let am = default_minutes("Away", &roster);

    let engine = SimulationEngine::with_default_config();
    let matchup = engine.matchup(&home, &away, &roster, &hm, &am);
    let result = engine
        .predict_live(&matchup, &live_state("OT1", 150, 110, 110), Some(400), Some(8))
        .unwrap();

    assert!((result.remaining_minutes - 2.5).abs() < 1e-9);
    assert!((result.home_win_probability + result.away_win_probability - 1.0).abs() < 1e-9);
}

#[test]
fn test_unknown_period_follows_configuration() {
    let roster = symmetric_roster();
    let home = team("Home", 100.0);
    let away = team("Away", 100.0);
    let hm = default_minutes("Home", &roster);
    let am = default_minutes("Away", &roster);
    let state = live_state("halftime", 0, 50, 48);

    let strict = SimulationEngine::with_default_config();
    let matchup = strict.matchup(&home, &away, &roster, &hm, &am);
    assert!(strict.predict_live(&matchup, &state, Some(100), Some(1)).is_err());

    let lenient = SimulationEngine::new(EngineConfig {
        reject_unknown_periods: false,
        ..EngineConfig::default()
    });
    let matchup = lenient.matchup(&home, &away, &roster, &hm, &am);
    let result = lenient.predict_live(&matchup, &state, Some(100), Some(1)).unwrap();
    assert_eq!(result.remaining_minutes, 48.0);
    assert!(!result.is_final());
}
