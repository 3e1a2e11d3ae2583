// Simulation Engine Orchestrator
// Applies engine configuration to the single-game, aggregate and live simulators

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::{PredictorError, PredictorResult};
use crate::minutes::TeamMinutes;
use crate::simulation::aggregate::{self, AggregateResult};
use crate::simulation::game::{self, Matchup};
use crate::simulation::live::{self, LiveWinProbability};
use crate::simulation::random::RandomSource;
use crate::types::{GameScore, LiveGameState, PlayerRecord, TeamRecord};

/// Trials simulated between progress updates on the sequential path
const PROGRESS_CHUNK: usize = 100;

/// Receives progress updates from long simulation runs
pub trait ProgressSink {
    fn advance(&self, completed: u64);
}

/// Main simulation engine; stateless apart from its configuration
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    config: EngineConfig,
}

impl SimulationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Create simulation engine with default configuration
    pub fn with_default_config() -> Self {
        Self::new(EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn defense_factor(&self, opponent_rating: Option<f64>) -> f64 {
        game::defense_factor(self.config.league_average_rating, opponent_rating)
    }

    /// Resolve a matchup against the configured league average
    pub fn matchup<'a>(
        &self,
        home: &'a TeamRecord,
        away: &'a TeamRecord,
        roster: &'a [PlayerRecord],
        home_minutes: &'a TeamMinutes,
        away_minutes: &'a TeamMinutes,
    ) -> Matchup<'a> {
        let matchup = Matchup::new(
            home,
            away,
            roster,
            home_minutes,
            away_minutes,
            self.config.league_average_rating,
        );
        debug!(
            "🏀 Matchup {} vs {}: defense factors {:.3} / {:.3}, expected {:.1}-{:.1}",
            home.team,
            away.team,
            matchup.home_factor,
            matchup.away_factor,
            matchup.expected_side_points(game::Side::Home),
            matchup.expected_side_points(game::Side::Away),
        );
        matchup
    }

    pub fn simulate_game<R: RandomSource + ?Sized>(&self, matchup: &Matchup<'_>, rng: &mut R) -> GameScore {
        matchup.simulate(rng)
    }

    /// Sequential aggregate run with the caller's random source
    pub fn run_multiple_simulations<R: RandomSource + ?Sized>(
        &self,
        n: usize,
        matchup: &Matchup<'_>,
        rng: &mut R,
    ) -> PredictorResult<AggregateResult> {
        aggregate::run_multiple_simulations(n, matchup, self.config.bin_width, rng)
    }

    /// Aggregate prediction using configured defaults for anything not given.
    /// A fixed seed makes the result reproducible on either execution path.
    pub fn predict(
        &self,
        matchup: &Matchup<'_>,
        simulations: Option<usize>,
        seed: Option<u64>,
        progress: Option<&dyn ProgressSink>,
    ) -> PredictorResult<AggregateResult> {
        let n = simulations.unwrap_or(self.config.simulations);
        if n == 0 {
            return Err(PredictorError::InvalidParameter(
                "simulations".to_string(),
                "must be greater than 0".to_string(),
            ));
        }
        let seed = seed.or(self.config.seed);

        info!(
            "🎲 Simulating {} vs {} ({} runs, {})",
            matchup.home.team,
            matchup.away.team,
            n,
            if self.config.parallel { "parallel" } else { "sequential" }
        );

        let result = if self.config.parallel {
            let seed = seed.unwrap_or_else(rand::random);
            let result =
                aggregate::run_multiple_simulations_parallel(n, matchup, self.config.bin_width, seed)?;
            if let Some(sink) = progress {
                sink.advance(n as u64);
            }
            result
        } else {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let mut scores = Vec::with_capacity(n);
            while scores.len() < n {
                let batch = PROGRESS_CHUNK.min(n - scores.len());
                scores.extend((0..batch).map(|_| matchup.simulate(&mut rng)));
                if let Some(sink) = progress {
                    sink.advance(batch as u64);
                }
            }
            AggregateResult::from_scores(&scores, self.config.bin_width)?
        };

        debug!(
            "📊 Averages {:.1}-{:.1}, {} histogram bins",
            result.avg_home_score,
            result.avg_away_score,
            result.distribution.len()
        );
        info!(
            "✅ Prediction complete: {} {:.1}% | {} {:.1}%",
            matchup.home.team,
            result.home_win_probability * 100.0,
            matchup.away.team,
            result.away_win_probability * 100.0
        );

        Ok(result)
    }

    pub fn simulate_live_game<R: RandomSource + ?Sized>(
        &self,
        n: usize,
        matchup: &Matchup<'_>,
        state: &LiveGameState,
        rng: &mut R,
    ) -> PredictorResult<LiveWinProbability> {
        live::simulate_live_game(n, matchup, state, self.config.reject_unknown_periods, rng)
    }

    /// Live win probability using configured defaults for anything not given
    pub fn predict_live(
        &self,
        matchup: &Matchup<'_>,
        state: &LiveGameState,
        simulations: Option<usize>,
        seed: Option<u64>,
    ) -> PredictorResult<LiveWinProbability> {
        let n = simulations.unwrap_or(self.config.simulations);
        let mut rng = match seed.or(self.config.seed) {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!(
            "⏱️  Live simulation {} {} - {} {} ({}, {}s left in period)",
            matchup.home.team,
            state.home_score,
            state.away_score,
            matchup.away.team,
            state.period,
            state.seconds_remaining
        );

        let result = self.simulate_live_game(n, matchup, state, &mut rng)?;

        if result.is_final() {
            info!("🏁 No time remaining; current score is final");
        } else {
            info!(
                "✅ Live prediction complete: {:.1} min left | {} {:.1}% | {} {:.1}%",
                result.remaining_minutes,
                matchup.home.team,
                result.home_win_probability * 100.0,
                matchup.away.team,
                result.away_win_probability * 100.0
            );
        }

        Ok(result)
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::with_default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Counter(Cell<u64>);

    impl ProgressSink for Counter {
        fn advance(&self, completed: u64) {
            self.0.set(self.0.get() + completed);
        }
    }

    fn fixture() -> (Vec<PlayerRecord>, TeamRecord, TeamRecord, TeamMinutes, TeamMinutes) {
        let roster = vec![
            PlayerRecord::new("H1", "Home").with_scoring(34.0, 28.0),
            PlayerRecord::new("H2", "Home").with_scoring(30.0, 18.0),
            PlayerRecord::new("A1", "Away").with_scoring(34.0, 28.0),
            PlayerRecord::new("A2", "Away").with_scoring(30.0, 18.0),
        ];
        let home = TeamRecord::new("Home", Some(102.0));
        let away = TeamRecord::new("Away", Some(98.0));
        let hm: TeamMinutes = vec![("H1", 34.0), ("H2", 30.0)].into_iter().collect();
        let am: TeamMinutes = vec![("A1", 34.0), ("A2", 30.0)].into_iter().collect();
        (roster, home, away, hm, am)
    }

    #[test]
    fn test_seeded_predictions_are_reproducible() {
        let (roster, home, away, hm, am) = fixture();
        let engine = SimulationEngine::with_default_config();
        let matchup = engine.matchup(&home, &away, &roster, &hm, &am);

        let first = engine.predict(&matchup, Some(250), Some(9), None).unwrap();
        let second = engine.predict(&matchup, Some(250), Some(9), None).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.simulations, 250);
    }

    #[test]
    fn test_progress_reports_every_trial() {
        let (roster, home, away, hm, am) = fixture();
        let engine = SimulationEngine::with_default_config();
        let matchup = engine.matchup(&home, &away, &roster, &hm, &am);
        let counter = Counter(Cell::new(0));

        engine.predict(&matchup, Some(345), Some(1), Some(&counter)).unwrap();
        assert_eq!(counter.0.get(), 345);
    }

    #[test]
    fn test_parallel_path_matches_itself() {
        let (roster, home, away, hm, am) = fixture();
        let engine = SimulationEngine::new(EngineConfig {
            parallel: true,
            seed: Some(77),
            ..EngineConfig::default()
        });
        let matchup = engine.matchup(&home, &away, &roster, &hm, &am);

        let first = engine.predict(&matchup, Some(300), None, None).unwrap();
        let second = engine.predict(&matchup, Some(300), None, None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_defense_factor_uses_configured_average() {
        let engine = SimulationEngine::new(EngineConfig {
            league_average_rating: 110.0,
            ..EngineConfig::default()
        });
        assert!((engine.defense_factor(Some(100.0)) - 1.1).abs() < 1e-12);
        assert_eq!(engine.defense_factor(None), 1.0);
    }

    #[test]
    fn test_live_unknown_period_follows_config() {
        let (roster, home, away, hm, am) = fixture();
        let state = LiveGameState {
            period: "halftime".to_string(),
            seconds_remaining: 0,
            home_score: 50,
            away_score: 48,
        };

        let strict = SimulationEngine::with_default_config();
        let matchup = strict.matchup(&home, &away, &roster, &hm, &am);
        assert!(matches!(
            strict.predict_live(&matchup, &state, Some(10), Some(3)),
            Err(PredictorError::InvalidPeriod(_))
        ));

        let lenient = SimulationEngine::new(EngineConfig {
            reject_unknown_periods: false,
            ..EngineConfig::default()
        });
        let result = lenient.predict_live(&matchup, &state, Some(10), Some(3)).unwrap();
        assert_eq!(result.remaining_minutes, 48.0);
    }
}
