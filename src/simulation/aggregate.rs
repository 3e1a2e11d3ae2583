// Monte Carlo aggregation over repeated single-game simulations

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{PredictorError, PredictorResult};
use crate::simulation::game::Matchup;
use crate::simulation::random::RandomSource;
use crate::types::GameScore;

/// Histogram of simulated scores; home and away share the same bin edges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreDistribution {
    pub bin_width: u32,
    pub min_score: u32,
    /// Inclusive ranges, e.g. "100-104"
    pub labels: Vec<String>,
    pub home: Vec<u32>,
    pub away: Vec<u32>,
}

impl ScoreDistribution {
    /// Bin pooled home and away scores; empty when there are no scores
    pub fn from_scores(scores: &[GameScore], bin_width: u32) -> Self {
        let bin_width = bin_width.max(1);
        let pooled = scores.iter().flat_map(|s| [s.home_score, s.away_score]);
        let (Some(min), Some(max)) = (pooled.clone().min(), pooled.max()) else {
            return Self {
                bin_width,
                min_score: 0,
                labels: Vec::new(),
                home: Vec::new(),
                away: Vec::new(),
            };
        };

        let bins = ((max - min + 1) as usize).div_ceil(bin_width as usize);
        let labels = (0..bins)
            .map(|i| {
                let lo = min + i as u32 * bin_width;
                format!("{}-{}", lo, lo + bin_width - 1)
            })
            .collect();

        let mut distribution = Self {
            bin_width,
            min_score: min,
            labels,
            home: vec![0; bins],
            away: vec![0; bins],
        };

        for score in scores {
            let home_bin = distribution.bin_index(score.home_score);
            let away_bin = distribution.bin_index(score.away_score);
            distribution.home[home_bin] += 1;
            distribution.away[away_bin] += 1;
        }

        distribution
    }

    fn bin_index(&self, score: u32) -> usize {
        let index = ((score - self.min_score) / self.bin_width) as usize;
        index.min(self.labels.len().saturating_sub(1))
    }

    /// Inclusive (low, high) score bounds of bin `index`
    pub fn bin_bounds(&self, index: usize) -> Option<(u32, u32)> {
        if index >= self.labels.len() {
            return None;
        }
        let lo = self.min_score + index as u32 * self.bin_width;
        Some((lo, lo + self.bin_width - 1))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Summary of `n` simulated games between the same two teams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub simulations: usize,
    pub avg_home_score: f64,
    pub avg_away_score: f64,
    pub home_win_probability: f64,
    pub away_win_probability: f64,
    pub distribution: ScoreDistribution,
}

impl AggregateResult {
    pub fn from_scores(scores: &[GameScore], bin_width: u32) -> PredictorResult<Self> {
        if scores.is_empty() {
            return Err(PredictorError::InvalidParameter(
                "simulations".to_string(),
                "at least one simulation is required".to_string(),
            ));
        }

        let n = scores.len() as f64;
        let home_total: u64 = scores.iter().map(|s| s.home_score as u64).sum();
        let away_total: u64 = scores.iter().map(|s| s.away_score as u64).sum();
        let home_wins = scores.iter().filter(|s| s.home_won()).count();
        let away_wins = scores.iter().filter(|s| s.away_won()).count();

        Ok(Self {
            simulations: scores.len(),
            avg_home_score: home_total as f64 / n,
            avg_away_score: away_total as f64 / n,
            home_win_probability: home_wins as f64 / n,
            away_win_probability: away_wins as f64 / n,
            distribution: ScoreDistribution::from_scores(scores, bin_width),
        })
    }

    pub fn expected_margin(&self) -> f64 {
        self.avg_home_score - self.avg_away_score
    }

    pub fn favorite(&self) -> Option<&'static str> {
        if self.home_win_probability > self.away_win_probability {
            Some("home")
        } else if self.away_win_probability > self.home_win_probability {
            Some("away")
        } else {
            None
        }
    }
}

fn ensure_simulations(n: usize) -> PredictorResult<()> {
    if n == 0 {
        return Err(PredictorError::InvalidParameter(
            "simulations".to_string(),
            "must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

/// Run `n` sequential simulations drawing from a single random source
pub fn run_multiple_simulations<R: RandomSource + ?Sized>(
    n: usize,
    matchup: &Matchup<'_>,
    bin_width: u32,
    rng: &mut R,
) -> PredictorResult<AggregateResult> {
    ensure_simulations(n)?;
    let scores: Vec<GameScore> = (0..n).map(|_| matchup.simulate(rng)).collect();
    AggregateResult::from_scores(&scores, bin_width)
}

/// Run `n` simulations across the rayon pool; trial `i` uses `StdRng` seeded
/// with `seed + i`, so the result does not depend on thread count
pub fn run_multiple_simulations_parallel(
    n: usize,
    matchup: &Matchup<'_>,
    bin_width: u32,
    seed: u64,
) -> PredictorResult<AggregateResult> {
    ensure_simulations(n)?;
    let scores: Vec<GameScore> = (0..n)
        .into_par_iter()
        .map(|i| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
            matchup.simulate(&mut rng)
        })
        .collect();
    AggregateResult::from_scores(&scores, bin_width)
}
