// Win probability for a game already in progress
//
// Only the remaining game time is simulated. Each player's full-game minutes
// are scaled down to the remaining window and their simulated points are
// added on top of the current score.

use serde::{Deserialize, Serialize};

use crate::error::{PredictorError, PredictorResult};
use crate::simulation::game::{break_tie, Matchup, Side, REGULATION_MINUTES};
use crate::simulation::random::RandomSource;
use crate::types::{GameScore, LiveGameState, Period};

pub const QUARTER_SECONDS: u32 = 720;
pub const OVERTIME_SECONDS: u32 = 300;

/// Minutes of game time left, counting the rest of the current period
pub fn remaining_minutes(period: Period, seconds_remaining: u32) -> f64 {
    let seconds = match period {
        Period::Quarter(q) => {
            let later_quarters = 4u32.saturating_sub(q as u32);
            later_quarters * QUARTER_SECONDS + seconds_remaining
        }
        Period::Overtime(n) => (n as u32).saturating_sub(1) * OVERTIME_SECONDS + seconds_remaining,
    };
    seconds as f64 / 60.0
}

/// Like `remaining_minutes`, starting from the raw label. Unknown labels are
/// rejected, or treated as a full game left when `reject_unknown` is false.
pub fn remaining_minutes_for_label(
    label: &str,
    seconds_remaining: u32,
    reject_unknown: bool,
) -> PredictorResult<f64> {
    match label.parse::<Period>() {
        Ok(period) => Ok(remaining_minutes(period, seconds_remaining)),
        Err(_) if !reject_unknown => Ok(REGULATION_MINUTES),
        Err(reason) => Err(PredictorError::InvalidPeriod(reason)),
    }
}

/// Length of a period in seconds
pub fn period_length_seconds(period: Period) -> u32 {
    match period {
        Period::Quarter(_) => QUARTER_SECONDS,
        Period::Overtime(_) => OVERTIME_SECONDS,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveWinProbability {
    pub home_win_probability: f64,
    pub away_win_probability: f64,
    pub remaining_minutes: f64,
    /// Number of simulated finishes; 0 when the game is already over
    pub simulations: usize,
    /// Set only when no time remains: the current score is the final score
    pub final_score: Option<GameScore>,
}

impl LiveWinProbability {
    pub fn is_final(&self) -> bool {
        self.final_score.is_some()
    }
}

/// Simulate `n` finishes of a game in progress
pub fn simulate_live_game<R: RandomSource + ?Sized>(
    n: usize,
    matchup: &Matchup<'_>,
    state: &LiveGameState,
    reject_unknown_periods: bool,
    rng: &mut R,
) -> PredictorResult<LiveWinProbability> {
    if n == 0 {
        return Err(PredictorError::InvalidParameter(
            "simulations".to_string(),
            "must be greater than 0".to_string(),
        ));
    }

    let remaining =
        remaining_minutes_for_label(&state.period, state.seconds_remaining, reject_unknown_periods)?;

    let current = GameScore {
        home_score: state.home_score,
        away_score: state.away_score,
    };

    if remaining <= 0.0 {
        // Nothing left to play; no draws taken
        return Ok(LiveWinProbability {
            home_win_probability: if current.home_won() { 1.0 } else { 0.0 },
            away_win_probability: if current.away_won() { 1.0 } else { 0.0 },
            remaining_minutes: 0.0,
            simulations: 0,
            final_score: Some(current),
        });
    }

    let mut home_wins = 0usize;
    let mut away_wins = 0usize;

    for _ in 0..n {
        let mut score = GameScore {
            home_score: current
                .home_score
                .saturating_add(matchup.simulate_side(Side::Home, remaining, rng)),
            away_score: current
                .away_score
                .saturating_add(matchup.simulate_side(Side::Away, remaining, rng)),
        };
        break_tie(&mut score, rng);

        if score.home_won() {
            home_wins += 1;
        } else if score.away_won() {
            away_wins += 1;
        }
    }

    Ok(LiveWinProbability {
        home_win_probability: home_wins as f64 / n as f64,
        away_win_probability: away_wins as f64 / n as f64,
        remaining_minutes: remaining,
        simulations: n,
        final_score: None,
    })
}
