// Single-game simulation
//
// Each rostered player's points are drawn independently from a normal
// distribution around their per-minute scoring rate times allocated minutes,
// scaled by the opponent's defense factor. Ties get a minimal overtime.

use std::collections::HashMap;

use crate::minutes::TeamMinutes;
use crate::simulation::random::RandomSource;
use crate::types::{GameScore, PlayerRecord, TeamRecord};

/// Full regulation length in minutes
pub const REGULATION_MINUTES: f64 = 48.0;

const MIN_POINTS_STDDEV: f64 = 2.0;
const POINTS_STDDEV_RATIO: f64 = 0.15;
const OVERTIME_MIN_POINTS: u32 = 1;
const OVERTIME_MAX_POINTS: u32 = 5;

/// Multiplier applied to a side's expected points from the opponent's defensive rating.
/// Neutral (1.0) when the rating is absent, zero or otherwise unusable.
pub fn defense_factor(league_average_rating: f64, opponent_rating: Option<f64>) -> f64 {
    match opponent_rating {
        Some(rating) if rating.is_finite() && rating > 0.0 => league_average_rating / rating,
        _ => 1.0,
    }
}

/// Defense-adjusted expected points, or `None` when the player cannot contribute
pub fn expected_points(player: &PlayerRecord, minutes: f64, defense_factor: f64) -> Option<f64> {
    if !(minutes > 0.0) {
        return None;
    }
    let mp = player.minutes.filter(|mp| mp.is_finite() && *mp > 0.0)?;
    let pts = player.points.filter(|pts| pts.is_finite() && *pts != 0.0)?;

    let points_per_minute = pts / mp;
    Some(points_per_minute * minutes * defense_factor)
}

/// Simulated points for one player in one game; never negative
pub fn simulate_player_points<R: RandomSource + ?Sized>(
    player: &PlayerRecord,
    minutes: f64,
    defense_factor: f64,
    rng: &mut R,
) -> u32 {
    let Some(adjusted) = expected_points(player, minutes, defense_factor) else {
        return 0;
    };

    let stdev = MIN_POINTS_STDDEV.max(adjusted * POINTS_STDDEV_RATIO);
    let simulated = rng.gaussian(adjusted, stdev);

    simulated.round().max(0.0) as u32
}

/// Add a random 1-5 points to one side, picked by coin flip, if the scores are level
pub fn break_tie<R: RandomSource + ?Sized>(score: &mut GameScore, rng: &mut R) {
    if score.home_score != score.away_score {
        return;
    }
    if rng.coin_flip() {
        let extra = rng.uniform_int(OVERTIME_MIN_POINTS, OVERTIME_MAX_POINTS);
        score.home_score = score.home_score.saturating_add(extra);
    } else {
        let extra = rng.uniform_int(OVERTIME_MIN_POINTS, OVERTIME_MAX_POINTS);
        score.away_score = score.away_score.saturating_add(extra);
    }
}

/// Player lookup by (team, name); names may collide across teams
#[derive(Debug, Clone)]
pub struct RosterIndex<'a> {
    players: HashMap<(&'a str, &'a str), &'a PlayerRecord>,
}

impl<'a> RosterIndex<'a> {
    pub fn new(roster: &'a [PlayerRecord]) -> Self {
        let mut players = HashMap::with_capacity(roster.len());
        for player in roster {
            // First match wins
            players
                .entry((player.team.as_str(), player.player.as_str()))
                .or_insert(player);
        }
        Self { players }
    }

    pub fn get(&self, team: &str, player: &str) -> Option<&'a PlayerRecord> {
        self.players.get(&(team, player)).copied()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

/// Everything a trial needs, resolved once per prediction
#[derive(Debug, Clone)]
pub struct Matchup<'a> {
    pub home: &'a TeamRecord,
    pub away: &'a TeamRecord,
    roster: RosterIndex<'a>,
    home_minutes: &'a TeamMinutes,
    away_minutes: &'a TeamMinutes,
    /// Scales home scoring; derived from the away team's rating
    pub home_factor: f64,
    /// Scales away scoring; derived from the home team's rating
    pub away_factor: f64,
}

impl<'a> Matchup<'a> {
    pub fn new(
        home: &'a TeamRecord,
        away: &'a TeamRecord,
        roster: &'a [PlayerRecord],
        home_minutes: &'a TeamMinutes,
        away_minutes: &'a TeamMinutes,
        league_average_rating: f64,
    ) -> Self {
        Self {
            home,
            away,
            roster: RosterIndex::new(roster),
            home_minutes,
            away_minutes,
            home_factor: defense_factor(league_average_rating, away.adjusted_defensive_rating),
            away_factor: defense_factor(league_average_rating, home.adjusted_defensive_rating),
        }
    }

    /// Expected (pre-randomness) points for one side over a full game
    pub fn expected_side_points(&self, side: Side) -> f64 {
        let (team, minutes, factor) = self.side(side);
        minutes
            .iter()
            .filter_map(|(name, m)| {
                let player = self.roster.get(&team.team, name)?;
                expected_points(player, m, factor)
            })
            .sum()
    }

    /// Simulated points for one side; each full-game allocation is scaled by
    /// `remaining_minutes / 48`, which is the identity for a whole game
    pub fn simulate_side<R: RandomSource + ?Sized>(
        &self,
        side: Side,
        remaining_minutes: f64,
        rng: &mut R,
    ) -> u32 {
        let (team, minutes, factor) = self.side(side);
        let window = remaining_minutes / REGULATION_MINUTES;

        let mut total: u32 = 0;
        for (name, allocated) in minutes.iter() {
            let Some(player) = self.roster.get(&team.team, name) else {
                continue;
            };
            total = total.saturating_add(simulate_player_points(player, allocated * window, factor, rng));
        }
        total
    }

    /// One full game; the returned scores are never equal
    pub fn simulate<R: RandomSource + ?Sized>(&self, rng: &mut R) -> GameScore {
        let mut score = GameScore {
            home_score: self.simulate_side(Side::Home, REGULATION_MINUTES, rng),
            away_score: self.simulate_side(Side::Away, REGULATION_MINUTES, rng),
        };
        break_tie(&mut score, rng);
        score
    }

    fn side(&self, side: Side) -> (&'a TeamRecord, &'a TeamMinutes, f64) {
        match side {
            Side::Home => (self.home, self.home_minutes, self.home_factor),
            Side::Away => (self.away, self.away_minutes, self.away_factor),
        }
    }
}

/// Simulate one game between two merged team profiles
pub fn simulate_game<R: RandomSource + ?Sized>(
    home: &TeamRecord,
    away: &TeamRecord,
    roster: &[PlayerRecord],
    home_minutes: &TeamMinutes,
    away_minutes: &TeamMinutes,
    league_average_rating: f64,
    rng: &mut R,
) -> GameScore {
    Matchup::new(home, away, roster, home_minutes, away_minutes, league_average_rating).simulate(rng)
}
