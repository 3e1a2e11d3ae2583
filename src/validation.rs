//! Pre-flight validation for predictions
//!
//! Checks team selection, data availability and minutes allocations before
//! any simulation work, and parses the raw live-game inputs.

use tracing::{error, info, warn};

use crate::config::MinutesConfig;
use crate::db::CombinedData;
use crate::error::{PredictorError, PredictorResult};
use crate::minutes::{MinutesAllocation, MinutesStatus};
use crate::reconciler::DataSource;
use crate::simulation::live::period_length_seconds;
use crate::types::{LiveGameState, Period};

/// Highest score accepted for a game in progress
pub const MAX_SCORE: u32 = 999;

/// Validation result with detailed findings
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub passed: bool,
    pub checks: Vec<ValidationCheck>,
}

#[derive(Debug, Clone)]
pub struct ValidationCheck {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub level: ValidationLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    Critical,  // Must pass for the prediction to run
    Warning,   // Prediction runs, but the result may be skewed
    Info,      // Informational only
}

impl ValidationCheck {
    fn new(name: &str, passed: bool, message: String, level: ValidationLevel) -> Self {
        ValidationCheck {
            name: name.to_string(),
            passed,
            message,
            level,
        }
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        ValidationResult {
            passed: true,
            checks: Vec::new(),
        }
    }

    pub fn add_check(&mut self, check: ValidationCheck) {
        if !check.passed && check.level == ValidationLevel::Critical {
            self.passed = false;
        }
        self.checks.push(check);
    }

    pub fn critical_failures(&self) -> Vec<&ValidationCheck> {
        self.checks
            .iter()
            .filter(|c| !c.passed && c.level == ValidationLevel::Critical)
            .collect()
    }

    pub fn warnings(&self) -> Vec<&ValidationCheck> {
        self.checks
            .iter()
            .filter(|c| !c.passed && c.level == ValidationLevel::Warning)
            .collect()
    }

    /// Turn critical failures into an error
    pub fn ensure_passed(&self) -> PredictorResult<()> {
        if self.passed {
            return Ok(());
        }
        let reasons: Vec<String> = self
            .critical_failures()
            .iter()
            .map(|c| format!("{}: {}", c.name, c.message))
            .collect();
        Err(PredictorError::ValidationFailed(reasons.join("; ")))
    }

    pub fn display(&self) {
        info!("🔍 Pre-flight Validation");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        for check in &self.checks {
            let icon = if check.passed {
                "✅"
            } else {
                match check.level {
                    ValidationLevel::Critical => "❌",
                    ValidationLevel::Warning => "⚠️",
                    ValidationLevel::Info => "ℹ️",
                }
            };

            info!("{} {} - {}", icon, check.name, check.message);
        }

        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        if !self.passed {
            let failures = self.critical_failures();
            error!("❌ Validation failed: {} critical issue(s)", failures.len());
            for failure in failures {
                error!("   • {}: {}", failure.name, failure.message);
            }
        } else {
            let warnings = self.warnings();
            if !warnings.is_empty() {
                warn!("⚠️  {} warning(s) detected", warnings.len());
                for warning in warnings {
                    warn!("   • {}: {}", warning.name, warning.message);
                }
            }
            info!("✅ All critical checks passed");
        }
    }
}

/// Reject an empty or repeated team selection
pub fn check_team_selection(home: &str, away: &str) -> PredictorResult<()> {
    if home.trim().is_empty() || away.trim().is_empty() {
        return Err(PredictorError::InvalidParameter(
            "team".to_string(),
            "both a home and an away team are required".to_string(),
        ));
    }
    if home.trim().eq_ignore_ascii_case(away.trim()) {
        return Err(PredictorError::SameTeam(home.trim().to_string()));
    }
    Ok(())
}

/// Pre-flight validator for predictions
pub struct PredictionValidator {
    minutes: MinutesConfig,
}

impl PredictionValidator {
    pub fn new(minutes: MinutesConfig) -> Self {
        PredictionValidator { minutes }
    }

    /// Run the full suite for one matchup
    pub fn validate_matchup(
        &self,
        data: &CombinedData,
        source: DataSource,
        home: &str,
        away: &str,
        allocation: &MinutesAllocation,
    ) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.add_check(match check_team_selection(home, away) {
            Ok(()) => ValidationCheck::new(
                "Team selection",
                true,
                format!("{} (home) vs {} (away)", home, away),
                ValidationLevel::Critical,
            ),
            Err(e) => ValidationCheck::new("Team selection", false, e.to_string(), ValidationLevel::Critical),
        });

        for (label, name) in [("Home", home), ("Away", away)] {
            match data.find_team(name) {
                Ok(team) => {
                    result.add_check(ValidationCheck::new(
                        &format!("{} team data", label),
                        true,
                        match team.adjusted_defensive_rating {
                            Some(rating) => format!("{} (defensive rating {:.1})", team.team, rating),
                            None => format!("{} (no defensive rating, neutral factor)", team.team),
                        },
                        ValidationLevel::Critical,
                    ));
                    self.check_minutes(&mut result, label, &team.team, data, allocation);
                }
                Err(_) => result.add_check(ValidationCheck::new(
                    &format!("{} team data", label),
                    false,
                    format!("'{}' not found in imported team data", name),
                    ValidationLevel::Critical,
                )),
            }
        }

        result.add_check(ValidationCheck::new(
            "Data source",
            source != DataSource::NoData,
            format!("Using {}", source.description()),
            ValidationLevel::Info,
        ));

        result
    }

    fn check_minutes(
        &self,
        result: &mut ValidationResult,
        label: &str,
        team: &str,
        data: &CombinedData,
        allocation: &MinutesAllocation,
    ) {
        let minutes = allocation.team_minutes(team, &data.players);
        let active = minutes.active_players();

        result.add_check(ValidationCheck::new(
            &format!("{} roster", label),
            active > 0,
            if active > 0 {
                format!("{} player(s) with minutes", active)
            } else {
                format!("No {} players have minutes allocated", team)
            },
            ValidationLevel::Critical,
        ));

        let total = minutes.total();
        let status = MinutesStatus::classify(total, &self.minutes);
        result.add_check(ValidationCheck::new(
            &format!("{} minutes", label),
            status == MinutesStatus::Ok,
            match status {
                MinutesStatus::Ok => format!("{:.0} total minutes", total),
                MinutesStatus::Warning => format!(
                    "{:.0} total minutes (expected ~{:.0})",
                    total, self.minutes.target_total
                ),
                MinutesStatus::Danger => format!(
                    "{:.0} total minutes is far from {:.0}; predicted scores will be skewed",
                    total, self.minutes.target_total
                ),
            },
            ValidationLevel::Warning,
        ));
    }
}

/// Parse a game clock in MM:SS form into seconds
pub fn parse_clock(raw: &str) -> PredictorResult<u32> {
    let invalid = || PredictorError::InvalidClock(raw.trim().to_string());

    let (minutes, seconds) = raw.trim().split_once(':').ok_or_else(invalid)?;
    let minutes: u32 = minutes.trim().parse().map_err(|_| invalid())?;
    let seconds: u32 = seconds.trim().parse().map_err(|_| invalid())?;

    if seconds >= 60 {
        return Err(invalid());
    }
    minutes
        .checked_mul(60)
        .and_then(|s| s.checked_add(seconds))
        .ok_or_else(invalid)
}

/// Parse a non-negative whole-number score no higher than `MAX_SCORE`
pub fn parse_score(raw: &str, side: &str) -> PredictorResult<u32> {
    let score = raw.trim().parse::<u32>().map_err(|_| {
        PredictorError::InvalidScore(format!("{} score '{}' must be a non-negative whole number", side, raw.trim()))
    })?;
    if score > MAX_SCORE {
        return Err(PredictorError::InvalidScore(format!(
            "{} score {} is above the {} point limit",
            side, score, MAX_SCORE
        )));
    }
    Ok(score)
}

/// Validate raw live-game inputs into a game state
pub fn validate_live_inputs(
    period: &str,
    clock: &str,
    home_score: &str,
    away_score: &str,
    reject_unknown_periods: bool,
) -> PredictorResult<LiveGameState> {
    let seconds_remaining = parse_clock(clock)?;

    match period.parse::<Period>() {
        Ok(parsed) => {
            let limit = period_length_seconds(parsed);
            if seconds_remaining > limit {
                return Err(PredictorError::InvalidClock(format!(
                    "{} is longer than a {} ({}:00)",
                    clock.trim(),
                    parsed,
                    limit / 60
                )));
            }
        }
        Err(reason) if reject_unknown_periods => return Err(PredictorError::InvalidPeriod(reason)),
        Err(_) => warn!("⚠️  Unknown period '{}', assuming a full game remains", period.trim()),
    }

    Ok(LiveGameState {
        period: period.trim().to_string(),
        seconds_remaining,
        home_score: parse_score(home_score, "Home")?,
        away_score: parse_score(away_score, "Away")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PlayerRecord, TeamRecord};

    fn data() -> CombinedData {
        CombinedData {
            players: vec![
                PlayerRecord::new("H1", "Home").with_scoring(36.0, 25.0),
                PlayerRecord::new("H2", "Home").with_scoring(36.0, 20.0),
                PlayerRecord::new("A1", "Away").with_scoring(36.0, 25.0),
            ],
            teams: vec![TeamRecord::new("Home", Some(100.0)), TeamRecord::new("Away", None)],
        }
    }

    #[test]
    fn test_validation_result() {
        let mut result = ValidationResult::new();
        result.add_check(ValidationCheck::new("Test", true, "ok".to_string(), ValidationLevel::Critical));
        assert!(result.passed);

        result.add_check(ValidationCheck::new("Soft", false, "meh".to_string(), ValidationLevel::Warning));
        assert!(result.passed);
        assert_eq!(result.warnings().len(), 1);

        result.add_check(ValidationCheck::new("Hard", false, "bad".to_string(), ValidationLevel::Critical));
        assert!(!result.passed);
        assert!(matches!(result.ensure_passed(), Err(PredictorError::ValidationFailed(_))));
    }

    #[test]
    fn test_matchup_validation() {
        let validator = PredictionValidator::new(MinutesConfig::default());
        let result = validator.validate_matchup(
            &data(),
            DataSource::CurrentOnly,
            "Home",
            "Away",
            &MinutesAllocation::new(),
        );

        // Only 72 and 36 minutes allocated: warnings, not failures
        assert!(result.passed);
        assert_eq!(result.warnings().len(), 2);
    }

    #[test]
    fn test_matchup_validation_failures() {
        let validator = PredictionValidator::new(MinutesConfig::default());

        let same = validator.validate_matchup(&data(), DataSource::CurrentOnly, "Home", "home", &MinutesAllocation::new());
        assert!(!same.passed);

        let missing = validator.validate_matchup(&data(), DataSource::CurrentOnly, "Home", "Lakers", &MinutesAllocation::new());
        assert_eq!(missing.critical_failures().len(), 1);

        let mut benched = MinutesAllocation::new();
        benched.set("Away", "A1", 0.0);
        let empty_roster = validator.validate_matchup(&data(), DataSource::CurrentOnly, "Home", "Away", &benched);
        assert!(!empty_roster.passed);
    }

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock("05:30").unwrap(), 330);
        assert_eq!(parse_clock("12:00").unwrap(), 720);
        assert_eq!(parse_clock("0:07").unwrap(), 7);
        assert!(parse_clock("5:60").is_err());
        assert!(parse_clock("530").is_err());
        assert!(parse_clock("a:30").is_err());
        assert!(parse_clock("-1:30").is_err());
    }

    #[test]
    fn test_live_inputs() {
        let state = validate_live_inputs("Q4", "02:15", "98", "101", true).unwrap();
        assert_eq!(state.seconds_remaining, 135);
        assert_eq!(state.home_score, 98);

        assert!(matches!(
            validate_live_inputs("OT1", "06:00", "98", "98", true),
            Err(PredictorError::InvalidClock(_))
        ));
        assert!(matches!(
            validate_live_inputs("Q5", "02:00", "98", "98", true),
            Err(PredictorError::InvalidPeriod(_))
        ));
        assert!(validate_live_inputs("Q5", "02:00", "98", "98", false).is_ok());
        assert!(matches!(
            validate_live_inputs("Q2", "02:00", "-3", "98", true),
            Err(PredictorError::InvalidScore(_))
        ));
    }

    #[test]
    fn test_scores_above_limit_rejected() {
        assert_eq!(parse_score("999", "Home").unwrap(), MAX_SCORE);
        assert!(matches!(parse_score("1000", "Home"), Err(PredictorError::InvalidScore(_))));
        assert!(matches!(
            validate_live_inputs("Q4", "06:00", "4294967295", "0", true),
            Err(PredictorError::InvalidScore(_))
        ));
        assert!(matches!(
            validate_live_inputs("Q4", "06:00", "0", "4294967296", true),
            Err(PredictorError::InvalidScore(_))
        ));
        assert!(matches!(parse_clock("99999999:00"), Err(PredictorError::InvalidClock(_))));
    }
}
