// Prediction command implementations: full-game and live win probability
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use nba_predictor::validation::validate_live_inputs;
use nba_predictor::{
    AggregateResult, CombinedData, Config, DataSource, LiveWinProbability, MinutesAllocation,
    PredictionValidator, PredictorError, PredictorResult, SimulationEngine, SimulationProgress,
    TeamMinutes, TeamRecord,
};
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::data_commands::{apply_overrides, open_service};

/// Width of the longest histogram bar
const HISTOGRAM_WIDTH: usize = 40;

pub struct PredictRequest {
    pub home: String,
    pub away: String,
    pub simulations: Option<usize>,
    pub seed: Option<u64>,
    pub home_overrides: Vec<String>,
    pub away_overrides: Vec<String>,
}

/// Everything resolved from the store for one matchup
struct PreparedMatchup {
    data: CombinedData,
    source: DataSource,
    home: TeamRecord,
    away: TeamRecord,
    home_minutes: TeamMinutes,
    away_minutes: TeamMinutes,
}

#[derive(Serialize)]
struct PredictionReport<'a> {
    id: Uuid,
    generated_at: DateTime<Utc>,
    home: &'a str,
    away: &'a str,
    data_source: DataSource,
    seed: Option<u64>,
    home_minutes: &'a TeamMinutes,
    away_minutes: &'a TeamMinutes,
    result: &'a AggregateResult,
}

fn prepare(request: &PredictRequest, config: &Config) -> PredictorResult<PreparedMatchup> {
    let service = open_service(config)?;
    let data = service.require_data()?;
    let source = service.data_source()?;

    let home = data.find_team(&request.home)?.clone();
    let away = data.find_team(&request.away)?.clone();
    if home.team == away.team {
        return Err(PredictorError::SameTeam(home.team));
    }

    let mut allocation = MinutesAllocation::new();
    apply_overrides(&mut allocation, &home.team, &request.home_overrides, &data.players)?;
    apply_overrides(&mut allocation, &away.team, &request.away_overrides, &data.players)?;

    let validator = PredictionValidator::new(config.minutes.clone());
    let validation = validator.validate_matchup(&data, source, &home.team, &away.team, &allocation);
    validation.display();
    if !validation.passed {
        error!("❌ Pre-flight validation failed. Cannot proceed.");
        validation.ensure_passed()?;
    }

    let home_minutes = allocation.team_minutes(&home.team, &data.players);
    let away_minutes = allocation.team_minutes(&away.team, &data.players);

    Ok(PreparedMatchup {
        data,
        source,
        home,
        away,
        home_minutes,
        away_minutes,
    })
}

fn pct(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

fn display_histogram(result: &AggregateResult, home: &str, away: &str) {
    let dist = &result.distribution;
    let peak = dist.home.iter().chain(dist.away.iter()).copied().max().unwrap_or(0).max(1) as usize;
    let bar = |count: u32| "█".repeat(count as usize * HISTOGRAM_WIDTH / peak);

    info!("📈 Score distribution ({} = home, {} = away)", home, away);
    for (i, label) in dist.labels.iter().enumerate() {
        info!("{:>9} H {:<width$} {}", label, bar(dist.home[i]), dist.home[i], width = HISTOGRAM_WIDTH);
        info!("{:>9} A {:<width$} {}", "", bar(dist.away[i]), dist.away[i], width = HISTOGRAM_WIDTH);
    }
}

pub async fn predict_game(
    request: PredictRequest,
    json: Option<PathBuf>,
    config: &Config,
) -> PredictorResult<()> {
    let prepared = prepare(&request, config)?;
    let engine = SimulationEngine::new(config.engine.clone());
    let simulations = request.simulations.unwrap_or(config.engine.simulations);
    let seed = request.seed;

    info!("");
    info!("🏀 {} (home) vs {} (away)", prepared.home.team, prepared.away.team);

    let progress = SimulationProgress::new(simulations);
    let (prepared, result) = tokio::task::spawn_blocking(move || {
        let result = {
            let matchup = engine.matchup(
                &prepared.home,
                &prepared.away,
                &prepared.data.players,
                &prepared.home_minutes,
                &prepared.away_minutes,
            );
            engine.predict(&matchup, Some(simulations), seed, Some(&progress))
        };
        match &result {
            Ok(r) => progress.finish(&prepared.home.team, r.home_win_probability),
            Err(e) => progress.finish_with_error(&e.to_string()),
        }
        (prepared, result)
    })
    .await
    .map_err(|e| PredictorError::Internal(format!("simulation task failed: {}", e)))?;
    let result = result?;

    info!("");
    info!("📊 Prediction ({} simulations, {})", result.simulations, prepared.source.description());
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!(
        "   {:<28} {:>6.1} pts   win {}",
        prepared.home.team,
        result.avg_home_score,
        pct(result.home_win_probability)
    );
    info!(
        "   {:<28} {:>6.1} pts   win {}",
        prepared.away.team,
        result.avg_away_score,
        pct(result.away_win_probability)
    );
    info!("   Projected margin: {:+.1} (home)", result.expected_margin());
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    display_histogram(&result, &prepared.home.team, &prepared.away.team);

    if let Some(path) = json {
        let report = PredictionReport {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            home: &prepared.home.team,
            away: &prepared.away.team,
            data_source: prepared.source,
            seed: seed.or(config.engine.seed),
            home_minutes: &prepared.home_minutes,
            away_minutes: &prepared.away_minutes,
            result: &result,
        };
        let content = serde_json::to_string_pretty(&report)?;
        std::fs::write(&path, content)
            .map_err(|e| PredictorError::FileWrite(format!("{}: {}", path.display(), e)))?;
        info!("💾 Report written to {}", path.display());
    }

    Ok(())
}

pub async fn predict_live(
    request: PredictRequest,
    period: &str,
    clock: &str,
    home_score: &str,
    away_score: &str,
    config: &Config,
) -> PredictorResult<()> {
    // Malformed live input is rejected before touching the store
    let state = validate_live_inputs(
        period,
        clock,
        home_score,
        away_score,
        config.engine.reject_unknown_periods,
    )?;

    let prepared = prepare(&request, config)?;
    let engine = SimulationEngine::new(config.engine.clone());
    let simulations = request.simulations;
    let seed = request.seed;

    let (prepared, state, result) = tokio::task::spawn_blocking(move || {
        let result: PredictorResult<LiveWinProbability> = {
            let matchup = engine.matchup(
                &prepared.home,
                &prepared.away,
                &prepared.data.players,
                &prepared.home_minutes,
                &prepared.away_minutes,
            );
            engine.predict_live(&matchup, &state, simulations, seed)
        };
        (prepared, state, result)
    })
    .await
    .map_err(|e| PredictorError::Internal(format!("simulation task failed: {}", e)))?;
    let result = result?;

    info!("");
    info!(
        "⏱️  {} {} - {} {} | {} {}",
        prepared.home.team, state.home_score, state.away_score, prepared.away.team, state.period, clock.trim()
    );
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    match result.final_score {
        Some(score) => {
            info!("🏁 Final: {} {} - {} {}", prepared.home.team, score.home_score, score.away_score, prepared.away.team);
        }
        None => {
            info!("   Remaining: {:.1} min over {} simulations", result.remaining_minutes, result.simulations);
        }
    }
    info!("   {:<28} win {}", prepared.home.team, pct(result.home_win_probability));
    info!("   {:<28} win {}", prepared.away.team, pct(result.away_win_probability));
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    Ok(())
}
