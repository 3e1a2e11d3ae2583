// Data command implementations: import, delete, status and listings
use std::path::Path;

use nba_predictor::{
    import_file, parse_override, Config, Database, MinutesAllocation, MinutesStatus, PredictorError,
    PredictorResult, RecordKind, SqliteStatStore, Spinner, StatService, Vintage,
};
use tracing::{info, warn};

/// Number of import log entries shown by `status`
const RECENT_IMPORTS: usize = 8;

pub fn open_service(config: &Config) -> PredictorResult<StatService<SqliteStatStore>> {
    let db = Database::new(&config.database.db_path)?;
    Ok(StatService::new(SqliteStatStore::open(db)?))
}

/// Apply "Name=minutes" overrides for one team
pub fn apply_overrides(
    allocation: &mut MinutesAllocation,
    team: &str,
    overrides: &[String],
    roster: &[nba_predictor::PlayerRecord],
) -> PredictorResult<()> {
    for raw in overrides {
        let (player, minutes) = parse_override(raw)?;
        if !roster.iter().any(|p| p.team == team && p.player == player) {
            warn!("⚠️  {} is not on the {} roster; override ignored", player, team);
            continue;
        }
        allocation.set(team, &player, minutes);
    }
    Ok(())
}

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "-".to_string(),
    }
}

fn matches_search(text: &str, search: Option<&str>) -> bool {
    match search {
        Some(s) => text.to_lowercase().contains(&s.trim().to_lowercase()),
        None => true,
    }
}

pub async fn import_data(
    season: Vintage,
    kind: RecordKind,
    file: &Path,
    config: &Config,
) -> PredictorResult<()> {
    let service = open_service(config)?;
    let spinner = Spinner::new(&format!("Importing {} {} from {}...", season, kind, file.display()));

    let path = file.to_path_buf();
    let store = service.store().clone();
    let result = tokio::task::spawn_blocking(move || import_file(&store, season, kind, &path))
        .await
        .map_err(|e| PredictorError::Internal(format!("import task failed: {}", e)))?;

    match result {
        Ok(summary) => {
            spinner.finish(&format!(
                "Imported {} {} {} ({} skipped)",
                summary.rows_imported, season, kind, summary.rows_skipped
            ));
            if summary.duplicates > 0 {
                warn!("⚠️  {} duplicate row(s); the last occurrence was kept", summary.duplicates);
            }
            info!("📊 Data source: {}", service.data_source()?.description());
            Ok(())
        }
        Err(e) => {
            spinner.finish_with_error(&format!("Import failed: {}", e));
            Err(e)
        }
    }
}

pub fn delete_data(season: Vintage, kind: RecordKind, config: &Config) -> PredictorResult<()> {
    let service = open_service(config)?;
    let removed = service.delete(season, kind)?;

    if removed == 0 {
        warn!("⚠️  No {} {} to delete", season, kind);
    } else {
        info!("✅ Deleted {} {} {}", removed, season, kind);
    }
    info!("📊 Data source: {}", service.data_source()?.description());
    Ok(())
}

pub fn show_status(config: &Config) -> PredictorResult<()> {
    let service = open_service(config)?;
    let counts = service.counts()?;

    info!("📊 System Status");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("💾 Database: {}", config.database.db_path);
    info!("📡 Data source: {}", service.data_source()?.description());
    info!("");
    info!("{:<10} {:>8} {:>8}", "Season", "Players", "Teams");
    for vintage in Vintage::ALL {
        info!(
            "{:<10} {:>8} {:>8}",
            vintage,
            counts.get(vintage, RecordKind::Players),
            counts.get(vintage, RecordKind::Teams)
        );
    }

    let history = service.import_history(RECENT_IMPORTS)?;
    info!("");
    if history.is_empty() {
        info!("📥 No imports yet");
    } else {
        info!("📥 Recent imports:");
        for entry in history {
            info!(
                "   {} {:<7} {:<7} {:>5} rows ({} skipped) from {}",
                entry.imported_at.format("%Y-%m-%d %H:%M"),
                entry.vintage,
                entry.kind,
                entry.rows_imported,
                entry.rows_skipped,
                entry.source
            );
        }
    }
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    Ok(())
}

pub fn list_teams(search: Option<&str>, config: &Config) -> PredictorResult<()> {
    let service = open_service(config)?;
    let teams = service.combined_teams()?;
    if teams.is_empty() {
        return Err(PredictorError::NoData);
    }

    info!("{:<28} {:<6} {:>8} {:>8}", "Team", "Abbr", "Adj DRtg", "Source");
    let mut shown = 0;
    for profile in teams.iter().filter(|t| matches_search(&t.record.team, search)) {
        let team = &profile.record;
        info!(
            "{:<28} {:<6} {:>8} {:>8}",
            team.team,
            team.abbreviation.as_deref().unwrap_or("-"),
            fmt_opt(team.adjusted_defensive_rating, 1),
            profile.source.as_str()
        );
        shown += 1;
    }
    info!("{} of {} teams", shown, teams.len());
    Ok(())
}

pub fn list_players(search: Option<&str>, team: Option<&str>, config: &Config) -> PredictorResult<()> {
    let service = open_service(config)?;
    let players = service.combined_players()?;
    if players.is_empty() {
        return Err(PredictorError::NoData);
    }

    info!(
        "{:<24} {:<24} {:<4} {:>5} {:>5} {:>6} {:>8}",
        "Player", "Team", "Pos", "MP", "PTS", "FG%", "Source"
    );
    let mut shown = 0;
    for profile in players.iter().filter(|p| {
        matches_search(&p.record.player, search)
            && team.map_or(true, |t| p.record.team.eq_ignore_ascii_case(t.trim()))
    }) {
        let player = &profile.record;
        info!(
            "{:<24} {:<24} {:<4} {:>5} {:>5} {:>6} {:>8}",
            player.player,
            player.team,
            player.position.as_deref().unwrap_or("-"),
            fmt_opt(player.minutes, 1),
            fmt_opt(player.points, 1),
            fmt_opt(player.fg_pct.map(|p| p * 100.0), 1),
            profile.source.as_str()
        );
        shown += 1;
    }
    info!("{} of {} players", shown, players.len());
    Ok(())
}

pub fn show_roster(team_name: &str, overrides: &[String], config: &Config) -> PredictorResult<()> {
    let service = open_service(config)?;
    let data = service.require_data()?;
    let team = data.find_team(team_name)?;

    let mut allocation = MinutesAllocation::new();
    apply_overrides(&mut allocation, &team.team, overrides, &data.players)?;
    let minutes = allocation.team_minutes(&team.team, &data.players);

    info!("🏀 {} roster", team.team);
    info!("{:<24} {:<4} {:>6} {:>6} {:>8}", "Player", "Pos", "MP", "PTS", "Minutes");
    for player in data.roster(&team.team) {
        let allocated = minutes.get(&player.player).unwrap_or(0.0);
        let marker = if allocation.override_for(&team.team, &player.player).is_some() { "*" } else { "" };
        info!(
            "{:<24} {:<4} {:>6} {:>6} {:>7}{}",
            player.player,
            player.position.as_deref().unwrap_or("-"),
            fmt_opt(player.minutes, 1),
            fmt_opt(player.points, 1),
            format!("{:.0}", allocated),
            marker
        );
    }

    let total = minutes.total();
    match MinutesStatus::classify(total, &config.minutes) {
        MinutesStatus::Ok => info!("✅ Total minutes: {:.0}", total),
        MinutesStatus::Warning => warn!(
            "⚠️  Total minutes: {:.0} (expected ~{:.0})",
            total, config.minutes.target_total
        ),
        MinutesStatus::Danger => warn!(
            "🚨 Total minutes: {:.0} is far from {:.0}; predictions will be skewed",
            total, config.minutes.target_total
        ),
    }
    Ok(())
}
