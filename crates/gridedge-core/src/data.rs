// Game and team-stat data loading, validation, and normalization.
//
// Games come from either a flat CSV (one row per game, scalar context only)
// or a JSON array of full `Game` records (recent form, injuries). Team stats
// come from a CSV keyed by (team, season).

use crate::game::{BettingLines, Game, GameContext, Weather, DEFAULT_MONEYLINE, DEFAULT_TOTAL};
use crate::team::{TeamStats, TeamStatsBook};
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::warn;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

/// Flat game row. Empty cells deserialize to `None`.
#[derive(Debug, Deserialize)]
struct RawGameRow {
    season: u16,
    week: u8,
    #[serde(default)]
    kickoff: Option<NaiveDate>,
    home_team: String,
    away_team: String,
    #[serde(default)]
    completed: Option<bool>,
    #[serde(default)]
    home_score: Option<u32>,
    #[serde(default)]
    away_score: Option<u32>,
    #[serde(default)]
    home_moneyline: Option<i32>,
    #[serde(default)]
    away_moneyline: Option<i32>,
    #[serde(default)]
    spread: Option<f64>,
    #[serde(default)]
    total: Option<f64>,
    #[serde(default)]
    division_game: Option<bool>,
    #[serde(default)]
    prime_time: Option<bool>,
    #[serde(default)]
    revenge: Option<bool>,
    #[serde(default)]
    playoffs: Option<bool>,
    #[serde(default)]
    temperature: Option<f64>,
    #[serde(default)]
    wind_speed: Option<f64>,
    #[serde(default)]
    precipitation: Option<bool>,
}

impl RawGameRow {
    fn into_game(self) -> Game {
        let has_weather =
            self.temperature.is_some() || self.wind_speed.is_some() || self.precipitation.is_some();
        let weather = has_weather.then(|| Weather {
            temperature: self.temperature,
            wind_speed: self.wind_speed,
            precipitation: self.precipitation.unwrap_or(false),
        });

        Game {
            season: self.season,
            week: self.week,
            kickoff: self.kickoff,
            home_team: self.home_team.trim().to_uppercase(),
            away_team: self.away_team.trim().to_uppercase(),
            is_completed: self.completed.unwrap_or(false),
            home_score: self.home_score,
            away_score: self.away_score,
            lines: BettingLines {
                home_moneyline: self.home_moneyline,
                away_moneyline: self.away_moneyline,
                spread: self.spread,
                total: self.total,
            },
            context: GameContext {
                is_division_game: self.division_game.unwrap_or(false),
                is_prime_time: self.prime_time.unwrap_or(false),
                is_revenge: self.revenge.unwrap_or(false),
                is_playoffs: self.playoffs.unwrap_or(false),
                weather,
                ..Default::default()
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Validation and normalization
// ---------------------------------------------------------------------------

/// Structural problems that make a game unusable. An empty list means the
/// game is valid. Line values are not checked here; see `normalize_lines`.
pub fn validate_game(game: &Game) -> Vec<String> {
    let mut problems = Vec::new();

    if game.home_team.trim().is_empty() || game.away_team.trim().is_empty() {
        problems.push("missing team identifier".to_string());
    } else if game.home_team == game.away_team {
        problems.push(format!("team {} cannot play itself", game.home_team));
    }

    if !(1..=22).contains(&game.week) {
        problems.push(format!("invalid week {}", game.week));
    }

    if !(2000..=2100).contains(&game.season) {
        problems.push(format!("invalid season {}", game.season));
    }

    if game.is_completed {
        match (game.home_score, game.away_score) {
            (Some(h), Some(a)) => {
                if h > 100 || a > 100 {
                    problems.push(format!("implausible final score {h}-{a}"));
                }
            }
            _ => problems.push("completed game is missing a final score".to_string()),
        }
    }

    problems
}

fn moneyline_in_range(odds: i32) -> bool {
    (100..=2000).contains(&odds.unsigned_abs())
}

/// Replace malformed quotes with documented defaults: an out-of-range
/// moneyline becomes -110 and an out-of-range total becomes 45.0. An
/// out-of-range spread is dropped so the market is skipped. Absent markets
/// are left absent. Returns the number of values changed.
pub fn normalize_lines(lines: &mut BettingLines, label: &str) -> usize {
    let mut changed = 0;

    for (name, slot) in [
        ("home moneyline", &mut lines.home_moneyline),
        ("away moneyline", &mut lines.away_moneyline),
    ] {
        if let Some(odds) = *slot {
            if !moneyline_in_range(odds) {
                warn!("{label}: {name} {odds} out of range, using {DEFAULT_MONEYLINE}");
                *slot = Some(DEFAULT_MONEYLINE);
                changed += 1;
            }
        }
    }

    if let Some(spread) = lines.spread {
        if !spread.is_finite() || spread.abs() > 30.0 {
            warn!("{label}: spread {spread} out of range, skipping spread market");
            lines.spread = None;
            changed += 1;
        }
    }

    if let Some(total) = lines.total {
        if !total.is_finite() || !(20.0..=80.0).contains(&total) {
            warn!("{label}: total {total} out of range, using {DEFAULT_TOTAL}");
            lines.total = Some(DEFAULT_TOTAL);
            changed += 1;
        }
    }

    changed
}

/// Validate and normalize a freshly parsed game. Invalid games are logged
/// and dropped.
fn accept_game(mut game: Game) -> Option<Game> {
    let problems = validate_game(&game);
    if !problems.is_empty() {
        warn!("skipping game {}: {}", game.label(), problems.join("; "));
        return None;
    }
    let label = game.label();
    normalize_lines(&mut game.lines, &label);
    Some(game)
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn load_games_csv_from_reader<R: Read>(rdr: R) -> Result<Vec<Game>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut games = Vec::new();
    for result in reader.deserialize::<RawGameRow>() {
        match result {
            Ok(raw) => {
                if let Some(game) = accept_game(raw.into_game()) {
                    games.push(game);
                }
            }
            Err(e) => {
                warn!("skipping malformed game row: {}", e);
            }
        }
    }
    Ok(games)
}

fn load_games_json_from_reader<R: Read>(rdr: R) -> Result<Vec<Game>, serde_json::Error> {
    let raw: Vec<serde_json::Value> = serde_json::from_reader(rdr)?;
    let mut games = Vec::new();
    for value in raw {
        match serde_json::from_value::<Game>(value) {
            Ok(game) => {
                if let Some(game) = accept_game(game) {
                    games.push(game);
                }
            }
            Err(e) => {
                warn!("skipping malformed game record: {}", e);
            }
        }
    }
    Ok(games)
}

fn load_team_stats_from_reader<R: Read>(rdr: R) -> Result<Vec<TeamStats>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut stats = Vec::new();
    for result in reader.deserialize::<TeamStats>() {
        match result {
            Ok(mut row) => {
                row.team = row.team.trim().to_uppercase();
                if row.team.is_empty() {
                    warn!("skipping team stats row with empty team");
                    continue;
                }
                stats.push(row);
            }
            Err(e) => {
                warn!("skipping malformed team stats row: {}", e);
            }
        }
    }
    Ok(stats)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<std::fs::File, DataError> {
    std::fs::File::open(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load games from a `.json` file or, for any other extension, a CSV file.
pub fn load_games(path: &Path) -> Result<Vec<Game>, DataError> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let file = open(path)?;
    if is_json {
        load_games_json_from_reader(file).map_err(|e| DataError::Json {
            path: path.display().to_string(),
            source: e,
        })
    } else {
        load_games_csv_from_reader(file).map_err(|e| DataError::Csv {
            path: path.display().to_string(),
            source: e,
        })
    }
}

/// Load team stats from a CSV file into a lookup book.
pub fn load_team_stats(path: &Path) -> Result<TeamStatsBook, DataError> {
    let file = open(path)?;
    let rows = load_team_stats_from_reader(file).map_err(|e| DataError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;
    if rows.is_empty() {
        return Err(DataError::Validation(format!(
            "team stats file {} produced zero valid rows",
            path.display()
        )));
    }
    Ok(TeamStatsBook::from_rows(rows))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
