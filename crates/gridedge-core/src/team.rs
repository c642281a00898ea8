// Seasonal team aggregates consumed by the strength adjuster.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::RangeInclusive;
use tracing::warn;

/// League-average points per game, used whenever a team's scoring or
/// allowed average is missing or malformed.
pub const LEAGUE_AVERAGE_POINTS: f64 = 22.5;

/// Neutral defensive rating.
pub const NEUTRAL_DEFENSIVE_RATING: f64 = 1.0;

/// Plausible per-game scoring averages, scored or allowed.
pub const POINTS_RANGE: RangeInclusive<f64> = 0.0..=60.0;

/// Plausible defensive ratings.
pub const DEFENSIVE_RATING_RANGE: RangeInclusive<f64> = 0.5..=2.0;

/// Per-team, per-season snapshot. Every metric is optional; accessors
/// substitute league-average defaults so the model stays available when the
/// upstream feed is incomplete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamStats {
    pub team: String,
    pub season: u16,
    pub avg_points_scored: Option<f64>,
    pub avg_points_allowed: Option<f64>,
    /// Multiplicative factor applied to opponents' scoring. Below 1.0 is a
    /// stronger-than-average defense.
    pub defensive_rating: Option<f64>,
    pub division: Option<String>,
    pub wins: Option<u32>,
    pub losses: Option<u32>,
    pub yards_per_play: Option<f64>,
    pub yards_per_play_allowed: Option<f64>,
    pub red_zone_efficiency: Option<f64>,
    pub red_zone_defense: Option<f64>,
    pub third_down_conversion: Option<f64>,
    pub third_down_defense: Option<f64>,
    pub turnover_differential: Option<f64>,
    /// Plays per minute relative to league average.
    pub pace: Option<f64>,
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

fn positive_within(value: Option<f64>, range: &RangeInclusive<f64>) -> Option<f64> {
    positive(value).filter(|v| range.contains(v))
}

impl TeamStats {
    /// A league-average team with no extended metrics.
    pub fn league_average(team: &str, season: u16) -> Self {
        TeamStats {
            team: team.to_string(),
            season,
            ..Default::default()
        }
    }

    pub fn points_scored(&self) -> f64 {
        positive_within(self.avg_points_scored, &POINTS_RANGE).unwrap_or(LEAGUE_AVERAGE_POINTS)
    }

    pub fn points_allowed(&self) -> f64 {
        positive_within(self.avg_points_allowed, &POINTS_RANGE).unwrap_or(LEAGUE_AVERAGE_POINTS)
    }

    pub fn defensive_rating(&self) -> f64 {
        positive_within(self.defensive_rating, &DEFENSIVE_RATING_RANGE)
            .unwrap_or(NEUTRAL_DEFENSIVE_RATING)
    }

    /// Clear scoring and defensive values outside their plausible ranges so
    /// the accessors fall back to league defaults. Returns the number of
    /// fields cleared.
    pub fn sanitize(&mut self) -> usize {
        let team = self.team.clone();
        let season = self.season;
        let mut cleared = 0;
        let mut check = |field: &str, value: &mut Option<f64>, range: &RangeInclusive<f64>| {
            if let Some(v) = *value {
                if positive_within(Some(v), range).is_none() {
                    warn!("{team} {season}: {field} {v} out of range, using league default");
                    *value = None;
                    cleared += 1;
                }
            }
        };
        check("avg_points_scored", &mut self.avg_points_scored, &POINTS_RANGE);
        check("avg_points_allowed", &mut self.avg_points_allowed, &POINTS_RANGE);
        check("defensive_rating", &mut self.defensive_rating, &DEFENSIVE_RATING_RANGE);
        cleared
    }

    pub fn wins(&self) -> u32 {
        self.wins.unwrap_or(0)
    }

    pub fn pace(&self) -> Option<f64> {
        positive(self.pace)
    }

    pub fn same_division(&self, other: &TeamStats) -> bool {
        match (&self.division, &other.division) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Lookup book
// ---------------------------------------------------------------------------

/// Team stats indexed by (team, season).
#[derive(Debug, Clone, Default)]
pub struct TeamStatsBook {
    by_team: HashMap<(String, u16), TeamStats>,
}

impl TeamStatsBook {
    /// Build a book from rows. A later row for the same (team, season)
    /// replaces an earlier one.
    pub fn from_rows(rows: impl IntoIterator<Item = TeamStats>) -> Self {
        let mut by_team = HashMap::new();
        for mut row in rows {
            row.sanitize();
            let key = (row.team.clone(), row.season);
            if by_team.contains_key(&key) {
                warn!("duplicate team stats for {} {}, using latest row", key.0, key.1);
            }
            by_team.insert(key, row);
        }
        TeamStatsBook { by_team }
    }

    pub fn get(&self, team: &str, season: u16) -> Option<&TeamStats> {
        self.by_team.get(&(team.to_string(), season))
    }

    /// Stats for `team`, or a league-average snapshot when the feed has none.
    pub fn get_or_default(&self, team: &str, season: u16) -> TeamStats {
        match self.get(team, season) {
            Some(stats) => stats.clone(),
            None => {
                warn!("no team stats for {team} {season}, using league averages");
                TeamStats::league_average(team, season)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.by_team.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_team.is_empty()
    }
}
