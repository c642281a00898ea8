// Team-strength adjustment: turns seasonal averages plus game context into
// an expected-points rate for each side.

use gridedge_core::game::{GameContext, Injury, InjuryClass, RecentGame, Side, Weather};
use gridedge_core::team::TeamStats;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Bounds on the recent-form multiplier.
pub const FORM_FLOOR: f64 = 0.8;
pub const FORM_CEILING: f64 = 1.3;

const FREEZING_FACTOR: f64 = 0.95;
const WIND_THRESHOLD_MPH: f64 = 15.0;
const WIND_FACTOR: f64 = 0.92;
const PRECIPITATION_FACTOR: f64 = 0.90;

const QUARTERBACK_FACTOR: f64 = 0.85;
const SKILL_POSITION_FACTOR: f64 = 0.95;

pub const HOME_FIELD_POINTS: f64 = 2.5;
const FREEZING_HOME_BONUS: f64 = 0.5;
const DIVISION_HOME_BONUS: f64 = 0.3;
const PLAYOFF_HOME_BONUS: f64 = 0.8;

/// No adjusted rate falls below this many expected points.
pub const MIN_RATE: f64 = 10.0;

// ---------------------------------------------------------------------------
// Individual factors
// ---------------------------------------------------------------------------

/// Ratio of recent scoring to the season average, clamped to
/// [`FORM_FLOOR`, `FORM_CEILING`]. Neutral when there is no usable recent
/// game.
pub fn form_factor(season_avg: f64, recent: &[RecentGame]) -> f64 {
    let points: Vec<f64> = recent
        .iter()
        .map(|g| g.points_scored)
        .filter(|p| p.is_finite() && *p >= 0.0)
        .collect();
    if points.is_empty() || season_avg <= 0.0 {
        return 1.0;
    }
    let recent_avg = points.iter().sum::<f64>() / points.len() as f64;
    (recent_avg / season_avg).clamp(FORM_FLOOR, FORM_CEILING)
}

/// Freezing, wind, and precipitation penalties multiplied together.
pub fn weather_factor(weather: Option<&Weather>) -> f64 {
    let Some(w) = weather else {
        return 1.0;
    };
    let mut factor = 1.0;
    if w.is_freezing() {
        factor *= FREEZING_FACTOR;
    }
    if w.wind_above(WIND_THRESHOLD_MPH) {
        factor *= WIND_FACTOR;
    }
    if w.precipitation {
        factor *= PRECIPITATION_FACTOR;
    }
    factor
}

/// Each injury class applies its penalty at most once.
pub fn injury_factor(injuries: &[Injury]) -> f64 {
    let has = |class: InjuryClass| injuries.iter().any(|i| i.class() == class);
    let mut factor = 1.0;
    if has(InjuryClass::Quarterback) {
        factor *= QUARTERBACK_FACTOR;
    }
    if has(InjuryClass::SkillPosition) {
        factor *= SKILL_POSITION_FACTOR;
    }
    factor
}

/// Points added to the home side after every multiplicative step.
pub fn home_field_advantage(ctx: &GameContext) -> f64 {
    let mut points = HOME_FIELD_POINTS;
    if ctx.weather.is_some_and(|w| w.is_freezing()) {
        points += FREEZING_HOME_BONUS;
    }
    if ctx.is_division_game {
        points += DIVISION_HOME_BONUS;
    }
    if ctx.is_playoffs {
        points += PLAYOFF_HOME_BONUS;
    }
    points
}

// ---------------------------------------------------------------------------
// Adjusted rate
// ---------------------------------------------------------------------------

/// Every step of one side's rate adjustment, kept for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrengthBreakdown {
    pub base: f64,
    pub defensive_factor: f64,
    pub form_factor: f64,
    pub weather_factor: f64,
    pub injury_factor: f64,
    /// Zero for the away side.
    pub home_advantage: f64,
    /// Final expected points, floored at [`MIN_RATE`].
    pub rate: f64,
}

/// Expected points for `team` (playing on `side`) against `opponent`.
///
/// With no context this is `points_scored * opponent defensive rating`, plus
/// home-field points for the home side.
pub fn adjusted_rate(
    team: &TeamStats,
    opponent: &TeamStats,
    side: Side,
    ctx: &GameContext,
) -> StrengthBreakdown {
    let base = team.points_scored();
    let defensive_factor = opponent.defensive_rating();
    let form = form_factor(base, ctx.recent_form(side));
    let weather = weather_factor(ctx.weather.as_ref());
    let injury = injury_factor(ctx.injuries(side));
    let home_advantage = match side {
        Side::Home => home_field_advantage(ctx),
        Side::Away => 0.0,
    };

    let rate = base * defensive_factor * form * weather * injury + home_advantage;
    StrengthBreakdown {
        base,
        defensive_factor,
        form_factor: form,
        weather_factor: weather,
        injury_factor: injury,
        home_advantage,
        rate: rate.max(MIN_RATE),
    }
}
