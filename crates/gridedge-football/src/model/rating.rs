// Stat-based power rating, reported next to the Poisson model as a second
// opinion on the spread.

use gridedge_core::team::TeamStats;

const LEAGUE_YARDS_PER_PLAY: f64 = 5.5;
const LEAGUE_RED_ZONE_EFFICIENCY: f64 = 0.55;
const LEAGUE_RED_ZONE_DEFENSE: f64 = 0.45;
const LEAGUE_THIRD_DOWN: f64 = 0.4;

/// Rating added to the defensive component before subtracting points
/// allowed.
const DEFENSE_BASELINE: f64 = 45.0;
const TURNOVER_WEIGHT: f64 = 2.5;
const THIRD_DOWN_WEIGHT: f64 = 10.0;

/// Home-field edge in rating points.
pub const HOME_RATING_EDGE: f64 = 2.5;

fn metric(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(default)
}

/// Composite team rating from scoring, efficiency, turnovers, and third-down
/// play. A league-average team rates 45.
pub fn power_rating(team: &TeamStats) -> f64 {
    let offense = team.points_scored()
        * (metric(team.yards_per_play, LEAGUE_YARDS_PER_PLAY) / LEAGUE_YARDS_PER_PLAY)
        * (metric(team.red_zone_efficiency, LEAGUE_RED_ZONE_EFFICIENCY)
            / LEAGUE_RED_ZONE_EFFICIENCY);

    let defense = DEFENSE_BASELINE
        - team.points_allowed()
            * (LEAGUE_YARDS_PER_PLAY / metric(team.yards_per_play_allowed, LEAGUE_YARDS_PER_PLAY))
            * (LEAGUE_RED_ZONE_DEFENSE / metric(team.red_zone_defense, LEAGUE_RED_ZONE_DEFENSE));

    let turnovers = team
        .turnover_differential
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
        * TURNOVER_WEIGHT;

    let third_down = metric(team.third_down_conversion, LEAGUE_THIRD_DOWN)
        - metric(team.third_down_defense, LEAGUE_THIRD_DOWN);

    offense + defense + turnovers + third_down * THIRD_DOWN_WEIGHT
}

/// Expected home margin implied by the two power ratings.
pub fn rating_spread(home: &TeamStats, away: &TeamStats) -> f64 {
    power_rating(home) - power_rating(away) + HOME_RATING_EDGE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn league_average_team_rates_45() {
        assert!(approx_eq(power_rating(&TeamStats::default()), 45.0, 1e-12));
    }

    #[test]
    fn efficiency_metrics_scale_the_rating() {
        let team = TeamStats {
            avg_points_scored: Some(27.0),
            avg_points_allowed: Some(18.0),
            yards_per_play: Some(6.05),
            yards_per_play_allowed: Some(5.0),
            red_zone_efficiency: Some(0.60),
            red_zone_defense: Some(0.50),
            third_down_conversion: Some(0.45),
            third_down_defense: Some(0.38),
            turnover_differential: Some(-0.5),
            ..Default::default()
        };
        let offense = 27.0 * (6.05 / 5.5) * (0.60 / 0.55);
        let defense = 45.0 - 18.0 * (5.5 / 5.0) * (0.45 / 0.50);
        let expected = offense + defense - 1.25 + 0.07 * 10.0;
        assert!(approx_eq(power_rating(&team), expected, 1e-9));
    }

    #[test]
    fn equal_teams_spread_is_home_edge() {
        let t = TeamStats::default();
        assert!(approx_eq(rating_spread(&t, &t), HOME_RATING_EDGE, 1e-12));
    }

    #[test]
    fn stronger_home_team_widens_spread() {
        let strong = TeamStats {
            avg_points_scored: Some(30.0),
            ..Default::default()
        };
        assert!(approx_eq(rating_spread(&strong, &TeamStats::default()), 7.5 + 2.5, 1e-12));
        assert!(approx_eq(rating_spread(&TeamStats::default(), &strong), -7.5 + 2.5, 1e-12));
    }
}
