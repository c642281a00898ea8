// Situational betting patterns and the edge bonus each one grants.
//
// Every trigger is evaluated for one side at a time, against that side's own
// base edge. The constants are fixed business rules.

use gridedge_core::game::{BettingLines, GameContext, Side};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    // Moneyline
    DivisionRoadDog,
    HomeValueDog,
    AwayValueDog,
    PlayoffContenderDog,
    RevengeDog,
    /// Bad weather favors the underdog (moneyline and spread).
    WeatherDog,
    // Spread
    FadeHeavyFavorite,
    DivisionUnderdog,
    PrimeTimeUnderdog,
    ModelLineDisagreement,
}

impl Pattern {
    /// Edge points added when the pattern fires.
    pub fn bonus(&self) -> f64 {
        match self {
            Pattern::DivisionRoadDog => 4.5,
            Pattern::HomeValueDog | Pattern::AwayValueDog => 4.2,
            Pattern::PlayoffContenderDog => 3.8,
            Pattern::RevengeDog => 3.2,
            Pattern::WeatherDog => 2.8,
            Pattern::FadeHeavyFavorite => 3.5,
            Pattern::DivisionUnderdog => 2.2,
            Pattern::PrimeTimeUnderdog => 2.5,
            Pattern::ModelLineDisagreement => 3.2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Pattern::DivisionRoadDog => "division road dog",
            Pattern::HomeValueDog => "home value dog",
            Pattern::AwayValueDog => "away value dog",
            Pattern::PlayoffContenderDog => "playoff contender dog",
            Pattern::RevengeDog => "revenge dog",
            Pattern::WeatherDog => "weather dog",
            Pattern::FadeHeavyFavorite => "fade heavy favorite",
            Pattern::DivisionUnderdog => "division underdog",
            Pattern::PrimeTimeUnderdog => "prime-time underdog",
            Pattern::ModelLineDisagreement => "model vs line",
        }
    }
}

/// Sum of the bonuses of `patterns`.
pub fn total_bonus(patterns: &[Pattern]) -> f64 {
    patterns.iter().map(Pattern::bonus).sum()
}

// ---------------------------------------------------------------------------
// Moneyline
// ---------------------------------------------------------------------------

/// Week from which winning teams count as playoff contenders.
pub const CONTENDER_WEEK: u8 = 14;
pub const CONTENDER_WINS: u32 = 7;

/// One side of a moneyline market, as seen by the pattern table.
#[derive(Debug, Clone, Copy)]
pub struct MoneylineSide {
    pub side: Side,
    pub odds: i32,
    pub base_edge: f64,
    /// The side's season wins so far.
    pub wins: u32,
}

pub fn moneyline_patterns(quote: &MoneylineSide, week: u8, ctx: &GameContext) -> Vec<Pattern> {
    let MoneylineSide {
        side,
        odds,
        base_edge,
        wins,
    } = *quote;
    let mut found = Vec::new();

    if side == Side::Away
        && ctx.is_division_game
        && (180..=350).contains(&odds)
        && base_edge > 2.0
    {
        found.push(Pattern::DivisionRoadDog);
    }
    if odds >= 200 && base_edge > 3.0 {
        found.push(match side {
            Side::Home => Pattern::HomeValueDog,
            Side::Away => Pattern::AwayValueDog,
        });
    }
    if week >= CONTENDER_WEEK && wins >= CONTENDER_WINS && odds > 150 && base_edge > 1.0 {
        found.push(Pattern::PlayoffContenderDog);
    }
    if ctx.is_revenge && odds > 120 && base_edge > 0.0 {
        found.push(Pattern::RevengeDog);
    }
    if ctx.has_severe_weather() && odds > 130 && base_edge > -1.0 {
        found.push(Pattern::WeatherDog);
    }
    found
}

// ---------------------------------------------------------------------------
// Spread
// ---------------------------------------------------------------------------

pub const HEAVY_FAVORITE_POINTS: f64 = 7.0;
pub const DISAGREEMENT_POINTS: f64 = 4.5;

/// Patterns for a spread bet on `side`.
///
/// `model_margin` is the model's expected home-minus-away margin. Every
/// spread pattern requires a positive base edge.
pub fn spread_patterns(
    side: Side,
    base_edge: f64,
    lines: &BettingLines,
    model_margin: f64,
    ctx: &GameContext,
) -> Vec<Pattern> {
    let mut found = Vec::new();
    let Some(spread) = lines.spread else {
        return found;
    };
    if base_edge <= 0.0 {
        return found;
    }

    let is_underdog = lines.spread_underdog() == Some(side);
    if is_underdog {
        if spread.abs() >= HEAVY_FAVORITE_POINTS {
            found.push(Pattern::FadeHeavyFavorite);
        }
        if ctx.has_severe_weather() {
            found.push(Pattern::WeatherDog);
        }
        if ctx.is_division_game {
            found.push(Pattern::DivisionUnderdog);
        }
        if ctx.is_prime_time {
            found.push(Pattern::PrimeTimeUnderdog);
        }
    }

    // Positive when the model rates the home side better than the line does.
    let disagreement = model_margin + spread;
    let model_side = if disagreement > 0.0 {
        Side::Home
    } else {
        Side::Away
    };
    if disagreement.abs() >= DISAGREEMENT_POINTS && model_side == side {
        found.push(Pattern::ModelLineDisagreement);
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridedge_core::game::Weather;

    fn quote(side: Side, odds: i32, base_edge: f64) -> MoneylineSide {
        MoneylineSide {
            side,
            odds,
            base_edge,
            wins: 0,
        }
    }

    fn division() -> GameContext {
        GameContext {
            is_division_game: true,
            ..Default::default()
        }
    }

    #[test]
    fn division_road_dog_needs_away_side_and_price_window() {
        let ctx = division();
        let hits = moneyline_patterns(&quote(Side::Away, 220, 2.5), 5, &ctx);
        assert_eq!(hits, vec![Pattern::DivisionRoadDog]);

        assert!(moneyline_patterns(&quote(Side::Home, 220, 2.5), 5, &ctx).is_empty());
        assert!(moneyline_patterns(&quote(Side::Away, 360, 2.5), 5, &ctx).is_empty());
        assert!(moneyline_patterns(&quote(Side::Away, 220, 2.0), 5, &ctx).is_empty());
    }

    #[test]
    fn value_dog_is_side_specific() {
        let ctx = GameContext::default();
        assert_eq!(
            moneyline_patterns(&quote(Side::Home, 200, 3.5), 5, &ctx),
            vec![Pattern::HomeValueDog]
        );
        assert_eq!(
            moneyline_patterns(&quote(Side::Away, 250, 3.5), 5, &ctx),
            vec![Pattern::AwayValueDog]
        );
        assert!(moneyline_patterns(&quote(Side::Away, 199, 10.0), 5, &ctx).is_empty());
    }

    #[test]
    fn patterns_stack() {
        let ctx = GameContext {
            is_division_game: true,
            is_revenge: true,
            ..Default::default()
        };
        let hits = moneyline_patterns(&quote(Side::Away, 240, 6.0), 5, &ctx);
        assert_eq!(
            hits,
            vec![
                Pattern::DivisionRoadDog,
                Pattern::AwayValueDog,
                Pattern::RevengeDog
            ]
        );
        assert!((total_bonus(&hits) - (4.5 + 4.2 + 3.2)).abs() < 1e-12);
    }

    #[test]
    fn playoff_contender_is_late_season_only() {
        let ctx = GameContext::default();
        let contender = MoneylineSide {
            side: Side::Home,
            odds: 160,
            base_edge: 1.5,
            wins: 8,
        };
        assert_eq!(
            moneyline_patterns(&contender, 14, &ctx),
            vec![Pattern::PlayoffContenderDog]
        );
        assert!(moneyline_patterns(&contender, 13, &ctx).is_empty());
        let losing = MoneylineSide { wins: 6, ..contender };
        assert!(moneyline_patterns(&losing, 16, &ctx).is_empty());
    }

    #[test]
    fn weather_dog_tolerates_slightly_negative_edge() {
        let ctx = GameContext {
            weather: Some(Weather {
                precipitation: true,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(
            moneyline_patterns(&quote(Side::Home, 140, -0.5), 3, &ctx),
            vec![Pattern::WeatherDog]
        );
        assert!(moneyline_patterns(&quote(Side::Home, 140, -1.5), 3, &ctx).is_empty());
    }

    fn spread_lines(spread: f64) -> BettingLines {
        BettingLines {
            spread: Some(spread),
            ..Default::default()
        }
    }

    #[test]
    fn heavy_favorite_fade_goes_to_the_underdog() {
        let ctx = GameContext::default();
        let lines = spread_lines(-9.5);
        assert_eq!(
            spread_patterns(Side::Away, 2.0, &lines, 9.0, &ctx),
            vec![Pattern::FadeHeavyFavorite]
        );
        assert!(spread_patterns(Side::Home, 2.0, &lines, 9.0, &ctx).is_empty());
    }

    #[test]
    fn weather_dog_spread_goes_to_the_underdog() {
        let ctx = GameContext {
            weather: Some(Weather {
                precipitation: true,
                ..Default::default()
            }),
            ..Default::default()
        };
        let lines = spread_lines(-3.0);
        assert_eq!(
            spread_patterns(Side::Away, 1.0, &lines, 3.0, &ctx),
            vec![Pattern::WeatherDog]
        );
        assert!(spread_patterns(Side::Home, 1.0, &lines, 3.0, &ctx).is_empty());
        assert!(spread_patterns(Side::Away, 0.0, &lines, 3.0, &ctx).is_empty());
        assert!(spread_patterns(Side::Away, -1.5, &lines, 3.0, &ctx).is_empty());
    }

    #[test]
    fn division_underdog_spread_goes_to_the_underdog() {
        let ctx = division();
        // Away favored by 4, so the home side is the dog.
        let lines = spread_lines(4.0);
        assert_eq!(
            spread_patterns(Side::Home, 0.5, &lines, -4.0, &ctx),
            vec![Pattern::DivisionUnderdog]
        );
        assert!(spread_patterns(Side::Away, 0.5, &lines, -4.0, &ctx).is_empty());
        assert!(spread_patterns(Side::Home, 0.0, &lines, -4.0, &ctx).is_empty());
    }

    #[test]
    fn spread_patterns_need_positive_edge() {
        let ctx = GameContext {
            is_prime_time: true,
            ..Default::default()
        };
        assert!(spread_patterns(Side::Home, 0.0, &spread_lines(3.0), 0.0, &ctx).is_empty());
        assert_eq!(
            spread_patterns(Side::Home, 0.1, &spread_lines(3.0), -3.0, &ctx),
            vec![Pattern::PrimeTimeUnderdog]
        );
    }

    #[test]
    fn disagreement_follows_the_model() {
        let ctx = GameContext::default();
        // Line has home favored by 3, model has home by 8.
        let lines = spread_lines(-3.0);
        assert_eq!(
            spread_patterns(Side::Home, 1.0, &lines, 8.0, &ctx),
            vec![Pattern::ModelLineDisagreement]
        );
        assert!(spread_patterns(Side::Away, 1.0, &lines, 8.0, &ctx).is_empty());
        assert!(spread_patterns(Side::Home, 1.0, &lines, 7.0, &ctx).is_empty());
    }

    #[test]
    fn pickem_has_no_underdog_patterns() {
        let ctx = GameContext {
            is_division_game: true,
            ..Default::default()
        };
        assert!(spread_patterns(Side::Home, 5.0, &spread_lines(0.0), 1.0, &ctx).is_empty());
    }
}
