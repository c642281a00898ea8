// Single-game analysis: strength adjustment, score table, and market
// probabilities for one matchup.

use crate::edge::{detect_edge_bets, EdgeBet};
use crate::model::markets::{
    matchup_pace, moneyline_probabilities, spread_probabilities, total_probabilities,
    MoneylineProbabilities, SpreadProbabilities, TotalProbabilities,
};
use crate::model::poisson::{game_variance, ScoreTable};
use crate::model::rating::rating_spread;
use crate::model::strength::{adjusted_rate, StrengthBreakdown};
use gridedge_core::config::ModelConfig;
use gridedge_core::game::{BettingLines, Game, GameContext, Side};
use gridedge_core::team::{TeamStats, TeamStatsBook};
use serde::Serialize;
use std::borrow::Cow;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A game the model cannot price. The caller skips the game and moves on.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{side} scoring rate is not a positive finite number: {rate}")]
    InvalidRate { side: Side, rate: f64 },

    #[error("variance multiplier {0} outside [0, 1)")]
    InvalidVariance(f64),

    #[error("{market} line is not finite: {value}")]
    InvalidLine { market: &'static str, value: f64 },
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpectedPoints {
    pub home: f64,
    pub away: f64,
}

impl ExpectedPoints {
    /// Expected home-minus-away margin.
    pub fn margin(&self) -> f64 {
        self.home - self.away
    }

    pub fn total(&self) -> f64 {
        self.home + self.away
    }
}

/// Market probabilities after context adjustment. A market is `None` when
/// its line was not quoted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarketProbabilities {
    pub moneyline: MoneylineProbabilities,
    pub spread: Option<SpreadProbabilities>,
    pub total: Option<TotalProbabilities>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameAnalysis {
    pub expected_points: ExpectedPoints,
    pub home_strength: StrengthBreakdown,
    pub away_strength: StrengthBreakdown,
    pub variance: f64,
    pub probabilities: MarketProbabilities,
    /// Home margin implied by the stat-based power ratings.
    pub power_spread: f64,
    /// Most probable final score as `(home, away)`.
    pub likely_score: (u32, u32),
    #[serde(skip)]
    pub score_table: ScoreTable,
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

fn check_rate(side: Side, rate: f64) -> Result<f64, AnalysisError> {
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(AnalysisError::InvalidRate { side, rate })
    }
}

fn check_line(market: &'static str, value: Option<f64>) -> Result<Option<f64>, AnalysisError> {
    match value {
        Some(v) if !v.is_finite() => Err(AnalysisError::InvalidLine { market, value: v }),
        other => Ok(other),
    }
}

/// Price one matchup. Pure: identical inputs give identical output.
pub fn analyze_game(
    home: &TeamStats,
    away: &TeamStats,
    lines: &BettingLines,
    ctx: &GameContext,
    model: &ModelConfig,
) -> Result<GameAnalysis, AnalysisError> {
    let variance = ctx
        .variance
        .unwrap_or_else(|| game_variance(model.variance, ctx));
    if !(0.0..1.0).contains(&variance) {
        return Err(AnalysisError::InvalidVariance(variance));
    }
    let spread = check_line("spread", lines.spread)?;
    let total = check_line("total", lines.total)?;

    let home_strength = adjusted_rate(home, away, Side::Home, ctx);
    let away_strength = adjusted_rate(away, home, Side::Away, ctx);
    let expected_points = ExpectedPoints {
        home: check_rate(Side::Home, home_strength.rate)?,
        away: check_rate(Side::Away, away_strength.rate)?,
    };

    let table = ScoreTable::generate(
        expected_points.home,
        expected_points.away,
        variance,
        model.max_score,
    );

    let moneyline = moneyline_probabilities(&table).with_context(ctx);
    let spread = spread.map(|s| spread_probabilities(&table, s).with_context(ctx));
    let pace = matchup_pace(home.pace(), away.pace());
    let total = total.map(|t| total_probabilities(&table, t).with_context(ctx, pace));
    let (likely_home, likely_away, _) = table.most_likely_score();

    Ok(GameAnalysis {
        expected_points,
        home_strength,
        away_strength,
        variance,
        probabilities: MarketProbabilities {
            moneyline,
            spread,
            total,
        },
        power_spread: rating_spread(home, away),
        likely_score: (likely_home, likely_away),
        score_table: table,
    })
}

// ---------------------------------------------------------------------------
// Full game evaluation
// ---------------------------------------------------------------------------

/// Analysis plus the bets it flags.
#[derive(Debug, Clone, Serialize)]
pub struct GameEvaluation {
    pub analysis: GameAnalysis,
    pub bets: Vec<EdgeBet>,
}

/// Look up both teams, analyze the game, and detect edge bets.
///
/// A game is treated as a division game when either the context says so or
/// both teams' stats list the same division.
pub fn evaluate_game(
    game: &Game,
    stats: &TeamStatsBook,
    model: &ModelConfig,
) -> Result<GameEvaluation, AnalysisError> {
    let home = stats.get_or_default(&game.home_team, game.season);
    let away = stats.get_or_default(&game.away_team, game.season);

    let game: Cow<'_, Game> = if !game.context.is_division_game && home.same_division(&away) {
        let mut inferred = game.clone();
        inferred.context.is_division_game = true;
        Cow::Owned(inferred)
    } else {
        Cow::Borrowed(game)
    };
    let analysis = analyze_game(&home, &away, &game.lines, &game.context, model)?;
    let bets = detect_edge_bets(&game, &home, &away, &analysis);
    Ok(GameEvaluation { analysis, bets })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridedge_core::game::Weather;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn team(name: &str, points: f64) -> TeamStats {
        TeamStats {
            team: name.into(),
            season: 2024,
            avg_points_scored: Some(points),
            ..Default::default()
        }
    }

    fn full_lines() -> BettingLines {
        BettingLines {
            home_moneyline: Some(-140),
            away_moneyline: Some(120),
            spread: Some(-3.0),
            total: Some(44.5),
        }
    }

    #[test]
    fn analysis_is_idempotent() {
        let ctx = GameContext::default();
        let model = ModelConfig::default();
        let a = analyze_game(&team("KC", 27.0), &team("LV", 18.0), &full_lines(), &ctx, &model)
            .unwrap();
        let b = analyze_game(&team("KC", 27.0), &team("LV", 18.0), &full_lines(), &ctx, &model)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn expected_points_match_adjusted_rates() {
        let a = analyze_game(
            &team("KC", 27.0),
            &team("LV", 18.0),
            &full_lines(),
            &GameContext::default(),
            &ModelConfig::default(),
        )
        .unwrap();
        assert!(approx_eq(a.expected_points.home, 29.5, 1e-12));
        assert!(approx_eq(a.expected_points.away, 18.0, 1e-12));
        assert!(approx_eq(a.expected_points.margin(), 11.5, 1e-12));
        assert!(approx_eq(a.score_table.home_lambda(), 29.5 * 1.15, 1e-9));
    }

    #[test]
    fn unquoted_markets_have_no_probabilities() {
        let a = analyze_game(
            &team("KC", 27.0),
            &team("LV", 18.0),
            &BettingLines::default(),
            &GameContext::default(),
            &ModelConfig::default(),
        )
        .unwrap();
        assert!(a.probabilities.spread.is_none());
        assert!(a.probabilities.total.is_none());
        let ml = a.probabilities.moneyline;
        assert!(ml.home_win > 0.8);
    }

    #[test]
    fn context_variance_overrides_config() {
        let ctx = GameContext {
            variance: Some(0.0),
            ..Default::default()
        };
        let a = analyze_game(
            &team("KC", 20.0),
            &team("LV", 20.0),
            &BettingLines::default(),
            &ctx,
            &ModelConfig::default(),
        )
        .unwrap();
        assert_eq!(a.variance, 0.0);
        assert!(approx_eq(a.score_table.away_lambda(), 20.0, 1e-12));
    }

    #[test]
    fn variance_follows_game_conditions() {
        let ctx = GameContext {
            is_division_game: true,
            weather: Some(Weather {
                wind_speed: Some(25.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let a = analyze_game(
            &team("KC", 20.0),
            &team("LV", 20.0),
            &BettingLines::default(),
            &ctx,
            &ModelConfig::default(),
        )
        .unwrap();
        assert!(approx_eq(a.variance, 0.16, 1e-12));
        assert!(approx_eq(
            a.score_table.away_lambda(),
            a.away_strength.rate * 1.16,
            1e-9
        ));
    }

    #[test]
    fn bad_variance_is_an_error() {
        let ctx = GameContext {
            variance: Some(1.5),
            ..Default::default()
        };
        let err = analyze_game(
            &team("KC", 20.0),
            &team("LV", 20.0),
            &BettingLines::default(),
            &ctx,
            &ModelConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidVariance(_)));
    }

    #[test]
    fn non_finite_line_is_an_error() {
        let lines = BettingLines {
            total: Some(f64::INFINITY),
            ..Default::default()
        };
        let err = analyze_game(
            &team("KC", 20.0),
            &team("LV", 20.0),
            &lines,
            &GameContext::default(),
            &ModelConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidLine { market: "total", .. }));
    }

    #[test]
    fn evaluate_infers_division_games_from_stats() {
        let mut home = team("BUF", 22.5);
        home.division = Some("AFC East".into());
        let mut away = team("MIA", 22.5);
        away.division = Some("AFC East".into());
        let book = TeamStatsBook::from_rows(vec![home, away]);

        let game = Game::new(2024, 3, "BUF", "MIA");
        let eval = evaluate_game(&game, &book, &ModelConfig::default()).unwrap();
        assert!(approx_eq(eval.analysis.home_strength.home_advantage, 2.8, 1e-12));
        assert!(eval.bets.is_empty());
    }

    #[test]
    fn evaluate_uses_league_average_for_unknown_teams() {
        let game = Game::new(2024, 3, "HOU", "IND");
        let eval = evaluate_game(&game, &TeamStatsBook::default(), &ModelConfig::default())
            .unwrap();
        assert!(approx_eq(eval.analysis.expected_points.away, 22.5, 1e-12));
    }
}
