// Per-market bet selection. Each market yields at most one bet; the home
// side is considered before the away side.

use crate::analysis::GameAnalysis;
use crate::edge::patterns::{self, MoneylineSide, Pattern};
use crate::edge::{EdgeBet, Market, Selection};
use gridedge_core::game::{Game, Side, STANDARD_JUICE};
use gridedge_core::odds::{expected_value, format_line, format_odds, implied_probability};
use gridedge_core::team::TeamStats;
use tracing::debug;

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

pub const MONEYLINE_MIN_EDGE_PATTERN: f64 = 5.5;
pub const MONEYLINE_MIN_EDGE: f64 = 8.5;

/// Short favorites priced inside this band are never flagged.
pub const EXCLUDED_FAVORITE_BAND: std::ops::RangeInclusive<i32> = -180..=-120;

pub const SPREAD_MIN_EDGE_PATTERN: f64 = 4.0;
pub const SPREAD_MIN_EDGE: f64 = 7.0;

/// Minimum gap, in points, between the predicted and listed total.
pub const TOTAL_MIN_GAP: f64 = 3.0;

fn min_edge(patterns: &[Pattern], with_pattern: f64, without: f64) -> f64 {
    if patterns.is_empty() {
        without
    } else {
        with_pattern
    }
}

// ---------------------------------------------------------------------------
// Markets
// ---------------------------------------------------------------------------

fn moneyline_bet(
    game: &Game,
    home: &TeamStats,
    away: &TeamStats,
    analysis: &GameAnalysis,
) -> Option<EdgeBet> {
    let lines = &game.lines;
    if !lines.has_moneylines() {
        return None;
    }
    let probs = &analysis.probabilities.moneyline;

    for side in [Side::Home, Side::Away] {
        let odds = lines.moneyline(side)?;
        let model = probs.win(side);
        let implied = implied_probability(odds);
        let base_edge = model * 100.0 - implied;
        let wins = match side {
            Side::Home => home.wins(),
            Side::Away => away.wins(),
        };
        let quote = MoneylineSide {
            side,
            odds,
            base_edge,
            wins,
        };
        let found = patterns::moneyline_patterns(&quote, game.week, &game.context);
        let edge = base_edge + patterns::total_bonus(&found);
        let threshold = min_edge(&found, MONEYLINE_MIN_EDGE_PATTERN, MONEYLINE_MIN_EDGE);

        if edge < threshold {
            continue;
        }
        if EXCLUDED_FAVORITE_BAND.contains(&odds) {
            debug!(
                "{}: {side} moneyline {odds} edge {edge:.1} inside favorite band",
                game.label()
            );
            continue;
        }

        let team = game.team(side).to_string();
        return Some(EdgeBet {
            market: Market::Moneyline,
            selection: Selection::team(side),
            text: format!("{team} ML {}", format_odds(odds)),
            team: Some(team),
            line: None,
            odds,
            model_probability: model,
            implied_probability: implied,
            base_edge,
            edge,
            patterns: found,
            expected_value: expected_value(model, odds),
        });
    }
    None
}

fn spread_bet(game: &Game, analysis: &GameAnalysis) -> Option<EdgeBet> {
    let lines = &game.lines;
    lines.spread?;
    let probs = analysis.probabilities.spread.as_ref()?;
    let model_margin = analysis.expected_points.margin();
    let implied = implied_probability(STANDARD_JUICE);

    for side in [Side::Home, Side::Away] {
        let model = probs.cover(side);
        let base_edge = model * 100.0 - implied;
        let found = patterns::spread_patterns(side, base_edge, lines, model_margin, &game.context);
        let edge = base_edge + patterns::total_bonus(&found);
        if edge < min_edge(&found, SPREAD_MIN_EDGE_PATTERN, SPREAD_MIN_EDGE) {
            continue;
        }

        let line = lines.spread_for(side)?;
        let team = game.team(side).to_string();
        return Some(EdgeBet {
            market: Market::Spread,
            selection: Selection::team(side),
            text: format!("{team} {}", format_line(line)),
            team: Some(team),
            line: Some(line),
            odds: STANDARD_JUICE,
            model_probability: model,
            implied_probability: implied,
            base_edge,
            edge,
            patterns: found,
            expected_value: expected_value(model, STANDARD_JUICE),
        });
    }
    None
}

fn total_bet(game: &Game, analysis: &GameAnalysis) -> Option<EdgeBet> {
    let line = game.lines.total?;
    let probs = analysis.probabilities.total.as_ref()?;
    let gap = analysis.expected_points.total() - line;
    if gap.abs() < TOTAL_MIN_GAP {
        return None;
    }

    let over = gap > 0.0;
    let (selection, word) = if over {
        (Selection::Over, "Over")
    } else {
        (Selection::Under, "Under")
    };
    let model = probs.direction(over);
    let implied = implied_probability(STANDARD_JUICE);
    // The point gap alone is not enough: the priced side must also beat
    // the juice.
    if model * 100.0 <= implied {
        return None;
    }
    Some(EdgeBet {
        market: Market::Total,
        selection,
        team: None,
        line: Some(line),
        odds: STANDARD_JUICE,
        model_probability: model,
        implied_probability: implied,
        base_edge: gap.abs(),
        edge: gap.abs(),
        patterns: Vec::new(),
        expected_value: expected_value(model, STANDARD_JUICE),
        text: format!("{word} {line}"),
    })
}

/// All bets the model flags for `game`: at most one per market, in
/// moneyline, spread, total order. Markets without a line are skipped.
pub fn detect_edge_bets(
    game: &Game,
    home: &TeamStats,
    away: &TeamStats,
    analysis: &GameAnalysis,
) -> Vec<EdgeBet> {
    let bets: Vec<EdgeBet> = [
        moneyline_bet(game, home, away, analysis),
        spread_bet(game, analysis),
        total_bet(game, analysis),
    ]
    .into_iter()
    .flatten()
    .collect();

    for bet in &bets {
        debug!("{}: flagged {} (edge {:.1})", game.label(), bet.text, bet.edge);
    }
    bets
}
