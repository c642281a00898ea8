// Plain-text report rendering for the terminal.

use crate::ledger::{RunRow, StoredBet};
use gridedge_core::game::{Game, Side};
use gridedge_core::odds::{format_line, format_odds_with_probability, vig};
use gridedge_football::backtest::BacktestReport;
use gridedge_football::edge::{EdgeBet, Market};
use gridedge_football::GameEvaluation;
use std::io::{self, Write};

fn pct(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

/// Edge with its unit: points for totals, percentage points otherwise.
fn edge_text(bet: &EdgeBet) -> String {
    match bet.market {
        Market::Total => format!("{:.1} pts", bet.edge),
        Market::Moneyline | Market::Spread => format!("{:.1} pp", bet.edge),
    }
}

fn bet_line(bet: &EdgeBet) -> String {
    let patterns: Vec<&str> = bet.patterns.iter().map(|p| p.label()).collect();
    let mut line = format!(
        "{:<9} {:<16} edge {:>8}  model {:>6}  implied {:>5.1}%  EV {:+.3}",
        bet.market.label(),
        bet.text,
        edge_text(bet),
        pct(bet.model_probability),
        bet.implied_probability,
        bet.expected_value,
    );
    if !patterns.is_empty() {
        line.push_str(&format!("  [{}]", patterns.join(", ")));
    }
    line
}

// ---------------------------------------------------------------------------
// Week
// ---------------------------------------------------------------------------

pub fn write_game(out: &mut impl Write, game: &Game, eval: &GameEvaluation) -> io::Result<()> {
    let a = &eval.analysis;
    let probs = &a.probabilities;
    writeln!(out, "{}  (week {}, {})", game.label(), game.week, game.season)?;
    writeln!(
        out,
        "  expected   {} {:.1} - {:.1} {}   likely {}-{}   power margin {:+.1}",
        game.away_team,
        a.expected_points.away,
        a.expected_points.home,
        game.home_team,
        a.likely_score.1,
        a.likely_score.0,
        a.power_spread,
    )?;
    if let (Some(home), Some(away)) = (game.lines.home_moneyline, game.lines.away_moneyline) {
        writeln!(
            out,
            "  prices     {} {}  {} {}  vig {:.1}%",
            game.home_team,
            format_odds_with_probability(home),
            game.away_team,
            format_odds_with_probability(away),
            vig(home, away),
        )?;
    }
    writeln!(
        out,
        "  moneyline  {} {}  {} {}  tie {}",
        game.home_team,
        pct(probs.moneyline.win(Side::Home)),
        game.away_team,
        pct(probs.moneyline.win(Side::Away)),
        pct(probs.moneyline.tie),
    )?;
    if let Some(spread) = probs.spread {
        writeln!(
            out,
            "  spread     {} {} covers {}  push {}",
            game.home_team,
            format_line(spread.spread),
            pct(spread.home_cover),
            pct(spread.push),
        )?;
    }
    if let Some(total) = probs.total {
        writeln!(
            out,
            "  total      {}  over {}  under {}  push {}",
            total.total,
            pct(total.over),
            pct(total.under),
            pct(total.push),
        )?;
    }
    if eval.bets.is_empty() {
        writeln!(out, "  no edge")?;
    }
    for bet in &eval.bets {
        writeln!(out, "  >> {}", bet_line(bet))?;
    }
    writeln!(out)
}

// ---------------------------------------------------------------------------
// Backtest
// ---------------------------------------------------------------------------

pub fn write_backtest(
    out: &mut impl Write,
    report: &BacktestReport,
    stake: f64,
    top: usize,
) -> io::Result<()> {
    writeln!(out, "Backtest summary")?;
    writeln!(
        out,
        "  games analyzed {}   skipped {}",
        report.games_analyzed, report.games_skipped
    )?;
    writeln!(
        out,
        "  record {}-{} ({} pushes)   win rate {:.1}%   units {:+.2}   ROI {:+.1}%",
        report.wins(),
        report.losses(),
        report.overall.pushes,
        report.win_rate(),
        report.total_units(),
        report.roi(stake),
    )?;

    writeln!(out)?;
    writeln!(out, "By market")?;
    for (market, record) in &report.by_type {
        writeln!(
            out,
            "  {:<9} {:>3}-{:<3} push {:<2} win {:>5.1}%  units {:+.2}",
            market.label(),
            record.wins,
            record.losses,
            record.pushes,
            record.win_rate(),
            record.units,
        )?;
    }

    writeln!(out)?;
    writeln!(out, "By week")?;
    for week in &report.weekly {
        let best = week
            .best_edge
            .map(|e| format!("{e:.1}"))
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "  {} wk {:>2}  games {:>2}  picks {:>2}  {:>2}-{:<2}  units {:+6.2}  best edge {}",
            week.season,
            week.week,
            week.games,
            week.edge_picks,
            week.record.wins,
            week.record.losses,
            week.record.units,
            best,
        )?;
    }

    let picks = report.top_picks(top);
    if !picks.is_empty() {
        writeln!(out)?;
        writeln!(out, "Top {} picks", picks.len())?;
        for r in picks {
            writeln!(
                out,
                "  wk {:>2}  {:<12} {:<18} {:<5} {:+.2}  edge {}  ({})",
                r.week,
                r.game,
                r.bet.text,
                r.outcome.label(),
                r.units,
                edge_text(&r.bet),
                r.final_score,
            )?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Ledger history
// ---------------------------------------------------------------------------

pub fn write_runs(out: &mut impl Write, runs: &[RunRow]) -> io::Result<()> {
    if runs.is_empty() {
        return writeln!(out, "No recorded backtest runs.");
    }
    for run in runs {
        writeln!(
            out,
            "{}  {}  season {} wk {}-{}  {}-{} ({} pushes)  units {:+.2}  ROI {:+.1}%",
            run.run_id,
            run.created_at,
            run.season,
            run.from_week,
            run.to_week,
            run.wins,
            run.losses,
            run.pushes,
            run.total_units,
            run.roi,
        )?;
    }
    Ok(())
}

pub fn write_stored_bets(out: &mut impl Write, bets: &[StoredBet]) -> io::Result<()> {
    for bet in bets {
        writeln!(
            out,
            "  wk {:>2}  {:<12} {:<9} {:<18} {:<5} {:+.2}  edge {:.1}",
            bet.week, bet.game, bet.market, bet.bet_text, bet.outcome, bet.units, bet.edge,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridedge_core::config::ModelConfig;
    use gridedge_core::game::BettingLines;
    use gridedge_core::team::{TeamStats, TeamStatsBook};
    use gridedge_football::{evaluate_game, run_backtest};

    fn book() -> TeamStatsBook {
        TeamStatsBook::from_rows(vec![
            TeamStats {
                team: "DEN".into(),
                season: 2024,
                avg_points_scored: Some(17.0),
                ..Default::default()
            },
            TeamStats {
                team: "DET".into(),
                season: 2024,
                avg_points_scored: Some(31.0),
                ..Default::default()
            },
        ])
    }

    fn game() -> Game {
        let mut g = Game::new(2024, 8, "DEN", "DET");
        g.lines = BettingLines {
            home_moneyline: Some(-200),
            away_moneyline: Some(240),
            spread: Some(-3.5),
            total: Some(44.5),
        };
        g
    }

    fn render_to_string(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn game_block_lists_markets_and_bets() {
        let g = game();
        let eval = evaluate_game(&g, &book(), &ModelConfig::default()).unwrap();
        let text = render_to_string(|out| write_game(out, &g, &eval));
        assert!(text.starts_with("DET @ DEN"));
        assert!(text.contains("moneyline"));
        assert!(text.contains("prices     DEN -200 (66.7%)  DET +240 (29.4%)  vig -3.9%"));
        assert!(text.contains("spread     DEN -3.5"));
        assert!(text.contains("total      44.5"));
        assert!(text.contains(">> moneyline DET ML +240"));
    }

    #[test]
    fn backtest_block_has_sections() {
        let mut g = game();
        g.is_completed = true;
        g.home_score = Some(17);
        g.away_score = Some(34);
        let report = run_backtest(&[g], &book(), &ModelConfig::default(), 1.0);
        let text = render_to_string(|out| write_backtest(out, &report, 1.0, 5));
        assert!(text.contains("games analyzed 1"));
        assert!(text.contains("By market"));
        assert!(text.contains("2024 wk  8"));
        assert!(text.contains("Top "));
        assert!(text.contains("DET ML +240"));
    }

    #[test]
    fn edge_units_follow_the_market() {
        let g = game();
        let eval = evaluate_game(&g, &book(), &ModelConfig::default()).unwrap();
        let ml = eval.bets.iter().find(|b| b.market == Market::Moneyline).unwrap();
        assert!(edge_text(ml).ends_with(" pp"));

        let mut total = ml.clone();
        total.market = Market::Total;
        total.edge = 7.5;
        assert_eq!(edge_text(&total), "7.5 pts");
    }

    #[test]
    fn empty_history_message() {
        let text = render_to_string(|out| write_runs(out, &[]));
        assert_eq!(text, "No recorded backtest runs.\n");
    }
}
