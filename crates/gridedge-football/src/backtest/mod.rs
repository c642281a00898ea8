// Backtesting: replay the edge detector over completed games and grade
// every bet it would have flagged.

pub mod grading;
pub mod report;

pub use grading::{grade, settle_units, Outcome};
pub use report::{BacktestReport, BetResult, Record, WeekSummary};

use crate::analysis::{evaluate_game, AnalysisError, GameEvaluation};
use gridedge_core::config::ModelConfig;
use gridedge_core::game::Game;
use gridedge_core::team::TeamStatsBook;
use rayon::prelude::*;
use tracing::{info, warn};

/// Run the model over every completed game in `games` and grade its picks.
///
/// Games are analyzed in parallel and folded into the report in input
/// order, so the result is identical to a sequential run. A game that
/// cannot be analyzed is logged and counted as skipped.
pub fn run_backtest(
    games: &[Game],
    stats: &TeamStatsBook,
    model: &ModelConfig,
    stake: f64,
) -> BacktestReport {
    let completed: Vec<&Game> = games.iter().filter(|g| g.final_score().is_some()).collect();

    let evaluations: Vec<Result<GameEvaluation, AnalysisError>> = completed
        .par_iter()
        .map(|game| evaluate_game(game, stats, model))
        .collect();

    let mut report = BacktestReport::default();
    for (game, evaluation) in completed.into_iter().zip(evaluations) {
        match evaluation {
            Ok(eval) => record_game(&mut report, game, eval, stake),
            Err(e) => {
                warn!("skipping {} (week {}): {}", game.label(), game.week, e);
                report.record_skip();
            }
        }
    }

    info!(
        "Backtest: {} games analyzed, {} skipped, {}-{} ({} pushes), {:+.2} units",
        report.games_analyzed,
        report.games_skipped,
        report.wins(),
        report.losses(),
        report.overall.pushes,
        report.total_units()
    );
    report
}

fn record_game(report: &mut BacktestReport, game: &Game, eval: GameEvaluation, stake: f64) {
    report.record_game(game.season, game.week);
    let Some((home, away)) = game.final_score() else {
        return;
    };
    let final_score = format!("{} {} - {} {}", game.away_team, away, home, game.home_team);

    for bet in eval.bets {
        let Some(outcome) = grade(&bet, game) else {
            warn!("{}: could not grade {}", game.label(), bet.text);
            continue;
        };
        if outcome == Outcome::Push {
            info!("{}: {} pushed ({final_score}), ungraded", game.label(), bet.text);
        }
        let units = settle_units(&bet, outcome, stake);
        report.record_bet(BetResult {
            season: game.season,
            week: game.week,
            game: game.label(),
            final_score: final_score.clone(),
            bet,
            outcome,
            units,
        });
    }
}
