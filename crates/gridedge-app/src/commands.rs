// Subcommand handlers. Each writes its report to `out` so the binary can
// pass stdout and tests can pass a buffer.

use std::io::Write;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use gridedge_core::config::Config;
use gridedge_core::feed::{FileFeed, GameFeed};
use gridedge_core::game::Game;
use gridedge_football::{evaluate_game, run_backtest, GameEvaluation};

use crate::cli::{BacktestArgs, HistoryArgs, WeekArgs};
use crate::ledger::Ledger;
use crate::render;

#[derive(Debug, Serialize)]
struct WeekEntry<'a> {
    game: &'a Game,
    evaluation: &'a GameEvaluation,
}

// ---------------------------------------------------------------------------
// week
// ---------------------------------------------------------------------------

pub fn week(config: &Config, feed: &FileFeed, args: &WeekArgs, out: &mut impl Write) -> Result<()> {
    let games = feed
        .games_for_week(args.season, args.week)
        .with_context(|| format!("failed to load games for week {}", args.week))?;
    if games.is_empty() {
        let weeks = feed.weeks(args.season);
        if weeks.is_empty() {
            bail!("no games found for season {}", args.season);
        }
        let listed: Vec<String> = weeks.iter().map(|w| w.to_string()).collect();
        bail!(
            "no games found for season {} week {} (weeks with games: {})",
            args.season,
            args.week,
            listed.join(", ")
        );
    }

    let mut evaluated = Vec::with_capacity(games.len());
    for game in &games {
        match evaluate_game(game, feed.stats(), &config.model) {
            Ok(eval) => evaluated.push((game, eval)),
            Err(e) => warn!("skipping {}: {}", game.label(), e),
        }
    }
    info!(
        "Week {} {}: {} of {} games analyzed",
        args.week,
        args.season,
        evaluated.len(),
        games.len()
    );

    if args.json {
        let entries: Vec<WeekEntry<'_>> = evaluated
            .iter()
            .map(|(game, evaluation)| WeekEntry { game, evaluation })
            .collect();
        serde_json::to_writer_pretty(&mut *out, &entries)
            .context("failed to serialize week analysis")?;
        writeln!(out)?;
        return Ok(());
    }

    for (game, eval) in &evaluated {
        render::write_game(out, game, eval)?;
    }
    let flagged: usize = evaluated.iter().map(|(_, e)| e.bets.len()).sum();
    writeln!(
        out,
        "{} games, {} flagged bets, {} skipped",
        evaluated.len(),
        flagged,
        games.len() - evaluated.len()
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// backtest
// ---------------------------------------------------------------------------

pub fn backtest(
    config: &Config,
    feed: &FileFeed,
    ledger: Option<&Ledger>,
    args: &BacktestArgs,
    out: &mut impl Write,
) -> Result<()> {
    if args.from_week > args.to_week {
        bail!(
            "--from-week ({}) is after --to-week ({})",
            args.from_week,
            args.to_week
        );
    }
    let stake = args.stake.unwrap_or(config.backtest.stake);
    if !(stake.is_finite() && stake > 0.0) {
        bail!("stake must be a positive number, got {stake}");
    }
    let top = args.top.unwrap_or(config.backtest.top_picks);

    let games = feed.completed_games(args.season, args.from_week..=args.to_week);
    info!(
        "Backtesting {} completed games, season {} weeks {}-{}",
        games.len(),
        args.season,
        args.from_week,
        args.to_week
    );
    let report = run_backtest(&games, feed.stats(), &config.model, stake);

    if let Some(ledger) = ledger {
        let run_id = ledger
            .record_run(args.season, args.from_week..=args.to_week, stake, &report)
            .context("failed to record backtest run")?;
        info!("Recorded backtest run {run_id}");
        if !args.json {
            writeln!(out, "Recorded as {run_id}")?;
            writeln!(out)?;
        }
    }

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &report)
            .context("failed to serialize backtest report")?;
        writeln!(out)?;
    } else {
        render::write_backtest(out, &report, stake, top)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// history
// ---------------------------------------------------------------------------

pub fn history(ledger: &Ledger, args: &HistoryArgs, out: &mut impl Write) -> Result<()> {
    if let Some(run_id) = &args.delete {
        if !ledger.delete_run(run_id)? {
            bail!("no recorded run with id {run_id}");
        }
        info!("Deleted backtest run {run_id}");
        writeln!(out, "Deleted {run_id}")?;
        return Ok(());
    }
    match &args.run {
        Some(run_id) => {
            let bets = ledger.bets_for_run(run_id)?;
            if bets.is_empty() && ledger.load_report(run_id)?.is_none() {
                bail!("no recorded run with id {run_id}");
            }
            writeln!(out, "{run_id}: {} graded bets", bets.len())?;
            render::write_stored_bets(out, &bets)?;
        }
        None => {
            let runs = ledger.recent_runs(args.limit)?;
            render::write_runs(out, &runs)?;
        }
    }
    Ok(())
}
