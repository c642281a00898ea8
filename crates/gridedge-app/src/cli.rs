// Command-line interface definitions.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "gridedge")]
#[command(version, about = "NFL betting-edge model and backtester", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze every game of one week and list flagged bets
    Week(WeekArgs),

    /// Replay the model over completed games and grade its picks
    Backtest(BacktestArgs),

    /// Show recorded backtest runs
    History(HistoryArgs),
}

#[derive(Parser, Debug)]
pub struct WeekArgs {
    /// Season year (e.g. 2024)
    #[arg(long)]
    pub season: u16,

    /// Week number (1-22)
    #[arg(long)]
    pub week: u8,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct BacktestArgs {
    /// Season year (e.g. 2024)
    #[arg(long)]
    pub season: u16,

    /// First week to include
    #[arg(long, default_value_t = 1)]
    pub from_week: u8,

    /// Last week to include
    #[arg(long, default_value_t = 22)]
    pub to_week: u8,

    /// Number of top-edge picks to list (defaults to the configured value)
    #[arg(long)]
    pub top: Option<usize>,

    /// Units risked per bet (defaults to the configured value)
    #[arg(long)]
    pub stake: Option<f64>,

    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,

    /// Store the run in the ledger
    #[arg(long)]
    pub record: bool,
}

#[derive(Parser, Debug)]
pub struct HistoryArgs {
    /// Number of runs to list
    #[arg(long, default_value_t = 10)]
    pub limit: usize,

    /// Show the bets of one run instead of the run list
    #[arg(long, conflicts_with = "delete")]
    pub run: Option<String>,

    /// Delete a recorded run and its bets
    #[arg(long)]
    pub delete: Option<String>,
}
