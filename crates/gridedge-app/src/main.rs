// gridedge entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Parse arguments and load config
// 3. Load games and team stats
// 4. Open the ledger if the command needs it
// 5. Dispatch

use gridedge_app::cli::{Cli, Commands};
use gridedge_app::commands;
use gridedge_app::ledger::Ledger;
use gridedge_core::config;
use gridedge_core::feed::FileFeed;

use anyhow::Context;
use clap::Parser;
use tracing::info;

const DEFAULT_LOG_FILTER: &str =
    "gridedge=info,gridedge_app=info,gridedge_core=info,gridedge_football=info,warn";

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;

    // 2. Parse arguments and load config
    let cli = Cli::parse();
    info!("gridedge starting: {:?}", cli.command);

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: variance={}, max_score={}, stake={}",
        config.model.variance, config.model.max_score, config.backtest.stake
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Commands::Week(args) => {
            let feed = FileFeed::load(&config.data_paths).context("failed to load game data")?;
            commands::week(&config, &feed, args, &mut out)?;
        }
        Commands::Backtest(args) => {
            let feed = FileFeed::load(&config.data_paths).context("failed to load game data")?;
            let ledger = if args.record {
                Some(open_ledger(&config.ledger_path)?)
            } else {
                None
            };
            commands::backtest(&config, &feed, ledger.as_ref(), args, &mut out)?;
        }
        Commands::History(args) => {
            let ledger = open_ledger(&config.ledger_path)?;
            commands::history(&ledger, args, &mut out)?;
        }
    }

    info!("gridedge finished");
    Ok(())
}

fn open_ledger(path: &str) -> anyhow::Result<Ledger> {
    let ledger = Ledger::open(path).context("failed to open ledger")?;
    info!("Ledger opened at {}", path);
    Ok(ledger)
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("gridedge.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
