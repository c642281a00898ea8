// SQLite ledger of recorded backtest runs and the bets each one graded.

use std::ops::RangeInclusive;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use gridedge_football::backtest::BacktestReport;

/// One row of the `runs` table.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRow {
    pub run_id: String,
    pub created_at: String,
    pub season: u16,
    pub from_week: u8,
    pub to_week: u8,
    pub games_analyzed: u32,
    pub games_skipped: u32,
    pub total_bets: u32,
    pub wins: u32,
    pub losses: u32,
    pub pushes: u32,
    pub total_units: f64,
    pub roi: f64,
}

/// One row of the `bets` table.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredBet {
    pub seq: u32,
    pub season: u16,
    pub week: u8,
    pub game: String,
    pub market: String,
    pub selection: String,
    pub bet_text: String,
    pub odds: i32,
    pub edge: f64,
    pub outcome: String,
    pub units: f64,
}

/// SQLite-backed store of backtest runs.
pub struct Ledger {
    conn: Mutex<Connection>,
}

impl Ledger {
    /// Open (or create) a ledger at `path` and ensure both tables exist.
    /// `":memory:"` gives an ephemeral ledger.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open ledger at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .context("failed to set ledger pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS runs (
                run_id         TEXT PRIMARY KEY,
                season         INTEGER NOT NULL,
                from_week      INTEGER NOT NULL,
                to_week        INTEGER NOT NULL,
                stake          REAL NOT NULL,
                games_analyzed INTEGER NOT NULL,
                games_skipped  INTEGER NOT NULL,
                total_bets     INTEGER NOT NULL,
                wins           INTEGER NOT NULL,
                losses         INTEGER NOT NULL,
                pushes         INTEGER NOT NULL,
                total_units    REAL NOT NULL,
                roi            REAL NOT NULL,
                report_json    TEXT NOT NULL,
                created_at     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE TABLE IF NOT EXISTS bets (
                run_id    TEXT NOT NULL REFERENCES runs(run_id) ON DELETE CASCADE,
                seq       INTEGER NOT NULL,
                season    INTEGER NOT NULL,
                week      INTEGER NOT NULL,
                game      TEXT NOT NULL,
                market    TEXT NOT NULL,
                selection TEXT NOT NULL,
                bet_text  TEXT NOT NULL,
                odds      INTEGER NOT NULL,
                edge      REAL NOT NULL,
                outcome   TEXT NOT NULL,
                units     REAL NOT NULL,
                PRIMARY KEY (run_id, seq)
            );

            CREATE INDEX IF NOT EXISTS idx_runs_created_at ON runs(created_at);
            ",
        )
        .context("failed to create ledger schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Panics if the mutex is poisoned.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("ledger mutex poisoned")
    }

    /// `run_YYYYMMDD_HHMMSS_SSS` from the current UTC time.
    pub fn generate_run_id() -> String {
        chrono::Utc::now().format("run_%Y%m%d_%H%M%S_%3f").to_string()
    }

    /// Store a finished backtest and every graded bet in one transaction.
    /// Returns the new run id.
    pub fn record_run(
        &self,
        season: u16,
        weeks: RangeInclusive<u8>,
        stake: f64,
        report: &BacktestReport,
    ) -> Result<String> {
        let run_id = Self::generate_run_id();
        let report_json =
            serde_json::to_string(report).context("failed to serialize backtest report")?;

        let mut conn = self.conn();
        let tx = conn
            .transaction()
            .context("failed to begin ledger transaction")?;

        tx.execute(
            "INSERT INTO runs
                (run_id, season, from_week, to_week, stake, games_analyzed, games_skipped,
                 total_bets, wins, losses, pushes, total_units, roi, report_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                run_id,
                season,
                weeks.start(),
                weeks.end(),
                stake,
                report.games_analyzed,
                report.games_skipped,
                report.total_bets(),
                report.wins(),
                report.losses(),
                report.overall.pushes,
                report.total_units(),
                report.roi(stake),
                report_json,
            ],
        )
        .context("failed to insert run")?;

        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO bets
                        (run_id, seq, season, week, game, market, selection, bet_text,
                         odds, edge, outcome, units)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                )
                .context("failed to prepare bet insert")?;
            for (seq, result) in report.detailed_results.iter().enumerate() {
                stmt.execute(params![
                    run_id,
                    seq as u32,
                    result.season,
                    result.week,
                    result.game,
                    result.bet.market.label(),
                    result.bet.selection.label(),
                    result.bet.text,
                    result.bet.odds,
                    result.bet.edge,
                    result.outcome.label(),
                    result.units,
                ])
                .with_context(|| format!("failed to insert bet {}", result.bet.text))?;
            }
        }

        tx.commit().context("failed to commit backtest run")?;
        Ok(run_id)
    }

    /// Most recent runs first.
    pub fn recent_runs(&self, limit: usize) -> Result<Vec<RunRow>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT run_id, created_at, season, from_week, to_week, games_analyzed,
                        games_skipped, total_bets, wins, losses, pushes, total_units, roi
                 FROM runs ORDER BY created_at DESC, run_id DESC LIMIT ?1",
            )
            .context("failed to prepare recent_runs query")?;

        let runs = stmt
            .query_map(params![limit as i64], |row| {
                Ok(RunRow {
                    run_id: row.get(0)?,
                    created_at: row.get(1)?,
                    season: row.get(2)?,
                    from_week: row.get(3)?,
                    to_week: row.get(4)?,
                    games_analyzed: row.get(5)?,
                    games_skipped: row.get(6)?,
                    total_bets: row.get(7)?,
                    wins: row.get(8)?,
                    losses: row.get(9)?,
                    pushes: row.get(10)?,
                    total_units: row.get(11)?,
                    roi: row.get(12)?,
                })
            })
            .context("failed to query runs")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map run rows")?;

        Ok(runs)
    }

    /// Bets recorded for `run_id`, in grading order.
    pub fn bets_for_run(&self, run_id: &str) -> Result<Vec<StoredBet>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT seq, season, week, game, market, selection, bet_text, odds, edge,
                        outcome, units
                 FROM bets WHERE run_id = ?1 ORDER BY seq",
            )
            .context("failed to prepare bets_for_run query")?;

        let bets = stmt
            .query_map(params![run_id], |row| {
                Ok(StoredBet {
                    seq: row.get(0)?,
                    season: row.get(1)?,
                    week: row.get(2)?,
                    game: row.get(3)?,
                    market: row.get(4)?,
                    selection: row.get(5)?,
                    bet_text: row.get(6)?,
                    odds: row.get(7)?,
                    edge: row.get(8)?,
                    outcome: row.get(9)?,
                    units: row.get(10)?,
                })
            })
            .context("failed to query bets")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map bet rows")?;

        Ok(bets)
    }

    /// Full JSON report stored with `run_id`, if the run exists.
    pub fn load_report(&self, run_id: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT report_json FROM runs WHERE run_id = ?1")
            .context("failed to prepare load_report query")?;

        let mut rows = stmt
            .query_map(params![run_id], |row| row.get::<_, String>(0))
            .context("failed to query run report")?;

        match rows.next() {
            Some(row_result) => {
                let json_str = row_result.context("failed to read report row")?;
                let value = serde_json::from_str(&json_str)
                    .context("failed to deserialize stored report")?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Delete a run and its bets. Returns whether the run existed.
    pub fn delete_run(&self, run_id: &str) -> Result<bool> {
        let conn = self.conn();
        let deleted = conn
            .execute("DELETE FROM runs WHERE run_id = ?1", params![run_id])
            .context("failed to delete run")?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridedge_core::config::ModelConfig;
    use gridedge_core::game::{BettingLines, Game};
    use gridedge_core::team::{TeamStats, TeamStatsBook};
    use gridedge_football::run_backtest;

    fn test_ledger() -> Ledger {
        Ledger::open(":memory:").expect("in-memory ledger should open")
    }

    fn sample_report() -> BacktestReport {
        let book = TeamStatsBook::from_rows(vec![
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
        ]);
        let mut games = Vec::new();
        for (week, home, away) in [(1, 14, 31), (2, 24, 20), (3, 20, 20)] {
            let mut g = Game::new(2024, week, "DEN", "DET");
            g.is_completed = true;
            g.home_score = Some(home);
            g.away_score = Some(away);
            g.lines = BettingLines {
                home_moneyline: Some(-200),
                away_moneyline: Some(240),
                ..Default::default()
            };
            games.push(g);
        }
        run_backtest(&games, &book, &ModelConfig::default(), 1.0)
    }

    #[test]
    fn open_creates_tables() {
        let ledger = test_ledger();
        let conn = ledger.conn();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(tables, vec!["bets", "runs"]);
    }

    #[test]
    fn record_and_list_runs() {
        let ledger = test_ledger();
        let report = sample_report();
        let run_id = ledger.record_run(2024, 1..=3, 1.0, &report).unwrap();
        assert!(run_id.starts_with("run_"));

        let runs = ledger.recent_runs(10).unwrap();
        assert_eq!(runs.len(), 1);
        let run = &runs[0];
        assert_eq!(run.run_id, run_id);
        assert_eq!((run.from_week, run.to_week), (1, 3));
        assert_eq!(run.games_analyzed, 3);
        assert_eq!(run.wins, 1);
        assert_eq!(run.losses, 1);
        assert_eq!(run.pushes, 1);
        assert_eq!(run.total_bets, 2);
        assert!((run.total_units - 1.4).abs() < 1e-9);
    }

    #[test]
    fn bets_are_stored_in_order() {
        let ledger = test_ledger();
        let report = sample_report();
        let run_id = ledger.record_run(2024, 1..=3, 1.0, &report).unwrap();

        let bets = ledger.bets_for_run(&run_id).unwrap();
        assert_eq!(bets.len(), report.detailed_results.len());
        let outcomes: Vec<&str> = bets.iter().map(|b| b.outcome.as_str()).collect();
        assert_eq!(outcomes, vec!["WIN", "LOSS", "PUSH"]);
        assert_eq!(bets[0].market, "moneyline");
        assert_eq!(bets[0].selection, "away");
        assert_eq!(bets[0].bet_text, "DET ML +240");
    }

    #[test]
    fn stored_report_round_trips_as_json() {
        let ledger = test_ledger();
        let run_id = ledger.record_run(2024, 1..=3, 1.0, &sample_report()).unwrap();
        let json = ledger.load_report(&run_id).unwrap().unwrap();
        assert_eq!(json["games_analyzed"], 3);
        assert!(ledger.load_report("run_missing").unwrap().is_none());
    }

    #[test]
    fn delete_cascades_to_bets() {
        let ledger = test_ledger();
        let run_id = ledger.record_run(2024, 1..=3, 1.0, &sample_report()).unwrap();
        assert!(ledger.delete_run(&run_id).unwrap());
        assert!(ledger.bets_for_run(&run_id).unwrap().is_empty());
        assert!(!ledger.delete_run(&run_id).unwrap());
    }

    #[test]
    fn recent_runs_respects_limit() {
        let ledger = test_ledger();
        let report = sample_report();
        for _ in 0..3 {
            ledger.record_run(2024, 1..=3, 1.0, &report).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
        assert_eq!(ledger.recent_runs(2).unwrap().len(), 2);
    }
}
