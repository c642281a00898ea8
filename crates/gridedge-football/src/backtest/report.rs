// Backtest aggregates: overall record, per-market and per-week breakdowns,
// and every graded bet.

use crate::backtest::grading::Outcome;
use crate::edge::{EdgeBet, Market};
use serde::Serialize;
use std::collections::BTreeMap;

/// One graded bet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BetResult {
    pub season: u16,
    pub week: u8,
    /// `"AWAY @ HOME"`.
    pub game: String,
    /// `"AWAY 20 - 24 HOME"`.
    pub final_score: String,
    pub bet: EdgeBet,
    pub outcome: Outcome,
    pub units: f64,
}

/// Running record for one slice of the results.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
    pub pushes: u32,
    pub units: f64,
}

impl Record {
    fn add(&mut self, outcome: Outcome, units: f64) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Push => self.pushes += 1,
        }
        self.units += units;
    }

    /// Graded bets: wins plus losses.
    pub fn bets(&self) -> u32 {
        self.wins + self.losses
    }

    /// Win percentage over graded bets, zero when nothing was graded.
    pub fn win_rate(&self) -> f64 {
        let bets = self.bets();
        if bets == 0 {
            return 0.0;
        }
        self.wins as f64 / bets as f64 * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekSummary {
    pub season: u16,
    pub week: u8,
    /// Games analyzed this week, with or without a pick.
    pub games: u32,
    pub edge_picks: u32,
    pub record: Record,
    pub best_edge: Option<f64>,
    /// Bet text of every pick this week.
    pub picks: Vec<String>,
}

impl WeekSummary {
    fn new(season: u16, week: u8) -> Self {
        WeekSummary {
            season,
            week,
            games: 0,
            edge_picks: 0,
            record: Record::default(),
            best_edge: None,
            picks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BacktestReport {
    pub games_analyzed: u32,
    pub games_skipped: u32,
    pub overall: Record,
    pub by_type: BTreeMap<Market, Record>,
    pub weekly: Vec<WeekSummary>,
    pub detailed_results: Vec<BetResult>,
}

impl BacktestReport {
    /// Count an analyzed game, so weeks without picks still show up.
    pub(crate) fn record_game(&mut self, season: u16, week: u8) {
        self.games_analyzed += 1;
        self.week_mut(season, week).games += 1;
    }

    pub(crate) fn record_skip(&mut self) {
        self.games_skipped += 1;
    }

    pub(crate) fn record_bet(&mut self, result: BetResult) {
        self.overall.add(result.outcome, result.units);
        self.by_type
            .entry(result.bet.market)
            .or_default()
            .add(result.outcome, result.units);

        let week = self.week_mut(result.season, result.week);
        week.edge_picks += 1;
        week.record.add(result.outcome, result.units);
        week.best_edge = Some(match week.best_edge {
            Some(best) => best.max(result.bet.edge),
            None => result.bet.edge,
        });
        week.picks.push(result.bet.text.clone());

        self.detailed_results.push(result);
    }

    fn week_mut(&mut self, season: u16, week: u8) -> &mut WeekSummary {
        let pos = match self
            .weekly
            .binary_search_by(|w| (w.season, w.week).cmp(&(season, week)))
        {
            Ok(pos) => pos,
            Err(pos) => {
                self.weekly.insert(pos, WeekSummary::new(season, week));
                pos
            }
        };
        &mut self.weekly[pos]
    }

    /// Graded bets (wins plus losses; pushes excluded).
    pub fn total_bets(&self) -> u32 {
        self.overall.bets()
    }

    pub fn wins(&self) -> u32 {
        self.overall.wins
    }

    pub fn losses(&self) -> u32 {
        self.overall.losses
    }

    pub fn total_units(&self) -> f64 {
        self.overall.units
    }

    pub fn win_rate(&self) -> f64 {
        self.overall.win_rate()
    }

    /// Return on units risked, in percent.
    pub fn roi(&self, stake: f64) -> f64 {
        let risked = self.total_bets() as f64 * stake;
        if risked <= 0.0 {
            return 0.0;
        }
        self.total_units() / risked * 100.0
    }

    /// The `n` highest-edge results, highest first. Ties keep report order.
    ///
    /// Total bets rank by their point gap alongside the probability edges
    /// of the other markets; see [`EdgeBet::edge`].
    pub fn top_picks(&self, n: usize) -> Vec<&BetResult> {
        let mut picks: Vec<&BetResult> = self.detailed_results.iter().collect();
        picks.sort_by(|a, b| b.bet.edge.total_cmp(&a.bet.edge));
        picks.truncate(n);
        picks
    }
}
