// Football betting model: score distributions, team strength, market
// probabilities, edge detection, and backtesting.

pub mod analysis;
pub mod backtest;
pub mod edge;
pub mod model;

pub use analysis::{analyze_game, evaluate_game, AnalysisError, GameAnalysis, GameEvaluation};
pub use backtest::{run_backtest, BacktestReport};
pub use edge::{detect_edge_bets, EdgeBet, Market, Selection};
