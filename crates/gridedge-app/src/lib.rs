// gridedge application layer: CLI parsing, command handlers, text rendering,
// and the backtest ledger.

pub mod cli;
pub mod commands;
pub mod ledger;
pub mod render;
