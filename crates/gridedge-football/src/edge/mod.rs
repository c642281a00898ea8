// Edge detection: compares model probabilities with sportsbook prices and
// emits the bets worth flagging.

pub mod detector;
pub mod patterns;

pub use detector::detect_edge_bets;
pub use patterns::Pattern;

use gridedge_core::game::Side;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Market {
    Moneyline,
    Spread,
    Total,
}

impl Market {
    pub const ALL: [Market; 3] = [Market::Moneyline, Market::Spread, Market::Total];

    pub fn label(&self) -> &'static str {
        match self {
            Market::Moneyline => "moneyline",
            Market::Spread => "spread",
            Market::Total => "total",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a bet is on: a team (moneyline and spread) or a total direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    Home,
    Away,
    Over,
    Under,
}

impl Selection {
    pub fn team(side: Side) -> Self {
        match side {
            Side::Home => Selection::Home,
            Side::Away => Selection::Away,
        }
    }

    pub fn side(&self) -> Option<Side> {
        match self {
            Selection::Home => Some(Side::Home),
            Selection::Away => Some(Side::Away),
            Selection::Over | Selection::Under => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Selection::Home => "home",
            Selection::Away => "away",
            Selection::Over => "over",
            Selection::Under => "under",
        }
    }
}

/// A flagged bet.
///
/// For moneyline and spread bets `edge` and `base_edge` are percentage
/// points of probability; for totals both hold the gap in points between the
/// predicted and listed total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeBet {
    pub market: Market,
    pub selection: Selection,
    /// Team abbreviation for moneyline and spread bets.
    pub team: Option<String>,
    /// Point line from the selection's perspective, or the listed total.
    pub line: Option<f64>,
    pub odds: i32,
    /// Model probability (0..1) of the selection winning.
    pub model_probability: f64,
    /// Implied probability in percent.
    pub implied_probability: f64,
    /// Edge before pattern bonuses, in the same unit as `edge`.
    pub base_edge: f64,
    /// Percentage points of probability for moneyline and spread bets;
    /// points between predicted and listed total for total bets. Compare
    /// edges across markets with that in mind.
    pub edge: f64,
    pub patterns: Vec<Pattern>,
    /// Expected profit per unit staked at the quoted price.
    pub expected_value: f64,
    pub text: String,
}

impl EdgeBet {
    pub fn pattern_matched(&self) -> bool {
        !self.patterns.is_empty()
    }
}
