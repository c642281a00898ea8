// Market reducers over the joint score table, plus the situational
// multipliers layered on top of each raw partition.
//
// Context multipliers are applied without renormalizing, so adjusted
// probabilities need not sum to one.

use crate::model::poisson::ScoreTable;
use gridedge_core::game::{GameContext, Side};
use serde::Serialize;

/// Half-point band around a line inside which a result is a push.
pub const PUSH_BAND: f64 = 0.5;

// ---------------------------------------------------------------------------
// Moneyline
// ---------------------------------------------------------------------------

const MOTIVATION_FACTOR: f64 = 1.08;
const PRIME_TIME_HOME_FACTOR: f64 = 0.96;
const PRIME_TIME_AWAY_FACTOR: f64 = 1.02;
const COACHING_FACTOR: f64 = 1.05;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoneylineProbabilities {
    pub home_win: f64,
    pub away_win: f64,
    pub tie: f64,
}

impl MoneylineProbabilities {
    pub fn win(&self, side: Side) -> f64 {
        match side {
            Side::Home => self.home_win,
            Side::Away => self.away_win,
        }
    }

    fn scale(&mut self, side: Side, factor: f64) {
        match side {
            Side::Home => self.home_win *= factor,
            Side::Away => self.away_win *= factor,
        }
    }

    /// Motivation, prime-time, and coaching adjustments.
    pub fn with_context(mut self, ctx: &GameContext) -> Self {
        if let Some(side) = ctx.motivation {
            self.scale(side, MOTIVATION_FACTOR);
        }
        if ctx.is_prime_time {
            self.home_win *= PRIME_TIME_HOME_FACTOR;
            self.away_win *= PRIME_TIME_AWAY_FACTOR;
        }
        if let Some(side) = ctx.coaching_edge {
            self.scale(side, COACHING_FACTOR);
        }
        self
    }
}

/// Partition the table by winner. Only exactly equal scores are ties.
pub fn moneyline_probabilities(table: &ScoreTable) -> MoneylineProbabilities {
    let mut probs = MoneylineProbabilities {
        home_win: 0.0,
        away_win: 0.0,
        tie: 0.0,
    };
    for (home, away, p) in table.iter() {
        match home.cmp(&away) {
            std::cmp::Ordering::Greater => probs.home_win += p,
            std::cmp::Ordering::Less => probs.away_win += p,
            std::cmp::Ordering::Equal => probs.tie += p,
        }
    }
    probs
}

// ---------------------------------------------------------------------------
// Spread
// ---------------------------------------------------------------------------

const DIVISION_FAVORITE_FACTOR: f64 = 0.95;
const PLAYOFF_IMPLICATIONS_FACTOR: f64 = 1.05;
const REST_ADVANTAGE_FACTOR: f64 = 1.08;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpreadProbabilities {
    /// Home-perspective line the partition was computed against.
    pub spread: f64,
    pub home_cover: f64,
    pub away_cover: f64,
    pub push: f64,
}

impl SpreadProbabilities {
    pub fn cover(&self, side: Side) -> f64 {
        match side {
            Side::Home => self.home_cover,
            Side::Away => self.away_cover,
        }
    }

    fn scale(&mut self, side: Side, factor: f64) {
        match side {
            Side::Home => self.home_cover *= factor,
            Side::Away => self.away_cover *= factor,
        }
    }

    /// Division, playoff-implication, and rest adjustments.
    pub fn with_context(mut self, ctx: &GameContext) -> Self {
        if ctx.is_division_game {
            let favorite = if self.spread < 0.0 {
                Some(Side::Home)
            } else if self.spread > 0.0 {
                Some(Side::Away)
            } else {
                None
            };
            if let Some(side) = favorite {
                self.scale(side, DIVISION_FAVORITE_FACTOR);
            }
        }
        if ctx.playoff_implications {
            self.home_cover *= PLAYOFF_IMPLICATIONS_FACTOR;
            self.away_cover *= PLAYOFF_IMPLICATIONS_FACTOR;
        }
        if let Some(side) = ctx.rest_advantage {
            self.scale(side, REST_ADVANTAGE_FACTOR);
        }
        self
    }
}

/// Partition the table by cover against a home-perspective `spread`.
pub fn spread_probabilities(table: &ScoreTable, spread: f64) -> SpreadProbabilities {
    let mut probs = SpreadProbabilities {
        spread,
        home_cover: 0.0,
        away_cover: 0.0,
        push: 0.0,
    };
    for (home, away, p) in table.iter() {
        let adjusted_margin = home as f64 - away as f64 + spread;
        if adjusted_margin > PUSH_BAND {
            probs.home_cover += p;
        } else if adjusted_margin < -PUSH_BAND {
            probs.away_cover += p;
        } else {
            probs.push += p;
        }
    }
    probs
}

// ---------------------------------------------------------------------------
// Total
// ---------------------------------------------------------------------------

const SEVERE_WEATHER_UNDER_FACTOR: f64 = 1.15;
const SEVERE_WEATHER_OVER_FACTOR: f64 = 0.90;
const FAST_PACE: f64 = 1.1;
const SLOW_PACE: f64 = 0.9;
const PACE_BOOST: f64 = 1.10;
const PACE_DAMP: f64 = 0.95;
const STRONG_DEFENSE: f64 = 1.2;
const STRONG_DEFENSE_UNDER_FACTOR: f64 = 1.12;
const STRONG_DEFENSE_OVER_FACTOR: f64 = 0.92;

/// Over and under each carry half of the push mass; `push` repeats that mass
/// on its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TotalProbabilities {
    pub total: f64,
    pub over: f64,
    pub under: f64,
    pub push: f64,
}

impl TotalProbabilities {
    pub fn direction(&self, over: bool) -> f64 {
        if over {
            self.over
        } else {
            self.under
        }
    }

    /// Weather, pace, and defensive-strength adjustments. `pace` is the
    /// matchup's combined pace factor when known.
    pub fn with_context(mut self, ctx: &GameContext, pace: Option<f64>) -> Self {
        if ctx.has_severe_weather() {
            self.under *= SEVERE_WEATHER_UNDER_FACTOR;
            self.over *= SEVERE_WEATHER_OVER_FACTOR;
        }
        match pace {
            Some(p) if p > FAST_PACE => {
                self.over *= PACE_BOOST;
                self.under *= PACE_DAMP;
            }
            Some(p) if p < SLOW_PACE => {
                self.under *= PACE_BOOST;
                self.over *= PACE_DAMP;
            }
            _ => {}
        }
        if ctx.defensive_strength.is_some_and(|d| d > STRONG_DEFENSE) {
            self.under *= STRONG_DEFENSE_UNDER_FACTOR;
            self.over *= STRONG_DEFENSE_OVER_FACTOR;
        }
        self
    }
}

/// Partition the table by combined score against `total`.
pub fn total_probabilities(table: &ScoreTable, total: f64) -> TotalProbabilities {
    let (mut over, mut under, mut push) = (0.0, 0.0, 0.0);
    for (home, away, p) in table.iter() {
        let game_total = (home + away) as f64;
        if game_total > total + PUSH_BAND {
            over += p;
        } else if game_total < total - PUSH_BAND {
            under += p;
        } else {
            push += p;
        }
    }
    TotalProbabilities {
        total,
        over: over + push / 2.0,
        under: under + push / 2.0,
        push,
    }
}

/// Mean of the two teams' pace factors, or whichever one is known.
pub fn matchup_pace(home: Option<f64>, away: Option<f64>) -> Option<f64> {
    match (home, away) {
        (Some(h), Some(a)) => Some((h + a) / 2.0),
        (Some(p), None) | (None, Some(p)) => Some(p),
        (None, None) => None,
    }
}
