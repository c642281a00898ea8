// Independent-Poisson joint score distribution.

use gridedge_core::game::GameContext;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Probability mass function
// ---------------------------------------------------------------------------

/// `ln(k!)`, accumulated term by term.
fn ln_factorial(k: u32) -> f64 {
    let mut acc = 0.0;
    for i in 2..=k {
        acc += (i as f64).ln();
    }
    acc
}

fn pmf_with_ln_factorial(lambda: f64, k: u32, ln_fact: f64) -> f64 {
    if !lambda.is_finite() || lambda < 0.0 {
        return 0.0;
    }
    if lambda == 0.0 {
        return if k == 0 { 1.0 } else { 0.0 };
    }
    ((k as f64) * lambda.ln() - lambda - ln_fact).exp()
}

/// Poisson probability of exactly `k` events at rate `lambda`.
///
/// Evaluated in log space, so large `k` never overflows. A non-finite or
/// negative rate has no mass anywhere.
pub fn poisson_pmf(lambda: f64, k: u32) -> f64 {
    pmf_with_ln_factorial(lambda, k, ln_factorial(k))
}

/// PMF values for `k = 0..=max_k`.
pub fn pmf_series(lambda: f64, max_k: u32) -> Vec<f64> {
    let mut series = Vec::with_capacity(max_k as usize + 1);
    let mut ln_fact = 0.0;
    for k in 0..=max_k {
        if k > 1 {
            ln_fact += (k as f64).ln();
        }
        series.push(pmf_with_ln_factorial(lambda, k, ln_fact));
    }
    series
}

// ---------------------------------------------------------------------------
// Score table
// ---------------------------------------------------------------------------

/// Joint probability of every final score `(home, away)` with both scores in
/// `0..=max_score`.
///
/// The two teams score independently. Mass beyond `max_score` is truncated,
/// so the table sums to slightly less than one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreTable {
    max_score: u32,
    home_lambda: f64,
    away_lambda: f64,
    /// Row-major: `cells[home * (max_score + 1) + away]`.
    cells: Vec<f64>,
}

impl ScoreTable {
    /// Build the table from adjusted scoring rates, widening each by
    /// `1 + variance`.
    pub fn generate(home_rate: f64, away_rate: f64, variance: f64, max_score: u32) -> Self {
        let widen = 1.0 + variance;
        Self::from_lambdas(home_rate * widen, away_rate * widen, max_score)
    }

    /// Build the table from Poisson rates used as-is.
    pub fn from_lambdas(home_lambda: f64, away_lambda: f64, max_score: u32) -> Self {
        let home = pmf_series(home_lambda, max_score);
        let away = pmf_series(away_lambda, max_score);
        let mut cells = Vec::with_capacity(home.len() * away.len());
        for ph in &home {
            for pa in &away {
                cells.push(ph * pa);
            }
        }
        ScoreTable {
            max_score,
            home_lambda,
            away_lambda,
            cells,
        }
    }

    pub fn max_score(&self) -> u32 {
        self.max_score
    }

    pub fn home_lambda(&self) -> f64 {
        self.home_lambda
    }

    pub fn away_lambda(&self) -> f64 {
        self.away_lambda
    }

    /// Probability of the exact score, zero outside the table.
    pub fn probability(&self, home: u32, away: u32) -> f64 {
        if home > self.max_score || away > self.max_score {
            return 0.0;
        }
        let width = self.max_score as usize + 1;
        self.cells[home as usize * width + away as usize]
    }

    /// Every cell as `(home, away, probability)`, home-major.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, f64)> + '_ {
        let width = self.max_score as usize + 1;
        self.cells.iter().enumerate().map(move |(i, p)| {
            ((i / width) as u32, (i % width) as u32, *p)
        })
    }

    pub fn total_mass(&self) -> f64 {
        self.cells.iter().sum()
    }

    /// The single most probable final score.
    pub fn most_likely_score(&self) -> (u32, u32, f64) {
        self.iter()
            .fold((0, 0, f64::MIN), |best, cell| if cell.2 > best.2 { cell } else { best })
    }
}

// ---------------------------------------------------------------------------
// Per-game variance
// ---------------------------------------------------------------------------

pub const MIN_GAME_VARIANCE: f64 = 0.10;
pub const MAX_GAME_VARIANCE: f64 = 0.25;

/// Widening for one game: `base` raised by high wind (+0.03), precipitation
/// (+0.02) and playoff implications (+0.02), lowered for division games
/// (-0.02), then clamped to [0.10, 0.25].
pub fn game_variance(base: f64, ctx: &GameContext) -> f64 {
    let mut variance = base;
    if let Some(weather) = &ctx.weather {
        if weather.wind_above(20.0) {
            variance += 0.03;
        }
        if weather.precipitation {
            variance += 0.02;
        }
    }
    if ctx.is_division_game {
        variance -= 0.02;
    }
    if ctx.playoff_implications {
        variance += 0.02;
    }
    variance.clamp(MIN_GAME_VARIANCE, MAX_GAME_VARIANCE)
}
