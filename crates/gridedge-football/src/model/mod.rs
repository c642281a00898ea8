// Scoring model: Poisson score table, team-strength adjustment, market
// reducers, and the stat-based power rating.

pub mod markets;
pub mod poisson;
pub mod rating;
pub mod strength;
