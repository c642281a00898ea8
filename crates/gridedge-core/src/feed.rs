// Schedule, odds, and stats collaborator. The model never fetches data
// itself; the presentation layer materializes games through a `GameFeed`.

use crate::config::DataPaths;
use crate::data::{self, DataError};
use crate::game::Game;
use crate::team::TeamStatsBook;
use std::path::Path;
use tracing::info;

/// Source of games, with embedded lines and, once final, scores.
pub trait GameFeed {
    fn games_for_week(&self, season: u16, week: u8) -> Result<Vec<Game>, DataError>;
}

/// A feed backed by local data files, fully loaded into memory.
#[derive(Debug, Clone, Default)]
pub struct FileFeed {
    games: Vec<Game>,
    stats: TeamStatsBook,
}

impl FileFeed {
    pub fn new(games: Vec<Game>, stats: TeamStatsBook) -> Self {
        FileFeed { games, stats }
    }

    /// Load games and team stats from the configured paths.
    pub fn load(paths: &DataPaths) -> Result<Self, DataError> {
        let games = data::load_games(Path::new(&paths.games))?;
        let stats = data::load_team_stats(Path::new(&paths.team_stats))?;
        info!(
            "Loaded {} games and {} team stat rows",
            games.len(),
            stats.len()
        );
        Ok(FileFeed::new(games, stats))
    }

    pub fn stats(&self) -> &TeamStatsBook {
        &self.stats
    }

    /// Weeks with at least one game in `season`, ascending.
    pub fn weeks(&self, season: u16) -> Vec<u8> {
        let mut weeks: Vec<u8> = self
            .games
            .iter()
            .filter(|g| g.season == season)
            .map(|g| g.week)
            .collect();
        weeks.sort_unstable();
        weeks.dedup();
        weeks
    }

    /// Completed games of `season` whose week falls in `weeks`, in schedule
    /// order.
    pub fn completed_games(&self, season: u16, weeks: std::ops::RangeInclusive<u8>) -> Vec<Game> {
        let mut games: Vec<Game> = self
            .games
            .iter()
            .filter(|g| g.season == season && weeks.contains(&g.week) && g.final_score().is_some())
            .cloned()
            .collect();
        games.sort_by(|a, b| (a.week, a.kickoff).cmp(&(b.week, b.kickoff)));
        games
    }
}

impl GameFeed for FileFeed {
    fn games_for_week(&self, season: u16, week: u8) -> Result<Vec<Game>, DataError> {
        Ok(self
            .games
            .iter()
            .filter(|g| g.season == season && g.week == week)
            .cloned()
            .collect())
    }
}
