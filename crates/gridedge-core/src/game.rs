// Scheduled and completed games, the sportsbook lines quoted on them, and the
// situational context that feeds the scoring model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Price substituted for a malformed moneyline quote.
pub const DEFAULT_MONEYLINE: i32 = -110;

/// Total substituted for a malformed over/under quote.
pub const DEFAULT_TOTAL: f64 = 45.0;

/// Price at which spread and total bets are quoted and settled.
pub const STANDARD_JUICE: i32 = -110;

// ---------------------------------------------------------------------------
// Sides
// ---------------------------------------------------------------------------

/// One of the two teams in a matchup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Side::Home => "home",
            Side::Away => "away",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Betting lines
// ---------------------------------------------------------------------------

/// Sportsbook quotes for a single game.
///
/// The spread is quoted from the home team's perspective: `-3.5` means the
/// home team is favored by three and a half points. A `None` market was not
/// offered (or could not be parsed) and is skipped by the edge detector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BettingLines {
    pub home_moneyline: Option<i32>,
    pub away_moneyline: Option<i32>,
    pub spread: Option<f64>,
    pub total: Option<f64>,
}

impl BettingLines {
    pub fn moneyline(&self, side: Side) -> Option<i32> {
        match side {
            Side::Home => self.home_moneyline,
            Side::Away => self.away_moneyline,
        }
    }

    /// Both sides of the moneyline market are quoted.
    pub fn has_moneylines(&self) -> bool {
        self.home_moneyline.is_some() && self.away_moneyline.is_some()
    }

    /// Point line for `side`: the home line is the quoted spread, the away
    /// line is its negation.
    pub fn spread_for(&self, side: Side) -> Option<f64> {
        self.spread.map(|s| match side {
            Side::Home => s,
            Side::Away => -s,
        })
    }

    /// The side getting points on the spread, or `None` for a pick'em.
    pub fn spread_underdog(&self) -> Option<Side> {
        match self.spread {
            Some(s) if s > 0.0 => Some(Side::Home),
            Some(s) if s < 0.0 => Some(Side::Away),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Situational context
// ---------------------------------------------------------------------------

/// Game-time weather. Missing readings never trigger an adjustment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weather {
    /// Degrees Fahrenheit.
    pub temperature: Option<f64>,
    /// Miles per hour.
    pub wind_speed: Option<f64>,
    pub precipitation: bool,
}

impl Weather {
    pub fn is_freezing(&self) -> bool {
        self.temperature.is_some_and(|t| t < 32.0)
    }

    pub fn wind_above(&self, mph: f64) -> bool {
        self.wind_speed.is_some_and(|w| w > mph)
    }

    /// Freezing, wind above 20 mph, or precipitation.
    pub fn is_severe(&self) -> bool {
        self.is_freezing() || self.wind_above(20.0) || self.precipitation
    }
}

/// Points scored in one recent game, plus whether the team covered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentGame {
    pub points_scored: f64,
    #[serde(default)]
    pub covered: Option<bool>,
}

/// Injury classes the strength adjuster distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InjuryClass {
    Quarterback,
    /// Running backs and wide receivers.
    SkillPosition,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Injury {
    pub position: String,
    #[serde(default)]
    pub player: Option<String>,
}

impl Injury {
    pub fn new(position: &str) -> Self {
        Injury {
            position: position.to_string(),
            player: None,
        }
    }

    /// Classify by position. Depth-chart suffixes such as "WR1" are accepted.
    pub fn class(&self) -> InjuryClass {
        let pos = self.position.trim().to_uppercase();
        let base = pos.trim_end_matches(|c: char| c.is_ascii_digit());
        match base {
            "QB" => InjuryClass::Quarterback,
            "RB" | "WR" => InjuryClass::SkillPosition,
            _ => InjuryClass::Other,
        }
    }
}

/// Situational modifiers for one game. Built per analysis; all fields are
/// optional and default to "no adjustment".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameContext {
    pub is_division_game: bool,
    pub is_prime_time: bool,
    pub is_revenge: bool,
    pub is_playoffs: bool,
    pub playoff_implications: bool,
    pub weather: Option<Weather>,
    pub home_recent_form: Vec<RecentGame>,
    pub away_recent_form: Vec<RecentGame>,
    pub home_injuries: Vec<Injury>,
    pub away_injuries: Vec<Injury>,
    /// Overrides the configured score-distribution variance multiplier.
    pub variance: Option<f64>,
    /// Combined defensive strength of the matchup (1.0 = league average).
    pub defensive_strength: Option<f64>,
    pub motivation: Option<Side>,
    pub coaching_edge: Option<Side>,
    pub rest_advantage: Option<Side>,
}

impl GameContext {
    pub fn recent_form(&self, side: Side) -> &[RecentGame] {
        match side {
            Side::Home => &self.home_recent_form,
            Side::Away => &self.away_recent_form,
        }
    }

    pub fn injuries(&self, side: Side) -> &[Injury] {
        match side {
            Side::Home => &self.home_injuries,
            Side::Away => &self.away_injuries,
        }
    }

    pub fn has_severe_weather(&self) -> bool {
        self.weather.is_some_and(|w| w.is_severe())
    }
}

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

/// A scheduled or completed matchup. Scores stay `None` until the game is
/// final; the model only ever reads a `Game`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub season: u16,
    pub week: u8,
    #[serde(default)]
    pub kickoff: Option<NaiveDate>,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub home_score: Option<u32>,
    #[serde(default)]
    pub away_score: Option<u32>,
    #[serde(default)]
    pub lines: BettingLines,
    #[serde(default)]
    pub context: GameContext,
}

impl Game {
    pub fn new(season: u16, week: u8, home_team: &str, away_team: &str) -> Self {
        Game {
            season,
            week,
            kickoff: None,
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            is_completed: false,
            home_score: None,
            away_score: None,
            lines: BettingLines::default(),
            context: GameContext::default(),
        }
    }

    /// `"AWAY @ HOME"`.
    pub fn label(&self) -> String {
        format!("{} @ {}", self.away_team, self.home_team)
    }

    pub fn team(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.home_team,
            Side::Away => &self.away_team,
        }
    }

    /// `(home, away)` final score, present only for completed games.
    pub fn final_score(&self) -> Option<(u32, u32)> {
        if !self.is_completed {
            return None;
        }
        Some((self.home_score?, self.away_score?))
    }

    /// Actual winner of a completed game. `Some(None)` is a tie.
    pub fn winner(&self) -> Option<Option<Side>> {
        let (home, away) = self.final_score()?;
        Some(match home.cmp(&away) {
            std::cmp::Ordering::Greater => Some(Side::Home),
            std::cmp::Ordering::Less => Some(Side::Away),
            std::cmp::Ordering::Equal => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(home: u32, away: u32) -> Game {
        let mut game = Game::new(2024, 15, "GB", "WAS");
        game.is_completed = true;
        game.home_score = Some(home);
        game.away_score = Some(away);
        game
    }

    #[test]
    fn label_is_away_at_home() {
        assert_eq!(Game::new(2024, 1, "KC", "BAL").label(), "BAL @ KC");
    }

    #[test]
    fn final_score_requires_completion() {
        let mut game = completed(24, 17);
        assert_eq!(game.final_score(), Some((24, 17)));
        game.is_completed = false;
        assert_eq!(game.final_score(), None);
    }

    #[test]
    fn final_score_requires_both_scores() {
        let mut game = completed(24, 17);
        game.away_score = None;
        assert_eq!(game.final_score(), None);
    }

    #[test]
    fn winner_handles_ties() {
        assert_eq!(completed(20, 20).winner(), Some(None));
        assert_eq!(completed(21, 20).winner(), Some(Some(Side::Home)));
        assert_eq!(completed(13, 20).winner(), Some(Some(Side::Away)));
    }

    #[test]
    fn spread_underdog_follows_home_perspective() {
        let mut lines = BettingLines {
            spread: Some(-6.5),
            ..Default::default()
        };
        assert_eq!(lines.spread_underdog(), Some(Side::Away));
        assert_eq!(lines.spread_for(Side::Away), Some(6.5));
        lines.spread = Some(3.0);
        assert_eq!(lines.spread_underdog(), Some(Side::Home));
        lines.spread = Some(0.0);
        assert_eq!(lines.spread_underdog(), None);
    }

    #[test]
    fn has_moneylines_requires_both_sides() {
        let mut lines = BettingLines {
            home_moneyline: Some(-150),
            ..Default::default()
        };
        assert!(!lines.has_moneylines());
        lines.away_moneyline = Some(130);
        assert!(lines.has_moneylines());
        assert_eq!(lines.moneyline(Side::Away), Some(130));
    }

    #[test]
    fn injury_classes() {
        assert_eq!(Injury::new("QB").class(), InjuryClass::Quarterback);
        assert_eq!(Injury::new("wr1").class(), InjuryClass::SkillPosition);
        assert_eq!(Injury::new("RB").class(), InjuryClass::SkillPosition);
        assert_eq!(Injury::new("CB1").class(), InjuryClass::Other);
    }

    #[test]
    fn severe_weather_thresholds() {
        let mild = Weather {
            temperature: Some(45.0),
            wind_speed: Some(18.0),
            precipitation: false,
        };
        assert!(!mild.is_severe());
        assert!(mild.wind_above(15.0));

        let windy = Weather {
            wind_speed: Some(22.0),
            ..mild
        };
        assert!(windy.is_severe());

        let cold = Weather {
            temperature: Some(28.0),
            ..mild
        };
        assert!(cold.is_freezing());
        assert!(cold.is_severe());
    }

    #[test]
    fn context_deserializes_from_partial_json() {
        let json = r#"{"is_division_game": true, "weather": {"temperature": 20.0}}"#;
        let ctx: GameContext = serde_json::from_str(json).unwrap();
        assert!(ctx.is_division_game);
        assert!(ctx.has_severe_weather());
        assert!(ctx.home_injuries.is_empty());
        assert_eq!(ctx.variance, None);
    }
}
