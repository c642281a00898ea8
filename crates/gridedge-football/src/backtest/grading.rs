// Settling flagged bets against final scores.

use crate::edge::{EdgeBet, Market, Selection};
use gridedge_core::game::{Game, Side, STANDARD_JUICE};
use gridedge_core::odds::calculate_units;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Push,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Win => "WIN",
            Outcome::Loss => "LOSS",
            Outcome::Push => "PUSH",
        }
    }

    fn from_bool(won: bool) -> Self {
        if won {
            Outcome::Win
        } else {
            Outcome::Loss
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Grade `bet` against the final score of `game`. `None` while the game is
/// unfinished or the bet is malformed for its market.
///
/// A tied game pushes a moneyline bet. A spread or total that lands exactly
/// on the line pushes.
pub fn grade(bet: &EdgeBet, game: &Game) -> Option<Outcome> {
    let (home, away) = game.final_score()?;
    let margin = home as f64 - away as f64;

    match bet.market {
        Market::Moneyline => {
            let side = bet.selection.side()?;
            let outcome = match game.winner()? {
                None => Outcome::Push,
                Some(winner) => Outcome::from_bool(winner == side),
            };
            Some(outcome)
        }
        Market::Spread => {
            let side = bet.selection.side()?;
            let spread = game.lines.spread?;
            let covered = margin + spread;
            let outcome = match covered.partial_cmp(&0.0)? {
                Ordering::Equal => Outcome::Push,
                Ordering::Greater => Outcome::from_bool(side == Side::Home),
                Ordering::Less => Outcome::from_bool(side == Side::Away),
            };
            Some(outcome)
        }
        Market::Total => {
            let line = bet.line?;
            let total = (home + away) as f64;
            let outcome = match (total.partial_cmp(&line)?, bet.selection) {
                (Ordering::Equal, _) => Outcome::Push,
                (Ordering::Greater, Selection::Over) | (Ordering::Less, Selection::Under) => {
                    Outcome::Win
                }
                (_, Selection::Over) | (_, Selection::Under) => Outcome::Loss,
                (_, Selection::Home) | (_, Selection::Away) => return None,
            };
            Some(outcome)
        }
    }
}

/// Units won or lost. Moneyline bets settle at their price; spread and total
/// bets at standard juice. Pushes return the stake.
pub fn settle_units(bet: &EdgeBet, outcome: Outcome, stake: f64) -> f64 {
    let odds = match bet.market {
        Market::Moneyline => bet.odds,
        Market::Spread | Market::Total => STANDARD_JUICE,
    };
    match outcome {
        Outcome::Push => 0.0,
        Outcome::Win => calculate_units(odds, true, stake),
        Outcome::Loss => calculate_units(odds, false, stake),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridedge_core::game::BettingLines;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn final_game(home: u32, away: u32, lines: BettingLines) -> Game {
        let mut game = Game::new(2024, 10, "SF", "SEA");
        game.is_completed = true;
        game.home_score = Some(home);
        game.away_score = Some(away);
        game.lines = lines;
        game
    }

    fn bet(market: Market, selection: Selection, line: Option<f64>, odds: i32) -> EdgeBet {
        EdgeBet {
            market,
            selection,
            team: None,
            line,
            odds,
            model_probability: 0.5,
            implied_probability: 50.0,
            base_edge: 0.0,
            edge: 0.0,
            patterns: Vec::new(),
            expected_value: 0.0,
            text: String::new(),
        }
    }

    #[test]
    fn moneyline_grading() {
        let game = final_game(24, 20, BettingLines::default());
        let home = bet(Market::Moneyline, Selection::Home, None, -130);
        let away = bet(Market::Moneyline, Selection::Away, None, 110);
        assert_eq!(grade(&home, &game), Some(Outcome::Win));
        assert_eq!(grade(&away, &game), Some(Outcome::Loss));
    }

    #[test]
    fn tied_game_pushes_moneyline() {
        let game = final_game(20, 20, BettingLines::default());
        let away = bet(Market::Moneyline, Selection::Away, None, 180);
        assert_eq!(grade(&away, &game), Some(Outcome::Push));
        assert_eq!(settle_units(&away, Outcome::Push, 1.0), 0.0);
    }

    #[test]
    fn unfinished_game_is_ungraded() {
        let mut game = final_game(20, 17, BettingLines::default());
        game.is_completed = false;
        let home = bet(Market::Moneyline, Selection::Home, None, -130);
        assert_eq!(grade(&home, &game), None);
    }

    #[test]
    fn spread_grading_from_home_perspective() {
        let lines = BettingLines {
            spread: Some(-3.5),
            ..Default::default()
        };
        let home = bet(Market::Spread, Selection::Home, Some(-3.5), STANDARD_JUICE);
        let away = bet(Market::Spread, Selection::Away, Some(3.5), STANDARD_JUICE);

        let covered = final_game(27, 20, lines.clone());
        assert_eq!(grade(&home, &covered), Some(Outcome::Win));
        assert_eq!(grade(&away, &covered), Some(Outcome::Loss));

        let missed = final_game(23, 20, lines);
        assert_eq!(grade(&home, &missed), Some(Outcome::Loss));
        assert_eq!(grade(&away, &missed), Some(Outcome::Win));
    }

    #[test]
    fn spread_landing_on_the_line_pushes() {
        let lines = BettingLines {
            spread: Some(3.0),
            ..Default::default()
        };
        let game = final_game(17, 20, lines);
        let home = bet(Market::Spread, Selection::Home, Some(3.0), STANDARD_JUICE);
        assert_eq!(grade(&home, &game), Some(Outcome::Push));
    }

    #[test]
    fn total_grading() {
        let game = final_game(30, 21, BettingLines::default());
        let over = bet(Market::Total, Selection::Over, Some(47.5), STANDARD_JUICE);
        let under = bet(Market::Total, Selection::Under, Some(47.5), STANDARD_JUICE);
        assert_eq!(grade(&over, &game), Some(Outcome::Win));
        assert_eq!(grade(&under, &game), Some(Outcome::Loss));

        let on_line = bet(Market::Total, Selection::Under, Some(51.0), STANDARD_JUICE);
        assert_eq!(grade(&on_line, &game), Some(Outcome::Push));
    }

    #[test]
    fn units_follow_the_market() {
        let ml = bet(Market::Moneyline, Selection::Away, None, 150);
        assert!(approx_eq(settle_units(&ml, Outcome::Win, 1.0), 1.5, 1e-12));
        assert!(approx_eq(settle_units(&ml, Outcome::Loss, 1.0), -1.0, 1e-12));

        let fav = bet(Market::Moneyline, Selection::Home, None, -150);
        assert!(approx_eq(settle_units(&fav, Outcome::Win, 1.0), 0.6667, 1e-4));

        let spread = bet(Market::Spread, Selection::Home, Some(-3.5), 120);
        assert!(approx_eq(settle_units(&spread, Outcome::Win, 2.0), 2.0 * 100.0 / 110.0, 1e-12));
    }
}
