// American odds arithmetic: implied probability, payouts, and display.

/// Implied win probability, in percent, encoded by American odds.
///
/// Zero odds (a missing or unparseable quote) map to an even 50%, which keeps
/// a bad quote from manufacturing an edge.
pub fn implied_probability(odds: i32) -> f64 {
    if odds == 0 {
        return 50.0;
    }
    let odds = odds as f64;
    if odds > 0.0 {
        100.0 / (odds + 100.0) * 100.0
    } else {
        odds.abs() / (odds.abs() + 100.0) * 100.0
    }
}

/// Units won or lost on a settled bet.
///
/// A loss costs the stake. A win pays `odds / 100` per unit on plus money and
/// `100 / |odds|` per unit on minus money. A win at zero odds pays nothing.
pub fn calculate_units(odds: i32, is_win: bool, stake: f64) -> f64 {
    if !is_win {
        return -stake;
    }
    if odds == 0 {
        return 0.0;
    }
    let odds = odds as f64;
    if odds > 0.0 {
        stake * (odds / 100.0)
    } else {
        stake * (100.0 / odds.abs())
    }
}

/// Decimal (European) odds, stake included. Zero maps to even money.
pub fn american_to_decimal(odds: i32) -> f64 {
    if odds == 0 {
        return 2.0;
    }
    1.0 + calculate_units(odds, true, 1.0)
}

/// Expected profit per unit staked when the true win probability is
/// `probability` (0..1).
pub fn expected_value(probability: f64, odds: i32) -> f64 {
    let profit = american_to_decimal(odds) - 1.0;
    probability * profit - (1.0 - probability)
}

/// Bookmaker margin, in percent, of a two-way market.
pub fn vig(odds_a: i32, odds_b: i32) -> f64 {
    implied_probability(odds_a) + implied_probability(odds_b) - 100.0
}

/// `"+150"`, `"-110"`, or `"EVEN"` for a zero quote.
pub fn format_odds(odds: i32) -> String {
    match odds {
        0 => "EVEN".to_string(),
        o if o > 0 => format!("+{o}"),
        o => o.to_string(),
    }
}

/// `"-110 (52.4%)"`.
pub fn format_odds_with_probability(odds: i32) -> String {
    format!("{} ({:.1}%)", format_odds(odds), implied_probability(odds))
}

/// `"+3.5"`, `"-7"`, `"PK"` for a pick'em.
pub fn format_line(line: f64) -> String {
    if line == 0.0 {
        "PK".to_string()
    } else if line > 0.0 {
        format!("+{line}")
    } else {
        format!("{line}")
    }
}
