//! Closed-form matchup arithmetic.
//!
//! Win probabilities come from a logistic curve over the strength
//! differential plus a home-field constant; spreads, moneylines, and totals
//! are derived from the same differential. Jitter is seeded per matchup so
//! repeated renders of the same game agree.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{GameOdds, League, Prediction};
use crate::synthetic::teams::{self, TeamEntry, DEFAULT_STRENGTH};

/// Home-field advantage, in strength points.
pub const HOME_EDGE: f64 = 2.5;

/// Strength points per point of spread.
const SPREAD_SCALE: f64 = 0.45;

const BOOKMAKERS: &[&str] = &["DraftKings", "FanDuel", "BetMGM", "Caesars"];

/// One side of a matchup, resolved from the strength table or defaulted for
/// teams the table does not know.
#[derive(Debug, Clone)]
pub struct Contender {
    pub name: String,
    pub abbr: String,
    pub strength: f64,
}

impl Contender {
    pub fn lookup(league: League, name: &str) -> Self {
        match teams::find(league, name) {
            Some(entry) => Contender::from_entry(entry),
            None => Contender {
                name: name.to_string(),
                abbr: fallback_abbr(name),
                strength: DEFAULT_STRENGTH,
            },
        }
    }

    pub fn from_entry(entry: &TeamEntry) -> Self {
        Contender {
            name: entry.name.to_string(),
            abbr: entry.abbr.to_string(),
            strength: entry.strength,
        }
    }
}

fn fallback_abbr(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|w| w.chars().next())
        .take(3)
        .collect::<String>()
        .to_uppercase()
}

/// Probability that the home side wins, before jitter.
pub fn win_probability(home_strength: f64, away_strength: f64) -> f64 {
    let diff = home_strength + HOME_EDGE - away_strength;
    1.0 / (1.0 + (-diff / 14.0).exp())
}

/// Full prediction for a matchup using the supplied randomness for jitter.
pub fn predict(home: &Contender, away: &Contender, rng: &mut impl Rng) -> Prediction {
    let diff = home.strength + HOME_EDGE - away.strength;
    let jitter: f64 = rng.gen_range(-0.03..0.03);
    let home_prob = (win_probability(home.strength, away.strength) + jitter).clamp(0.05, 0.95);

    let home_win_pct = round1(home_prob * 100.0);
    let away_win_pct = round1(100.0 - home_win_pct);

    let spread = spread_string(home, away, diff);
    let confidence = round1((50.0 + (home_prob - 0.5).abs() * 90.0 + rng.gen_range(0.0..5.0)).min(95.0));

    let reasoning = if home_prob >= 0.5 {
        format!(
            "{} carry a {:.0}-point strength edge once home field is counted; the number leans {}.",
            home.name,
            diff.abs(),
            spread
        )
    } else {
        format!(
            "{} are the stronger side by {:.0} points even on the road; the number leans {}.",
            away.name,
            diff.abs(),
            spread
        )
    };

    Prediction {
        home_team: home.name.clone(),
        away_team: away.name.clone(),
        home_win_pct,
        away_win_pct,
        spread,
        confidence,
        reasoning,
    }
}

/// Prediction with jitter keyed to the matchup, so the same pairing always
/// renders the same numbers.
pub fn predict_matchup(league: League, home_name: &str, away_name: &str) -> Prediction {
    let mut hasher = DefaultHasher::new();
    (home_name, away_name).hash(&mut hasher);
    let mut rng = StdRng::seed_from_u64(hasher.finish());
    predict(
        &Contender::lookup(league, home_name),
        &Contender::lookup(league, away_name),
        &mut rng,
    )
}

/// Betting line derived from the same strength arithmetic.
pub fn derive_line(
    league: League,
    home: &Contender,
    away: &Contender,
    rng: &mut impl Rng,
) -> GameOdds {
    let diff = home.strength + HOME_EDGE - away.strength;
    let home_prob = win_probability(home.strength, away.strength);
    let total_base = match league {
        League::Nfl => 44.5,
        League::College => 55.5,
    };
    let bookmaker = BOOKMAKERS[rng.gen_range(0..BOOKMAKERS.len())];

    GameOdds {
        home_team: home.name.clone(),
        away_team: away.name.clone(),
        spread: round_half(-diff * SPREAD_SCALE),
        home_moneyline: prob_to_moneyline(home_prob),
        away_moneyline: prob_to_moneyline(1.0 - home_prob),
        total: round_half(total_base + rng.gen_range(-6.0..6.0)),
        bookmaker: bookmaker.to_string(),
    }
}

fn spread_string(home: &Contender, away: &Contender, diff: f64) -> String {
    let points = round_half(diff.abs() * SPREAD_SCALE);
    if points < 0.5 {
        "PK".to_string()
    } else if diff > 0.0 {
        format!("{} -{:.1}", home.abbr, points)
    } else {
        format!("{} -{:.1}", away.abbr, points)
    }
}

/// American-format moneyline from an implied probability.
fn prob_to_moneyline(prob: f64) -> i32 {
    let p = prob.clamp(0.05, 0.95);
    if p >= 0.5 {
        -((p / (1.0 - p)) * 100.0).round() as i32
    } else {
        (((1.0 - p) / p) * 100.0).round() as i32
    }
}

fn round_half(x: f64) -> f64 {
    (x * 2.0).round() / 2.0
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
