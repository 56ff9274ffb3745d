//! Synthetic fallback data.
//!
//! When every remote source fails or is disabled, these generators fabricate
//! a plausible dataset from the static strength tables so the dashboard never
//! renders an empty state. The RNG is injected and seedable, so fallback
//! output is reproducible under test.

pub mod teams;

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::models::{
    DataKind, DataSet, FetchParams, Game, GameOdds, GameStatus, InjuryReport, League, NewsItem,
    TeamRank,
};
use crate::predict::{self, Contender};
use teams::TeamEntry;

const FIRST_NAMES: &[&str] = &[
    "Marcus", "Jalen", "DeAndre", "Tyler", "Chris", "Jordan", "Caleb", "Derrick", "Malik",
    "Trevor", "Isaiah", "Brandon", "Zach", "Aaron", "Devon",
];

const LAST_NAMES: &[&str] = &[
    "Williams", "Johnson", "Brown", "Smith", "Jackson", "Davis", "Harris", "Thompson", "Moore",
    "Robinson", "Carter", "Mitchell", "Turner", "Collins", "Reed",
];

const POSITIONS: &[&str] = &["QB", "RB", "WR", "TE", "OT", "LB", "CB", "S", "DE"];

const STATUSES: &[&str] = &["Questionable", "Questionable", "Out", "Doubtful", "Probable"];

const AILMENTS: &[&str] = &[
    "Hamstring", "Ankle", "Knee", "Shoulder", "Concussion protocol", "Illness", "Back", "Groin",
];

const HEADLINES: &[&str] = &[
    "{team} lean on the ground game heading into the weekend",
    "Film room: how {team} keep winning on third down",
    "{team} shuffle the offensive line after another slow start",
    "Inside the numbers on {team} and their red-zone surge",
    "{team} coaching staff preaches patience amid playoff chatter",
    "Scouts weigh in on the breakout season unfolding for {team}",
];

/// Fabricates structurally valid data for any kind. Never fails.
pub struct SyntheticGenerator {
    rng: Mutex<StdRng>,
}

impl SyntheticGenerator {
    /// Deterministic generator for reproducible output.
    pub fn seeded(seed: u64) -> Self {
        SyntheticGenerator {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// OS-entropy generator for normal operation.
    pub fn from_entropy() -> Self {
        SyntheticGenerator {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn generate(&self, kind: DataKind, params: &FetchParams) -> DataSet {
        let mut guard = self.rng.lock().expect("rng mutex poisoned");
        let rng = &mut *guard;
        match kind {
            DataKind::Games => DataSet::Games(games(rng, params)),
            DataKind::Rankings => DataSet::Rankings(rankings(rng, params.league)),
            DataKind::Injuries => DataSet::Injuries(injuries(rng, params.league)),
            DataKind::Odds => DataSet::Odds(odds(rng, params)),
            DataKind::News => DataSet::News(news(rng, params.league)),
        }
    }
}

/// Shuffle the roster and pair teams off for one slate of games.
fn matchups(
    rng: &mut StdRng,
    league: League,
    count: usize,
) -> Vec<(&'static TeamEntry, &'static TeamEntry)> {
    let roster = teams::roster(league);
    let mut order: Vec<usize> = (0..roster.len()).collect();
    order.shuffle(rng);
    order
        .chunks_exact(2)
        .take(count)
        .map(|pair| (&roster[pair[0]], &roster[pair[1]]))
        .collect()
}

fn slate_size(league: League) -> usize {
    match league {
        League::Nfl => 8,
        League::College => 10,
    }
}

fn games(rng: &mut StdRng, params: &FetchParams) -> Vec<Game> {
    let week_tag = params
        .week
        .map_or_else(|| "cur".to_string(), |w| w.to_string());

    matchups(rng, params.league, slate_size(params.league))
        .into_iter()
        .enumerate()
        .map(|(i, (home, away))| {
            let home_prob = predict::win_probability(home.strength, away.strength);
            let roll: f64 = rng.gen();

            let (status, home_score, away_score) = if roll < 0.35 {
                (GameStatus::Scheduled, 0, 0)
            } else if roll < 0.65 {
                let quarter = rng.gen_range(1..=4u32);
                let clock = format!(
                    "Q{} {:02}:{:02}",
                    quarter,
                    rng.gen_range(0..15u32),
                    rng.gen_range(0..60u32)
                );
                let cap = 1 + quarter * 10;
                (
                    GameStatus::InProgress { clock },
                    rng.gen_range(0..cap),
                    rng.gen_range(0..cap),
                )
            } else {
                let home_won = rng.gen_bool(home_prob);
                let winner_score = rng.gen_range(20..=41u32);
                let margin = rng.gen_range(1..=17u32);
                let loser_score = winner_score.saturating_sub(margin);
                if home_won {
                    (GameStatus::Final, winner_score, loser_score)
                } else {
                    (GameStatus::Final, loser_score, winner_score)
                }
            };

            Game {
                id: format!("{}-{}-{:02}", params.league, week_tag, i),
                league: params.league,
                home_team: home.name.to_string(),
                away_team: away.name.to_string(),
                home_score,
                away_score,
                status,
                venue: Some(format!("{} Stadium", home.abbr)),
                kickoff: None,
            }
        })
        .collect()
}

fn rankings(rng: &mut StdRng, league: League) -> Vec<TeamRank> {
    let mut scored: Vec<(&TeamEntry, f64)> = teams::roster(league)
        .iter()
        .map(|t| (t, t.strength + rng.gen_range(-2.0..2.0)))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    scored
        .into_iter()
        .take(25)
        .enumerate()
        .map(|(i, (team, score))| {
            let wins = (((score - 55.0) / 4.0).round() as i64).clamp(0, 12);
            TeamRank {
                rank: (i + 1) as u32,
                school: team.name.to_string(),
                record: format!("{}-{}", wins, 12 - wins),
                previous: None,
            }
        })
        .collect()
}

fn injuries(rng: &mut StdRng, league: League) -> Vec<InjuryReport> {
    let roster = teams::roster(league);
    let count = rng.gen_range(6..=12);
    (0..count)
        .map(|_| {
            let team = roster[rng.gen_range(0..roster.len())];
            InjuryReport {
                team: team.name.to_string(),
                player: format!(
                    "{} {}",
                    FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())],
                    LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())]
                ),
                position: POSITIONS[rng.gen_range(0..POSITIONS.len())].to_string(),
                status: STATUSES[rng.gen_range(0..STATUSES.len())].to_string(),
                detail: Some(AILMENTS[rng.gen_range(0..AILMENTS.len())].to_string()),
            }
        })
        .collect()
}

fn odds(rng: &mut StdRng, params: &FetchParams) -> Vec<GameOdds> {
    matchups(rng, params.league, slate_size(params.league))
        .into_iter()
        .map(|(home, away)| {
            predict::derive_line(
                params.league,
                &Contender::from_entry(home),
                &Contender::from_entry(away),
                rng,
            )
        })
        .collect()
}

fn news(rng: &mut StdRng, league: League) -> Vec<NewsItem> {
    let roster = teams::roster(league);
    let mut order: Vec<usize> = (0..HEADLINES.len()).collect();
    order.shuffle(rng);
    order
        .into_iter()
        .map(|idx| {
            let team = roster[rng.gen_range(0..roster.len())];
            let headline = HEADLINES[idx].replace("{team}", team.name);
            NewsItem {
                headline,
                summary: Some(format!(
                    "Around the {}: what the week ahead looks like for {}.",
                    team.conference, team.name
                )),
                published: None,
                link: None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(league: League) -> FetchParams {
        FetchParams {
            league,
            week: Some(5),
        }
    }

    #[test]
    fn test_same_seed_same_output() {
        let a = SyntheticGenerator::seeded(7);
        let b = SyntheticGenerator::seeded(7);
        for kind in DataKind::ALL {
            assert_eq!(
                a.generate(kind, &params(League::Nfl)),
                b.generate(kind, &params(League::Nfl)),
                "kind {kind} diverged under identical seeds"
            );
        }
    }

    #[test]
    fn test_games_are_self_consistent() {
        let generator = SyntheticGenerator::seeded(3);
        for seed_pass in 0..5 {
            let set = generator.generate(DataKind::Games, &params(League::Nfl));
            let DataSet::Games(games) = set else {
                panic!("wrong dataset variant on pass {seed_pass}");
            };
            assert!(!games.is_empty());
            for game in games {
                assert_ne!(game.home_team, game.away_team);
                match game.status {
                    GameStatus::Scheduled => {
                        assert_eq!((game.home_score, game.away_score), (0, 0));
                    }
                    GameStatus::InProgress { ref clock } => {
                        assert!(clock.starts_with('Q'), "bad clock '{clock}'");
                    }
                    GameStatus::Final => {
                        assert_ne!(game.home_score, game.away_score, "synthetic finals never tie");
                    }
                }
            }
        }
    }

    #[test]
    fn test_rankings_are_ordered_and_bounded() {
        let generator = SyntheticGenerator::seeded(9);
        let DataSet::Rankings(rows) = generator.generate(DataKind::Rankings, &params(League::College))
        else {
            panic!("wrong dataset variant");
        };
        assert!(!rows.is_empty() && rows.len() <= 25);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.rank, (i + 1) as u32);
        }
    }

    #[test]
    fn test_odds_have_sane_lines() {
        let generator = SyntheticGenerator::seeded(4);
        let DataSet::Odds(lines) = generator.generate(DataKind::Odds, &params(League::Nfl)) else {
            panic!("wrong dataset variant");
        };
        assert!(!lines.is_empty());
        for line in lines {
            // one side negative, the other positive, except true pick-ems
            assert!(
                line.home_moneyline.signum() != line.away_moneyline.signum()
                    || line.home_moneyline == -100,
                "moneylines {} / {}",
                line.home_moneyline,
                line.away_moneyline
            );
            assert!(line.total > 25.0 && line.total < 75.0);
        }
    }

    #[test]
    fn test_every_kind_is_nonempty() {
        let generator = SyntheticGenerator::seeded(1);
        for kind in DataKind::ALL {
            let set = generator.generate(kind, &params(League::College));
            assert_eq!(set.kind(), kind);
            assert!(!set.is_empty(), "kind {kind} generated an empty set");
        }
    }
}
