use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// League a request or record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum League {
    Nfl,
    #[serde(alias = "ncaa")]
    College,
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            League::Nfl => write!(f, "nfl"),
            League::College => write!(f, "college"),
        }
    }
}

impl std::str::FromStr for League {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nfl" => Ok(League::Nfl),
            "college" | "ncaa" | "ncaaf" | "cfb" => Ok(League::College),
            other => Err(format!("unknown league '{other}'")),
        }
    }
}

/// Category of data the provider can fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Games,
    Rankings,
    Injuries,
    Odds,
    News,
}

impl DataKind {
    pub const ALL: [DataKind; 5] = [
        DataKind::Games,
        DataKind::Rankings,
        DataKind::Injuries,
        DataKind::Odds,
        DataKind::News,
    ];
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataKind::Games => "games",
            DataKind::Rankings => "rankings",
            DataKind::Injuries => "injuries",
            DataKind::Odds => "odds",
            DataKind::News => "news",
        };
        write!(f, "{s}")
    }
}

/// Request context for a fetch: which league, and optionally which week.
/// Doubles as the cache key together with the kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchParams {
    pub league: League,
    /// `None` means "whatever the source considers current".
    pub week: Option<u16>,
}

impl FetchParams {
    pub fn current(league: League) -> Self {
        FetchParams { league, week: None }
    }
}

/// Where a snapshot's data came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Origin {
    /// Fetched from a remote source; `source` names which one.
    Live { source: String },
    /// Generated locally because every remote source failed or was skipped.
    Synthetic,
}

/// One fetch result: the data plus where and when it was obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub origin: Origin,
    pub fetched_at: DateTime<Utc>,
    pub data: DataSet,
}

impl Snapshot {
    pub fn kind(&self) -> DataKind {
        self.data.kind()
    }
}

/// Canonical payload union — one variant per data kind. Adapters map raw
/// third-party shapes into exactly one of these; malformed shapes fail the
/// adapter instead of producing partial records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "lowercase")]
pub enum DataSet {
    Games(Vec<Game>),
    Rankings(Vec<TeamRank>),
    Injuries(Vec<InjuryReport>),
    Odds(Vec<GameOdds>),
    News(Vec<NewsItem>),
}

impl DataSet {
    pub fn kind(&self) -> DataKind {
        match self {
            DataSet::Games(_) => DataKind::Games,
            DataSet::Rankings(_) => DataKind::Rankings,
            DataSet::Injuries(_) => DataKind::Injuries,
            DataSet::Odds(_) => DataKind::Odds,
            DataSet::News(_) => DataKind::News,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            DataSet::Games(v) => v.len(),
            DataSet::Rankings(v) => v.len(),
            DataSet::Injuries(v) => v.len(),
            DataSet::Odds(v) => v.len(),
            DataSet::News(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single scheduled, in-progress, or completed game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub league: League,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
    pub status: GameStatus,
    pub venue: Option<String>,
    pub kickoff: Option<DateTime<Utc>>,
}

impl Game {
    pub fn is_live(&self) -> bool {
        matches!(self.status, GameStatus::InProgress { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GameStatus {
    Scheduled,
    /// `clock` is a display string, e.g. "Q3 07:24".
    InProgress { clock: String },
    Final,
}

/// One row of a poll or power ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRank {
    pub rank: u32,
    pub school: String,
    /// Win-loss record, e.g. "11-1".
    pub record: String,
    pub previous: Option<u32>,
}

/// One player on an injury report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjuryReport {
    pub team: String,
    pub player: String,
    pub position: String,
    /// "Questionable" | "Doubtful" | "Out" | "Probable" as reported upstream.
    pub status: String,
    pub detail: Option<String>,
}

/// Betting lines for one matchup from one bookmaker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOdds {
    pub home_team: String,
    pub away_team: String,
    /// Home handicap in points; negative means the home side is favored.
    pub spread: f64,
    /// American-format moneylines.
    pub home_moneyline: i32,
    pub away_moneyline: i32,
    /// Over/under total points.
    pub total: f64,
    pub bookmaker: String,
}

/// A headline from a news feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub headline: String,
    pub summary: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub link: Option<String>,
}

/// Matchup forecast produced by closed-form arithmetic over the strength
/// table — win percentages, a spread string, and templated reasoning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub home_team: String,
    pub away_team: String,
    pub home_win_pct: f64,
    pub away_win_pct: f64,
    /// Display spread, e.g. "KC -3.5" or "PK".
    pub spread: String,
    pub confidence: f64,
    pub reasoning: String,
}
