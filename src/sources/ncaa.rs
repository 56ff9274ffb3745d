use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{check_status, default_client, route, Source, SourceError};
use crate::models::{DataKind, DataSet, FetchParams, Game, GameStatus, League, TeamRank};

const DEFAULT_BASE_URL: &str = "https://ncaa-api.henrygd.me";

/// College scoreboard source backed by the community NCAA API.
/// NFL requests are reported as unsupported so the provider moves on.
pub struct NcaaScoreboard {
    http: Client,
    base_url: String,
    proxy: Option<String>,
}

impl NcaaScoreboard {
    pub fn new(base_url: Option<&str>, proxy: Option<String>) -> anyhow::Result<Self> {
        Ok(NcaaScoreboard {
            http: default_client()?,
            base_url: base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/').to_string(),
            proxy,
        })
    }
}

#[async_trait]
impl Source for NcaaScoreboard {
    fn name(&self) -> &str {
        "ncaa_scoreboard"
    }

    fn kind(&self) -> DataKind {
        DataKind::Games
    }

    async fn fetch(&self, params: &FetchParams) -> Result<DataSet, SourceError> {
        if params.league != League::College {
            return Err(SourceError::Unsupported(params.league));
        }

        let mut target = format!("{}/scoreboard/football/fbs", self.base_url);
        if let Some(week) = params.week {
            target.push_str(&format!("/{week}"));
        }
        let url = route(self.proxy.as_deref(), &target);
        debug!("Fetching NCAA scoreboard from {}", url);

        let resp = check_status(self.http.get(&url).send().await?)?;
        let doc: ScoreboardDoc = resp.json().await?;
        let games = parse_scoreboard(doc)?;
        Ok(DataSet::Games(games))
    }
}

/// AP Top 25 source from the same community API.
pub struct NcaaRankings {
    http: Client,
    base_url: String,
    proxy: Option<String>,
}

impl NcaaRankings {
    pub fn new(base_url: Option<&str>, proxy: Option<String>) -> anyhow::Result<Self> {
        Ok(NcaaRankings {
            http: default_client()?,
            base_url: base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/').to_string(),
            proxy,
        })
    }
}

#[async_trait]
impl Source for NcaaRankings {
    fn name(&self) -> &str {
        "ncaa_rankings"
    }

    fn kind(&self) -> DataKind {
        DataKind::Rankings
    }

    async fn fetch(&self, params: &FetchParams) -> Result<DataSet, SourceError> {
        if params.league != League::College {
            return Err(SourceError::Unsupported(params.league));
        }

        let target = format!("{}/rankings/football/fbs/associated-press", self.base_url);
        let url = route(self.proxy.as_deref(), &target);
        debug!("Fetching AP rankings from {}", url);

        let resp = check_status(self.http.get(&url).send().await?)?;
        let doc: RankingsDoc = resp.json().await?;
        let rows = parse_rankings(doc)?;
        Ok(DataSet::Rankings(rows))
    }
}

// --- NCAA API response types ---

#[derive(Debug, Deserialize)]
struct ScoreboardDoc {
    games: Vec<GameWrapper>,
}

#[derive(Debug, Deserialize)]
struct GameWrapper {
    game: NcaaGame,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NcaaGame {
    #[serde(rename = "gameID")]
    game_id: String,
    home: SideInfo,
    away: SideInfo,
    game_state: String,
    contest_clock: Option<String>,
    current_period: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SideInfo {
    names: SideNames,
    score: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SideNames {
    short: String,
}

#[derive(Debug, Deserialize)]
struct RankingsDoc {
    data: Vec<RankingRow>,
}

#[derive(Debug, Deserialize)]
struct RankingRow {
    #[serde(rename = "RANK")]
    rank: String,
    #[serde(rename = "SCHOOL")]
    school: String,
    #[serde(rename = "RECORD")]
    record: Option<String>,
    #[serde(rename = "PREVIOUS")]
    previous: Option<String>,
}

fn parse_scoreboard(doc: ScoreboardDoc) -> Result<Vec<Game>, SourceError> {
    doc.games
        .into_iter()
        .map(|wrapper| {
            let raw = wrapper.game;
            let status = match raw.game_state.as_str() {
                "pre" => GameStatus::Scheduled,
                "final" => GameStatus::Final,
                "live" | "in_progress" => GameStatus::InProgress {
                    clock: format!(
                        "{} {}",
                        raw.current_period.as_deref().unwrap_or("1st"),
                        raw.contest_clock.as_deref().unwrap_or("0:00")
                    ),
                },
                other => {
                    return Err(SourceError::Malformed(format!(
                        "unknown gameState '{other}'"
                    )))
                }
            };

            Ok(Game {
                id: raw.game_id,
                league: League::College,
                home_score: parse_score(raw.home.score.as_deref())?,
                away_score: parse_score(raw.away.score.as_deref())?,
                home_team: raw.home.names.short,
                away_team: raw.away.names.short,
                status,
                venue: None,
                kickoff: None,
            })
        })
        .collect()
}

fn parse_score(raw: Option<&str>) -> Result<u32, SourceError> {
    match raw {
        None | Some("") => Ok(0),
        Some(s) => s
            .parse()
            .map_err(|_| SourceError::Malformed(format!("unparseable score '{s}'"))),
    }
}

fn parse_rankings(doc: RankingsDoc) -> Result<Vec<TeamRank>, SourceError> {
    doc.data
        .into_iter()
        .map(|row| {
            let rank: u32 = row
                .rank
                .trim()
                .parse()
                .map_err(|_| SourceError::Malformed(format!("unparseable rank '{}'", row.rank)))?;
            Ok(TeamRank {
                rank,
                // "Georgia (62)" carries first-place votes; strip them
                school: strip_votes(&row.school),
                record: row.record.unwrap_or_default(),
                previous: row.previous.and_then(|p| p.trim().parse().ok()),
            })
        })
        .collect()
}

fn strip_votes(school: &str) -> String {
    match school.find(" (") {
        Some(idx) => school[..idx].to_string(),
        None => school.to_string(),
    }
}
