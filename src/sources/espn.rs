use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{check_status, default_client, route, Source, SourceError};
use crate::models::{DataKind, DataSet, FetchParams, Game, GameStatus, League, NewsItem};

const DEFAULT_BASE_URL: &str = "https://site.api.espn.com";

fn sport_path(league: League) -> &'static str {
    match league {
        League::Nfl => "football/nfl",
        League::College => "football/college-football",
    }
}

/// Scoreboard source backed by ESPN's public site API.
/// Covers both the NFL and FBS college football.
pub struct EspnScoreboard {
    http: Client,
    base_url: String,
    proxy: Option<String>,
}

impl EspnScoreboard {
    pub fn new(base_url: Option<&str>, proxy: Option<String>) -> anyhow::Result<Self> {
        Ok(EspnScoreboard {
            http: default_client()?,
            base_url: base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/').to_string(),
            proxy,
        })
    }

    fn scoreboard_url(&self, params: &FetchParams) -> String {
        let mut url = format!(
            "{}/apis/site/v2/sports/{}/scoreboard",
            self.base_url,
            sport_path(params.league)
        );
        let mut query: Vec<String> = Vec::new();
        if params.league == League::College {
            // groups=80 selects FBS
            query.push("groups=80".into());
        }
        if let Some(week) = params.week {
            query.push(format!("week={week}"));
            query.push("seasontype=2".into());
        }
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }
        url
    }
}

#[async_trait]
impl Source for EspnScoreboard {
    fn name(&self) -> &str {
        "espn_scoreboard"
    }

    fn kind(&self) -> DataKind {
        DataKind::Games
    }

    async fn fetch(&self, params: &FetchParams) -> Result<DataSet, SourceError> {
        let url = route(self.proxy.as_deref(), &self.scoreboard_url(params));
        debug!("Fetching ESPN scoreboard from {}", url);

        let resp = check_status(self.http.get(&url).send().await?)?;
        let doc: Scoreboard = resp.json().await?;
        let games = parse_scoreboard(doc, params.league)?;
        Ok(DataSet::Games(games))
    }
}

/// News source backed by ESPN's football news feed.
pub struct EspnNews {
    http: Client,
    base_url: String,
    proxy: Option<String>,
}

impl EspnNews {
    pub fn new(base_url: Option<&str>, proxy: Option<String>) -> anyhow::Result<Self> {
        Ok(EspnNews {
            http: default_client()?,
            base_url: base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/').to_string(),
            proxy,
        })
    }
}

#[async_trait]
impl Source for EspnNews {
    fn name(&self) -> &str {
        "espn_news"
    }

    fn kind(&self) -> DataKind {
        DataKind::News
    }

    async fn fetch(&self, params: &FetchParams) -> Result<DataSet, SourceError> {
        let target = format!(
            "{}/apis/site/v2/sports/{}/news",
            self.base_url,
            sport_path(params.league)
        );
        let url = route(self.proxy.as_deref(), &target);
        debug!("Fetching ESPN news from {}", url);

        let resp = check_status(self.http.get(&url).send().await?)?;
        let doc: NewsFeed = resp.json().await?;

        let items = doc
            .articles
            .into_iter()
            .map(|a| NewsItem {
                headline: a.headline,
                summary: a.description,
                published: a.published.as_deref().and_then(parse_timestamp),
                link: a.links.and_then(|l| l.web).map(|w| w.href),
            })
            .collect();
        Ok(DataSet::News(items))
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

// --- ESPN API response types ---

#[derive(Debug, Deserialize)]
struct Scoreboard {
    events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
struct Event {
    id: String,
    date: Option<String>,
    competitions: Vec<Competition>,
}

#[derive(Debug, Deserialize)]
struct Competition {
    competitors: Vec<Competitor>,
    status: Status,
    venue: Option<Venue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Competitor {
    home_away: String,
    score: Option<String>,
    team: Team,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Team {
    display_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Status {
    display_clock: Option<String>,
    period: Option<u8>,
    #[serde(rename = "type")]
    type_detail: StatusType,
}

#[derive(Debug, Deserialize)]
struct StatusType {
    state: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Venue {
    full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsFeed {
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    headline: String,
    description: Option<String>,
    published: Option<String>,
    links: Option<ArticleLinks>,
}

#[derive(Debug, Deserialize)]
struct ArticleLinks {
    web: Option<WebLink>,
}

#[derive(Debug, Deserialize)]
struct WebLink {
    href: String,
}

/// Map the raw scoreboard into canonical games. A structurally broken event
/// fails the whole payload rather than yielding a partial record.
fn parse_scoreboard(doc: Scoreboard, league: League) -> Result<Vec<Game>, SourceError> {
    doc.events
        .into_iter()
        .map(|event| {
            let competition = event
                .competitions
                .into_iter()
                .next()
                .ok_or_else(|| SourceError::Malformed(format!("event {} has no competition", event.id)))?;

            let mut home = None;
            let mut away = None;
            for competitor in competition.competitors {
                match competitor.home_away.as_str() {
                    "home" => home = Some(competitor),
                    "away" => away = Some(competitor),
                    other => {
                        return Err(SourceError::Malformed(format!(
                            "competitor with unknown homeAway '{other}'"
                        )))
                    }
                }
            }
            let home = home.ok_or_else(|| {
                SourceError::Malformed(format!("event {} missing home competitor", event.id))
            })?;
            let away = away.ok_or_else(|| {
                SourceError::Malformed(format!("event {} missing away competitor", event.id))
            })?;

            let status = match competition.status.type_detail.state.as_str() {
                "pre" => GameStatus::Scheduled,
                "post" => GameStatus::Final,
                "in" => {
                    let period = competition.status.period.unwrap_or(1);
                    let clock = competition
                        .status
                        .display_clock
                        .unwrap_or_else(|| "0:00".into());
                    GameStatus::InProgress {
                        clock: format!("Q{period} {clock}"),
                    }
                }
                other => {
                    return Err(SourceError::Malformed(format!(
                        "unknown game state '{other}'"
                    )))
                }
            };

            Ok(Game {
                id: event.id,
                league,
                home_score: parse_score(home.score.as_deref())?,
                away_score: parse_score(away.score.as_deref())?,
                home_team: home.team.display_name,
                away_team: away.team.display_name,
                status,
                venue: competition.venue.and_then(|v| v.full_name),
                kickoff: event.date.as_deref().and_then(parse_timestamp),
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
