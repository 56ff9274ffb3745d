use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{default_client, route, Source, SourceError};
use crate::models::{DataKind, DataSet, FetchParams, GameOdds, League};

const DEFAULT_BASE_URL: &str = "https://api.the-odds-api.com";

/// Error code The Odds API returns once paid credits run out. Seeing it
/// disables this source for the rest of the session.
const QUOTA_ERROR_CODE: &str = "OUT_OF_USAGE_CREDITS";

fn sport_key(league: League) -> &'static str {
    match league {
        League::Nfl => "americanfootball_nfl",
        League::College => "americanfootball_ncaaf",
    }
}

/// Betting-line source backed by The Odds API.
pub struct TheOddsApi {
    http: Client,
    base_url: String,
    api_key: String,
    proxy: Option<String>,
}

impl TheOddsApi {
    pub fn new(base_url: Option<&str>, api_key: &str, proxy: Option<String>) -> anyhow::Result<Self> {
        Ok(TheOddsApi {
            http: default_client()?,
            base_url: base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            proxy,
        })
    }
}

#[async_trait]
impl Source for TheOddsApi {
    fn name(&self) -> &str {
        "the_odds_api"
    }

    fn kind(&self) -> DataKind {
        DataKind::Odds
    }

    async fn fetch(&self, params: &FetchParams) -> Result<DataSet, SourceError> {
        let target = format!(
            "{}/v4/sports/{}/odds?apiKey={}&regions=us&markets=h2h,spreads,totals&oddsFormat=american",
            self.base_url,
            sport_key(params.league),
            self.api_key,
        );
        let url = route(self.proxy.as_deref(), &target);
        debug!("Fetching odds from {}", url);

        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            if is_quota_error(&body) {
                return Err(SourceError::QuotaExhausted);
            }
            return Err(SourceError::Status(status));
        }

        let events: Vec<OddsEvent> = resp.json().await?;
        Ok(DataSet::Odds(parse_events(events)))
    }
}

/// The Odds API reports quota exhaustion with a 401 carrying a specific
/// `error_code`, distinct from an ordinary bad-key 401.
fn is_quota_error(body: &str) -> bool {
    #[derive(Deserialize)]
    struct ApiError {
        error_code: Option<String>,
    }
    serde_json::from_str::<ApiError>(body)
        .ok()
        .and_then(|e| e.error_code)
        .is_some_and(|code| code == QUOTA_ERROR_CODE)
}

// --- The Odds API response types ---

#[derive(Debug, Deserialize)]
struct OddsEvent {
    home_team: String,
    away_team: String,
    #[serde(default)]
    bookmakers: Vec<Bookmaker>,
}

#[derive(Debug, Deserialize)]
struct Bookmaker {
    title: String,
    markets: Vec<Market>,
}

#[derive(Debug, Deserialize)]
struct Market {
    key: String,
    outcomes: Vec<Outcome>,
}

#[derive(Debug, Deserialize)]
struct Outcome {
    name: String,
    price: f64,
    point: Option<f64>,
}

/// Flatten each event's first bookmaker into one `GameOdds` row. Events
/// without a complete set of markets are dropped, not errors — books list
/// games before pricing them.
fn parse_events(events: Vec<OddsEvent>) -> Vec<GameOdds> {
    events
        .into_iter()
        .filter_map(|event| {
            let book = event.bookmakers.into_iter().next()?;
            let mut home_ml = None;
            let mut away_ml = None;
            let mut spread = None;
            let mut total = None;

            for market in &book.markets {
                match market.key.as_str() {
                    "h2h" => {
                        for outcome in &market.outcomes {
                            if outcome.name == event.home_team {
                                home_ml = Some(outcome.price as i32);
                            } else if outcome.name == event.away_team {
                                away_ml = Some(outcome.price as i32);
                            }
                        }
                    }
                    "spreads" => {
                        for outcome in &market.outcomes {
                            if outcome.name == event.home_team {
                                spread = outcome.point;
                            }
                        }
                    }
                    "totals" => {
                        for outcome in &market.outcomes {
                            if outcome.name == "Over" {
                                total = outcome.point;
                            }
                        }
                    }
                    _ => {}
                }
            }

            Some(GameOdds {
                home_team: event.home_team,
                away_team: event.away_team,
                spread: spread?,
                home_moneyline: home_ml?,
                away_moneyline: away_ml?,
                total: total?,
                bookmaker: book.title,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_events_flattens_first_bookmaker() {
        let events: Vec<OddsEvent> = serde_json::from_value(json!([{
            "home_team": "Kansas City Chiefs",
            "away_team": "Buffalo Bills",
            "bookmakers": [{
                "title": "DraftKings",
                "markets": [
                    { "key": "h2h", "outcomes": [
                        { "name": "Kansas City Chiefs", "price": -170.0 },
                        { "name": "Buffalo Bills", "price": 145.0 }
                    ]},
                    { "key": "spreads", "outcomes": [
                        { "name": "Kansas City Chiefs", "price": -110.0, "point": -3.5 },
                        { "name": "Buffalo Bills", "price": -110.0, "point": 3.5 }
                    ]},
                    { "key": "totals", "outcomes": [
                        { "name": "Over", "price": -105.0, "point": 47.5 },
                        { "name": "Under", "price": -115.0, "point": 47.5 }
                    ]}
                ]
            }]
        }]))
        .unwrap();

        let odds = parse_events(events);
        assert_eq!(odds.len(), 1);
        assert_eq!(odds[0].home_moneyline, -170);
        assert_eq!(odds[0].away_moneyline, 145);
        assert_eq!(odds[0].spread, -3.5);
        assert_eq!(odds[0].total, 47.5);
        assert_eq!(odds[0].bookmaker, "DraftKings");
    }

    #[test]
    fn test_parse_events_drops_unpriced_games() {
        let events: Vec<OddsEvent> = serde_json::from_value(json!([{
            "home_team": "Detroit Lions",
            "away_team": "Chicago Bears",
            "bookmakers": []
        }]))
        .unwrap();
        assert!(parse_events(events).is_empty());
    }

    #[test]
    fn test_quota_error_detection() {
        let body = r#"{"message":"Usage quota has been reached.","error_code":"OUT_OF_USAGE_CREDITS"}"#;
        assert!(is_quota_error(body));
        assert!(!is_quota_error(r#"{"message":"Invalid api key"}"#));
        assert!(!is_quota_error("not json"));
    }
}
