use async_trait::async_trait;
use chrono::{Datelike, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{check_status, default_client, route, Source, SourceError};
use crate::models::{DataKind, DataSet, FetchParams, InjuryReport, League};

const DEFAULT_BASE_URL: &str = "https://v1.american-football.api-sports.io";

/// NFL injury-report source backed by API-Sports (RapidAPI key scheme).
/// College injuries are not published there, so those requests are skipped.
pub struct ApiSportsInjuries {
    http: Client,
    base_url: String,
    api_key: String,
    proxy: Option<String>,
}

impl ApiSportsInjuries {
    pub fn new(base_url: Option<&str>, api_key: &str, proxy: Option<String>) -> anyhow::Result<Self> {
        Ok(ApiSportsInjuries {
            http: default_client()?,
            base_url: base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            proxy,
        })
    }

    fn host(&self) -> String {
        url::Url::parse(&self.base_url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
            .unwrap_or_default()
    }
}

#[async_trait]
impl Source for ApiSportsInjuries {
    fn name(&self) -> &str {
        "api_sports_injuries"
    }

    fn kind(&self) -> DataKind {
        DataKind::Injuries
    }

    async fn fetch(&self, params: &FetchParams) -> Result<DataSet, SourceError> {
        if params.league != League::Nfl {
            return Err(SourceError::Unsupported(params.league));
        }

        let season = Utc::now().year();
        let target = format!("{}/injuries?league=1&season={season}", self.base_url);
        let url = route(self.proxy.as_deref(), &target);
        debug!("Fetching injuries from {}", url);

        let resp = self
            .http
            .get(&url)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", self.host())
            .send()
            .await?;
        let resp = check_status(resp)?;
        let doc: InjuriesDoc = resp.json().await?;

        let reports = doc
            .response
            .into_iter()
            .map(|row| InjuryReport {
                team: row.team.name,
                player: row.player.name,
                position: row.player.position.unwrap_or_else(|| "—".into()),
                status: row.status,
                detail: row.description,
            })
            .collect();
        Ok(DataSet::Injuries(reports))
    }
}

// --- API-Sports response types ---

#[derive(Debug, Deserialize)]
struct InjuriesDoc {
    response: Vec<InjuryRow>,
}

#[derive(Debug, Deserialize)]
struct InjuryRow {
    player: PlayerInfo,
    team: TeamInfo,
    status: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlayerInfo {
    name: String,
    position: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TeamInfo {
    name: String,
}
