pub mod api_sports;
pub mod espn;
pub mod ncaa;
pub mod odds_api;

pub use api_sports::ApiSportsInjuries;
pub use espn::{EspnNews, EspnScoreboard};
pub use ncaa::{NcaaRankings, NcaaScoreboard};
pub use odds_api::TheOddsApi;

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::models::{DataKind, DataSet, FetchParams, League};

/// Trait every remote data source implements. One source covers exactly one
/// data kind; the provider holds a priority-ordered list per kind.
#[async_trait]
pub trait Source: Send + Sync {
    /// Stable name for logging, rate limiting, and session-wide disabling.
    fn name(&self) -> &str;

    /// The data kind this source serves.
    fn kind(&self) -> DataKind;

    /// Fetch and adapt one payload into the canonical shape.
    async fn fetch(&self, params: &FetchParams) -> Result<DataSet, SourceError>;
}

/// Failure taxonomy for a single source attempt.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    /// The upstream reported its usage quota as exhausted; the provider
    /// disables the source for the rest of the session.
    #[error("usage quota exhausted")]
    QuotaExhausted,
    /// The source does not cover the requested league; skipped quietly.
    #[error("league {0} not covered by this source")]
    Unsupported(League),
}

impl SourceError {
    /// Timeouts, 429s, and 5xx responses are worth one more try; everything
    /// else fails the source outright and the loop moves on.
    pub fn is_retryable(&self) -> bool {
        match self {
            SourceError::Timeout => true,
            SourceError::Status(code) => {
                code.is_server_error() || *code == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout
        } else if err.is_decode() {
            SourceError::Malformed(err.to_string())
        } else {
            SourceError::Network(err.to_string())
        }
    }
}

/// Shared HTTP client construction for all sources.
pub(crate) fn default_client() -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .context("Failed to build HTTP client")
}

/// Rewrite a target URL through the same-origin proxy path when one is
/// configured: `{proxy}?url={encoded target}`.
pub(crate) fn route(proxy: Option<&str>, target: &str) -> String {
    match proxy {
        Some(base) => format!(
            "{}?url={}",
            base.trim_end_matches('/'),
            urlencoding::encode(target)
        ),
        None => target.to_string(),
    }
}

/// Fail non-2xx responses with their status.
pub(crate) fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, SourceError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(SourceError::Status(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_passthrough_without_proxy() {
        let url = route(None, "https://site.api.espn.com/x?y=1");
        assert_eq!(url, "https://site.api.espn.com/x?y=1");
    }

    #[test]
    fn test_route_encodes_target_through_proxy() {
        let url = route(
            Some("http://localhost:8001/api/proxy"),
            "https://site.api.espn.com/x?y=1",
        );
        assert_eq!(
            url,
            "http://localhost:8001/api/proxy?url=https%3A%2F%2Fsite.api.espn.com%2Fx%3Fy%3D1"
        );
    }

    #[test]
    fn test_retryable_classification() {
        assert!(SourceError::Timeout.is_retryable());
        assert!(SourceError::Status(StatusCode::BAD_GATEWAY).is_retryable());
        assert!(SourceError::Status(StatusCode::TOO_MANY_REQUESTS).is_retryable());
        assert!(!SourceError::Status(StatusCode::NOT_FOUND).is_retryable());
        assert!(!SourceError::Network("connection refused".into()).is_retryable());
        assert!(!SourceError::QuotaExhausted.is_retryable());
    }
}
