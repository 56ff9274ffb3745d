use std::num::NonZeroU32;

use clap::Parser;

/// NFL/NCAA analytics dashboard server
#[derive(Parser, Debug, Clone)]
#[command(name = "gridiron-hub", version, about)]
pub struct Config {
    /// Dashboard listen address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: String,

    /// ESPN site API base URL
    #[arg(long, env = "ESPN_BASE_URL", default_value = "https://site.api.espn.com")]
    pub espn_base_url: String,

    /// Community NCAA API base URL
    #[arg(long, env = "NCAA_BASE_URL", default_value = "https://ncaa-api.henrygd.me")]
    pub ncaa_base_url: String,

    /// The Odds API base URL
    #[arg(long, env = "ODDS_BASE_URL", default_value = "https://api.the-odds-api.com")]
    pub odds_base_url: String,

    /// API-Sports (american football) base URL
    #[arg(
        long,
        env = "API_SPORTS_BASE_URL",
        default_value = "https://v1.american-football.api-sports.io"
    )]
    pub api_sports_base_url: String,

    /// The Odds API key; without one, odds come from the synthetic generator
    #[arg(long, env = "ODDS_API_KEY")]
    pub odds_api_key: Option<String>,

    /// API-Sports key for injury reports
    #[arg(long, env = "API_SPORTS_KEY")]
    pub api_sports_key: Option<String>,

    /// Route all outbound API calls through this same-origin proxy path
    #[arg(long, env = "PROXY_BASE")]
    pub proxy_base: Option<String>,

    /// Skip external odds calls entirely, even with a key configured
    #[arg(long, env = "DISABLE_EXTERNAL_ODDS", default_value = "false")]
    pub disable_external_odds: bool,

    /// Background refresh interval in seconds
    #[arg(long, env = "REFRESH_INTERVAL_SECS", default_value = "60")]
    pub refresh_interval_secs: u64,

    /// Per-attempt timeout for remote sources, in seconds
    #[arg(long, env = "SOURCE_TIMEOUT_SECS", default_value = "10")]
    pub source_timeout_secs: u64,

    /// Attempts per source before moving on (retryable failures only)
    #[arg(long, env = "RETRY_ATTEMPTS", default_value = "2")]
    pub retry_attempts: u32,

    /// Linear backoff step between retries, in milliseconds
    #[arg(long, env = "RETRY_BACKOFF_MS", default_value = "500")]
    pub retry_backoff_ms: u64,

    /// Requests per minute allowed per scoreboard/news source
    #[arg(long, env = "SCOREBOARD_RATE_PER_MIN", default_value = "30")]
    pub scoreboard_rate_per_min: NonZeroU32,

    /// Requests per minute allowed for the odds source
    #[arg(long, env = "ODDS_RATE_PER_MIN", default_value = "5")]
    pub odds_rate_per_min: NonZeroU32,

    /// Seed for the synthetic generator; omit for OS entropy
    #[arg(long, env = "SYNTHETIC_SEED")]
    pub synthetic_seed: Option<u64>,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.refresh_interval_secs == 0 {
            anyhow::bail!("refresh_interval_secs must be positive");
        }
        if self.source_timeout_secs == 0 {
            anyhow::bail!("source_timeout_secs must be positive");
        }
        if self.retry_attempts == 0 {
            anyhow::bail!("retry_attempts must be at least 1");
        }
        if let Some(proxy) = &self.proxy_base {
            url::Url::parse(proxy)
                .map_err(|e| anyhow::anyhow!("proxy_base is not a valid URL: {e}"))?;
        }
        Ok(())
    }
}
