use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use gridiron_hub::config::Config;
use gridiron_hub::dashboard::{self, AppState};
use gridiron_hub::models::{DataKind, FetchParams, League};
use gridiron_hub::provider::{DataProvider, FetchPolicy, RateLimit, TtlTable};
use gridiron_hub::sources::{
    ApiSportsInjuries, EspnNews, EspnScoreboard, NcaaRankings, NcaaScoreboard, TheOddsApi,
};
use gridiron_hub::synthetic::SyntheticGenerator;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let generator = match config.synthetic_seed {
        Some(seed) => {
            info!("Synthetic generator seeded with {}", seed);
            SyntheticGenerator::seeded(seed)
        }
        None => SyntheticGenerator::from_entropy(),
    };

    let policy = FetchPolicy {
        attempt_timeout: Duration::from_secs(config.source_timeout_secs),
        retry_attempts: config.retry_attempts,
        retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        ttls: TtlTable::default(),
    };
    let mut provider = DataProvider::new(generator, policy);

    // Source registration order is attempt priority.
    let proxy = config.proxy_base.clone();
    let board_limit = RateLimit::per_minute(config.scoreboard_rate_per_min);

    provider.register(
        Arc::new(EspnScoreboard::new(Some(&config.espn_base_url), proxy.clone())?),
        Some(board_limit),
    );
    provider.register(
        Arc::new(NcaaScoreboard::new(Some(&config.ncaa_base_url), proxy.clone())?),
        Some(board_limit),
    );
    provider.register(
        Arc::new(NcaaRankings::new(Some(&config.ncaa_base_url), proxy.clone())?),
        Some(board_limit),
    );
    provider.register(
        Arc::new(EspnNews::new(Some(&config.espn_base_url), proxy.clone())?),
        Some(board_limit),
    );

    match (&config.odds_api_key, config.disable_external_odds) {
        (Some(key), false) => {
            provider.register(
                Arc::new(TheOddsApi::new(Some(&config.odds_base_url), key, proxy.clone())?),
                Some(RateLimit::per_minute(config.odds_rate_per_min)),
            );
        }
        (Some(_), true) => info!("External odds calls disabled — odds will be generated"),
        (None, _) => warn!("ODDS_API_KEY not set — odds will be generated"),
    }

    if let Some(key) = &config.api_sports_key {
        provider.register(
            Arc::new(ApiSportsInjuries::new(
                Some(&config.api_sports_base_url),
                key,
                proxy.clone(),
            )?),
            Some(board_limit),
        );
    } else {
        warn!("API_SPORTS_KEY not set — injury reports will be generated");
    }

    let provider = Arc::new(provider);

    // Background refresh: keep the cache warm for every kind, both leagues.
    let refresh_provider = Arc::clone(&provider);
    let refresh_interval = Duration::from_secs(config.refresh_interval_secs);
    tokio::spawn(async move {
        refresh_loop(refresh_provider, refresh_interval).await;
    });

    // Serve the dashboard
    let state = AppState {
        provider,
        http: reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?,
        api_sports_key: config.api_sports_key.clone(),
    };
    let app = dashboard::router(state);
    let addr: SocketAddr = config.listen_addr.parse()?;
    info!("Dashboard listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Fan out one fetch per kind concurrently, join, and log the slate counts.
async fn refresh_loop(provider: Arc<DataProvider>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        for league in [League::Nfl, League::College] {
            let params = FetchParams::current(league);
            let fetches: Vec<_> = DataKind::ALL
                .iter()
                .map(|kind| provider.fetch(*kind, &params))
                .collect();
            let snapshots = futures_util::future::join_all(fetches).await;
            let summary: Vec<String> = snapshots
                .iter()
                .map(|s| format!("{}={}", s.kind(), s.data.len()))
                .collect();
            info!(%league, "Refreshed: {}", summary.join(" "));
        }
    }
}
