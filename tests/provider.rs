//! End-to-end provider behavior against mocked transports.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gridiron_hub::models::{DataKind, DataSet, FetchParams, GameStatus, League, Origin};
use gridiron_hub::provider::{DataProvider, FetchPolicy, RateLimit, TtlTable};
use gridiron_hub::sources::{EspnScoreboard, NcaaScoreboard, TheOddsApi};
use gridiron_hub::synthetic::SyntheticGenerator;

const NFL_SCOREBOARD_PATH: &str = "/apis/site/v2/sports/football/nfl/scoreboard";
const CFB_SCOREBOARD_PATH: &str = "/apis/site/v2/sports/football/college-football/scoreboard";

fn fast_policy() -> FetchPolicy {
    FetchPolicy {
        attempt_timeout: Duration::from_secs(5),
        retry_attempts: 1,
        retry_backoff: Duration::from_millis(10),
        ttls: TtlTable::default(),
    }
}

fn espn_event(id: usize) -> serde_json::Value {
    json!({
        "id": id.to_string(),
        "date": "2025-10-12T17:00:00Z",
        "competitions": [{
            "venue": { "fullName": "Mock Field" },
            "status": { "displayClock": "12:00", "period": 2, "type": { "state": "in" } },
            "competitors": [
                { "homeAway": "home", "score": "14", "team": { "displayName": "Kansas City Chiefs" } },
                { "homeAway": "away", "score": "10", "team": { "displayName": "Buffalo Bills" } }
            ]
        }]
    })
}

fn espn_body(events: usize) -> serde_json::Value {
    json!({ "events": (0..events).map(espn_event).collect::<Vec<_>>() })
}

fn ncaa_body() -> serde_json::Value {
    json!({
        "games": [{
            "game": {
                "gameID": "801",
                "gameState": "final",
                "home": { "names": { "short": "Georgia" }, "score": "31" },
                "away": { "names": { "short": "Alabama" }, "score": "24" }
            }
        }]
    })
}

async fn espn_provider(server: &MockServer, policy: FetchPolicy) -> DataProvider {
    let mut provider = DataProvider::new(SyntheticGenerator::seeded(99), policy);
    provider.register(
        Arc::new(EspnScoreboard::new(Some(&server.uri()), None).unwrap()),
        None,
    );
    provider
}

#[tokio::test]
async fn live_path_returns_all_mocked_events() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(NFL_SCOREBOARD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(espn_body(3)))
        .expect(1)
        .mount(&server)
        .await;

    let provider = espn_provider(&server, fast_policy()).await;
    let params = FetchParams { league: League::Nfl, week: Some(5) };
    let snapshot = provider.fetch(DataKind::Games, &params).await;

    assert_eq!(
        snapshot.origin,
        Origin::Live { source: "espn_scoreboard".into() }
    );
    let DataSet::Games(games) = snapshot.data else {
        panic!("expected games");
    };
    assert_eq!(games.len(), 3);
    assert!(games.iter().all(|g| g.home_team == "Kansas City Chiefs"));
}

#[tokio::test]
async fn second_fetch_within_ttl_hits_cache_not_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(NFL_SCOREBOARD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(espn_body(2)))
        .expect(1)
        .mount(&server)
        .await;

    let provider = espn_provider(&server, fast_policy()).await;
    let params = FetchParams { league: League::Nfl, week: Some(5) };

    let first = provider.fetch(DataKind::Games, &params).await;
    let second = provider.fetch(DataKind::Games, &params).await;

    assert_eq!(first, second, "cached snapshot must be byte-identical");
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn fetch_after_ttl_expiry_makes_exactly_one_more_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(NFL_SCOREBOARD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(espn_body(2)))
        .expect(2)
        .mount(&server)
        .await;

    let mut policy = fast_policy();
    policy.ttls.games = Duration::from_millis(150);
    let provider = espn_provider(&server, policy).await;
    let params = FetchParams { league: League::Nfl, week: Some(5) };

    provider.fetch(DataKind::Games, &params).await;
    provider.fetch(DataKind::Games, &params).await; // cached
    tokio::time::sleep(Duration::from_millis(250)).await;
    provider.fetch(DataKind::Games, &params).await; // refetch

    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn total_outage_degrades_to_consistent_synthetic_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let provider = espn_provider(&server, fast_policy()).await;
    let params = FetchParams { league: League::Nfl, week: Some(5) };
    let snapshot = provider.fetch(DataKind::Games, &params).await;

    assert_eq!(snapshot.origin, Origin::Synthetic);
    let DataSet::Games(games) = snapshot.data else {
        panic!("expected games");
    };
    assert!(!games.is_empty());
    for game in &games {
        match &game.status {
            GameStatus::Scheduled => assert_eq!((game.home_score, game.away_score), (0, 0)),
            GameStatus::InProgress { clock } => assert!(!clock.is_empty()),
            GameStatus::Final => assert_ne!(game.home_score, game.away_score),
        }
    }
}

#[tokio::test]
async fn retryable_failure_is_retried_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(NFL_SCOREBOARD_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(NFL_SCOREBOARD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(espn_body(1)))
        .expect(1)
        .mount(&server)
        .await;

    let mut policy = fast_policy();
    policy.retry_attempts = 2;
    let provider = espn_provider(&server, policy).await;
    let snapshot = provider
        .fetch(DataKind::Games, &FetchParams::current(League::Nfl))
        .await;

    assert_eq!(
        snapshot.origin,
        Origin::Live { source: "espn_scoreboard".into() }
    );
}

#[tokio::test]
async fn saturated_source_is_skipped_without_forcing_fallback() {
    let espn = MockServer::start().await;
    let ncaa = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CFB_SCOREBOARD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(espn_body(2)))
        .expect(1)
        .mount(&espn)
        .await;
    Mock::given(method("GET"))
        .and(path("/scoreboard/football/fbs/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ncaa_body()))
        .expect(1)
        .mount(&ncaa)
        .await;

    let mut provider = DataProvider::new(SyntheticGenerator::seeded(99), fast_policy());
    provider.register(
        Arc::new(EspnScoreboard::new(Some(&espn.uri()), None).unwrap()),
        Some(RateLimit::per_minute(NonZeroU32::new(1).unwrap())),
    );
    provider.register(
        Arc::new(NcaaScoreboard::new(Some(&ncaa.uri()), None).unwrap()),
        None,
    );

    let week1 = FetchParams { league: League::College, week: Some(1) };
    let week2 = FetchParams { league: League::College, week: Some(2) };

    let first = provider.fetch(DataKind::Games, &week1).await;
    assert_eq!(
        first.origin,
        Origin::Live { source: "espn_scoreboard".into() }
    );

    // ESPN's window is spent; the next cycle must fall through to the NCAA
    // source, not to synthetic data.
    let second = provider.fetch(DataKind::Games, &week2).await;
    assert_eq!(
        second.origin,
        Origin::Live { source: "ncaa_scoreboard".into() }
    );
}

#[tokio::test]
async fn quota_exhausted_source_is_disabled_for_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4/sports/americanfootball_nfl/odds"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Usage quota has been reached.",
            "error_code": "OUT_OF_USAGE_CREDITS"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut provider = DataProvider::new(SyntheticGenerator::seeded(99), fast_policy());
    provider.register(
        Arc::new(TheOddsApi::new(Some(&server.uri()), "test-key", None).unwrap()),
        None,
    );

    let week1 = FetchParams { league: League::Nfl, week: Some(1) };
    let week2 = FetchParams { league: League::Nfl, week: Some(2) };

    let first = provider.fetch(DataKind::Odds, &week1).await;
    assert_eq!(first.origin, Origin::Synthetic);

    // A second call must not touch the source again.
    let second = provider.fetch(DataKind::Odds, &week2).await;
    assert_eq!(second.origin, Origin::Synthetic);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn empty_source_list_matches_seeded_generator_exactly() {
    let provider = DataProvider::new(SyntheticGenerator::seeded(42), fast_policy());
    let reference = SyntheticGenerator::seeded(42);
    let params = FetchParams { league: League::Nfl, week: Some(5) };

    for kind in DataKind::ALL {
        let snapshot = provider.fetch(kind, &params).await;
        assert_eq!(snapshot.origin, Origin::Synthetic);
        assert_eq!(
            snapshot.data,
            reference.generate(kind, &params),
            "kind {kind} diverged from the reference generator"
        );
    }
}

#[tokio::test]
async fn fetch_never_fails_for_any_kind_or_league() {
    let provider = DataProvider::new(SyntheticGenerator::seeded(7), fast_policy());

    for league in [League::Nfl, League::College] {
        for kind in DataKind::ALL {
            let snapshot = provider.fetch(kind, &FetchParams::current(league)).await;
            assert_eq!(snapshot.kind(), kind);
            assert!(
                !snapshot.data.is_empty(),
                "{kind}/{league} produced an empty snapshot"
            );
        }
    }
}
