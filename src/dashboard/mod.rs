use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::debug;
use url::Url;

use crate::models::{DataKind, DataSet, FetchParams, League, Prediction, Snapshot};
use crate::predict;
use crate::provider::DataProvider;

/// Hosts the `/api/proxy` route will forward to. Everything else is refused.
const ALLOWED_PROXY_HOSTS: &[&str] = &[
    "site.api.espn.com",
    "api.the-odds-api.com",
    "api-sports.io",
    "ncaa-api.henrygd.me",
];

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<DataProvider>,
    pub http: reqwest::Client,
    /// Injected into proxied API-Sports requests so the browser never sees it.
    pub api_sports_key: Option<String>,
}

/// Build the Axum router for the dashboard.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/games", get(games_handler))
        .route("/api/rankings", get(rankings_handler))
        .route("/api/injuries", get(injuries_handler))
        .route("/api/odds", get(odds_handler))
        .route("/api/news", get(news_handler))
        .route("/api/predictions", get(predictions_handler))
        .route("/api/proxy", get(proxy_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// League/week selection shared by every data endpoint.
#[derive(Debug, Deserialize)]
pub struct ScopeQuery {
    league: Option<League>,
    week: Option<u16>,
}

impl ScopeQuery {
    fn params(&self) -> FetchParams {
        FetchParams {
            league: self.league.unwrap_or(League::Nfl),
            week: self.week,
        }
    }
}

async fn index_handler() -> impl IntoResponse {
    Html(DASHBOARD_HTML)
}

async fn fetch_kind(state: &AppState, kind: DataKind, query: &ScopeQuery) -> Json<Snapshot> {
    Json(state.provider.fetch(kind, &query.params()).await)
}

/// GET /api/games?league=nfl&week=5
async fn games_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ScopeQuery>,
) -> Json<Snapshot> {
    fetch_kind(&state, DataKind::Games, &query).await
}

/// GET /api/rankings?league=college
async fn rankings_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ScopeQuery>,
) -> Json<Snapshot> {
    fetch_kind(&state, DataKind::Rankings, &query).await
}

/// GET /api/injuries?league=nfl
async fn injuries_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ScopeQuery>,
) -> Json<Snapshot> {
    fetch_kind(&state, DataKind::Injuries, &query).await
}

/// GET /api/odds?league=nfl
async fn odds_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ScopeQuery>,
) -> Json<Snapshot> {
    fetch_kind(&state, DataKind::Odds, &query).await
}

/// GET /api/news?league=nfl
async fn news_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ScopeQuery>,
) -> Json<Snapshot> {
    fetch_kind(&state, DataKind::News, &query).await
}

/// GET /api/predictions?league=nfl&week=5
///
/// Forecast for every game on the current slate. Works off whatever the
/// provider returns — live or synthetic — so it never fails either.
async fn predictions_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ScopeQuery>,
) -> Json<Vec<Prediction>> {
    let snapshot = state.provider.fetch(DataKind::Games, &query.params()).await;
    let predictions = match &snapshot.data {
        DataSet::Games(games) => games
            .iter()
            .map(|g| predict::predict_matchup(g.league, &g.home_team, &g.away_team))
            .collect(),
        _ => Vec::new(),
    };
    Json(predictions)
}

#[derive(Debug, Deserialize)]
struct ProxyQuery {
    url: String,
}

/// GET /api/proxy?url=https://...
///
/// Same-origin forwarder for browser-side calls to the third-party APIs,
/// restricted to an allowlist of sports hosts. API keys are attached here,
/// server-side.
async fn proxy_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProxyQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let target = Url::parse(&query.url)
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("invalid url: {e}")))?;
    let host = target.host_str().unwrap_or_default().to_string();
    if !host_allowed(&host) {
        return Err((StatusCode::FORBIDDEN, format!("host '{host}' not allowed")));
    }
    debug!("Proxying request to {}", target);

    let mut request = state.http.get(target.as_str());
    if host.ends_with("api-sports.io") {
        if let Some(key) = &state.api_sports_key {
            request = request
                .header("x-rapidapi-key", key)
                .header("x-rapidapi-host", host.as_str());
        }
    }

    let resp = request
        .send()
        .await
        .map_err(|e| (StatusCode::BAD_GATEWAY, e.to_string()))?;

    let status = StatusCode::from_u16(resp.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/json")
        .to_string();
    let body = resp
        .bytes()
        .await
        .map_err(|e| (StatusCode::BAD_GATEWAY, e.to_string()))?;

    Ok((status, [(header::CONTENT_TYPE, content_type)], body.to_vec()))
}

fn host_allowed(host: &str) -> bool {
    ALLOWED_PROXY_HOSTS
        .iter()
        .any(|allowed| host == *allowed || host.ends_with(&format!(".{allowed}")))
}

/// Embedded single-file dashboard (HTML + CSS + JS)
const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Gridiron Hub</title>
<style>
  :root {
    --bg: #0b1209;
    --card: #141d12;
    --border: #24301f;
    --accent: #8bc34a;
    --accent-dim: #5a7f3b;
    --amber: #ffb300;
    --red: #ef5350;
    --text: #e6ebe2;
    --muted: #8a987f;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Inter', 'Helvetica Neue', sans-serif; }
  header { display: flex; align-items: center; gap: 1rem; padding: 1rem 2rem; border-bottom: 1px solid var(--border); }
  header h1 { font-size: 1.3rem; letter-spacing: .03em; }
  .origin-badge { padding: .2rem .6rem; border-radius: 4px; font-size: .72rem; font-weight: 700; text-transform: uppercase; }
  .origin-badge.live { background: var(--accent); color: #0b1209; }
  .origin-badge.synthetic { background: var(--amber); color: #0b1209; }
  .league-toggle { margin-left: auto; display: flex; gap: .4rem; }
  .league-toggle button { background: none; border: 1px solid var(--border); color: var(--muted); padding: .35rem .9rem; border-radius: 6px; cursor: pointer; font-size: .8rem; }
  .league-toggle button.active { border-color: var(--accent); color: var(--accent); }
  main { padding: 1.5rem 2rem; display: grid; gap: 1.5rem; }
  .cards { display: grid; grid-template-columns: repeat(auto-fill, minmax(250px, 1fr)); gap: 1rem; }
  .game-card { background: var(--card); border: 1px solid var(--border); border-radius: 10px; padding: 1rem; }
  .game-card .matchup { display: flex; justify-content: space-between; margin-bottom: .4rem; font-size: .92rem; }
  .game-card .score { font-weight: 700; }
  .game-card .meta { color: var(--muted); font-size: .78rem; display: flex; justify-content: space-between; }
  .game-card .live-tag { color: var(--red); font-weight: 700; }
  .panel { background: var(--card); border: 1px solid var(--border); border-radius: 10px; overflow: hidden; }
  .panel-header { padding: .8rem 1.1rem; border-bottom: 1px solid var(--border); font-weight: 600; font-size: .92rem; }
  table { width: 100%; border-collapse: collapse; }
  th { padding: .6rem 1rem; text-align: left; font-size: .72rem; text-transform: uppercase; color: var(--muted); border-bottom: 1px solid var(--border); }
  td { padding: .55rem 1rem; font-size: .85rem; border-bottom: 1px solid #18220f; }
  tr:last-child td { border-bottom: none; }
  .grid-2 { display: grid; grid-template-columns: 1fr 1fr; gap: 1.5rem; }
  @media (max-width: 820px) { .grid-2 { grid-template-columns: 1fr; } }
  .empty { color: var(--muted); text-align: center; padding: 1.6rem; font-size: .85rem; }
  .news-list { list-style: none; }
  .news-list li { padding: .7rem 1.1rem; border-bottom: 1px solid #18220f; }
  .news-list .headline { font-size: .9rem; }
  .news-list .summary { color: var(--muted); font-size: .78rem; margin-top: .2rem; }
  .fav { color: var(--accent); font-weight: 600; }
</style>
</head>
<body>
<header>
  <h1>🏈 Gridiron Hub</h1>
  <span class="origin-badge" id="origin-badge">…</span>
  <div class="league-toggle">
    <button id="btn-nfl" class="active" onclick="setLeague('nfl')">NFL</button>
    <button id="btn-college" onclick="setLeague('college')">College</button>
  </div>
</header>

<main>
  <div class="cards" id="game-cards"><div class="empty">Loading games…</div></div>

  <div class="panel">
    <div class="panel-header">Model Predictions</div>
    <table>
      <thead><tr><th>Matchup</th><th>Home Win</th><th>Away Win</th><th>Spread</th><th>Confidence</th><th>Read</th></tr></thead>
      <tbody id="pred-tbody"><tr><td colspan="6" class="empty">Loading…</td></tr></tbody>
    </table>
  </div>

  <div class="grid-2">
    <div class="panel">
      <div class="panel-header">Betting Lines</div>
      <table>
        <thead><tr><th>Matchup</th><th>Spread</th><th>ML (H/A)</th><th>Total</th><th>Book</th></tr></thead>
        <tbody id="odds-tbody"><tr><td colspan="5" class="empty">Loading…</td></tr></tbody>
      </table>
    </div>
    <div class="panel">
      <div class="panel-header">Rankings</div>
      <table>
        <thead><tr><th>#</th><th>Team</th><th>Record</th></tr></thead>
        <tbody id="rank-tbody"><tr><td colspan="3" class="empty">Loading…</td></tr></tbody>
      </table>
    </div>
  </div>

  <div class="grid-2">
    <div class="panel">
      <div class="panel-header">Injury Report</div>
      <table>
        <thead><tr><th>Team</th><th>Player</th><th>Pos</th><th>Status</th><th>Note</th></tr></thead>
        <tbody id="injury-tbody"><tr><td colspan="5" class="empty">Loading…</td></tr></tbody>
      </table>
    </div>
    <div class="panel">
      <div class="panel-header">Headlines</div>
      <ul class="news-list" id="news-list"><li class="empty">Loading…</li></ul>
    </div>
  </div>
</main>

<script>
let league = 'nfl';

function setLeague(next) {
  league = next;
  document.getElementById('btn-nfl').classList.toggle('active', next === 'nfl');
  document.getElementById('btn-college').classList.toggle('active', next === 'college');
  loadAll();
}

async function getSnapshot(kind) {
  const r = await fetch(`/api/${kind}?league=${league}`);
  if (!r.ok) return null;
  return r.json();
}

function statusLabel(g) {
  if (g.status.state === 'in_progress') return `<span class="live-tag">● ${g.status.clock}</span>`;
  if (g.status.state === 'final') return 'Final';
  return 'Scheduled';
}

async function loadGames() {
  const snap = await getSnapshot('games');
  if (!snap) return;
  const badge = document.getElementById('origin-badge');
  const live = snap.origin.type === 'live';
  badge.textContent = live ? `live · ${snap.origin.source}` : 'generated';
  badge.className = 'origin-badge ' + (live ? 'live' : 'synthetic');

  const el = document.getElementById('game-cards');
  const games = snap.data.items;
  if (!games.length) { el.innerHTML = '<div class="empty">No games on the slate</div>'; return; }
  el.innerHTML = games.map(g => `
    <div class="game-card">
      <div class="matchup"><span>${g.away_team}</span><span class="score">${g.away_score}</span></div>
      <div class="matchup"><span>${g.home_team}</span><span class="score">${g.home_score}</span></div>
      <div class="meta"><span>${statusLabel(g)}</span><span>${g.venue ?? ''}</span></div>
    </div>`).join('');
}

async function loadPredictions() {
  const r = await fetch(`/api/predictions?league=${league}`);
  if (!r.ok) return;
  const preds = await r.json();
  const tbody = document.getElementById('pred-tbody');
  if (!preds.length) { tbody.innerHTML = '<tr><td colspan="6" class="empty">Nothing to forecast</td></tr>'; return; }
  tbody.innerHTML = preds.map(p => `<tr>
    <td>${p.away_team} @ ${p.home_team}</td>
    <td class="${p.home_win_pct >= 50 ? 'fav' : ''}">${p.home_win_pct.toFixed(1)}%</td>
    <td class="${p.away_win_pct > 50 ? 'fav' : ''}">${p.away_win_pct.toFixed(1)}%</td>
    <td>${p.spread}</td>
    <td>${p.confidence.toFixed(0)}%</td>
    <td>${p.reasoning}</td>
  </tr>`).join('');
}

async function loadOdds() {
  const snap = await getSnapshot('odds');
  if (!snap) return;
  const tbody = document.getElementById('odds-tbody');
  const lines = snap.data.items;
  if (!lines.length) { tbody.innerHTML = '<tr><td colspan="5" class="empty">No lines posted</td></tr>'; return; }
  tbody.innerHTML = lines.map(l => `<tr>
    <td>${l.away_team} @ ${l.home_team}</td>
    <td>${l.spread > 0 ? '+' : ''}${l.spread.toFixed(1)}</td>
    <td>${l.home_moneyline} / ${l.away_moneyline}</td>
    <td>${l.total.toFixed(1)}</td>
    <td>${l.bookmaker}</td>
  </tr>`).join('');
}

async function loadRankings() {
  const snap = await getSnapshot('rankings');
  if (!snap) return;
  const tbody = document.getElementById('rank-tbody');
  const rows = snap.data.items;
  if (!rows.length) { tbody.innerHTML = '<tr><td colspan="3" class="empty">No rankings yet</td></tr>'; return; }
  tbody.innerHTML = rows.slice(0, 15).map(r => `<tr>
    <td>${r.rank}</td><td>${r.school}</td><td>${r.record}</td>
  </tr>`).join('');
}

async function loadInjuries() {
  const snap = await getSnapshot('injuries');
  if (!snap) return;
  const tbody = document.getElementById('injury-tbody');
  const rows = snap.data.items;
  if (!rows.length) { tbody.innerHTML = '<tr><td colspan="5" class="empty">No reports filed</td></tr>'; return; }
  tbody.innerHTML = rows.slice(0, 12).map(r => `<tr>
    <td>${r.team}</td><td>${r.player}</td><td>${r.position}</td><td>${r.status}</td><td>${r.detail ?? ''}</td>
  </tr>`).join('');
}

async function loadNews() {
  const snap = await getSnapshot('news');
  if (!snap) return;
  const list = document.getElementById('news-list');
  const items = snap.data.items;
  if (!items.length) { list.innerHTML = '<li class="empty">Quiet day on the wire</li>'; return; }
  list.innerHTML = items.slice(0, 8).map(n => `<li>
    <div class="headline">${n.link ? `<a href="${n.link}" target="_blank" rel="noopener" style="color:var(--text);">${n.headline}</a>` : n.headline}</div>
    ${n.summary ? `<div class="summary">${n.summary}</div>` : ''}
  </li>`).join('');
}

async function loadAll() {
  await Promise.all([loadGames(), loadPredictions(), loadOdds(), loadRankings(), loadInjuries(), loadNews()]);
}

loadAll();
setInterval(loadAll, 30000);
</script>
</body>
</html>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_allowlist() {
        assert!(host_allowed("site.api.espn.com"));
        assert!(host_allowed("v1.american-football.api-sports.io"));
        assert!(host_allowed("ncaa-api.henrygd.me"));
        assert!(!host_allowed("evil.example.com"));
        // suffix spoofing must not slip through
        assert!(!host_allowed("evilapi-sports.io"));
    }
}
