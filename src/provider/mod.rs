//! The remote-or-fallback data provider.
//!
//! One consolidated component replaces the per-page data services of the
//! original dashboard: for a data kind and request params it checks the TTL
//! cache, walks the registered sources in priority order, and degrades to
//! the synthetic generator when everything fails. `fetch` never errors —
//! the caller always receives a structurally valid snapshot.

pub mod cache;
pub mod limiter;

pub use cache::TtlCache;
pub use limiter::{RateLimit, SourceLimiter};

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::models::{DataKind, DataSet, FetchParams, Origin, Snapshot};
use crate::sources::{Source, SourceError};
use crate::synthetic::SyntheticGenerator;

/// Per-kind freshness windows.
#[derive(Debug, Clone, Copy)]
pub struct TtlTable {
    pub games: Duration,
    pub rankings: Duration,
    pub injuries: Duration,
    pub odds: Duration,
    pub news: Duration,
}

impl TtlTable {
    pub fn for_kind(&self, kind: DataKind) -> Duration {
        match kind {
            DataKind::Games => self.games,
            DataKind::Rankings => self.rankings,
            DataKind::Injuries => self.injuries,
            DataKind::Odds => self.odds,
            DataKind::News => self.news,
        }
    }
}

impl Default for TtlTable {
    fn default() -> Self {
        TtlTable {
            games: Duration::from_secs(30),
            rankings: Duration::from_secs(3600),
            injuries: Duration::from_secs(900),
            odds: Duration::from_secs(300),
            news: Duration::from_secs(600),
        }
    }
}

/// Knobs governing one source attempt and the cache.
#[derive(Debug, Clone, Copy)]
pub struct FetchPolicy {
    /// Hard deadline per attempt, on top of the HTTP client's own timeout.
    pub attempt_timeout: Duration,
    /// Total attempts per source, including the first.
    pub retry_attempts: u32,
    /// Linear backoff step between attempts.
    pub retry_backoff: Duration,
    pub ttls: TtlTable,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        FetchPolicy {
            attempt_timeout: Duration::from_secs(10),
            retry_attempts: 2,
            retry_backoff: Duration::from_millis(500),
            ttls: TtlTable::default(),
        }
    }
}

struct SourceSlot {
    source: Arc<dyn Source>,
    limiter: Option<SourceLimiter>,
}

/// Consolidated provider for all data kinds.
pub struct DataProvider {
    sources: HashMap<DataKind, Vec<SourceSlot>>,
    cache: TtlCache,
    /// Sources disabled for the rest of the session after a quota error.
    disabled: RwLock<HashSet<String>>,
    fallback: SyntheticGenerator,
    policy: FetchPolicy,
}

impl DataProvider {
    pub fn new(fallback: SyntheticGenerator, policy: FetchPolicy) -> Self {
        DataProvider {
            sources: HashMap::new(),
            cache: TtlCache::new(),
            disabled: RwLock::new(HashSet::new()),
            fallback,
            policy,
        }
    }

    /// Append a source to the priority list for its kind. Registration order
    /// is attempt order.
    pub fn register(&mut self, source: Arc<dyn Source>, limit: Option<RateLimit>) {
        let slot = SourceSlot {
            limiter: limit.map(SourceLimiter::new),
            source,
        };
        self.sources.entry(slot.source.kind()).or_default().push(slot);
    }

    /// Fetch one kind of data. Returns a cached snapshot when fresh, a live
    /// snapshot from the first source that succeeds, or a synthetic snapshot
    /// when every source fails or is skipped. Never errors.
    pub async fn fetch(&self, kind: DataKind, params: &FetchParams) -> Snapshot {
        if let Some(hit) = self.cache.get(kind, params).await {
            debug!(%kind, league = %params.league, "cache hit");
            return hit;
        }

        let ttl = self.policy.ttls.for_kind(kind);
        if let Some(snapshot) = self.try_sources(kind, params).await {
            self.cache.set(kind, params, snapshot.clone(), ttl).await;
            return snapshot;
        }

        info!(%kind, league = %params.league, "all sources exhausted, generating synthetic data");
        let snapshot = Snapshot {
            origin: Origin::Synthetic,
            fetched_at: Utc::now(),
            data: self.fallback.generate(kind, params),
        };
        self.cache.set(kind, params, snapshot.clone(), ttl).await;
        snapshot
    }

    async fn try_sources(&self, kind: DataKind, params: &FetchParams) -> Option<Snapshot> {
        let slots = self.sources.get(&kind)?;
        for slot in slots {
            let name = slot.source.name();

            if self.disabled.read().await.contains(name) {
                debug!(source = name, "skipping quota-disabled source");
                continue;
            }
            if let Some(limiter) = &slot.limiter {
                if !limiter.try_acquire() {
                    debug!(source = name, "rate window saturated, skipping this cycle");
                    continue;
                }
            }

            match self.attempt(slot.source.as_ref(), params).await {
                Ok(data) => {
                    info!(source = name, %kind, items = data.len(), "live fetch succeeded");
                    return Some(Snapshot {
                        origin: Origin::Live {
                            source: name.to_string(),
                        },
                        fetched_at: Utc::now(),
                        data,
                    });
                }
                Err(SourceError::Unsupported(league)) => {
                    debug!(source = name, %league, "source does not cover league");
                }
                Err(SourceError::QuotaExhausted) => {
                    warn!(source = name, "usage quota exhausted, disabling for this session");
                    self.disabled.write().await.insert(name.to_string());
                }
                Err(e) => {
                    warn!(source = name, error = %e, "source failed, trying next");
                }
            }
        }
        None
    }

    /// One source, bounded retries. Only retryable failures (timeout, 429,
    /// 5xx) get another attempt; network-level and parse failures do not.
    async fn attempt(
        &self,
        source: &dyn Source,
        params: &FetchParams,
    ) -> Result<DataSet, SourceError> {
        let attempts = self.policy.retry_attempts.max(1);
        let mut delay = self.policy.retry_backoff;
        let mut n = 0;
        loop {
            n += 1;
            let result = match tokio::time::timeout(self.policy.attempt_timeout, source.fetch(params))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(SourceError::Timeout),
            };
            match result {
                Err(ref e) if e.is_retryable() && n < attempts => {
                    debug!(source = source.name(), attempt = n, error = %e, "retrying after backoff");
                    tokio::time::sleep(delay).await;
                    delay += self.policy.retry_backoff;
                }
                other => return other,
            }
        }
    }

    pub fn cache(&self) -> &TtlCache {
        &self.cache
    }
}
