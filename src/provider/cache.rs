//! In-memory TTL cache for fetch results.
//!
//! One entry per `(kind, params)` pair. Expiry is lazy: a stale entry is
//! simply treated as absent on read and overwritten by the next fetch.
//! There is no eviction and no size bound — the key space is a handful of
//! kind/league/week combinations, all bounded by the process lifetime.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::models::{DataKind, FetchParams, Snapshot};

type Key = (DataKind, FetchParams);

struct Entry {
    snapshot: Snapshot,
    stored_at: Instant,
    ttl: Duration,
}

/// Thread-safe TTL cache shared by every fetch path.
#[derive(Clone)]
pub struct TtlCache {
    inner: Arc<RwLock<HashMap<Key, Entry>>>,
}

impl TtlCache {
    pub fn new() -> Self {
        TtlCache {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Return the stored snapshot while it is still fresh; an expired entry
    /// reads as absent, not as an error.
    pub async fn get(&self, kind: DataKind, params: &FetchParams) -> Option<Snapshot> {
        let map = self.inner.read().await;
        let entry = map.get(&(kind, params.clone()))?;
        if entry.stored_at.elapsed() < entry.ttl {
            Some(entry.snapshot.clone())
        } else {
            None
        }
    }

    /// Store unconditionally, replacing any previous entry for the key.
    pub async fn set(&self, kind: DataKind, params: &FetchParams, snapshot: Snapshot, ttl: Duration) {
        let mut map = self.inner.write().await;
        map.insert(
            (kind, params.clone()),
            Entry {
                snapshot,
                stored_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Number of entries, fresh or stale.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DataSet, League, Origin};
    use chrono::Utc;

    fn snapshot(marker: &str) -> Snapshot {
        Snapshot {
            origin: Origin::Live {
                source: marker.into(),
            },
            fetched_at: Utc::now(),
            data: DataSet::Games(vec![]),
        }
    }

    fn params() -> FetchParams {
        FetchParams {
            league: League::Nfl,
            week: Some(5),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_entry_is_returned() {
        let cache = TtlCache::new();
        cache
            .set(DataKind::Games, &params(), snapshot("a"), Duration::from_secs(30))
            .await;

        let hit = cache.get(DataKind::Games, &params()).await;
        assert!(hit.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = TtlCache::new();
        cache
            .set(DataKind::Games, &params(), snapshot("a"), Duration::from_secs(30))
            .await;

        tokio::time::advance(Duration::from_secs(29)).await;
        assert!(cache.get(DataKind::Games, &params()).await.is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get(DataKind::Games, &params()).await.is_none());
        // entry stays until the next set — expiry is lazy
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_overwrites_and_resets_clock() {
        let cache = TtlCache::new();
        cache
            .set(DataKind::Games, &params(), snapshot("old"), Duration::from_secs(30))
            .await;
        tokio::time::advance(Duration::from_secs(25)).await;
        cache
            .set(DataKind::Games, &params(), snapshot("new"), Duration::from_secs(30))
            .await;
        tokio::time::advance(Duration::from_secs(10)).await;

        let hit = cache.get(DataKind::Games, &params()).await.unwrap();
        assert_eq!(
            hit.origin,
            Origin::Live {
                source: "new".into()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_distinct_params_do_not_collide() {
        let cache = TtlCache::new();
        let week5 = params();
        let week6 = FetchParams {
            league: League::Nfl,
            week: Some(6),
        };
        cache
            .set(DataKind::Games, &week5, snapshot("w5"), Duration::from_secs(30))
            .await;

        assert!(cache.get(DataKind::Games, &week6).await.is_none());
        assert!(cache.get(DataKind::Odds, &week5).await.is_none());
    }
}
