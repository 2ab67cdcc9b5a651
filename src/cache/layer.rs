//! Read-through layer that orchestrates freshness checks with data fetching.

use chrono::{DateTime, Duration, Utc};
use color_eyre::Result;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

use super::keys::QueryKey;
use super::store::CacheStore;

/// Whether a read-through lookup was served from the cache.
///
/// Surfaced to the HTTP layer so it can set the `X-Cache` response header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
  /// Fresh entry found, compute skipped
  Hit,
  /// Entry absent or stale, compute ran and its result was stored
  Miss,
}

impl CacheOutcome {
  /// Value for the `X-Cache` header.
  pub fn header_value(self) -> &'static str {
    match self {
      Self::Hit => "HIT",
      Self::Miss => "MISS",
    }
  }
}

/// Freshness predicate: an entry stored at `stored_at` is fresh at `now`
/// while strictly less than `ttl` has elapsed.
pub fn is_fresh(stored_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
  now - stored_at < ttl
}

/// Read-through response cache.
///
/// Sits between the HTTP handlers and the store, serving stored results while
/// they are within the freshness window and delegating to the underlying read
/// otherwise. Write handlers invalidate it wholesale via [`clear`].
///
/// [`clear`]: ResponseCache::clear
#[derive(Clone)]
pub struct ResponseCache {
  store: Arc<CacheStore>,
  /// How long before a stored entry is considered stale
  ttl: Duration,
}

impl ResponseCache {
  /// Create a cache with the default 60 second TTL.
  pub fn new() -> Self {
    Self {
      store: Arc::new(CacheStore::new()),
      ttl: Duration::seconds(60),
    }
  }

  /// Set the TTL for stored entries.
  pub fn with_ttl(mut self, ttl: Duration) -> Self {
    self.ttl = ttl;
    self
  }

  /// The composed read-through operation.
  ///
  /// 1. Look up the key; a fresh entry is returned as-is (`Hit`).
  /// 2. Otherwise await `compute`, store its result under the key with the
  ///    current timestamp, and return it (`Miss`).
  ///
  /// A failed `compute` propagates unchanged and stores nothing. The store
  /// lock is only held for the lookup and the insert, never across `compute`,
  /// so a slow database read does not block lookups for unrelated keys.
  pub async fn fetch_or_compute<K, F, Fut>(
    &self,
    key: &K,
    compute: F,
  ) -> Result<(Value, CacheOutcome)>
  where
    K: QueryKey,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Value>>,
  {
    let cache_key = key.cache_key();

    if let Some(entry) = self.store.get(&cache_key)? {
      if is_fresh(entry.stored_at, Utc::now(), self.ttl) {
        return Ok((entry.value, CacheOutcome::Hit));
      }
    }

    let value = compute().await?;
    self.store.put(&cache_key, value.clone())?;

    Ok((value, CacheOutcome::Miss))
  }

  /// Remove all entries. Called by write handlers after a mutation commits.
  pub fn clear(&self) -> Result<()> {
    self.store.clear()
  }

  /// Direct access to the underlying store.
  pub fn store(&self) -> &CacheStore {
    &self.store
  }
}

impl Default for ResponseCache {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::keys::ListKey;
  use chrono::TimeZone;
  use color_eyre::eyre::eyre;
  use serde_json::json;
  use std::sync::atomic::{AtomicU32, Ordering};

  fn issues_key() -> ListKey {
    ListKey::Issues {
      page: 1,
      limit: 20,
      user_id: None,
    }
  }

  #[tokio::test]
  async fn test_miss_then_hit() {
    let cache = ResponseCache::new();
    let calls = AtomicU32::new(0);

    let compute = || {
      calls.fetch_add(1, Ordering::SeqCst);
      async { Ok(json!({"data": [1, 2, 3]})) }
    };

    let (value, outcome) = cache.fetch_or_compute(&issues_key(), compute).await.unwrap();
    assert_eq!(outcome, CacheOutcome::Miss);
    assert_eq!(value, json!({"data": [1, 2, 3]}));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Second call within the TTL serves the stored value without computing.
    let compute = || {
      calls.fetch_add(1, Ordering::SeqCst);
      async { Ok(json!({"data": ["recomputed"]})) }
    };

    let (value, outcome) = cache.fetch_or_compute(&issues_key(), compute).await.unwrap();
    assert_eq!(outcome, CacheOutcome::Hit);
    assert_eq!(value, json!({"data": [1, 2, 3]}));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_expiry_recomputes() {
    // Zero TTL: every stored entry is immediately stale.
    let cache = ResponseCache::new().with_ttl(Duration::zero());
    let calls = AtomicU32::new(0);

    for _ in 0..2 {
      let (_, outcome) = cache
        .fetch_or_compute(&issues_key(), || {
          let n = calls.fetch_add(1, Ordering::SeqCst);
          async move { Ok(json!(n)) }
        })
        .await
        .unwrap();
      assert_eq!(outcome, CacheOutcome::Miss);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);

    // The stored entry was refreshed by the second compute.
    let entry = cache.store().get("issues:1:20:all").unwrap().unwrap();
    assert_eq!(entry.value, json!(1));
  }

  #[tokio::test]
  async fn test_failed_compute_stores_nothing() {
    let cache = ResponseCache::new();

    let result = cache
      .fetch_or_compute(&issues_key(), || async { Err(eyre!("store unavailable")) })
      .await;

    assert!(result.is_err());
    assert!(cache.store().get("issues:1:20:all").unwrap().is_none());
  }

  #[tokio::test]
  async fn test_failure_leaves_other_entries_alone() {
    let cache = ResponseCache::new();
    cache
      .fetch_or_compute(&issues_key(), || async { Ok(json!(1)) })
      .await
      .unwrap();

    let _ = cache
      .fetch_or_compute(
        &ListKey::Issues {
          page: 2,
          limit: 20,
          user_id: None,
        },
        || async { Err(eyre!("boom")) },
      )
      .await;

    assert_eq!(
      cache.store().get("issues:1:20:all").unwrap().unwrap().value,
      json!(1)
    );
    assert!(cache.store().get("issues:2:20:all").unwrap().is_none());
  }

  #[tokio::test]
  async fn test_clear_invalidates_between_calls() {
    let cache = ResponseCache::new();
    let calls = AtomicU32::new(0);

    cache
      .fetch_or_compute(&issues_key(), || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Ok(json!("page")) }
      })
      .await
      .unwrap();

    cache.clear().unwrap();

    let (_, outcome) = cache
      .fetch_or_compute(&issues_key(), || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Ok(json!("page")) }
      })
      .await
      .unwrap();

    assert_eq!(outcome, CacheOutcome::Miss);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
  }

  #[test]
  fn test_freshness_window() {
    // Entry stored at t=0 under a 60s TTL: fresh at 30s, stale at 61s.
    let stored_at = Utc.timestamp_millis_opt(0).unwrap();
    let ttl = Duration::milliseconds(60_000);

    assert!(is_fresh(
      stored_at,
      Utc.timestamp_millis_opt(30_000).unwrap(),
      ttl
    ));
    assert!(!is_fresh(
      stored_at,
      Utc.timestamp_millis_opt(61_000).unwrap(),
      ttl
    ));
    // The boundary itself is stale: freshness requires strictly less than TTL.
    assert!(!is_fresh(
      stored_at,
      Utc.timestamp_millis_opt(60_000).unwrap(),
      ttl
    ));
  }

  #[tokio::test]
  async fn test_stale_entry_treated_as_miss() {
    let cache = ResponseCache::new();

    // Backdate an entry past the TTL, then read through it.
    let stored_at = Utc::now() - Duration::seconds(61);
    cache
      .store()
      .put_at("issues:1:20:all", json!("stale"), stored_at)
      .unwrap();

    let (value, outcome) = cache
      .fetch_or_compute(&issues_key(), || async { Ok(json!("fresh")) })
      .await
      .unwrap();

    assert_eq!(outcome, CacheOutcome::Miss);
    assert_eq!(value, json!("fresh"));
  }
}
