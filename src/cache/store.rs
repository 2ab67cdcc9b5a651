//! In-memory cache storage: a single keyed map behind one lock.

use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// A stored response payload together with its insertion time.
#[derive(Debug, Clone)]
pub struct CacheEntry {
  /// The serialized result payload for the query
  pub value: Value,
  /// When the entry was inserted
  pub stored_at: DateTime<Utc>,
}

/// Map-based cache storage.
///
/// One entry per key (a later insert overwrites an earlier one). Entries
/// accumulate for the process lifetime; the only removal paths are the
/// wholesale `clear` and overwrites. Staleness is detected lazily by the
/// caller, never swept in the background.
pub struct CacheStore {
  entries: Mutex<HashMap<String, CacheEntry>>,
}

impl CacheStore {
  /// Create an empty store.
  pub fn new() -> Self {
    Self {
      entries: Mutex::new(HashMap::new()),
    }
  }

  /// Look up an entry. Pure read, no side effects.
  pub fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
    let entries = self
      .entries
      .lock()
      .map_err(|e| eyre!("Cache lock poisoned: {}", e))?;

    Ok(entries.get(key).cloned())
  }

  /// Insert or overwrite the entry for `key` with `stored_at = now`.
  pub fn put(&self, key: &str, value: Value) -> Result<()> {
    self.put_at(key, value, Utc::now())
  }

  /// Insert with an explicit timestamp. Used by `put` and by freshness tests.
  pub fn put_at(&self, key: &str, value: Value, stored_at: DateTime<Utc>) -> Result<()> {
    let mut entries = self
      .entries
      .lock()
      .map_err(|e| eyre!("Cache lock poisoned: {}", e))?;

    entries.insert(key.to_string(), CacheEntry { value, stored_at });
    Ok(())
  }

  /// Remove all entries unconditionally.
  pub fn clear(&self) -> Result<()> {
    let mut entries = self
      .entries
      .lock()
      .map_err(|e| eyre!("Cache lock poisoned: {}", e))?;

    entries.clear();
    Ok(())
  }

  /// Number of live entries.
  pub fn len(&self) -> Result<usize> {
    let entries = self
      .entries
      .lock()
      .map_err(|e| eyre!("Cache lock poisoned: {}", e))?;

    Ok(entries.len())
  }

  pub fn is_empty(&self) -> Result<bool> {
    Ok(self.len()? == 0)
  }
}

impl Default for CacheStore {
  fn default() -> Self {
    Self::new()
  }
}
