//! Read cache that sits between the views and the store client.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::store::MemoryStore;

/// Entries older than this are treated as absent.
const DEFAULT_TTL: Duration = Duration::from_secs(600);

/// Distinct query results held at once. The student list is a single entry;
/// the bound is a safety net for parameterized queries.
const DEFAULT_CAPACITY: usize = 200;

/// Time- and size-bounded cache over list queries.
///
/// A fresh entry is served without touching the fetcher; an expired or
/// missing entry triggers a fetch, whose result is cached only on success.
/// Fetch failures propagate to the caller and are never cached, so a later
/// call retries the store. There is no stale-serving fallback.
pub struct ReadCache<T> {
  store: Arc<MemoryStore<T>>,
  ttl: Duration,
}

impl<T: Clone> ReadCache<T> {
  pub fn new() -> Self {
    Self {
      store: Arc::new(MemoryStore::new(DEFAULT_CAPACITY)),
      ttl: DEFAULT_TTL,
    }
  }

  /// Override the expiry window.
  #[cfg(test)]
  pub fn with_ttl(mut self, ttl: Duration) -> Self {
    self.ttl = ttl;
    self
  }

  /// Return the cached result for `key`, fetching on miss or expiry.
  pub async fn fetch<F, Fut, E>(&self, key: &str, fetcher: F) -> Result<Vec<T>, E>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
  {
    if let Some(entry) = self.store.get(key) {
      if entry.cached_at.elapsed() <= self.ttl {
        return Ok(entry.values);
      }
    }

    let values = fetcher().await?;
    self.store.insert(key, values.clone());
    Ok(values)
  }

  /// Drop the entry for `key`, forcing the next fetch to hit the store.
  pub fn invalidate(&self, key: &str) {
    self.store.remove(key);
  }

  /// Drop every entry.
  #[allow(dead_code)]
  pub fn invalidate_all(&self) {
    self.store.clear();
  }
}

impl<T: Clone> Default for ReadCache<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> Clone for ReadCache<T> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
      ttl: self.ttl,
    }
  }
}
