//! Bounded in-memory storage for cached query results.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

/// A cached query result.
#[derive(Debug, Clone)]
pub struct Entry<T> {
  pub values: Vec<T>,
  pub cached_at: Instant,
  seq: u64,
}

struct Inner<T> {
  entries: HashMap<String, Entry<T>>,
  next_seq: u64,
}

/// Size-bounded map from query key to cached result.
///
/// Holds at most `capacity` distinct entries; inserting past the bound evicts
/// the entry that has been resident longest. Expiry is the caller's concern.
pub struct MemoryStore<T> {
  inner: Mutex<Inner<T>>,
  capacity: usize,
}

impl<T: Clone> MemoryStore<T> {
  pub fn new(capacity: usize) -> Self {
    Self {
      inner: Mutex::new(Inner {
        entries: HashMap::new(),
        next_seq: 0,
      }),
      capacity,
    }
  }

  pub fn get(&self, key: &str) -> Option<Entry<T>> {
    let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
    inner.entries.get(key).cloned()
  }

  pub fn insert(&self, key: &str, values: Vec<T>) {
    let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

    if !inner.entries.contains_key(key) && inner.entries.len() >= self.capacity {
      let oldest = inner
        .entries
        .iter()
        .min_by_key(|(_, entry)| entry.seq)
        .map(|(k, _)| k.clone());
      if let Some(oldest) = oldest {
        inner.entries.remove(&oldest);
      }
    }

    let seq = inner.next_seq;
    inner.next_seq += 1;
    inner.entries.insert(
      key.to_string(),
      Entry {
        values,
        cached_at: Instant::now(),
        seq,
      },
    );
  }

  pub fn remove(&self, key: &str) {
    let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
    inner.entries.remove(key);
  }

  pub fn clear(&self) {
    let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
    inner.entries.clear();
  }

  #[cfg(test)]
  pub fn len(&self) -> usize {
    let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
    inner.entries.len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_insert_and_get() {
    let store: MemoryStore<u32> = MemoryStore::new(10);
    store.insert("a", vec![1, 2, 3]);

    let entry = store.get("a").unwrap();
    assert_eq!(entry.values, vec![1, 2, 3]);
    assert!(store.get("b").is_none());
  }

  #[test]
  fn test_remove_and_clear() {
    let store: MemoryStore<u32> = MemoryStore::new(10);
    store.insert("a", vec![1]);
    store.insert("b", vec![2]);

    store.remove("a");
    assert!(store.get("a").is_none());
    assert!(store.get("b").is_some());

    store.clear();
    assert_eq!(store.len(), 0);
  }

  #[test]
  fn test_capacity_evicts_longest_resident() {
    let store: MemoryStore<u32> = MemoryStore::new(2);
    store.insert("a", vec![1]);
    store.insert("b", vec![2]);
    store.insert("c", vec![3]);

    assert_eq!(store.len(), 2);
    assert!(store.get("a").is_none());
    assert!(store.get("b").is_some());
    assert!(store.get("c").is_some());
  }

  #[test]
  fn test_reinserting_existing_key_does_not_evict() {
    let store: MemoryStore<u32> = MemoryStore::new(2);
    store.insert("a", vec![1]);
    store.insert("b", vec![2]);
    store.insert("a", vec![9]);

    assert_eq!(store.len(), 2);
    assert_eq!(store.get("a").unwrap().values, vec![9]);
    assert!(store.get("b").is_some());
  }
}
