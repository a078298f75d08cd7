//! Cache Store Module
//!
//! TTL key/value storage for serialized handler responses, plus the backend
//! trait the read-through layer talks to.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{CacheEntry, CacheStats, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::CacheError;

// == Cache Backend ==
/// A TTL-keyed store of JSON text addressed by composite string keys.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Returns the payload under `key` if present and not expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `value` under `key`, replacing any previous entry, expiring after
    /// `ttl_seconds`.
    async fn set_ex(&self, key: &str, value: String, ttl_seconds: u64) -> Result<(), CacheError>;

    /// Current counters.
    async fn stats(&self) -> CacheStats;
}

// == TTL Store ==
/// In-process TTL store. Expired entries are dropped when read, and swept in
/// bulk when the store reaches capacity.
#[derive(Debug)]
pub struct TtlStore {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
    max_entries: usize,
}

impl TtlStore {
    // == Constructor ==
    /// Creates an empty store holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            max_entries,
        }
    }

    // == Set ==
    /// Stores a payload with a TTL, overwriting and re-arming an existing key.
    ///
    /// When the store is full the expired entries are swept first; if that
    /// frees nothing the write is refused.
    pub fn set(
        &mut self,
        key: String,
        payload: String,
        ttl_seconds: u64,
    ) -> Result<(), CacheError> {
        if key.is_empty() || key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidKey(format!(
                "key must be 1..={} bytes, got {}",
                MAX_KEY_LENGTH,
                key.len()
            )));
        }

        if payload.len() > MAX_VALUE_SIZE {
            return Err(CacheError::ValueTooLarge(payload.len()));
        }

        let is_overwrite = self.entries.contains_key(&key);
        if !is_overwrite && self.entries.len() >= self.max_entries {
            let swept = self.cleanup_expired();
            self.stats.record_evictions(swept);
            if self.entries.len() >= self.max_entries {
                return Err(CacheError::CacheFull(format!(
                    "{} live entries",
                    self.entries.len()
                )));
            }
        }

        self.entries
            .insert(key, CacheEntry::new(payload, ttl_seconds));
        self.stats.set_total_entries(self.entries.len());

        Ok(())
    }

    // == Get ==
    /// Returns a fresh entry. Expired entries are removed and count as misses.
    pub fn get(&mut self, key: &str) -> Option<&CacheEntry> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.entries.remove(key);
            self.stats.set_total_entries(self.entries.len());
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        self.entries.get(key)
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        self.stats.set_total_entries(self.entries.len());
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Shared Store ==
/// `TtlStore` behind an async lock, shared across request handlers.
#[derive(Debug, Clone)]
pub struct SharedStore {
    inner: Arc<RwLock<TtlStore>>,
}

impl SharedStore {
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(TtlStore::new(max_entries))),
        }
    }
}

#[async_trait]
impl CacheBackend for SharedStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        // Write lock: a read may drop an expired entry and always bumps counters
        let mut store = self.inner.write().await;
        Ok(store.get(key).map(|entry| {
            tracing::trace!(
                key,
                ttl_remaining_ms = entry.ttl_remaining().as_millis() as u64,
                "fresh entry"
            );
            entry.payload.clone()
        }))
    }

    async fn set_ex(&self, key: &str, value: String, ttl_seconds: u64) -> Result<(), CacheError> {
        let mut store = self.inner.write().await;
        store.set(key.to_string(), value, ttl_seconds)
    }

    async fn stats(&self) -> CacheStats {
        self.inner.read().await.stats()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_store_new() {
        let store = TtlStore::new(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = TtlStore::new(100);

        store
            .set("sky_summary:35.9:-86.9".into(), r#"{"a":1}"#.into(), 120)
            .unwrap();
        let entry = store.get("sky_summary:35.9:-86.9").unwrap();

        assert_eq!(entry.payload, r#"{"a":1}"#);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = TtlStore::new(100);
        assert!(store.get("missing").is_none());
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_overwrite_resets_payload() {
        let mut store = TtlStore::new(100);

        store.set("k".into(), "1".into(), 120).unwrap();
        store.set("k".into(), "2".into(), 120).unwrap();

        assert_eq!(store.get("k").unwrap().payload, "2");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = TtlStore::new(100);

        store.set("k".into(), "v".into(), 1).unwrap();
        assert!(store.get("k").is_some());

        sleep(Duration::from_millis(1100));

        assert!(store.get("k").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_full_sweeps_expired() {
        let mut store = TtlStore::new(2);

        store.set("a".into(), "1".into(), 1).unwrap();
        store.set("b".into(), "2".into(), 60).unwrap();

        sleep(Duration::from_millis(1100));

        store.set("c".into(), "3".into(), 60).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.stats().evictions, 1);
        assert!(store.get("c").is_some());
    }

    #[test]
    fn test_store_full_of_live_entries_refuses() {
        let mut store = TtlStore::new(1);

        store.set("a".into(), "1".into(), 60).unwrap();
        let result = store.set("b".into(), "2".into(), 60);

        assert!(matches!(result, Err(CacheError::CacheFull(_))));
        // Overwriting an existing key is still allowed
        assert!(store.set("a".into(), "3".into(), 60).is_ok());
    }

    #[test]
    fn test_store_stats() {
        let mut store = TtlStore::new(100);

        store.set("k".into(), "v".into(), 60).unwrap();
        store.get("k");
        store.get("nope");

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn test_store_cleanup_expired() {
        let mut store = TtlStore::new(100);

        store.set("short".into(), "v".into(), 1).unwrap();
        store.set("long".into(), "v".into(), 10).unwrap();

        sleep(Duration::from_millis(1100));

        assert_eq!(store.cleanup_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("long").is_some());
    }

    #[test]
    fn test_store_key_validation() {
        let mut store = TtlStore::new(100);

        let long_key = "x".repeat(MAX_KEY_LENGTH + 1);
        assert!(matches!(
            store.set(long_key, "v".into(), 60),
            Err(CacheError::InvalidKey(_))
        ));
        assert!(matches!(
            store.set(String::new(), "v".into(), 60),
            Err(CacheError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_store_value_too_large() {
        let mut store = TtlStore::new(100);
        let large_value = "x".repeat(MAX_VALUE_SIZE + 1);

        assert!(matches!(
            store.set("k".into(), large_value, 60),
            Err(CacheError::ValueTooLarge(_))
        ));
    }

    #[tokio::test]
    async fn test_shared_store_backend() {
        let store = SharedStore::new(10);

        store.set_ex("k", "v".to_string(), 60).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(store.get("other").await.unwrap(), None);

        let stats = store.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }
}
