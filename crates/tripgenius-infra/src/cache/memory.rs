//! In-memory cache - used when Redis is not configured or unreachable.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use tripgenius_core::ports::{Cache, CacheError};

struct CacheEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }
}

/// HashMap cache behind an async RwLock. Expired entries are dropped lazily
/// on read. Data is lost on process restart.
pub struct InMemoryCache {
    store: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        {
            let store = self.store.read().await;
            match store.get(key) {
                Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        let mut store = self.store.write().await;
        if store.get(key).is_some_and(|entry| entry.is_expired(now)) {
            store.remove(key);
        }
        None
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let mut store = self.store.write().await;
        store.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at: ttl.map(|d| Instant::now() + d),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.write().await.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> bool {
        self.get(key).await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tripgenius_core::ports::read_through;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = InMemoryCache::new();
        cache.set("key1", "value1", None).await.unwrap();
        assert_eq!(cache.get("key1").await, Some("value1".to_string()));
        assert!(cache.exists("key1").await);
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = InMemoryCache::new();
        cache.set("key1", "value1", None).await.unwrap();
        cache.delete("key1").await.unwrap();
        assert_eq!(cache.get("key1").await, None);
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let cache = InMemoryCache::new();
        cache
            .set("short", "lived", Some(Duration::from_millis(20)))
            .await
            .unwrap();
        assert!(cache.exists("short").await);

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(cache.get("short").await, None);
        assert!(cache.store.read().await.get("short").is_none());
    }

    #[tokio::test]
    async fn test_read_through_fetches_once() {
        let cache = InMemoryCache::new();
        let ttl = Duration::from_secs(60);

        let first: Result<Vec<u32>, String> =
            read_through(&cache, "numbers", ttl, || async { Ok(vec![1, 2, 3]) }).await;
        let second: Result<Vec<u32>, String> = read_through(&cache, "numbers", ttl, || async {
            Err("should not be called".to_string())
        })
        .await;

        assert_eq!(first.unwrap(), vec![1, 2, 3]);
        assert_eq!(second.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_read_through_does_not_cache_errors() {
        let cache = InMemoryCache::new();
        let ttl = Duration::from_secs(60);

        let failed: Result<u32, String> =
            read_through(&cache, "n", ttl, || async { Err("boom".to_string()) }).await;
        assert!(failed.is_err());
        assert!(!cache.exists("n").await);
    }
}
