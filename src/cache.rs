// src/cache.rs
//! In-memory store of finished searches, keyed by an opaque token.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::error::{JobSearchError, JobSearchResult};
use crate::search::SearchResult;

pub const DEFAULT_CACHE_CAPACITY: usize = 256;

struct CacheEntry {
    result: Arc<SearchResult>,
    stored_at: Instant,
}

/// Shared across requests; entries are immutable once stored.
///
/// Capacity is bounded: storing past it evicts the least recently used
/// search. With a TTL configured, older entries read as not found.
pub struct ResultCache {
    entries: Mutex<LruCache<Uuid, CacheEntry>>,
    ttl: Option<Duration>,
}

impl ResultCache {
    pub fn new(capacity: NonZeroUsize, ttl: Option<Duration>) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    pub async fn store(&self, result: SearchResult) -> String {
        let token = Uuid::new_v4();
        let entry = CacheEntry {
            result: Arc::new(result),
            stored_at: Instant::now(),
        };

        let mut entries = self.entries.lock().await;
        if let Some((evicted, _)) = entries.push(token, entry) {
            debug!("Result cache at capacity, evicted {}", evicted);
        }
        trace!("Stored search result {} ({} cached)", token, entries.len());

        token.to_string()
    }

    pub async fn load(&self, token: &str) -> JobSearchResult<Arc<SearchResult>> {
        let key = Uuid::parse_str(token).map_err(|_| JobSearchError::NotFound)?;
        let mut entries = self.entries.lock().await;

        let expired = match entries.get(&key) {
            Some(entry) => self.is_expired(entry),
            None => return Err(JobSearchError::NotFound),
        };

        if expired {
            entries.pop(&key);
            debug!("Search result {} expired", key);
            return Err(JobSearchError::NotFound);
        }

        entries
            .get(&key)
            .map(|entry| Arc::clone(&entry.result))
            .ok_or(JobSearchError::NotFound)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        self.ttl
            .map(|ttl| entry.stored_at.elapsed() >= ttl)
            .unwrap_or(false)
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        let capacity = NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self::new(capacity, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::orchestrator::tests::sample_table;
    use crate::search::{SearchRequest, Site};

    fn result(term: &str) -> SearchResult {
        SearchResult::new(
            sample_table(),
            SearchRequest::new(Site::Indeed, term).resolve(),
        )
    }

    #[tokio::test]
    async fn test_store_then_load_returns_same_result() {
        let cache = ResultCache::default();
        let stored = result("engineer");

        let token = cache.store(stored.clone()).await;
        let loaded = cache.load(&token).await.unwrap();

        assert_eq!(*loaded, stored);
    }

    #[tokio::test]
    async fn test_unknown_or_malformed_token_is_not_found() {
        let cache = ResultCache::default();
        cache.store(result("engineer")).await;

        let unknown = Uuid::new_v4().to_string();
        assert_eq!(cache.load(&unknown).await.unwrap_err(), JobSearchError::NotFound);
        assert_eq!(cache.load("not-a-token").await.unwrap_err(), JobSearchError::NotFound);
    }

    #[tokio::test]
    async fn test_tokens_are_unique() {
        let cache = ResultCache::default();
        let first = cache.store(result("a")).await;
        let second = cache.store(result("a")).await;

        assert_ne!(first, second);
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_capacity_evicts_least_recently_used() {
        let cache = ResultCache::new(NonZeroUsize::new(2).unwrap(), None);
        let first = cache.store(result("first")).await;
        let second = cache.store(result("second")).await;

        // touch the first so the second becomes the eviction candidate
        cache.load(&first).await.unwrap();
        let third = cache.store(result("third")).await;

        assert!(cache.load(&first).await.is_ok());
        assert_eq!(cache.load(&second).await.unwrap_err(), JobSearchError::NotFound);
        assert!(cache.load(&third).await.is_ok());
    }

    #[tokio::test]
    async fn test_expired_entries_are_not_found() {
        let cache = ResultCache::new(NonZeroUsize::new(4).unwrap(), Some(Duration::ZERO));
        let token = cache.store(result("engineer")).await;

        assert_eq!(cache.load(&token).await.unwrap_err(), JobSearchError::NotFound);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_concurrent_stores_do_not_collide() {
        let cache = Arc::new(ResultCache::default());

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.store(result(&format!("term {i}"))).await })
            })
            .collect();

        let mut tokens = Vec::new();
        for handle in handles {
            tokens.push(handle.await.unwrap());
        }

        for (i, token) in tokens.iter().enumerate() {
            let loaded = cache.load(token).await.unwrap();
            assert_eq!(loaded.params.search_term, format!("term {i}"));
        }
    }
}
