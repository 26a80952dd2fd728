//! Cache Store Module
//!
//! Thread-safe wrapper around [`LruCache`] used by a group. The LRU is only
//! allocated on the first write.

use parking_lot::Mutex;

use crate::cache::{ByteView, LruCache, StoreStats};

// == Inner State ==
#[derive(Debug, Default)]
struct Inner {
    lru: Option<LruCache<ByteView>>,
    stats: StoreStats,
}

// == Cache Store ==
/// Mutex-guarded, lazily allocated byte-bounded store.
///
/// Every operation takes the lock exclusively since reads reorder recency.
#[derive(Debug)]
pub struct CacheStore {
    max_bytes: usize,
    inner: Mutex<Inner>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store bounded to `max_bytes` (0 = unbounded).
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            inner: Mutex::new(Inner::default()),
        }
    }

    // == Add ==
    /// Inserts or replaces a value, evicting as needed.
    pub fn add(&self, key: &str, value: ByteView) {
        let mut inner = self.inner.lock();
        let max_bytes = self.max_bytes;
        let evicted = inner
            .lru
            .get_or_insert_with(|| LruCache::new(max_bytes))
            .add(key, value);
        inner.stats.record_evictions(evicted);
    }

    // == Get ==
    /// Retrieves a value; a never-written store reports a miss.
    pub fn get(&self, key: &str) -> Option<ByteView> {
        let mut inner = self.inner.lock();
        let value = inner.lru.as_mut().and_then(|lru| lru.get(key).cloned());
        match value {
            Some(_) => inner.stats.record_hit(),
            None => inner.stats.record_miss(),
        }
        value
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.inner.lock().lru.as_ref().map_or(0, LruCache::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes charged to resident entries.
    pub fn used_bytes(&self) -> usize {
        self.inner.lock().lru.as_ref().map_or(0, LruCache::used_bytes)
    }

    /// Whether the backing LRU has been allocated yet.
    pub fn is_allocated(&self) -> bool {
        self.inner.lock().lru.is_some()
    }

    // == Stats ==
    /// Returns a snapshot of the store counters.
    pub fn stats(&self) -> StoreStats {
        let inner = self.inner.lock();
        let mut stats = inner.stats.clone();
        if let Some(lru) = inner.lru.as_ref() {
            stats.total_entries = lru.len();
            stats.used_bytes = lru.used_bytes();
        }
        stats.max_bytes = self.max_bytes;
        stats
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_store_new_is_unallocated() {
        let store = CacheStore::new(100);
        assert!(store.is_empty());
        assert!(!store.is_allocated());
    }

    #[test]
    fn test_store_get_does_not_allocate() {
        let store = CacheStore::new(100);
        assert!(store.get("missing").is_none());
        assert!(!store.is_allocated());
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_add_and_get() {
        let store = CacheStore::new(100);
        store.add("key1", ByteView::from("value1"));

        assert!(store.is_allocated());
        assert_eq!(store.get("key1"), Some(ByteView::from("value1")));
        assert_eq!(store.len(), 1);
        assert_eq!(store.used_bytes(), 10);
    }

    #[test]
    fn test_store_eviction_counted() {
        let store = CacheStore::new(20);
        store.add("k1", ByteView::from("12345"));
        store.add("k2", ByteView::from("67890"));
        store.get("k1");
        store.add("k3", ByteView::from("short"));

        assert!(store.get("k2").is_none());
        let stats = store.stats();
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.used_bytes, 14);
        assert_eq!(stats.max_bytes, 20);
    }

    #[test]
    fn test_store_concurrent_access_respects_bound() {
        let store = Arc::new(CacheStore::new(256));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..200 {
                        let key = format!("t{t}-k{i}");
                        store.add(&key, ByteView::from("payload"));
                        store.get(&key);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(store.used_bytes() <= 256);
        assert!(store.len() > 0);
    }
}
