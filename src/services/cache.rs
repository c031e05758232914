use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use lru::LruCache;

/// Thread-safe, capacity-bounded LRU cache keyed by string.
pub struct Cache<V> {
    entries: Mutex<LruCache<String, V>>,
    /// Bumped by every invalidation, under the entries lock.
    generation: AtomicU64,
}

impl<V: Clone> Cache<V> {
    pub fn new(capacity: usize) -> anyhow::Result<Self> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| anyhow::anyhow!("cache capacity must be greater than zero"))?;
        Ok(Self {
            entries: Mutex::new(LruCache::new(capacity)),
            generation: AtomicU64::new(0),
        })
    }

    // A panic while holding the lock cannot leave the LRU half-updated.
    fn lock(&self) -> MutexGuard<'_, LruCache<String, V>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.lock().get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: V) {
        self.lock().put(key.into(), value);
    }

    /// Token to pass to [`Cache::set_if_current`] for a value computed after this call.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Stores `value` only if nothing was invalidated since `generation` was read.
    pub fn set_if_current(&self, key: impl Into<String>, value: V, generation: u64) -> bool {
        let mut entries = self.lock();
        if self.generation.load(Ordering::Acquire) != generation {
            return false;
        }
        entries.put(key.into(), value);
        true
    }

    pub fn delete(&self, key: &str) {
        let mut entries = self.lock();
        entries.pop(key);
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    pub fn purge(&self) {
        let mut entries = self.lock();
        entries.clear();
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_is_rejected() {
        assert!(Cache::<u32>::new(0).is_err());
    }

    #[test]
    fn test_least_recently_used_is_evicted() {
        let cache = Cache::new(2).unwrap();
        cache.set("a", 1);
        cache.set("b", 2);
        // Touch "a" so "b" becomes the eviction candidate.
        assert_eq!(cache.get("a"), Some(1));
        cache.set("c", 3);

        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("c"), Some(3));
    }

    #[test]
    fn test_value_read_before_invalidation_is_not_stored() {
        let cache = Cache::new(4).unwrap();
        let before = cache.generation();
        cache.delete("listing");
        assert!(!cache.set_if_current("listing", 1, before));
        assert_eq!(cache.get("listing"), None);

        let before = cache.generation();
        cache.purge();
        assert!(!cache.set_if_current("listing", 2, before));

        let current = cache.generation();
        assert!(cache.set_if_current("listing", 3, current));
        assert_eq!(cache.get("listing"), Some(3));
    }

    #[test]
    fn test_delete_and_purge() {
        let cache = Cache::new(4).unwrap();
        cache.set("a", "x".to_string());
        cache.set("b", "y".to_string());

        cache.delete("a");
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some("y".to_string()));

        cache.purge();
        assert_eq!(cache.get("b"), None);
    }
}
