// =============================================================================
// TTL Cache — Injectable time-bounded memoisation for callers of the core
// =============================================================================
//
// The calculation modules never cache.  Callers that want to avoid recomputing
// (the HTTP layer, batch jobs) own a `Cache` and decide what to key on.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

/// Minimal cache contract.  Implementations must be safe to share across
/// threads.
pub trait Cache<K, V>: Send + Sync {
    /// Fresh value for `key`, if any.
    fn get(&self, key: &K) -> Option<V>;
    fn insert(&self, key: K, value: V);
    fn invalidate(&self, key: &K);
    fn clear(&self);
}

struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// Entry cap used by [`TtlCache::new`].
pub const DEFAULT_MAX_ENTRIES: usize = 1024;

/// In-memory cache whose entries expire `ttl` after insertion.  Holds at most
/// `max_entries`; inserting into a full cache evicts the oldest entry.
pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
    ttl: Duration,
    max_entries: usize,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self::bounded(ttl, DEFAULT_MAX_ENTRIES)
    }

    /// Cache holding at most `max_entries` (a cap of zero is raised to one).
    pub fn bounded(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Number of stored entries, expired ones included until pruned.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every expired entry.
    pub fn prune(&self) {
        let ttl = self.ttl;
        self.entries
            .write()
            .retain(|_, entry| entry.stored_at.elapsed() < ttl);
    }

    /// Return the cached value or compute, store and return a new one.
    pub fn get_or_insert_with<F>(&self, key: K, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.lookup(&key) {
            return value;
        }
        let value = compute();
        self.store(key, value.clone());
        value
    }

    fn lookup(&self, key: &K) -> Option<V> {
        let entries = self.entries.read();
        let entry = entries.get(key)?;
        if entry.stored_at.elapsed() < self.ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    fn store(&self, key: K, value: V) {
        let mut entries = self.entries.write();
        if !entries.contains_key(&key) && entries.len() >= self.max_entries {
            let ttl = self.ttl;
            entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
            if entries.len() >= self.max_entries {
                Self::evict_oldest(&mut entries);
            }
        }
        entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    fn evict_oldest(entries: &mut HashMap<K, CacheEntry<V>>) {
        let oldest = entries
            .iter()
            .min_by_key(|(_, entry)| entry.stored_at)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            entries.remove(&key);
        }
    }
}

impl<K, V> Cache<K, V> for TtlCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn get(&self, key: &K) -> Option<V> {
        self.lookup(key)
    }

    fn insert(&self, key: K, value: V) {
        self.store(key, value);
    }

    fn invalidate(&self, key: &K) {
        self.entries.write().remove(key);
    }

    fn clear(&self) {
        self.entries.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_returns_values() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60));
        cache.insert("gold".to_string(), 7);
        assert_eq!(cache.get(&"gold".to_string()), Some(7));
        assert_eq!(cache.get(&"silver".to_string()), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let cache: TtlCache<u8, u8> = TtlCache::new(Duration::ZERO);
        cache.insert(1, 1);
        assert_eq!(cache.get(&1), None);
        cache.prune();
        assert!(cache.is_empty());
    }

    #[test]
    fn invalidate_and_clear() {
        let cache: TtlCache<u8, &'static str> = TtlCache::new(Duration::from_secs(60));
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.invalidate(&1);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some("b"));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn get_or_insert_with_computes_once() {
        let cache: TtlCache<u8, u32> = TtlCache::new(Duration::from_secs(60));
        let mut calls = 0;
        let first = cache.get_or_insert_with(1, || {
            calls += 1;
            42
        });
        let second = cache.get_or_insert_with(1, || {
            calls += 1;
            0
        });
        assert_eq!((first, second), (42, 42));
        assert_eq!(calls, 1);
    }

    #[test]
    fn full_cache_evicts_oldest_entry() {
        let cache: TtlCache<u8, u8> = TtlCache::bounded(Duration::from_secs(60), 2);
        cache.insert(1, 10);
        std::thread::sleep(Duration::from_millis(2));
        cache.insert(2, 20);
        std::thread::sleep(Duration::from_millis(2));
        cache.insert(3, 30);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some(20));
        assert_eq!(cache.get(&3), Some(30));
    }

    #[test]
    fn overwriting_a_key_does_not_evict() {
        let cache: TtlCache<u8, u8> = TtlCache::bounded(Duration::from_secs(60), 2);
        cache.insert(1, 10);
        cache.insert(2, 20);
        cache.insert(2, 21);
        assert_eq!(cache.get(&1), Some(10));
        assert_eq!(cache.get(&2), Some(21));
    }

    #[test]
    fn zero_cap_is_raised_to_one() {
        let cache: TtlCache<u8, u8> = TtlCache::bounded(Duration::from_secs(60), 0);
        assert_eq!(cache.max_entries(), 1);
        cache.insert(1, 1);
        cache.insert(2, 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&2), Some(2));
    }

    #[test]
    fn usable_as_trait_object() {
        let cache: Box<dyn Cache<u8, u8>> = Box::new(TtlCache::new(Duration::from_secs(60)));
        cache.insert(3, 9);
        assert_eq!(cache.get(&3), Some(9));
    }
}
