//! Concurrent read-through cache with hit/miss counters.

use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Hit/miss counters of one cache instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStatistics {
    /// Which cache the numbers belong to.
    pub name: &'static str,
    /// Lookups answered from the cache.
    pub hit_count: u64,
    /// Lookups that had to be computed.
    pub miss_count: u64,
}

impl CacheStatistics {
    /// Returns `hits / (hits + misses)` as a percentage, 0 before any lookup.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn efficiency_percent(&self) -> f64 {
        let total = self.hit_count + self.miss_count;
        if total == 0 {
            0.0
        } else {
            self.hit_count as f64 * 100.0 / total as f64
        }
    }
}

/// Memoizes validation results by dependency value.
///
/// Entries are never invalidated; the owner is dropped and replaced when the
/// rules change.
#[derive(Debug)]
pub(crate) struct DependencyCache<K, V>
where
    K: Eq + Hash,
{
    name: &'static str,
    entries: DashMap<K, V>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K, V> DependencyCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub(crate) fn new(name: &'static str) -> Self {
        tracing::debug!("creating {name} cache");
        Self {
            name,
            entries: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns the cached value for `key`, computing and storing it on a miss.
    ///
    /// `compute` runs at most once per key.
    pub(crate) fn get_or_compute(&self, key: &K, compute: impl FnOnce() -> V) -> V {
        if let Some(value) = self.entries.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return value.clone();
        }

        match self.entries.entry(key.clone()) {
            Entry::Occupied(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                let value = compute();
                entry.insert(value.clone());
                value
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn statistics(&self) -> CacheStatistics {
        CacheStatistics {
            name: self.name,
            hit_count: self.hits.load(Ordering::Relaxed),
            miss_count: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn efficiency_is_zero_without_lookups() {
        let cache: DependencyCache<u32, u32> = DependencyCache::new("test");
        assert_eq!(cache.statistics().efficiency_percent(), 0.0);
    }

    #[test]
    fn first_lookup_misses_then_hits() {
        let cache = DependencyCache::new("test");
        let mut calls = 0;
        for _ in 0..3 {
            let value = cache.get_or_compute(&"key", || {
                calls += 1;
                42
            });
            assert_eq!(value, 42);
        }
        assert_eq!(calls, 1);
        let stats = cache.statistics();
        assert_eq!(stats.miss_count, 1);
        assert_eq!(stats.hit_count, 2);
        assert!((stats.efficiency_percent() - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn distinct_keys_are_separate_entries() {
        let cache = DependencyCache::new("test");
        cache.get_or_compute(&1, || "a");
        cache.get_or_compute(&2, || "b");
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get_or_compute(&2, || "z"), "b");
    }

    #[test]
    fn concurrent_lookups_compute_once_per_key() {
        let cache = Arc::new(DependencyCache::new("test"));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for key in 0..50u32 {
                        assert_eq!(cache.get_or_compute(&key, || key * 2), key * 2);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let stats = cache.statistics();
        assert_eq!(stats.miss_count, 50);
        assert_eq!(stats.hit_count, 8 * 50 - 50);
    }
}
