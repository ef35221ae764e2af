//! Time-to-live caches for the film catalog and proxied images.
//!
//! Entries are replaced whole and never mutated in place. Expired entries are
//! not returned but stay in memory until overwritten, unless the cache has a
//! capacity bound, in which case inserting into a full cache prunes expired
//! entries and then evicts the oldest one.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::clock::Clock;

pub trait TtlCache<K, V>: Send + Sync {
    /// Returns the value stored for `key` if it is younger than the TTL.
    fn get(&self, key: &K) -> Option<V>;

    /// Stores `value` for `key`, stamped with the current time.
    fn insert(&self, key: K, value: V);

    /// Number of stored entries, fresh or not.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct Stamped<V> {
    value: V,
    stored_at: Instant,
}

pub struct MemoryTtlCache<K, V> {
    ttl: Duration,
    max_entries: Option<usize>,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<K, Stamped<V>>>,
}

impl<K, V> MemoryTtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            max_entries: None,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Bounds the number of entries. Zero means unbounded.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = (max_entries > 0).then_some(max_entries);
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_fresh(ttl: Duration, stamped: &Stamped<V>, now: Instant) -> bool {
        now.saturating_duration_since(stamped.stored_at) < ttl
    }

    fn make_room(&self, entries: &mut HashMap<K, Stamped<V>>, now: Instant, max_entries: usize) {
        let ttl = self.ttl;
        entries.retain(|_, stamped| Self::is_fresh(ttl, stamped, now));
        while entries.len() >= max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, stamped)| stamped.stored_at)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    entries.remove(&key);
                }
                None => break,
            }
        }
    }
}

impl<K, V> TtlCache<K, V> for MemoryTtlCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
    fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let entries = self.entries.lock().unwrap();
        entries
            .get(key)
            .filter(|stamped| Self::is_fresh(self.ttl, stamped, now))
            .map(|stamped| stamped.value.clone())
    }

    fn insert(&self, key: K, value: V) {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap();
        if let Some(max_entries) = self.max_entries {
            if !entries.contains_key(&key) && entries.len() >= max_entries {
                self.make_room(&mut entries, now, max_entries);
            }
        }
        entries.insert(
            key,
            Stamped {
                value,
                stored_at: now,
            },
        );
    }

    fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn make_cache(ttl_secs: u64) -> (Arc<ManualClock>, MemoryTtlCache<String, u32>) {
        let clock = Arc::new(ManualClock::new());
        let cache = MemoryTtlCache::new(Duration::from_secs(ttl_secs), clock.clone());
        (clock, cache)
    }

    #[test]
    fn returns_value_until_ttl_elapses() {
        let (clock, cache) = make_cache(600);
        cache.insert("films".to_string(), 22);

        clock.advance(Duration::from_secs(599));
        assert_eq!(cache.get(&"films".to_string()), Some(22));

        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.get(&"films".to_string()), None);
        // Expired entries are kept until overwritten.
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn overwrite_restarts_the_ttl() {
        let (clock, cache) = make_cache(10);
        cache.insert("a".to_string(), 1);
        clock.advance(Duration::from_secs(8));
        cache.insert("a".to_string(), 2);
        clock.advance(Duration::from_secs(8));

        assert_eq!(cache.get(&"a".to_string()), Some(2));
    }

    #[test]
    fn unbounded_cache_keeps_growing() {
        let (_clock, cache) = make_cache(10);
        for i in 0..100 {
            cache.insert(format!("key-{}", i), i);
        }
        assert_eq!(cache.len(), 100);
    }

    #[test]
    fn bounded_cache_evicts_oldest_entry() {
        let (clock, cache) = make_cache(3600);
        let cache = cache.with_max_entries(2);

        cache.insert("first".to_string(), 1);
        clock.advance(Duration::from_secs(1));
        cache.insert("second".to_string(), 2);
        clock.advance(Duration::from_secs(1));
        cache.insert("third".to_string(), 3);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"first".to_string()), None);
        assert_eq!(cache.get(&"second".to_string()), Some(2));
        assert_eq!(cache.get(&"third".to_string()), Some(3));
    }

    #[test]
    fn bounded_cache_prunes_expired_before_evicting() {
        let (clock, cache) = make_cache(10);
        let cache = cache.with_max_entries(3);

        cache.insert("stale-1".to_string(), 1);
        cache.insert("stale-2".to_string(), 2);
        clock.advance(Duration::from_secs(5));
        cache.insert("fresh".to_string(), 3);
        clock.advance(Duration::from_secs(6));
        cache.insert("new".to_string(), 4);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"fresh".to_string()), Some(3));
        assert_eq!(cache.get(&"new".to_string()), Some(4));
    }

    #[test]
    fn replacing_a_key_in_a_full_cache_evicts_nothing() {
        let (_clock, cache) = make_cache(3600);
        let cache = cache.with_max_entries(2);
        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);
        cache.insert("a".to_string(), 3);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"a".to_string()), Some(3));
        assert_eq!(cache.get(&"b".to_string()), Some(2));
    }

    #[test]
    fn zero_max_entries_means_unbounded() {
        let (_clock, cache) = make_cache(10);
        let cache = cache.with_max_entries(0);
        for i in 0..5 {
            cache.insert(format!("key-{}", i), i);
        }
        assert_eq!(cache.len(), 5);
    }
}
