//! Bounded score cache with least-recently-used eviction.
//!
//! Entries live in a slab threaded onto a doubly linked recency list by
//! index; a hash map finds the slot for a key. Everything sits behind one
//! mutex. Hit and miss counters are atomics so they can be read without
//! taking the lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

const NIL: usize = usize::MAX;

#[derive(Debug, Clone)]
struct Entry {
    key: u64,
    digest: u64,
    score: f64,
    prev: usize,
    next: usize,
}

#[derive(Debug, Default)]
struct Lru {
    map: HashMap<u64, usize>,
    entries: Vec<Entry>,
    /// Most recently used.
    head: usize,
    /// Least recently used.
    tail: usize,
}

impl Lru {
    fn new(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
            entries: Vec::with_capacity(capacity),
            head: NIL,
            tail: NIL,
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.entries[idx].prev, self.entries[idx].next);
        if prev == NIL {
            self.head = next;
        } else {
            self.entries[prev].next = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.entries[next].prev = prev;
        }
    }

    fn push_front(&mut self, idx: usize) {
        self.entries[idx].prev = NIL;
        self.entries[idx].next = self.head;
        if self.head != NIL {
            self.entries[self.head].prev = idx;
        }
        self.head = idx;
        if self.tail == NIL {
            self.tail = idx;
        }
    }

    fn touch(&mut self, idx: usize) {
        if self.head != idx {
            self.unlink(idx);
            self.push_front(idx);
        }
    }
}

/// Thread-safe memo of position scores keyed by Zobrist hash.
#[derive(Debug)]
pub struct ScoreCache {
    capacity: usize,
    inner: Mutex<Lru>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Counter snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub len: usize,
    pub capacity: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl ScoreCache {
    /// A cache holding at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            inner: Mutex::new(Lru::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Score stored for `key`, provided it was stored with the same
    /// `digest`. A digest mismatch is a hash collision and counts as a miss.
    pub fn get(&self, key: u64, digest: u64) -> Option<f64> {
        let mut lru = self.inner.lock();
        let found = lru
            .map
            .get(&key)
            .copied()
            .filter(|&idx| lru.entries[idx].digest == digest);
        match found {
            Some(idx) => {
                lru.touch(idx);
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(lru.entries[idx].score)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a score, evicting the least recently used entry when full.
    pub fn put(&self, key: u64, digest: u64, score: f64) {
        let mut lru = self.inner.lock();
        if let Some(&idx) = lru.map.get(&key) {
            lru.entries[idx].digest = digest;
            lru.entries[idx].score = score;
            lru.touch(idx);
            return;
        }

        let idx = if lru.entries.len() < self.capacity {
            lru.entries.push(Entry {
                key,
                digest,
                score,
                prev: NIL,
                next: NIL,
            });
            lru.entries.len() - 1
        } else {
            let victim = lru.tail;
            lru.unlink(victim);
            let old_key = lru.entries[victim].key;
            lru.map.remove(&old_key);
            tracing::trace!(key = old_key, "score cache eviction");
            let entry = &mut lru.entries[victim];
            entry.key = key;
            entry.digest = digest;
            entry.score = score;
            victim
        };
        lru.map.insert(key, idx);
        lru.push_front(idx);
    }

    /// Look up `key` or compute, store and return the score.
    pub fn get_or_insert_with(&self, key: u64, digest: u64, compute: impl FnOnce() -> f64) -> f64 {
        if let Some(score) = self.get(key, digest) {
            return score;
        }
        let score = compute();
        self.put(key, digest, score);
        score
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits(),
            misses: self.misses(),
            len: self.len(),
            capacity: self.capacity,
        }
    }

    /// Drop all entries and reset the counters.
    pub fn clear(&self) {
        *self.inner.lock() = Lru::new(self.capacity);
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_hit_and_miss_counters() {
        let cache = ScoreCache::new(4);
        assert_eq!(cache.get(1, 10), None);
        cache.put(1, 10, 2.5);
        assert_eq!(cache.get(1, 10), Some(2.5));
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn test_digest_mismatch_is_a_miss() {
        let cache = ScoreCache::new(4);
        cache.put(7, 100, 1.0);
        assert_eq!(cache.get(7, 101), None);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = ScoreCache::new(2);
        cache.put(1, 0, 1.0);
        cache.put(2, 0, 2.0);
        // Touch 1 so that 2 becomes the eviction victim.
        assert_eq!(cache.get(1, 0), Some(1.0));
        cache.put(3, 0, 3.0);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(2, 0), None);
        assert_eq!(cache.get(1, 0), Some(1.0));
        assert_eq!(cache.get(3, 0), Some(3.0));
    }

    #[test]
    fn test_overwrite_keeps_size() {
        let cache = ScoreCache::new(2);
        cache.put(1, 0, 1.0);
        cache.put(1, 0, 5.0);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(1, 0), Some(5.0));
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(ScoreCache::new(64));
        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..100u64 {
                        let key = t * 1000 + i;
                        cache.put(key, key, key as f64);
                        cache.get(key, key);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(cache.len(), 64);
        let stats = cache.stats();
        assert_eq!(stats.hits + stats.misses, 400);
    }

    #[test]
    fn test_clear() {
        let cache = ScoreCache::new(3);
        cache.put(1, 1, 1.0);
        cache.get(1, 1);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.hits(), 0);
    }
}
