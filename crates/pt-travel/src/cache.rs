//! Bounded, thread-safe memo table with approximate LRU eviction.
//!
//! Reads take a shared lock and stamp the entry with a global access counter.
//! When an insert finds the table full, the oldest eighth of the entries (by
//! stamp) is dropped in one batch, so eviction cost is amortized over many
//! inserts.
//!
//! Two threads may miss on the same key and both insert; values are pure
//! functions of their keys, so the second insert overwrites with an equal
//! value.

use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

struct Entry<V> {
    value: V,
    stamp: AtomicU64,
}

/// Hit/miss counters and occupancy of a [`BoundedCache`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits:     u64,
    pub misses:   u64,
    pub len:      usize,
    pub capacity: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 { 0.0 } else { self.hits as f64 / total as f64 }
    }
}

pub struct BoundedCache<K, V> {
    map:      RwLock<FxHashMap<K, Entry<V>>>,
    capacity: usize,
    clock:    AtomicU64,
    hits:     AtomicU64,
    misses:   AtomicU64,
}

impl<K: Eq + Hash + Copy, V: Copy> BoundedCache<K, V> {
    /// `capacity == 0` disables caching: every lookup misses.
    pub fn new(capacity: usize) -> Self {
        Self {
            map:      RwLock::new(FxHashMap::default()),
            capacity,
            clock:    AtomicU64::new(0),
            hits:     AtomicU64::new(0),
            misses:   AtomicU64::new(0),
        }
    }

    #[inline]
    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let map = self.map.read();
        match map.get(key) {
            Some(e) => {
                e.stamp.store(self.tick(), Ordering::Relaxed);
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(e.value)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn insert(&self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        let mut map = self.map.write();
        if map.len() >= self.capacity && !map.contains_key(&key) {
            evict_oldest(&mut map, self.capacity);
        }
        map.insert(key, Entry { value, stamp: AtomicU64::new(self.tick()) });
    }

    /// Return the cached value or compute, store, and return it.
    ///
    /// `compute` runs without any lock held.
    pub fn get_or_insert_with(&self, key: K, compute: impl FnOnce() -> V) -> V {
        if let Some(v) = self.get(&key) {
            return v;
        }
        let v = compute();
        self.insert(key, v);
        v
    }

    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.map.write().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits:     self.hits.load(Ordering::Relaxed),
            misses:   self.misses.load(Ordering::Relaxed),
            len:      self.len(),
            capacity: self.capacity,
        }
    }
}

/// Drop the least recently stamped eighth of a full table (at least one).
fn evict_oldest<K: Eq + Hash + Copy, V>(map: &mut FxHashMap<K, Entry<V>>, capacity: usize) {
    let drop_n = (capacity / 8).max(1).min(map.len());
    let mut stamps: Vec<u64> = map.values().map(|e| e.stamp.load(Ordering::Relaxed)).collect();
    let (_, cutoff, _) = stamps.select_nth_unstable(drop_n - 1);
    let cutoff = *cutoff;
    // Stamps are unique, so exactly `drop_n` entries satisfy `<= cutoff`.
    map.retain(|_, e| e.stamp.load(Ordering::Relaxed) > cutoff);
}
