//! LRU tile cache with exact, entry-count-bounded eviction.
//!
//! Eviction order matters here: the grid re-requests whichever tile the
//! viewport re-enters, so the cache must drop the least-recently touched
//! key first, deterministically. The recency queue is explicit for that
//! reason; approximate LRU policies don't qualify.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::tile::Tile;

/// Counters exposed for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
}

struct Inner {
    capacity: usize,
    entries: HashMap<String, Arc<Tile>>,
    /// Keys ordered least-recent (front) to most-recent (back).
    recency: VecDeque<String>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl Inner {
    /// Move a key to the most-recent end.
    fn refresh(&mut self, key: &str) {
        if let Some(position) = self.recency.iter().position(|k| k == key) {
            self.recency.remove(position);
        }
        self.recency.push_back(key.to_string());
    }

    /// Evict least-recent entries until the size bound holds.
    fn evict_to_capacity(&mut self) {
        while self.entries.len() > self.capacity {
            let Some(key) = self.recency.pop_front() else {
                break;
            };
            self.entries.remove(&key);
            self.evictions += 1;
            tracing::trace!(key = %key, "tile evicted from memory cache");
        }
    }
}

/// Fixed-capacity LRU store for constructed tiles, keyed by `"{x}/{y}"`.
///
/// All access goes through one mutex; the request-resolution path is the
/// single writer, and readers never hold the lock across an await point.
pub struct TileCache {
    inner: Mutex<Inner>,
}

impl TileCache {
    /// Create a cache bounded to `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                capacity,
                entries: HashMap::new(),
                recency: VecDeque::new(),
                hits: 0,
                misses: 0,
                evictions: 0,
            }),
        }
    }

    /// Whether a key is present. Does not refresh recency.
    pub fn has(&self, key: &str) -> bool {
        self.inner.lock().entries.contains_key(key)
    }

    /// Look up a tile, refreshing its recency on a hit.
    pub fn get(&self, key: &str) -> Option<Arc<Tile>> {
        let mut inner = self.inner.lock();
        match inner.entries.get(key).cloned() {
            Some(tile) => {
                inner.refresh(key);
                inner.hits += 1;
                Some(tile)
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    /// Insert or overwrite a tile, refreshing recency and evicting the
    /// least-recent entries beyond capacity.
    pub fn put(&self, key: String, tile: Arc<Tile>) {
        let mut inner = self.inner.lock();
        inner.entries.insert(key.clone(), tile);
        inner.refresh(&key);
        inner.evict_to_capacity();
    }

    /// Change the capacity, immediately evicting down to the new bound.
    pub fn set_capacity(&self, capacity: usize) {
        let mut inner = self.inner.lock();
        inner.capacity = capacity;
        inner.evict_to_capacity();
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            evictions: inner.evictions,
            entries: inner.entries.len(),
        }
    }
}

impl Default for TileCache {
    /// A cache with the default capacity of 100 tiles.
    fn default() -> Self {
        Self::new(100)
    }
}
