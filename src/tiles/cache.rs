use crate::core::geo::TileCoord;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

const DEFAULT_CAPACITY: usize = 512;

/// In-memory tile image cache using LRU eviction.
///
/// Holds the bytes of tiles that finished loading, so a tile scrolling back
/// onto the screen does not trigger another request.
#[derive(Debug)]
pub struct TileCache {
    cache: LruCache<TileCoord, Arc<Vec<u8>>>,
}

impl TileCache {
    /// Create a new tile cache with the given capacity
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or_else(|| NonZeroUsize::new(DEFAULT_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
        }
    }

    /// Get a tile from the cache, marking it most recently used
    pub fn get(&mut self, coord: &TileCoord) -> Option<Arc<Vec<u8>>> {
        self.cache.get(coord).cloned()
    }

    /// Insert a tile into the cache
    pub fn insert(&mut self, coord: TileCoord, data: Vec<u8>) -> Arc<Vec<u8>> {
        let data = Arc::new(data);
        self.cache.put(coord, Arc::clone(&data));
        data
    }

    /// Check if a tile is in the cache without touching its recency
    pub fn contains(&self, coord: &TileCoord) -> bool {
        self.cache.contains(coord)
    }

    /// Remove a tile from the cache
    pub fn remove(&mut self, coord: &TileCoord) -> Option<Arc<Vec<u8>>> {
        self.cache.pop(coord)
    }

    /// Clear all tiles from the cache
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Get the current number of cached tiles
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }
}

impl Default for TileCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
