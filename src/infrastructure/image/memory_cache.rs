//! In-memory LRU cache of decoded images.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;
use tracing::trace;

use crate::domain::entities::ImageId;

/// Default maximum number of images to cache in memory.
pub const DEFAULT_CACHE_SIZE: usize = 64;

/// LRU cache for decoded images, shared by all loads.
pub struct MemoryImageCache {
    cache: Mutex<LruCache<ImageId, Arc<image::DynamicImage>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryImageCache {
    /// Creates a new cache with the specified capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(cap)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Looks up an image, promoting it in the LRU order.
    pub fn get(&self, id: &ImageId) -> Option<Arc<image::DynamicImage>> {
        let mut cache = self.cache.lock();
        if let Some(img) = cache.get(id) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(id = %id, "Memory cache hit");
            Some(img.clone())
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(id = %id, "Memory cache miss");
            None
        }
    }

    /// Peeks at an image without promoting it.
    pub fn peek(&self, id: &ImageId) -> Option<Arc<image::DynamicImage>> {
        self.cache.lock().peek(id).cloned()
    }

    /// Stores an image, evicting the least recently used one when full.
    pub fn put(&self, id: ImageId, image: Arc<image::DynamicImage>) {
        trace!(id = %id, "Storing image in memory cache");
        self.cache.lock().put(id, image);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns cache statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        CacheStats {
            hits,
            misses,
            hit_rate,
            size: self.len(),
        }
    }
}

impl Default for MemoryImageCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of cached images.
    pub size: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {} images, {:.1}% hit rate ({} hits, {} misses)",
            self.size, self.hit_rate, self.hits, self.misses
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn img() -> Arc<image::DynamicImage> {
        Arc::new(image::DynamicImage::new_rgb8(10, 10))
    }

    #[test]
    fn test_cache_put_and_get() {
        let cache = MemoryImageCache::new(10);
        let id = ImageId::new("a");

        cache.put(id.clone(), img());

        assert_eq!(cache.get(&id).map(|i| i.width()), Some(10));
        assert!(cache.get(&ImageId::new("missing")).is_none());
    }

    #[test]
    fn test_cache_eviction() {
        let cache = MemoryImageCache::new(2);
        let ids = [ImageId::new("1"), ImageId::new("2"), ImageId::new("3")];

        for id in &ids {
            cache.put(id.clone(), img());
        }

        assert!(cache.get(&ids[0]).is_none());
        assert!(cache.get(&ids[1]).is_some());
        assert!(cache.get(&ids[2]).is_some());
    }

    #[test]
    fn test_peek_does_not_promote() {
        let cache = MemoryImageCache::new(2);
        let id1 = ImageId::new("1");
        let id2 = ImageId::new("2");

        cache.put(id1.clone(), img());
        cache.put(id2, img());
        let _ = cache.peek(&id1);
        cache.put(ImageId::new("3"), img());

        assert!(cache.peek(&id1).is_none());
    }

    #[test]
    fn test_cache_stats() {
        let cache = MemoryImageCache::new(10);
        let id = ImageId::new("a");
        cache.put(id.clone(), img());

        let _ = cache.get(&id);
        let _ = cache.get(&ImageId::new("missing"));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
    }
}
