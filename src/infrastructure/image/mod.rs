//! Image handling infrastructure.
//!
//! This module provides:
//! - Memory caching with LRU eviction
//! - Async image loading pipeline

pub mod loader;
pub mod memory_cache;

pub use loader::{HttpImageLoader, ImageLoaderConfig};
pub use memory_cache::{CacheStats, MemoryImageCache};
