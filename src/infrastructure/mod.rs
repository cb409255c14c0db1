//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Image handling (caching, loading).
pub mod image;
/// Picsum and metadata HTTP client.
pub mod picsum;

pub use config::{AppConfig, CliArgs, LogLevel, StorageManager};
pub use image::{CacheStats, HttpImageLoader, ImageLoaderConfig, MemoryImageCache};
pub use picsum::PicsumClient;
