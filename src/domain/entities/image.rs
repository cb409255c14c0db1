//! Domain types for downloaded images.

use std::sync::Arc;

/// Cache key for a downloaded image, derived from its URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageId(pub String);

impl ImageId {
    /// Creates a new `ImageId` from any string-like input.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates an `ImageId` from a URL by hashing it.
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let result = hasher.finalize();
        Self(hex::encode(&result[..16]))
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a loaded image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// Served from the in-memory cache.
    MemoryCache,
    /// Downloaded from the network.
    Network,
}

/// A decoded image ready for display.
#[derive(Clone)]
pub struct LoadedImage {
    /// Cache key.
    pub id: ImageId,
    /// Decoded pixels.
    pub image: Arc<image::DynamicImage>,
    /// Origin of the pixels.
    pub source: ImageSource,
}

impl std::fmt::Debug for LoadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedImage")
            .field("id", &self.id)
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .field("source", &self.source)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_id_from_url_is_stable() {
        let a = ImageId::from_url("https://picsum.photos/id/1/600/400");
        let b = ImageId::from_url("https://picsum.photos/id/1/600/400");
        let c = ImageId::from_url("https://picsum.photos/id/2/600/400");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str().len(), 32);
    }
}
