//! Canonical thumbnail URLs.

use crate::domain::entities::PhotoId;

/// Default image host.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://picsum.photos";
/// Default thumbnail width in pixels.
pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 600;
/// Default thumbnail height in pixels.
pub const DEFAULT_THUMBNAIL_HEIGHT: u32 = 400;

/// Builds `{base}/id/{id}/{width}/{height}` URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrlBuilder {
    base_url: String,
}

impl ImageUrlBuilder {
    /// Creates a builder for the given host. Trailing slashes are ignored.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// URL at the default 600×400 size.
    #[must_use]
    pub fn url(&self, id: &PhotoId) -> String {
        self.sized_url(id, DEFAULT_THUMBNAIL_WIDTH, DEFAULT_THUMBNAIL_HEIGHT)
    }

    /// URL at an explicit size.
    #[must_use]
    pub fn sized_url(&self, id: &PhotoId, width: u32, height: u32) -> String {
        format!("{}/id/{}/{}/{}", self.base_url, id, width, height)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for ImageUrlBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_BASE_URL)
    }
}
