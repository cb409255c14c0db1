//! Port for the remote photo services.

use async_trait::async_trait;

use crate::domain::entities::{Photo, PhotoId, PhotoMeta};
use crate::domain::errors::PhotoApiError;

/// Remote photo listing, detail and metadata lookups.
///
/// Implementations perform exactly one request per call: no retries, no
/// caching and no request deduplication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhotoSourcePort: Send + Sync {
    /// Lists one page of photos. An empty page signals the end of the data.
    async fn list_photos(&self, page: u32, limit: u32) -> Result<Vec<Photo>, PhotoApiError>;

    /// Fetches the full record for a single photo.
    async fn fetch_photo_detail(&self, id: &PhotoId) -> Result<Photo, PhotoApiError>;

    /// Fetches supplementary title and description for a photo.
    async fn fetch_photo_meta(&self, id: &PhotoId) -> Result<PhotoMeta, PhotoApiError>;
}
