use serde::Deserialize;

use crate::domain::entities::{Photo, PhotoMeta};
use crate::domain::serde_utils::string_or_number;

/// Photo record returned by the list and info endpoints.
#[derive(Debug, Deserialize)]
pub struct PhotoResponse {
    #[serde(with = "string_or_number")]
    pub id: String,
    pub author: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub download_url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

impl From<PhotoResponse> for Photo {
    fn from(value: PhotoResponse) -> Self {
        Self::new(
            value.id,
            value.author,
            value.url,
            value.download_url,
            value.width,
            value.height,
        )
    }
}

/// Mock post record used as photo metadata. Other fields are ignored.
#[derive(Debug, Deserialize)]
pub struct PostResponse {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl From<PostResponse> for PhotoMeta {
    fn from(value: PostResponse) -> Self {
        Self::new(value.title, value.body)
    }
}
