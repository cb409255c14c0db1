//! Photo entities returned by the listing and detail endpoints.

use serde::{Deserialize, Serialize};

/// Identifier of a photo as issued by the upstream API.
///
/// Picsum ids are numeric in practice but are transported as strings, so the
/// id is kept as a string and only interpreted numerically where needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(String);

impl PhotoId {
    /// Creates a new id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the id is empty or whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Parses the id as an unsigned number.
    #[must_use]
    pub fn as_number(&self) -> Option<u64> {
        self.0.trim().parse().ok()
    }
}

impl std::fmt::Display for PhotoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PhotoId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PhotoId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Canonical image record from the photo API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    id: PhotoId,
    author: String,
    url: String,
    download_url: String,
    width: u32,
    height: u32,
}

impl Photo {
    /// Creates a new photo.
    #[must_use]
    pub fn new(
        id: impl Into<PhotoId>,
        author: impl Into<String>,
        url: impl Into<String>,
        download_url: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            id: id.into(),
            author: author.into(),
            url: url.into(),
            download_url: download_url.into(),
            width,
            height,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &PhotoId {
        &self.id
    }

    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Source page of the photo (usually on Unsplash).
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Full resolution download URL.
    #[must_use]
    pub fn download_url(&self) -> &str {
        &self.download_url
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns a `W × H` label for display.
    #[must_use]
    pub fn dimensions_label(&self) -> String {
        format!("{} × {}", self.width, self.height)
    }
}

/// Supplementary text attached to a photo from a secondary content source.
///
/// Both fields being absent is a normal state meaning the metadata is
/// unavailable, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoMeta {
    /// Title, if the secondary source provided one.
    pub title: Option<String>,
    /// Description, if the secondary source provided one.
    pub description: Option<String>,
}

impl PhotoMeta {
    /// Creates metadata from optional title and description.
    #[must_use]
    pub const fn new(title: Option<String>, description: Option<String>) -> Self {
        Self { title, description }
    }

    /// Metadata with both fields absent.
    #[must_use]
    pub const fn unavailable() -> Self {
        Self {
            title: None,
            description: None,
        }
    }

    /// Returns true if at least one field is present.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.title.is_some() || self.description.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_id_numeric() {
        assert_eq!(PhotoId::from("237").as_number(), Some(237));
        assert_eq!(PhotoId::from("abc").as_number(), None);
        assert!(PhotoId::from("  ").is_blank());
    }

    #[test]
    fn test_photo_deserializes_from_api_shape() {
        let json = r#"{
            "id": "0",
            "author": "Alejandro Escamilla",
            "width": 5000,
            "height": 3333,
            "url": "https://unsplash.com/photos/yC-Yzbqy7PY",
            "download_url": "https://picsum.photos/id/0/5000/3333"
        }"#;

        let photo: Photo = serde_json::from_str(json).expect("valid photo");
        assert_eq!(photo.id().as_str(), "0");
        assert_eq!(photo.author(), "Alejandro Escamilla");
        assert_eq!(photo.dimensions_label(), "5000 × 3333");
    }

    #[test]
    fn test_unavailable_meta() {
        let meta = PhotoMeta::unavailable();
        assert!(!meta.is_available());
        assert!(PhotoMeta::new(Some("t".into()), None).is_available());
    }
}
