//! Picsum photo API client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::{PhotoResponse, PostResponse};
use crate::domain::entities::{Photo, PhotoId, PhotoMeta};
use crate::domain::errors::PhotoApiError;
use crate::domain::ports::PhotoSourcePort;
use crate::infrastructure::config::ApiConfig;

const USER_AGENT: &str = concat!("picsum-gallery/", env!("CARGO_PKG_VERSION"));

/// Maps a photo id onto the bounded metadata corpus as `(id mod size) + 1`.
///
/// # Errors
/// Returns [`PhotoApiError::InvalidId`] if the id is not numeric.
pub fn meta_record_id(id: &PhotoId, corpus_size: u64) -> Result<u64, PhotoApiError> {
    let number = id
        .as_number()
        .ok_or_else(|| PhotoApiError::invalid_id(id.as_str()))?;
    Ok(number % corpus_size.max(1) + 1)
}

/// HTTP binding for the photo listing, detail and metadata endpoints.
pub struct PicsumClient {
    client: Client,
    config: ApiConfig,
}

impl PicsumClient {
    /// Creates a client for the configured endpoints.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(config: ApiConfig) -> Result<Self, PhotoApiError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PhotoApiError::unexpected(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Creates a client for the public Picsum endpoints.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_defaults() -> Result<Self, PhotoApiError> {
        Self::new(ApiConfig::default())
    }

    fn list_endpoint(&self, page: u32, limit: u32) -> Result<Url, PhotoApiError> {
        Url::parse_with_params(
            &self.config.list_url,
            &[("page", page.to_string()), ("limit", limit.to_string())],
        )
        .map_err(|e| PhotoApiError::unexpected(format!("invalid list URL: {e}")))
    }

    /// `{info_url}/{id}/info`, with the id pushed as a single encoded segment.
    fn info_endpoint(&self, id: &PhotoId) -> Result<Url, PhotoApiError> {
        if matches!(id.as_str(), "" | "." | "..") {
            return Err(PhotoApiError::invalid_id(id.as_str()));
        }
        let mut url = Url::parse(&self.config.info_url)
            .map_err(|e| PhotoApiError::unexpected(format!("invalid info URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| PhotoApiError::unexpected("info URL cannot be a base"))?
            .pop_if_empty()
            .push(id.as_str())
            .push("info");
        Ok(url)
    }

    fn meta_endpoint(&self, record: u64) -> String {
        format!("{}/{}", self.config.meta_url.trim_end_matches('/'), record)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: impl reqwest::IntoUrl,
        endpoint: &'static str,
    ) -> Result<T, PhotoApiError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(endpoint = endpoint, error = %e, "Request failed");
            if e.is_timeout() {
                PhotoApiError::Timeout
            } else if e.is_connect() {
                PhotoApiError::network(format!("failed to connect to {endpoint} endpoint"))
            } else {
                PhotoApiError::network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PhotoApiError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        response.json::<T>().await.map_err(|e| {
            warn!(endpoint = endpoint, error = %e, "Failed to parse response");
            if e.is_timeout() {
                PhotoApiError::Timeout
            } else {
                PhotoApiError::decode(e.to_string())
            }
        })
    }
}

#[async_trait]
impl PhotoSourcePort for PicsumClient {
    async fn list_photos(&self, page: u32, limit: u32) -> Result<Vec<Photo>, PhotoApiError> {
        let url = self.list_endpoint(page, limit)?;
        debug!(page = page, limit = limit, "Fetching photo page");

        let photos: Vec<PhotoResponse> = self.get_json(url, "list").await?;

        debug!(page = page, count = photos.len(), "Fetched photo page");
        Ok(photos.into_iter().map(Photo::from).collect())
    }

    async fn fetch_photo_detail(&self, id: &PhotoId) -> Result<Photo, PhotoApiError> {
        let url = self.info_endpoint(id)?;
        debug!(photo_id = %id, "Fetching photo detail");

        match self.get_json::<PhotoResponse>(url, "info").await {
            Ok(photo) => Ok(photo.into()),
            Err(PhotoApiError::Status { status, .. })
                if status == StatusCode::NOT_FOUND.as_u16() =>
            {
                Err(PhotoApiError::not_found(id.as_str()))
            }
            Err(e) => Err(e),
        }
    }

    async fn fetch_photo_meta(&self, id: &PhotoId) -> Result<PhotoMeta, PhotoApiError> {
        let record = meta_record_id(id, self.config.meta_corpus_size)?;
        let url = self.meta_endpoint(record);
        debug!(photo_id = %id, record = record, "Fetching photo metadata");

        let post: PostResponse = self.get_json(url, "meta").await?;
        Ok(post.into())
    }
}

impl std::fmt::Debug for PicsumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PicsumClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_client_creation() {
        let client = PicsumClient::with_defaults();
        assert!(client.is_ok());
    }

    #[test_case("0", 1 ; "zero")]
    #[test_case("29", 30 ; "last_in_corpus")]
    #[test_case("30", 1 ; "wraps")]
    #[test_case("237", 28 ; "large")]
    fn test_meta_record_id(id: &str, expected: u64) {
        assert_eq!(meta_record_id(&PhotoId::new(id), 30).unwrap(), expected);
    }

    #[test]
    fn test_meta_record_id_rejects_non_numeric() {
        let err = meta_record_id(&PhotoId::new("abc"), 30).unwrap_err();
        assert!(matches!(err, PhotoApiError::InvalidId { .. }));
    }

    #[test]
    fn test_meta_record_id_respects_corpus_size() {
        assert_eq!(meta_record_id(&PhotoId::new("150"), 100).unwrap(), 51);
        assert_eq!(meta_record_id(&PhotoId::new("5"), 0).unwrap(), 1);
    }

    #[test]
    fn test_endpoints() {
        let client = PicsumClient::with_defaults().unwrap();

        let list = client.list_endpoint(2, 9).unwrap();
        assert_eq!(list.as_str(), "https://picsum.photos/v2/list?page=2&limit=9");
        assert_eq!(
            client.info_endpoint(&PhotoId::new("237")).unwrap().as_str(),
            "https://picsum.photos/id/237/info"
        );
        assert_eq!(client.meta_endpoint(28), "https://dummyjson.com/posts/28");
    }

    #[test]
    fn test_info_endpoint_keeps_id_in_one_segment() {
        let client = PicsumClient::with_defaults().unwrap();

        let nested = client.info_endpoint(&PhotoId::new("a/b")).unwrap();
        assert_eq!(nested.as_str(), "https://picsum.photos/id/a%2Fb/info");

        let err = client.info_endpoint(&PhotoId::new("..")).unwrap_err();
        assert!(matches!(err, PhotoApiError::InvalidId { .. }));
        assert!(client.info_endpoint(&PhotoId::new(".")).is_err());
    }

    #[tokio::test]
    async fn test_invalid_id_fails_before_request() {
        let config = ApiConfig {
            meta_url: "http://127.0.0.1:9/posts".to_string(),
            ..ApiConfig::default()
        };
        let client = PicsumClient::new(config).unwrap();

        let err = client
            .fetch_photo_meta(&PhotoId::new("not-a-number"))
            .await
            .unwrap_err();
        assert!(matches!(err, PhotoApiError::InvalidId { .. }));
    }

    #[test]
    fn test_dto_mapping() {
        let photos: Vec<PhotoResponse> = serde_json::from_str(
            r#"[{"id":"1","author":"Alejandro Escamilla","width":5000,"height":3333,
                "url":"https://unsplash.com/photos/LNRyGwIJr5c",
                "download_url":"https://picsum.photos/id/1/5000/3333"}]"#,
        )
        .unwrap();
        let photo: Photo = photos.into_iter().next().unwrap().into();
        assert_eq!(photo.id().as_str(), "1");
        assert_eq!(photo.width(), 5000);

        let post: PostResponse = serde_json::from_str(
            r#"{"id":28,"title":"Title","body":"Body","tags":["a"],"userId":3}"#,
        )
        .unwrap();
        let meta: PhotoMeta = post.into();
        assert_eq!(meta.title.as_deref(), Some("Title"));
        assert_eq!(meta.description.as_deref(), Some("Body"));
    }
}
