//! Detail view state built from two independent lookups.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, error, warn};

use crate::domain::entities::{Photo, PhotoId, PhotoMeta};
use crate::domain::errors::PhotoApiError;
use crate::domain::ports::PhotoSourcePort;

/// Message shown when the photo itself cannot be loaded.
pub const DETAIL_ERROR_MESSAGE: &str = "Unable to load the original photo information.";

/// Shared by every aggregator; generations never repeat across detail screens.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// A detail lookup issued by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    /// Photo to resolve.
    pub id: PhotoId,
    /// Request generation at issue time.
    pub generation: u64,
}

/// Settled results of both lookups.
#[derive(Debug, Clone)]
pub struct DetailOutcome {
    /// Primary photo lookup.
    pub photo: Result<Photo, PhotoApiError>,
    /// Supplementary metadata lookup.
    pub meta: Result<PhotoMeta, PhotoApiError>,
}

impl DetailOutcome {
    /// Runs both lookups concurrently and waits for both to settle.
    ///
    /// A failure of one lookup never cancels the other.
    pub async fn fetch(source: &dyn PhotoSourcePort, id: &PhotoId) -> Self {
        let (photo, meta) = tokio::join!(source.fetch_photo_detail(id), source.fetch_photo_meta(id));
        Self { photo, meta }
    }
}

/// Detail state for one photo id.
///
/// `error` is set only when the primary lookup fails. A failed metadata
/// lookup degrades to [`PhotoMeta::unavailable`].
#[derive(Debug)]
pub struct DetailAggregator {
    photo: Option<Photo>,
    meta: Option<PhotoMeta>,
    loading: bool,
    error: Option<String>,
    generation: u64,
    in_flight: Option<u64>,
}

impl DetailAggregator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            photo: None,
            meta: None,
            loading: true,
            error: None,
            generation: 0,
            in_flight: None,
        }
    }

    /// Switches to `id`, superseding any lookup in flight. Returns `None`
    /// without fetching when the id is missing or blank.
    pub fn request(&mut self, id: Option<&PhotoId>) -> Option<DetailRequest> {
        self.generation = next_generation();
        self.in_flight = None;

        let id = id.filter(|id| !id.is_blank())?;

        self.loading = true;
        self.error = None;
        self.in_flight = Some(self.generation);

        Some(DetailRequest {
            id: id.clone(),
            generation: self.generation,
        })
    }

    /// Commits a settled outcome. Returns false if the request was superseded
    /// and the outcome has been discarded.
    pub fn apply(&mut self, generation: u64, outcome: DetailOutcome) -> bool {
        if self.in_flight != Some(generation) {
            debug!(
                generation = generation,
                current = self.generation,
                "Discarding stale detail response"
            );
            return false;
        }
        self.in_flight = None;

        match outcome.photo {
            Ok(photo) => {
                self.photo = Some(photo);
                self.meta = Some(match outcome.meta {
                    Ok(meta) => meta,
                    Err(e) => {
                        warn!(error = %e, "Metadata unavailable, using fallback");
                        PhotoMeta::unavailable()
                    }
                });
            }
            Err(e) => {
                error!(error = %e, "Failed to load photo detail");
                self.photo = None;
                self.meta = None;
                self.error = Some(DETAIL_ERROR_MESSAGE.to_string());
            }
        }

        self.loading = false;
        true
    }

    /// Requests `id`, runs both lookups and commits the outcome.
    pub async fn load(&mut self, source: &dyn PhotoSourcePort, id: Option<&PhotoId>) -> bool {
        let Some(request) = self.request(id) else {
            return false;
        };
        let outcome = DetailOutcome::fetch(source, &request.id).await;
        self.apply(request.generation, outcome)
    }

    /// Invalidates any lookup in flight.
    pub fn teardown(&mut self) {
        self.generation = next_generation();
        self.in_flight = None;
    }

    #[must_use]
    pub const fn photo(&self) -> Option<&Photo> {
        self.photo.as_ref()
    }

    #[must_use]
    pub const fn meta(&self) -> Option<&PhotoMeta> {
        self.meta.as_ref()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl Default for DetailAggregator {
    fn default() -> Self {
        Self::new()
    }
}
