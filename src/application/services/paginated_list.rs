//! Accumulation of paged photo results into one deduplicated list.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::domain::entities::{Photo, PhotoId};
use crate::domain::errors::PhotoApiError;
use crate::domain::ports::PhotoSourcePort;

/// Default number of photos requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 9;

/// A page fetch issued by the controller.
///
/// The response must be handed back to [`PaginatedListController::apply`]
/// together with `generation`; responses for superseded requests are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number, starting at 1.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Request generation at issue time.
    pub generation: u64,
}

/// Snapshot of the list exposed to the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState<'a> {
    /// Accumulated photos in fetch order.
    pub photos: &'a [Photo],
    /// A page fetch is in flight.
    pub loading: bool,
    /// The latest page fetch failed.
    pub error: bool,
    /// No empty page has been seen yet.
    pub has_more: bool,
}

/// Turns page numbers into an accumulated, deduplicated photo list.
///
/// Every page change bumps a generation counter; a response is applied only
/// when its generation is still the one in flight. Late responses for older
/// pages are therefore discarded whatever order they arrive in.
#[derive(Debug)]
pub struct PaginatedListController {
    photos: Vec<Photo>,
    limit: u32,
    page: Option<u32>,
    loading: bool,
    error: bool,
    has_more: bool,
    generation: u64,
    in_flight: Option<u64>,
}

impl PaginatedListController {
    /// Creates an empty controller. It starts out loading, since the first
    /// page is requested right away.
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self {
            photos: Vec::new(),
            limit: limit.max(1),
            page: None,
            loading: true,
            error: false,
            has_more: true,
            generation: 0,
            in_flight: None,
        }
    }

    /// Starts fetching `page`, superseding any request still in flight.
    pub fn request_page(&mut self, page: u32) -> PageRequest {
        if let Some(stale) = self.in_flight {
            debug!(generation = stale, "Superseding in-flight page request");
        }

        self.generation += 1;
        self.in_flight = Some(self.generation);

        // Already true on the very first request.
        if self.page.is_some() {
            self.loading = true;
        }
        self.error = false;
        self.page = Some(page);

        PageRequest {
            page,
            limit: self.limit,
            generation: self.generation,
        }
    }

    /// Applies the outcome of a page fetch. Returns false if the response
    /// was stale and has been discarded without touching any state.
    pub fn apply(
        &mut self,
        generation: u64,
        result: Result<Vec<Photo>, PhotoApiError>,
    ) -> bool {
        if self.in_flight != Some(generation) {
            debug!(
                generation = generation,
                current = self.generation,
                "Discarding stale page response"
            );
            return false;
        }
        self.in_flight = None;

        match result {
            Ok(photos) if photos.is_empty() => {
                if self.has_more {
                    info!(page = ?self.page, "Reached end of photo list");
                }
                self.has_more = false;
            }
            Ok(photos) => {
                let added = self.merge(photos);
                debug!(page = ?self.page, added = added, total = self.photos.len(), "Merged page");
            }
            Err(e) => {
                warn!(page = ?self.page, error = %e, "Failed to fetch photos");
                self.error = true;
            }
        }
        self.loading = false;
        true
    }

    fn merge(&mut self, incoming: Vec<Photo>) -> usize {
        let mut seen: HashSet<PhotoId> = self.photos.iter().map(|p| p.id().clone()).collect();
        let before = self.photos.len();
        self.photos
            .extend(incoming.into_iter().filter(|p| seen.insert(p.id().clone())));
        self.photos.len() - before
    }

    /// Requests `page`, awaits the source and applies the response.
    pub async fn load_page(&mut self, source: &dyn PhotoSourcePort, page: u32) -> bool {
        let request = self.request_page(page);
        let result = source.list_photos(request.page, request.limit).await;
        self.apply(request.generation, result)
    }

    /// Invalidates the in-flight request so its response is discarded.
    pub fn teardown(&mut self) {
        self.generation += 1;
        self.in_flight = None;
    }

    /// Current exposed state.
    #[must_use]
    pub fn state(&self) -> ListState<'_> {
        ListState {
            photos: &self.photos,
            loading: self.loading,
            error: self.error,
            has_more: self.has_more,
        }
    }

    #[must_use]
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.error
    }

    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    /// Last requested page.
    #[must_use]
    pub const fn page(&self) -> Option<u32> {
        self.page
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }
}

impl Default for PaginatedListController {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockPhotoSourcePort;
    use mockall::predicate::eq;

    fn photo(id: &str) -> Photo {
        Photo::new(
            id,
            format!("Author {id}"),
            format!("https://unsplash.com/photos/{id}"),
            format!("https://picsum.photos/id/{id}/5000/3333"),
            5000,
            3333,
        )
    }

    fn page(ids: std::ops::Range<u32>) -> Vec<Photo> {
        ids.map(|i| photo(&i.to_string())).collect()
    }

    fn ids(controller: &PaginatedListController) -> Vec<&str> {
        controller.photos().iter().map(|p| p.id().as_str()).collect()
    }

    #[test]
    fn test_initial_state_is_loading() {
        let controller = PaginatedListController::default();
        let state = controller.state();

        assert!(state.loading);
        assert!(!state.error);
        assert!(state.has_more);
        assert!(state.photos.is_empty());
    }

    #[tokio::test]
    async fn test_overlapping_pages_are_deduplicated() {
        let mut source = MockPhotoSourcePort::new();
        source
            .expect_list_photos()
            .with(eq(1), eq(9))
            .returning(|_, _| Ok(page(0..9)));
        source
            .expect_list_photos()
            .with(eq(2), eq(9))
            .returning(|_, _| Ok(page(7..16)));

        let mut controller = PaginatedListController::new(9);
        assert!(controller.load_page(&source, 1).await);
        assert!(controller.load_page(&source, 2).await);

        assert_eq!(controller.photos().len(), 16);
        assert!(!controller.is_loading());
        let unique: HashSet<&str> = ids(&controller).into_iter().collect();
        assert_eq!(unique.len(), 16);
    }

    #[test]
    fn test_duplicates_within_a_page_are_dropped() {
        let mut controller = PaginatedListController::default();
        let request = controller.request_page(1);

        controller.apply(
            request.generation,
            Ok(vec![photo("1"), photo("2"), photo("1"), photo("3")]),
        );

        assert_eq!(ids(&controller), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_late_response_for_superseded_page_is_discarded() {
        let mut controller = PaginatedListController::default();
        let first = controller.request_page(1);
        assert!(controller.apply(first.generation, Ok(page(0..9))));

        let second = controller.request_page(2);
        let third = controller.request_page(3);

        assert!(controller.apply(third.generation, Ok(page(18..27))));
        assert!(!controller.apply(second.generation, Ok(page(9..18))));

        assert_eq!(controller.photos().len(), 18);
        let skipped: Vec<String> = (9..18).map(|i| i.to_string()).collect();
        assert!(ids(&controller).iter().all(|id| !skipped.iter().any(|s| s == id)));
        assert!(!controller.is_loading());
    }

    #[test]
    fn test_stale_failure_does_not_set_error() {
        let mut controller = PaginatedListController::default();
        let stale = controller.request_page(1);
        let current = controller.request_page(2);

        assert!(!controller.apply(stale.generation, Err(PhotoApiError::Timeout)));
        assert!(!controller.has_error());
        assert!(controller.is_loading());

        assert!(controller.apply(current.generation, Ok(page(0..3))));
        assert!(!controller.has_error());
    }

    #[test]
    fn test_empty_page_ends_list_permanently() {
        let mut controller = PaginatedListController::default();
        let request = controller.request_page(1);
        controller.apply(request.generation, Ok(page(0..9)));

        let request = controller.request_page(2);
        controller.apply(request.generation, Ok(Vec::new()));
        assert!(!controller.has_more());

        let request = controller.request_page(3);
        controller.apply(request.generation, Ok(page(9..18)));
        assert!(!controller.has_more());
        assert_eq!(controller.photos().len(), 18);
    }

    #[test]
    fn test_failure_preserves_accumulated_photos() {
        let mut controller = PaginatedListController::default();
        let request = controller.request_page(1);
        controller.apply(request.generation, Ok(page(0..9)));

        let request = controller.request_page(2);
        assert!(controller.is_loading());
        controller.apply(request.generation, Err(PhotoApiError::network("reset")));

        assert!(controller.has_error());
        assert!(!controller.is_loading());
        assert_eq!(controller.photos().len(), 9);

        controller.request_page(3);
        assert!(!controller.has_error());
    }

    #[test]
    fn test_teardown_discards_in_flight_response() {
        let mut controller = PaginatedListController::default();
        let request = controller.request_page(1);
        controller.teardown();

        assert!(!controller.apply(request.generation, Ok(page(0..9))));
        assert!(controller.photos().is_empty());
    }

    #[test]
    fn test_response_is_applied_once() {
        let mut controller = PaginatedListController::default();
        let request = controller.request_page(1);

        assert!(controller.apply(request.generation, Ok(page(0..3))));
        assert!(!controller.apply(request.generation, Ok(page(3..6))));
        assert_eq!(controller.photos().len(), 3);
    }
}
