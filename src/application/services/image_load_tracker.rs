//! Progressive-loading state for a single image URL.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::domain::entities::LoadedImage;
use crate::domain::ports::{ImageLoadedEvent, ImageLoaderPort, LoadTicket, TrackerId};

/// Whether the tracked image has finished downloading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Not downloaded yet, or no URL to download.
    #[default]
    NotLoaded,
    /// Downloaded and decoded.
    Loaded,
}

/// Tracks whether the image at a URL has been loaded.
///
/// Changing the URL resets the state and detaches the previous load, so a
/// late completion for an older URL can never mark the new one as loaded.
/// A failed load leaves the tracker in [`LoadState::NotLoaded`].
pub struct ImageLoadTracker {
    id: TrackerId,
    loader: Arc<dyn ImageLoaderPort>,
    url: Option<String>,
    generation: u64,
    pending: Option<LoadTicket>,
    state: LoadState,
    image: Option<LoadedImage>,
}

impl ImageLoadTracker {
    /// Creates a tracker and starts loading `url` if one is given.
    #[must_use]
    pub fn new(loader: Arc<dyn ImageLoaderPort>, url: Option<String>) -> Self {
        let mut tracker = Self {
            id: TrackerId::next(),
            loader,
            url: None,
            generation: 0,
            pending: None,
            state: LoadState::NotLoaded,
            image: None,
        };
        tracker.start(url);
        tracker
    }

    /// Points the tracker at a new URL. Same URL is a no-op.
    pub fn set_url(&mut self, url: Option<String>) {
        if self.url == url {
            return;
        }
        self.start(url);
    }

    fn start(&mut self, url: Option<String>) {
        self.detach_pending();
        self.generation += 1;
        self.state = LoadState::NotLoaded;
        self.image = None;
        self.url = url;

        let Some(url) = self.url.as_ref().filter(|u| !u.trim().is_empty()) else {
            trace!(tracker = self.id.as_u64(), "No image URL, nothing to load");
            return;
        };

        let ticket = LoadTicket {
            tracker: self.id,
            generation: self.generation,
            url: url.clone(),
        };
        self.loader.load(ticket.clone());
        self.pending = Some(ticket);
    }

    fn detach_pending(&mut self) {
        if let Some(ticket) = self.pending.take() {
            self.loader.detach(&ticket);
        }
    }

    /// Applies a load completion. Returns true if the tracker became loaded.
    ///
    /// Completions for other trackers or for superseded tickets are ignored.
    pub fn handle_event(&mut self, event: &ImageLoadedEvent) -> bool {
        if event.ticket.tracker != self.id {
            return false;
        }
        if self.pending.as_ref() != Some(&event.ticket) {
            debug!(
                url = %event.ticket.url,
                generation = event.ticket.generation,
                current = self.generation,
                "Ignoring stale image completion"
            );
            return false;
        }
        self.pending = None;

        match &event.result {
            Ok(image) => {
                self.state = LoadState::Loaded;
                self.image = Some(image.clone());
                true
            }
            Err(e) => {
                warn!(url = %event.ticket.url, error = %e, "Image failed to load");
                false
            }
        }
    }

    /// Detaches any pending load. Nothing the loader delivers afterwards
    /// changes the tracker.
    pub fn teardown(&mut self) {
        self.detach_pending();
        self.generation += 1;
    }

    #[must_use]
    pub const fn id(&self) -> TrackerId {
        self.id
    }

    #[must_use]
    pub const fn state(&self) -> LoadState {
        self.state
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    /// Returns true while a load is outstanding.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Decoded image, once loaded.
    #[must_use]
    pub const fn image(&self) -> Option<&LoadedImage> {
        self.image.as_ref()
    }
}

impl Drop for ImageLoadTracker {
    fn drop(&mut self) {
        self.detach_pending();
    }
}

impl std::fmt::Debug for ImageLoadTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoadTracker")
            .field("id", &self.id)
            .field("url", &self.url)
            .field("generation", &self.generation)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
