//! Port definition for out-of-band image loading.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::entities::LoadedImage;

/// Result type for image loading operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Errors that can occur while loading an image.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    /// Failed to decode image.
    #[error("Decode error: {0}")]
    DecodeError(String),
    /// Network error during download.
    #[error("Network error: {0}")]
    NetworkError(String),
}

static NEXT_TRACKER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of the party waiting on an image load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackerId(u64);

impl TrackerId {
    /// Allocates a process-unique id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_TRACKER_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

/// Handle for one requested image load.
///
/// The generation distinguishes successive loads issued by the same tracker,
/// so a completion for an older URL never matches the current ticket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    /// Tracker that issued the load.
    pub tracker: TrackerId,
    /// Tracker generation at issue time.
    pub generation: u64,
    /// Image URL to fetch.
    pub url: String,
}

/// Message sent when an image load settles.
#[derive(Debug, Clone)]
pub struct ImageLoadedEvent {
    /// Ticket the load was started with.
    pub ticket: LoadTicket,
    /// The loaded image, or the reason it failed.
    pub result: CacheResult<LoadedImage>,
}

/// Port for loading images outside the render path.
pub trait ImageLoaderPort: Send + Sync {
    /// Starts loading `ticket.url`. The outcome is delivered later as an
    /// [`ImageLoadedEvent`] unless the ticket is detached first.
    fn load(&self, ticket: LoadTicket);

    /// Detaches the completion of a pending load. A detached ticket never
    /// produces an event; the transfer itself may still run to completion.
    fn detach(&self, ticket: &LoadTicket);
}

#[cfg(test)]
pub mod mock {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::domain::entities::{ImageId, ImageSource};

    /// Loader that records requests and never completes on its own.
    #[derive(Default)]
    pub struct RecordingImageLoader {
        loads: Mutex<Vec<LoadTicket>>,
        detached: Mutex<Vec<LoadTicket>>,
    }

    impl RecordingImageLoader {
        /// Creates new mock.
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        /// Tickets passed to `load`, in order.
        pub fn loads(&self) -> Vec<LoadTicket> {
            self.loads.lock().clone()
        }

        /// Tickets passed to `detach`, in order.
        pub fn detached(&self) -> Vec<LoadTicket> {
            self.detached.lock().clone()
        }

        /// Most recent ticket passed to `load`.
        pub fn last_load(&self) -> Option<LoadTicket> {
            self.loads.lock().last().cloned()
        }

        /// Builds a successful completion for `ticket`.
        pub fn success(ticket: &LoadTicket) -> ImageLoadedEvent {
            ImageLoadedEvent {
                ticket: ticket.clone(),
                result: Ok(LoadedImage {
                    id: ImageId::from_url(&ticket.url),
                    image: Arc::new(image::DynamicImage::new_rgb8(4, 4)),
                    source: ImageSource::Network,
                }),
            }
        }

        /// Builds a failed completion for `ticket`.
        pub fn failure(ticket: &LoadTicket) -> ImageLoadedEvent {
            ImageLoadedEvent {
                ticket: ticket.clone(),
                result: Err(CacheError::NetworkError("HTTP 404".to_string())),
            }
        }
    }

    impl ImageLoaderPort for RecordingImageLoader {
        fn load(&self, ticket: LoadTicket) {
            self.loads.lock().push(ticket);
        }

        fn detach(&self, ticket: &LoadTicket) {
            self.detached.lock().push(ticket.clone());
        }
    }
}
