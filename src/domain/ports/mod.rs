mod image_loader_port;
mod photo_source_port;
mod viewport_port;

pub use image_loader_port::{
    CacheError, CacheResult, ImageLoadedEvent, ImageLoaderPort, LoadTicket, TrackerId,
};
pub use photo_source_port::PhotoSourcePort;
pub use viewport_port::{IntersectionEntry, ObservationId, ViewportObserver};

#[cfg(test)]
pub mod mocks {
    pub use super::image_loader_port::mock::RecordingImageLoader;
    pub use super::photo_source_port::MockPhotoSourcePort;
    pub use super::viewport_port::mock::RecordingViewport;
}
