//! Application layer with the list, detail and image-loading state machines.

/// Gallery services.
pub mod services;

pub use services::{
    DetailAggregator, ImageLoadTracker, ImageUrlBuilder, PaginatedListController,
    ScrollTriggeredPager,
};
