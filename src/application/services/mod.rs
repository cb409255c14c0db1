pub mod detail_aggregator;
pub mod image_load_tracker;
pub mod image_url;
pub mod paginated_list;
pub mod scroll_pager;

pub use detail_aggregator::{DETAIL_ERROR_MESSAGE, DetailAggregator, DetailOutcome, DetailRequest};
pub use image_load_tracker::{ImageLoadTracker, LoadState};
pub use image_url::ImageUrlBuilder;
pub use paginated_list::{ListState, PageRequest, PaginatedListController};
pub use scroll_pager::ScrollTriggeredPager;
