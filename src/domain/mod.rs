//! Domain layer with core entities, routes and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;
/// Route table.
pub mod route;
/// Serde utilities.
pub mod serde_utils;

pub use entities::{Photo, PhotoId, PhotoMeta};
pub use errors::PhotoApiError;
pub use ports::{ImageLoaderPort, PhotoSourcePort, ViewportObserver};
pub use route::Route;
