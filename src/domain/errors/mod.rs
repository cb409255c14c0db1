//! Domain error types.

mod photo_api_error;

pub use photo_api_error::PhotoApiError;
