//! Picsum Gallery - an infinite-scroll photo browser for the terminal.
//!
//! This crate lists photos from the Picsum image API page by page, loads
//! thumbnails progressively and shows a detail view that combines photo
//! information with supplementary metadata from a second service.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the list, detail and image-loading services.
pub mod application;
/// Domain layer containing entities, errors, routes and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;
/// Presentation layer containing UI components and event handling.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "picsum-gallery";
