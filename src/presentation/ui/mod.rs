//! UI screens.

mod app;
mod backend;
mod detail_screen;
mod list_screen;
mod not_found_screen;
mod utils;

pub use app::{App, AppOptions};
pub use backend::{Action, Backend, BackendCommand};
pub use detail_screen::{DetailKeyResult, DetailScreen, DetailScreenState, PreviewSpec};
pub use list_screen::{ListKeyResult, ListScreen, ListScreenState, ThumbnailSpec};
pub use not_found_screen::NotFoundScreen;
pub use utils::{centered_rect, truncate_to_width};
