mod image_preview;
mod photo_card;
mod status_bar;
mod terminal_viewport;

pub use image_preview::{ImageManager, LOAD_BUFFER, PreviewSlot};
pub use photo_card::{CARD_HEIGHT, CARD_WIDTH, PhotoCard};
pub use status_bar::{StatusBar, StatusLevel};
pub use terminal_viewport::{TerminalViewport, ViewportProbe};
