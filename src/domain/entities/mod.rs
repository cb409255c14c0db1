//! Domain entity definitions.

mod image;
mod photo;

pub use image::{ImageId, ImageSource, LoadedImage};
pub use photo::{Photo, PhotoId, PhotoMeta};
