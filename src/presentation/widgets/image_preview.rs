//! Terminal image protocols for loaded photos.

use ratatui::layout::Rect;
use ratatui_image::Resize;
use ratatui_image::picker::{Picker, ProtocolType};
use ratatui_image::protocol::StatefulProtocol;

use crate::domain::entities::{ImageId, LoadedImage};

/// Number of grid rows around the visible ones whose thumbnails stay loaded.
pub const LOAD_BUFFER: usize = 2;

/// Encodes decoded images for the terminal's graphics protocol.
pub struct ImageManager {
    picker: Option<Picker>,
}

impl ImageManager {
    /// Queries the terminal for its graphics capabilities.
    ///
    /// Must run after the terminal entered raw mode and before the event
    /// stream starts reading stdin.
    #[must_use]
    pub fn new() -> Self {
        let mut picker = Picker::from_query_stdio().unwrap_or_else(|_| Picker::halfblocks());

        let caps = picker.capabilities();
        let has_sixel = caps
            .iter()
            .any(|c| matches!(c, ratatui_image::picker::Capability::Sixel));
        let has_kitty = caps
            .iter()
            .any(|c| matches!(c, ratatui_image::picker::Capability::Kitty));

        if has_sixel && !has_kitty && picker.protocol_type() == ProtocolType::Halfblocks {
            picker.set_protocol_type(ProtocolType::Sixel);
        }

        Self {
            picker: Some(picker),
        }
    }

    #[must_use]
    pub fn halfblocks() -> Self {
        Self {
            picker: Some(Picker::halfblocks()),
        }
    }

    /// Manager that never renders images.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { picker: None }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.picker.is_some()
    }

    #[must_use]
    pub fn protocol_type(&self) -> Option<ProtocolType> {
        self.picker.as_ref().map(Picker::protocol_type)
    }

    fn new_protocol(&self, image: &LoadedImage) -> Option<StatefulProtocol> {
        self.picker
            .as_ref()
            .map(|picker| picker.new_resize_protocol((*image.image).clone()))
    }
}

impl Default for ImageManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Render state for one image area.
#[derive(Default)]
pub struct PreviewSlot {
    id: Option<ImageId>,
    protocol: Option<StatefulProtocol>,
}

impl PreviewSlot {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            id: None,
            protocol: None,
        }
    }

    /// Builds the protocol for `image`, reusing it while the image is unchanged.
    pub fn sync(&mut self, manager: &ImageManager, image: Option<&LoadedImage>) {
        let Some(image) = image else {
            self.clear();
            return;
        };
        if self.id.as_ref() == Some(&image.id) && self.protocol.is_some() {
            return;
        }
        self.id = Some(image.id.clone());
        self.protocol = manager.new_protocol(image);
    }

    pub fn clear(&mut self) {
        self.id = None;
        self.protocol = None;
    }

    #[must_use]
    pub const fn has_protocol(&self) -> bool {
        self.protocol.is_some()
    }

    pub const fn protocol_mut(&mut self) -> Option<&mut StatefulProtocol> {
        self.protocol.as_mut()
    }

    /// Area the image occupies when fitted into `area`.
    #[must_use]
    pub fn fitted_area(&self, area: Rect) -> Rect {
        match &self.protocol {
            Some(protocol) => {
                let size = protocol.size_for(Resize::Fit(None), area);
                let x = area.x + area.width.saturating_sub(size.width) / 2;
                Rect::new(x, area.y, size.width.min(area.width), size.height.min(area.height))
            }
            None => Rect::new(area.x, area.y, 0, 0),
        }
    }
}

impl std::fmt::Debug for PreviewSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewSlot")
            .field("id", &self.id)
            .field("has_protocol", &self.protocol.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ImageSource;
    use std::sync::Arc;

    fn loaded(url: &str) -> LoadedImage {
        LoadedImage {
            id: ImageId::from_url(url),
            image: Arc::new(image::DynamicImage::new_rgb8(60, 40)),
            source: ImageSource::Network,
        }
    }

    #[test]
    fn test_slot_builds_protocol_once_per_image() {
        let manager = ImageManager::halfblocks();
        let mut slot = PreviewSlot::new();
        let image = loaded("https://picsum.photos/id/1/600/400");

        slot.sync(&manager, Some(&image));
        assert!(slot.has_protocol());
        assert_eq!(slot.id, Some(image.id.clone()));

        slot.sync(&manager, None);
        assert!(!slot.has_protocol());
        assert!(slot.id.is_none());
    }

    #[test]
    fn test_slot_switches_to_new_image() {
        let manager = ImageManager::halfblocks();
        let mut slot = PreviewSlot::new();

        slot.sync(&manager, Some(&loaded("a")));
        let second = loaded("b");
        slot.sync(&manager, Some(&second));

        assert_eq!(slot.id, Some(second.id));
    }

    #[test]
    fn test_disabled_manager_renders_nothing() {
        let manager = ImageManager::disabled();
        let mut slot = PreviewSlot::new();

        slot.sync(&manager, Some(&loaded("a")));

        assert!(!manager.is_enabled());
        assert!(!slot.has_protocol());
        assert_eq!(slot.fitted_area(Rect::new(0, 0, 10, 10)).area(), 0);
    }
}
