//! Grid card for a single photo.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, StatefulWidget, Widget},
};
use ratatui_image::StatefulImage;

use crate::domain::entities::Photo;

use super::image_preview::PreviewSlot;
use crate::presentation::ui::truncate_to_width;

/// Card width in columns, borders included.
pub const CARD_WIDTH: u16 = 32;
/// Card height in rows, borders included.
pub const CARD_HEIGHT: u16 = 11;

/// Photo thumbnail with author caption.
///
/// Shows a placeholder until the thumbnail has loaded.
pub struct PhotoCard<'a> {
    photo: &'a Photo,
    selected: bool,
    loaded: bool,
}

impl<'a> PhotoCard<'a> {
    #[must_use]
    pub const fn new(photo: &'a Photo) -> Self {
        Self {
            photo,
            selected: false,
            loaded: false,
        }
    }

    #[must_use]
    pub const fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    #[must_use]
    pub const fn loaded(mut self, loaded: bool) -> Self {
        self.loaded = loaded;
        self
    }

    fn border_style(&self) -> Style {
        if self.selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }
}

impl StatefulWidget for PhotoCard<'_> {
    type State = PreviewSlot;

    fn render(self, area: Rect, buf: &mut Buffer, slot: &mut Self::State) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(if self.selected {
                BorderType::Thick
            } else {
                BorderType::Rounded
            })
            .border_style(self.border_style())
            .title(format!(" #{} ", self.photo.id()));
        let inner = block.inner(area);
        block.render(area, buf);

        let [image_area, caption_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(2)]).areas(inner);

        match slot.protocol_mut() {
            Some(protocol) => {
                StatefulImage::default().render(image_area, buf, protocol);
            }
            None => {
                let placeholder = if self.loaded { "▒▒▒" } else { "loading…" };
                let y = image_area.y + image_area.height / 2;
                Paragraph::new(placeholder)
                    .style(Style::default().fg(Color::DarkGray))
                    .alignment(Alignment::Center)
                    .render(Rect::new(image_area.x, y, image_area.width, 1).intersection(image_area), buf);
            }
        }

        let width = caption_area.width as usize;
        let caption = vec![
            Line::from(Span::styled(
                truncate_to_width(self.photo.author(), width),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                self.photo.dimensions_label(),
                Style::default().fg(Color::Gray),
            )),
        ];
        Paragraph::new(caption).render(caption_area, buf);
    }
}
