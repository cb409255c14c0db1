//! Detail view of a single photo.

use std::sync::Arc;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget, Wrap},
};
use ratatui_image::StatefulImage;

use crate::application::services::{
    DetailAggregator, DetailOutcome, DetailRequest, ImageLoadTracker, ImageUrlBuilder,
};
use crate::domain::entities::{Photo, PhotoId, PhotoMeta};
use crate::domain::ports::{ImageLoadedEvent, ImageLoaderPort};
use crate::presentation::events::KeyAction;
use crate::presentation::widgets::{ImageManager, PreviewSlot, StatusBar};

const DETAIL_HINTS: &str = "o open image  esc back  g home  q quit";

/// Result of a key press on the detail screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailKeyResult {
    Consumed,
    Ignored,
    /// Return to the list, keeping its position.
    Back,
    /// Navigate to the list route.
    Home,
    /// Open a URL in the system browser.
    OpenExternal(String),
}

/// Preview settings for the detail screen.
#[derive(Debug, Clone)]
pub struct PreviewSpec {
    pub urls: ImageUrlBuilder,
    pub width: u32,
    pub height: u32,
    pub enabled: bool,
}

pub struct DetailScreenState {
    id: PhotoId,
    aggregator: DetailAggregator,
    preview: ImageLoadTracker,
    slot: PreviewSlot,
    spec: PreviewSpec,
}

impl DetailScreenState {
    #[must_use]
    pub fn new(id: PhotoId, spec: PreviewSpec, loader: Arc<dyn ImageLoaderPort>) -> Self {
        Self {
            id,
            aggregator: DetailAggregator::new(),
            preview: ImageLoadTracker::new(loader, None),
            slot: PreviewSlot::new(),
            spec,
        }
    }

    /// Issues the detail lookup for this screen's photo.
    pub fn start(&mut self) -> Option<DetailRequest> {
        self.aggregator.request(Some(&self.id))
    }

    /// Commits a settled lookup. Returns false for stale outcomes.
    pub fn apply(&mut self, generation: u64, outcome: DetailOutcome) -> bool {
        let applied = self.aggregator.apply(generation, outcome);
        if applied {
            let url = self
                .aggregator
                .photo()
                .filter(|_| self.spec.enabled)
                .map(|photo| self.spec.urls.sized_url(photo.id(), self.spec.width, self.spec.height));
            self.preview.set_url(url);
        }
        applied
    }

    pub fn handle_image_event(&mut self, event: &ImageLoadedEvent) -> bool {
        self.preview.handle_event(event)
    }

    pub fn handle_key(&mut self, action: KeyAction) -> DetailKeyResult {
        match action {
            KeyAction::Back | KeyAction::Left => DetailKeyResult::Back,
            KeyAction::Home => DetailKeyResult::Home,
            KeyAction::OpenExternal => self
                .aggregator
                .photo()
                .map_or(DetailKeyResult::Ignored, |photo| {
                    DetailKeyResult::OpenExternal(photo.download_url().to_string())
                }),
            _ => DetailKeyResult::Ignored,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &PhotoId {
        &self.id
    }

    #[must_use]
    pub const fn aggregator(&self) -> &DetailAggregator {
        &self.aggregator
    }

    #[must_use]
    pub const fn preview(&self) -> &ImageLoadTracker {
        &self.preview
    }

    /// Drops the lookup in flight and the pending preview load.
    pub fn teardown(&mut self) {
        self.aggregator.teardown();
        self.preview.teardown();
        self.slot.clear();
    }
}

pub struct DetailScreen<'a> {
    images: &'a ImageManager,
}

impl<'a> DetailScreen<'a> {
    #[must_use]
    pub const fn new(images: &'a ImageManager) -> Self {
        Self { images }
    }
}

impl StatefulWidget for DetailScreen<'_> {
    type State = DetailScreenState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [content_area, status_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" Photo #{} ", state.id));
        let inner = block.inner(content_area);
        block.render(content_area, buf);

        if let Some(message) = state.aggregator.error() {
            render_centered(
                vec![
                    Line::styled(message.to_string(), Style::default().fg(Color::Red)),
                    Line::raw(""),
                    Line::styled("Press g to go home", Style::default().fg(Color::DarkGray)),
                ],
                inner,
                buf,
            );
            (&StatusBar::error("Photo unavailable").hints("g home  q quit")).render(status_area, buf);
            return;
        }

        let (Some(photo), false) = (state.aggregator.photo(), state.aggregator.is_loading()) else {
            render_centered(vec![Line::raw("Loading photo…")], inner, buf);
            (&StatusBar::busy("Loading photo…").hints(DETAIL_HINTS)).render(status_area, buf);
            return;
        };

        let status = if state.preview.is_loaded() || !state.spec.enabled {
            StatusBar::info(photo.author())
        } else {
            StatusBar::busy(format!("{} · loading preview…", photo.author()))
        };
        let info = info_lines(photo, state.aggregator.meta());

        if state.spec.enabled {
            let [image_area, info_area] =
                Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                    .spacing(1)
                    .areas(inner);
            render_preview(self.images, state, image_area, buf);
            render_info(info, info_area, buf);
        } else {
            render_info(info, inner, buf);
        }
        (&status.hints(DETAIL_HINTS)).render(status_area, buf);
    }
}

fn render_centered(lines: Vec<Line<'static>>, area: Rect, buf: &mut Buffer) {
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).min(area.height);
    let y = area.y + area.height.saturating_sub(height) / 2;
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(Rect::new(area.x, y, area.width, height), buf);
}

fn render_preview(images: &ImageManager, state: &mut DetailScreenState, area: Rect, buf: &mut Buffer) {
    state.slot.sync(images, state.preview.image());
    let fitted = state.slot.fitted_area(area);
    match state.slot.protocol_mut() {
        Some(protocol) => StatefulImage::default().render(fitted, buf, protocol),
        None => render_centered(
            vec![Line::styled("▒▒▒ loading preview ▒▒▒", Style::default().fg(Color::DarkGray))],
            area,
            buf,
        ),
    }
}

fn field(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<12}"), Style::default().fg(Color::Cyan)),
        Span::raw(value),
    ])
}

fn info_lines(photo: &Photo, meta: Option<&PhotoMeta>) -> Vec<Line<'static>> {
    let title = meta
        .and_then(|m| m.title.clone())
        .unwrap_or_else(|| "Title unavailable".to_string());
    let description = meta
        .and_then(|m| m.description.clone())
        .unwrap_or_else(|| "Description unavailable".to_string());

    vec![
        Line::styled(title, Style::default().add_modifier(Modifier::BOLD)),
        Line::raw(""),
        field("Author", photo.author().to_string()),
        field("Size", photo.dimensions_label()),
        field("Source", photo.url().to_string()),
        field("Download", photo.download_url().to_string()),
        Line::raw(""),
        Line::styled(description, Style::default().fg(Color::Gray)),
    ]
}

fn render_info(lines: Vec<Line<'static>>, area: Rect, buf: &mut Buffer) {
    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}
