//! Infinite-scroll photo grid.

use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::sync::Arc;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, StatefulWidget, Widget},
};
use tracing::debug;

use crate::application::services::{
    ImageLoadTracker, ImageUrlBuilder, PageRequest, PaginatedListController, ScrollTriggeredPager,
};
use crate::domain::entities::{Photo, PhotoId};
use crate::domain::errors::PhotoApiError;
use crate::domain::ports::{ImageLoadedEvent, ImageLoaderPort};
use crate::presentation::events::KeyAction;
use crate::presentation::widgets::{
    CARD_HEIGHT, CARD_WIDTH, ImageManager, LOAD_BUFFER, PhotoCard, PreviewSlot, StatusBar,
    TerminalViewport, ViewportProbe,
};

const LIST_ERROR_MESSAGE: &str = "Unable to load photos. Press r to retry.";
const END_OF_LIST_MESSAGE: &str = "No more photos";
const LIST_HINTS: &str = "←↑↓→ move  ⏎ open  r retry  q quit";

/// Result of a key press on the list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListKeyResult {
    /// Handled locally.
    Consumed,
    /// Not a list key.
    Ignored,
    /// Navigate to the detail view.
    OpenPhoto(PhotoId),
    /// Fetch a page.
    Request(PageRequest),
}

struct CardSlot {
    tracker: ImageLoadTracker,
    preview: PreviewSlot,
}

/// Thumbnail settings for grid cards.
#[derive(Debug, Clone)]
pub struct ThumbnailSpec {
    pub urls: ImageUrlBuilder,
    pub width: u32,
    pub height: u32,
}

impl ThumbnailSpec {
    fn url(&self, id: &PhotoId) -> String {
        self.urls.sized_url(id, self.width, self.height)
    }
}

/// State of the photo grid.
///
/// Owns the page counter: the pager bumps it when the last card scrolls
/// into view, and every bump turns into a page request.
pub struct ListScreenState {
    controller: PaginatedListController,
    pager: ScrollTriggeredPager,
    probe: ViewportProbe,
    page: u32,
    thumbnails: ThumbnailSpec,
    loader: Arc<dyn ImageLoaderPort>,
    cards: HashMap<PhotoId, CardSlot>,
    selected: usize,
    scroll_row: usize,
    columns: usize,
    visible_rows: usize,
}

impl ListScreenState {
    #[must_use]
    pub fn new(limit: u32, thumbnails: ThumbnailSpec, loader: Arc<dyn ImageLoaderPort>) -> Self {
        let (viewport, probe) = TerminalViewport::new();
        Self {
            controller: PaginatedListController::new(limit),
            pager: ScrollTriggeredPager::new(Box::new(viewport)),
            probe,
            page: 1,
            thumbnails,
            loader,
            cards: HashMap::new(),
            selected: 0,
            scroll_row: 0,
            columns: 1,
            visible_rows: 1,
        }
    }

    /// Requests the first page.
    pub fn start(&mut self) -> PageRequest {
        self.request_current_page()
    }

    fn request_current_page(&mut self) -> PageRequest {
        let request = self.controller.request_page(self.page);
        self.sync_pager();
        request
    }

    fn sync_pager(&mut self) {
        let state = self.controller.state();
        let sentinel = state.photos.last().map(Photo::id);
        self.pager.attach(sentinel, state.loading, state.has_more);
    }

    /// Applies a page response. Returns false for stale responses.
    pub fn apply_page(&mut self, generation: u64, result: Result<Vec<Photo>, PhotoApiError>) -> bool {
        let applied = self.controller.apply(generation, result);
        if applied {
            self.sync_pager();
            self.clamp_selection();
        }
        applied
    }

    /// Samples the sentinel's visibility in the frame just drawn and
    /// returns the page request it triggered, if any.
    pub fn after_draw(&mut self) -> Option<PageRequest> {
        self.sync_cards();

        let visible: HashSet<PhotoId> = self.controller.photos()[self.visible_range()]
            .iter()
            .map(|photo| photo.id().clone())
            .collect();

        for entry in self.probe.report(|id| visible.contains(id)) {
            if self.pager.on_intersection(entry, &mut self.page) {
                return Some(self.request_current_page());
            }
        }
        None
    }

    /// Re-requests the current page after a failure.
    pub fn retry(&mut self) -> Option<PageRequest> {
        if !self.controller.has_error() {
            return None;
        }
        debug!(page = self.page, "Retrying page");
        Some(self.request_current_page())
    }

    /// Feeds a thumbnail completion to the card that requested it.
    pub fn handle_image_event(&mut self, event: &ImageLoadedEvent) -> bool {
        self.cards
            .values_mut()
            .find(|card| card.tracker.id() == event.ticket.tracker)
            .is_some_and(|card| card.tracker.handle_event(event))
    }

    pub fn handle_key(&mut self, action: KeyAction) -> ListKeyResult {
        let columns = self.columns.max(1);
        let len = self.controller.photos().len();
        match action {
            KeyAction::Left => self.select(self.selected.saturating_sub(1)),
            KeyAction::Right => self.select(self.selected + 1),
            KeyAction::Up => self.select(self.selected.saturating_sub(columns)),
            KeyAction::Down => {
                // Moving down from a partial last row lands on the last card.
                if self.selected + columns < len {
                    self.select(self.selected + columns);
                } else {
                    self.select(len.saturating_sub(1));
                }
            }
            KeyAction::PageUp => {
                self.select(self.selected.saturating_sub(columns * self.visible_rows));
            }
            KeyAction::PageDown => {
                self.select(self.selected + columns * self.visible_rows);
            }
            KeyAction::Home => self.select(0),
            KeyAction::Open => {
                return self
                    .selected_photo()
                    .map_or(ListKeyResult::Ignored, |photo| {
                        ListKeyResult::OpenPhoto(photo.id().clone())
                    });
            }
            KeyAction::Retry => {
                return self
                    .retry()
                    .map_or(ListKeyResult::Consumed, ListKeyResult::Request);
            }
            _ => return ListKeyResult::Ignored,
        }
        ListKeyResult::Consumed
    }

    /// Scrolls by whole rows, keeping the selection on screen.
    pub fn scroll_rows(&mut self, delta: isize) {
        let columns = self.columns.max(1);
        let target = self.selected.saturating_add_signed(delta * columns as isize);
        self.select(target);
    }

    fn select(&mut self, index: usize) {
        let len = self.controller.photos().len();
        self.selected = index.min(len.saturating_sub(1));
        self.ensure_selected_visible();
    }

    fn clamp_selection(&mut self) {
        self.select(self.selected);
    }

    fn ensure_selected_visible(&mut self) {
        let row = self.selected / self.columns.max(1);
        if row < self.scroll_row {
            self.scroll_row = row;
        } else if row >= self.scroll_row + self.visible_rows.max(1) {
            self.scroll_row = row + 1 - self.visible_rows.max(1);
        }
    }

    fn visible_range(&self) -> Range<usize> {
        self.row_range(self.scroll_row, self.scroll_row + self.visible_rows)
    }

    fn row_range(&self, first_row: usize, end_row: usize) -> Range<usize> {
        let len = self.controller.photos().len();
        let start = (first_row * self.columns).min(len);
        let end = (end_row * self.columns).min(len);
        start..end
    }

    /// Keeps thumbnail trackers for cards on screen and a few rows around it.
    fn sync_cards(&mut self) {
        let range = self.row_range(
            self.scroll_row.saturating_sub(LOAD_BUFFER),
            self.scroll_row + self.visible_rows + LOAD_BUFFER,
        );
        let wanted: HashSet<&PhotoId> = self.controller.photos()[range]
            .iter()
            .map(Photo::id)
            .collect();

        // Dropping a tracker detaches its pending load.
        self.cards.retain(|id, _| wanted.contains(id));

        for id in wanted {
            if !self.cards.contains_key(id) {
                let url = self.thumbnails.url(id);
                self.cards.insert(
                    id.clone(),
                    CardSlot {
                        tracker: ImageLoadTracker::new(self.loader.clone(), Some(url)),
                        preview: PreviewSlot::new(),
                    },
                );
            }
        }
    }

    #[must_use]
    pub fn selected_photo(&self) -> Option<&Photo> {
        self.controller.photos().get(self.selected)
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn controller(&self) -> &PaginatedListController {
        &self.controller
    }

    /// Invalidates the page request in flight and releases thumbnails.
    pub fn teardown(&mut self) {
        self.controller.teardown();
        self.cards.clear();
    }

    fn status_bar(&self) -> StatusBar {
        let state = self.controller.state();
        let bar = if state.error {
            StatusBar::error(LIST_ERROR_MESSAGE)
        } else if state.loading {
            StatusBar::busy("Loading photos…")
        } else if !state.has_more {
            StatusBar::info(END_OF_LIST_MESSAGE)
        } else {
            StatusBar::info(format!("{} photos", state.photos.len()))
        };
        bar.hints(LIST_HINTS)
    }
}

/// Photo grid widget.
pub struct ListScreen<'a> {
    images: &'a ImageManager,
}

impl<'a> ListScreen<'a> {
    #[must_use]
    pub const fn new(images: &'a ImageManager) -> Self {
        Self { images }
    }
}

impl StatefulWidget for ListScreen<'_> {
    type State = ListScreenState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [header_area, grid_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(CARD_HEIGHT),
            Constraint::Length(1),
        ])
        .areas(area);

        render_header(state, header_area, buf);
        render_grid(self.images, state, grid_area, buf);
        (&state.status_bar()).render(status_area, buf);
    }
}

fn render_header(state: &ListScreenState, area: Rect, buf: &mut Buffer) {
    let line = Line::from(vec![
        Span::styled(
            " Picsum Gallery ",
            Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  page {}", state.page)),
    ]);
    Paragraph::new(line).render(area, buf);
}

fn render_grid(images: &ImageManager, state: &mut ListScreenState, area: Rect, buf: &mut Buffer) {
    state.columns = usize::from((area.width / CARD_WIDTH).max(1));
    state.visible_rows = usize::from((area.height / CARD_HEIGHT).max(1));
    state.ensure_selected_visible();

    if state.controller.photos().is_empty() {
        let message = if state.controller.is_loading() {
            "Loading photos…"
        } else if state.controller.has_error() {
            LIST_ERROR_MESSAGE
        } else {
            END_OF_LIST_MESSAGE
        };
        let y = area.y + area.height / 2;
        Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .render(Rect::new(area.x, y, area.width, 1), buf);
        return;
    }

    let range = state.visible_range();
    let columns = state.columns;
    let x_offset = (area.width - (CARD_WIDTH * columns as u16).min(area.width)) / 2;

    for (offset, photo) in state.controller.photos()[range.clone()].iter().enumerate() {
        let index = range.start + offset;
        let row = (offset / columns) as u16;
        let column = (offset % columns) as u16;
        let card_area = Rect::new(
            area.x + x_offset + column * CARD_WIDTH,
            area.y + row * CARD_HEIGHT,
            CARD_WIDTH,
            CARD_HEIGHT,
        )
        .intersection(area);

        let mut fallback = PreviewSlot::new();
        let (slot, loaded) = match state.cards.get_mut(photo.id()) {
            Some(card) => {
                card.preview.sync(images, card.tracker.image());
                (&mut card.preview, card.tracker.is_loaded())
            }
            None => (&mut fallback, false),
        };

        PhotoCard::new(photo)
            .selected(index == state.selected)
            .loaded(loaded)
            .render(card_area, buf, slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::RecordingImageLoader;

    fn photos(range: Range<u32>) -> Vec<Photo> {
        range
            .map(|i| {
                Photo::new(
                    i.to_string(),
                    format!("Author {i}"),
                    format!("https://unsplash.com/photos/{i}"),
                    format!("https://picsum.photos/id/{i}/100/100"),
                    100,
                    100,
                )
            })
            .collect()
    }

    fn state() -> (ListScreenState, Arc<RecordingImageLoader>) {
        let loader = RecordingImageLoader::new();
        let thumbnails = ThumbnailSpec {
            urls: ImageUrlBuilder::default(),
            width: 600,
            height: 400,
        };
        (ListScreenState::new(3, thumbnails, loader.clone()), loader)
    }

    fn draw(state: &mut ListScreenState, width: u16, height: u16) -> Option<PageRequest> {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        ListScreen::new(&ImageManager::disabled()).render(area, &mut buf, state);
        state.after_draw()
    }

    #[test]
    fn test_visible_sentinel_requests_next_page() {
        let (mut state, _) = state();
        let first = state.start();
        assert_eq!(first.page, 1);
        assert!(draw(&mut state, 100, 40).is_none());

        assert!(state.apply_page(first.generation, Ok(photos(0..3))));

        // Three cards fit on one row, so the last card is on screen.
        let next = draw(&mut state, 100, 40).expect("next page requested");
        assert_eq!(next.page, 2);
        assert_eq!(state.page(), 2);
        assert!(state.controller().is_loading());
    }

    #[test]
    fn test_hidden_sentinel_waits_for_scroll() {
        let (mut state, _) = state();
        let first = state.start();
        state.apply_page(first.generation, Ok(photos(0..3)));

        // One card per row and one visible row.
        assert!(draw(&mut state, CARD_WIDTH, CARD_HEIGHT + 2).is_none());
        assert!(draw(&mut state, CARD_WIDTH, CARD_HEIGHT + 2).is_none());

        assert_eq!(state.handle_key(KeyAction::Down), ListKeyResult::Consumed);
        assert_eq!(state.handle_key(KeyAction::Down), ListKeyResult::Consumed);

        let next = draw(&mut state, CARD_WIDTH, CARD_HEIGHT + 2).expect("next page requested");
        assert_eq!(next.page, 2);
    }

    #[test]
    fn test_no_request_while_loading_or_exhausted() {
        let (mut state, _) = state();
        let first = state.start();
        state.apply_page(first.generation, Ok(photos(0..3)));
        let second = draw(&mut state, 100, 40).expect("page 2");

        // Loading: sentinel unobserved.
        assert!(draw(&mut state, 100, 40).is_none());

        state.apply_page(second.generation, Ok(Vec::new()));
        assert!(!state.controller().has_more());
        assert!(draw(&mut state, 100, 40).is_none());
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn test_retry_requests_failed_page() {
        let (mut state, _) = state();
        let first = state.start();
        assert!(state.retry().is_none());

        state.apply_page(first.generation, Err(PhotoApiError::Timeout));

        match state.handle_key(KeyAction::Retry) {
            ListKeyResult::Request(request) => assert_eq!(request.page, 1),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_open_selected_photo() {
        let (mut state, _) = state();
        assert_eq!(state.handle_key(KeyAction::Open), ListKeyResult::Ignored);

        let first = state.start();
        state.apply_page(first.generation, Ok(photos(0..3)));
        draw(&mut state, 100, 40);
        state.handle_key(KeyAction::Right);

        assert_eq!(
            state.handle_key(KeyAction::Open),
            ListKeyResult::OpenPhoto(PhotoId::new("1"))
        );
    }

    #[test]
    fn test_thumbnails_load_for_visible_cards() {
        let (mut state, loader) = state();
        let first = state.start();
        state.apply_page(first.generation, Ok(photos(0..3)));
        draw(&mut state, 100, 40);

        let urls: Vec<String> = loader.loads().into_iter().map(|t| t.url).collect();
        assert_eq!(urls.len(), 3);
        assert!(urls.contains(&"https://picsum.photos/id/0/600/400".to_string()));

        let ticket = loader.last_load().expect("load issued");
        assert!(state.handle_image_event(&RecordingImageLoader::success(&ticket)));
    }

    #[test]
    fn test_teardown_detaches_thumbnails() {
        let (mut state, loader) = state();
        let first = state.start();
        state.apply_page(first.generation, Ok(photos(0..3)));
        draw(&mut state, 100, 40);

        state.teardown();

        assert_eq!(loader.detached().len(), 3);
    }
}
