//! Main application orchestrator.

use std::sync::Arc;

use crossterm::event::{Event, EventStream, KeyEvent, MouseEventKind};
use futures_util::StreamExt;
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::domain::entities::PhotoId;
use crate::domain::ports::{ImageLoadedEvent, ImageLoaderPort, PhotoSourcePort};
use crate::domain::route::Route;
use crate::presentation::events::{EventHandler, KeyAction};
use crate::presentation::ui::backend::{Action, Backend, BackendCommand};
use crate::presentation::ui::{
    DetailKeyResult, DetailScreen, DetailScreenState, ListKeyResult, ListScreen, ListScreenState,
    NotFoundScreen, PreviewSpec, ThumbnailSpec,
};
use crate::presentation::widgets::ImageManager;

/// Settings the UI needs from the configuration.
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub page_size: u32,
    pub thumbnails: ThumbnailSpec,
    pub preview: PreviewSpec,
}

enum CurrentScreen {
    List,
    Detail(Box<DetailScreenState>),
    NotFound(NotFoundScreen),
}

pub struct App {
    options: AppOptions,
    route: Route,
    screen: CurrentScreen,
    /// Kept across detail visits so the grid keeps its pages and position.
    list: Option<ListScreenState>,
    images: ImageManager,
    loader: Arc<dyn ImageLoaderPort>,
    command_tx: mpsc::UnboundedSender<BackendCommand>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    image_rx: mpsc::UnboundedReceiver<ImageLoadedEvent>,
    exiting: bool,
}

impl App {
    /// Creates the application and spawns its backend worker.
    #[must_use]
    pub fn new(
        source: Arc<dyn PhotoSourcePort>,
        loader: Arc<dyn ImageLoaderPort>,
        image_rx: mpsc::UnboundedReceiver<ImageLoadedEvent>,
        images: ImageManager,
        options: AppOptions,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        tokio::spawn(Backend::new(source, command_rx, action_tx).run());

        Self {
            options,
            route: Route::NotFound(String::new()),
            screen: CurrentScreen::NotFound(NotFoundScreen::new("")),
            list: None,
            images,
            loader,
            command_tx,
            action_rx,
            image_rx,
            exiting: false,
        }
    }

    /// # Errors
    /// Returns error if drawing to the terminal fails.
    pub async fn run(mut self, terminal: &mut DefaultTerminal, path: &str) -> color_eyre::Result<()> {
        self.navigate(Route::resolve(path));

        let mut terminal_events = EventStream::new();
        self.draw(terminal)?;

        while !self.exiting {
            tokio::select! {
                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action);
                }
                Some(event) = self.image_rx.recv() => {
                    if !self.handle_image_event(&event) {
                        continue;
                    }
                }
                event = terminal_events.next() => {
                    match event {
                        Some(Ok(event)) => self.handle_terminal_event(event),
                        Some(Err(e)) => {
                            error!(error = %e, "Terminal event stream failed");
                            self.exiting = true;
                        }
                        None => self.exiting = true,
                    }
                }
            }
            if !self.exiting {
                self.draw(terminal)?;
            }
        }

        self.teardown();
        info!("Application exiting normally");
        Ok(())
    }

    fn draw(&mut self, terminal: &mut DefaultTerminal) -> std::io::Result<()> {
        terminal.draw(|frame| self.render(frame))?;
        if self.after_draw() {
            terminal.draw(|frame| self.render(frame))?;
        }
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        match &mut self.screen {
            CurrentScreen::List => {
                if let Some(list) = self.list.as_mut() {
                    frame.render_stateful_widget(ListScreen::new(&self.images), area, list);
                }
            }
            CurrentScreen::Detail(state) => {
                frame.render_stateful_widget(DetailScreen::new(&self.images), area, state.as_mut());
            }
            CurrentScreen::NotFound(screen) => {
                frame.render_widget(&*screen, area);
            }
        }
    }

    /// Samples the viewport after a frame. Returns true if a page request
    /// was issued and the frame should be redrawn.
    fn after_draw(&mut self) -> bool {
        if !matches!(self.screen, CurrentScreen::List) {
            return false;
        }
        let Some(request) = self.list.as_mut().and_then(ListScreenState::after_draw) else {
            return false;
        };
        self.send(BackendCommand::LoadPage(request));
        true
    }

    fn send(&self, command: BackendCommand) {
        if let Err(e) = self.command_tx.send(command) {
            error!("Failed to send backend command: {}", e);
        }
    }

    /// Switches to `route`, tearing down the screen being left.
    pub fn navigate(&mut self, route: Route) {
        let route = match route {
            Route::Redirect(target) => Route::resolve(&target),
            other => other,
        };
        debug!(route = %route, "Navigating");

        if let CurrentScreen::Detail(state) = &mut self.screen {
            state.teardown();
        }

        self.screen = match &route {
            Route::PhotoList | Route::Redirect(_) => {
                self.ensure_list();
                CurrentScreen::List
            }
            Route::PhotoDetail(id) => CurrentScreen::Detail(Box::new(self.open_detail(id.clone()))),
            Route::NotFound(path) => {
                warn!(path = %path, "No route matched");
                CurrentScreen::NotFound(NotFoundScreen::new(path.clone()))
            }
        };
        self.route = route;
    }

    fn ensure_list(&mut self) {
        if self.list.is_some() {
            return;
        }
        let mut list = ListScreenState::new(
            self.options.page_size,
            self.options.thumbnails.clone(),
            self.loader.clone(),
        );
        let request = list.start();
        self.list = Some(list);
        self.send(BackendCommand::LoadPage(request));
    }

    fn open_detail(&self, id: PhotoId) -> DetailScreenState {
        let mut state = DetailScreenState::new(id, self.options.preview.clone(), self.loader.clone());
        if let Some(request) = state.start() {
            self.send(BackendCommand::LoadDetail(request));
        }
        state
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::PageLoaded { generation, result } => {
                if let Some(list) = self.list.as_mut() {
                    list.apply_page(generation, result);
                }
            }
            Action::DetailLoaded {
                id,
                generation,
                outcome,
            } => match &mut self.screen {
                CurrentScreen::Detail(state) if state.id() == &id => {
                    state.apply(generation, outcome);
                }
                _ => debug!(photo_id = %id, "Dropping detail response for a closed screen"),
            },
        }
    }

    /// Routes an image completion to whichever tracker issued it.
    pub fn handle_image_event(&mut self, event: &ImageLoadedEvent) -> bool {
        if let CurrentScreen::Detail(state) = &mut self.screen {
            if state.handle_image_event(event) {
                return true;
            }
        }
        self.list
            .as_mut()
            .is_some_and(|list| list.handle_image_event(event))
    }

    fn handle_terminal_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(&key),
            Event::Mouse(mouse) => {
                if let (CurrentScreen::List, Some(list)) = (&self.screen, self.list.as_mut()) {
                    match mouse.kind {
                        MouseEventKind::ScrollDown => list.scroll_rows(1),
                        MouseEventKind::ScrollUp => list.scroll_rows(-1),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        if let Some(action) = EventHandler::action(key) {
            self.handle_key_action(action);
        }
    }

    pub fn handle_key_action(&mut self, action: KeyAction) {
        if action == KeyAction::Quit {
            self.exiting = true;
            return;
        }

        match &mut self.screen {
            CurrentScreen::List => {
                let Some(list) = self.list.as_mut() else {
                    return;
                };
                match list.handle_key(action) {
                    ListKeyResult::OpenPhoto(id) => self.navigate(Route::PhotoDetail(id)),
                    ListKeyResult::Request(request) => self.send(BackendCommand::LoadPage(request)),
                    ListKeyResult::Consumed | ListKeyResult::Ignored => {}
                }
            }
            CurrentScreen::Detail(state) => match state.handle_key(action) {
                DetailKeyResult::Back | DetailKeyResult::Home => self.navigate(Route::home()),
                DetailKeyResult::OpenExternal(url) => {
                    info!(url = %url, "Opening image in system viewer");
                    if let Err(e) = opener::open(&url) {
                        warn!(url = %url, error = %e, "Failed to open URL");
                    }
                }
                DetailKeyResult::Consumed | DetailKeyResult::Ignored => {}
            },
            CurrentScreen::NotFound(_) => {
                if matches!(action, KeyAction::Home | KeyAction::Back) {
                    self.navigate(Route::home());
                }
            }
        }
    }

    fn teardown(&mut self) {
        if let CurrentScreen::Detail(state) = &mut self.screen {
            state.teardown();
        }
        if let Some(list) = self.list.as_mut() {
            list.teardown();
        }
    }

    #[must_use]
    pub const fn route(&self) -> &Route {
        &self.route
    }

    #[must_use]
    pub const fn is_exiting(&self) -> bool {
        self.exiting
    }
}
