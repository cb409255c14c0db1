//! Screen for routes that match nothing.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::utils::centered_rect;
use crate::presentation::widgets::StatusBar;

pub struct NotFoundScreen {
    path: String,
}

impl NotFoundScreen {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Widget for &NotFoundScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [content_area, status_area] =
            Layout::vertical([Constraint::Min(5), Constraint::Length(1)]).areas(area);

        let card = centered_rect(48, 7, content_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" 404 ");
        let inner = block.inner(card);
        block.render(card, buf);

        Paragraph::new(vec![
            Line::styled("Page not found", Style::default().add_modifier(Modifier::BOLD)),
            Line::styled(self.path.clone(), Style::default().fg(Color::DarkGray)),
            Line::raw(""),
            Line::raw("Press g to go home"),
        ])
        .alignment(Alignment::Center)
        .render(inner, buf);

        (&StatusBar::warning(format!("No route for {}", self.path)).hints("g home  q quit"))
            .render(status_area, buf);
    }
}
