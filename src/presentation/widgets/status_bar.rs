//! Single-line status bar with left message and right key hints.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// Status bar severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    /// Informational.
    Info,
    /// Background work in progress.
    Busy,
    /// Warning.
    Warning,
    /// Error.
    Error,
}

impl StatusLevel {
    /// Returns color for level.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Info => Color::Gray,
            Self::Busy => Color::Cyan,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }
}

/// Status bar widget.
#[derive(Debug, Clone)]
pub struct StatusBar {
    message: String,
    hints: String,
    level: StatusLevel,
}

impl StatusBar {
    /// Creates empty status bar.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            message: String::new(),
            hints: String::new(),
            level: StatusLevel::Info,
        }
    }

    #[must_use]
    pub fn message(mut self, content: impl Into<String>) -> Self {
        self.message = content.into();
        self
    }

    /// Sets the right-aligned key hints.
    #[must_use]
    pub fn hints(mut self, content: impl Into<String>) -> Self {
        self.hints = content.into();
        self
    }

    #[must_use]
    pub const fn level(mut self, level: StatusLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new().message(message).level(StatusLevel::Info)
    }

    #[must_use]
    pub fn busy(message: impl Into<String>) -> Self {
        Self::new().message(message).level(StatusLevel::Busy)
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new().message(message).level(StatusLevel::Warning)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new().message(message).level(StatusLevel::Error)
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for &StatusBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default()
            .fg(self.level.color())
            .add_modifier(Modifier::BOLD);
        let hint_style = Style::default().fg(Color::DarkGray);

        let width = area.width as usize;
        let message_width = self.message.width();
        let hints_width = self.hints.width();

        let mut spans = vec![Span::styled(self.message.as_str(), style)];

        // Hints are dropped first when the line is too narrow.
        if message_width + 1 + hints_width <= width && !self.hints.is_empty() {
            let padding = width - message_width - hints_width;
            spans.push(Span::raw(" ".repeat(padding)));
            spans.push(Span::styled(self.hints.as_str(), hint_style));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(bar: &StatusBar, width: u16) -> String {
        let area = Rect::new(0, 0, width, 1);
        let mut buf = Buffer::empty(area);
        bar.render(area, &mut buf);
        buf.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_hints_are_right_aligned() {
        let bar = StatusBar::info("12 photos").hints("q quit");
        let line = render(&bar, 30);
        assert!(line.starts_with("12 photos"));
        assert!(line.ends_with("q quit"));
    }

    #[test]
    fn test_hints_dropped_when_narrow() {
        let bar = StatusBar::error("Unable to load photos").hints("r retry");
        let line = render(&bar, 24);
        assert!(line.starts_with("Unable to load photos"));
        assert!(!line.contains("retry"));
    }

    #[test]
    fn test_level_colors() {
        assert_eq!(StatusLevel::Error.color(), Color::Red);
        assert_eq!(StatusLevel::Busy.color(), Color::Cyan);
    }
}
