//! Event handling.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// User intent decoded from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Exit application.
    Quit,
    /// Leave the current screen.
    Back,
    /// Move selection up.
    Up,
    /// Move selection down.
    Down,
    /// Move selection left.
    Left,
    /// Move selection right.
    Right,
    /// Scroll one screen up.
    PageUp,
    /// Scroll one screen down.
    PageDown,
    /// Open the selected photo.
    Open,
    /// Open the full-size image in the system viewer.
    OpenExternal,
    /// Navigate to the photo list.
    Home,
    /// Retry the failed request.
    Retry,
}

/// Terminal key decoding.
pub struct EventHandler;

impl EventHandler {
    /// Checks if key is a quit event.
    #[must_use]
    pub fn is_quit_event(key: &KeyEvent) -> bool {
        matches!(
            key,
            KeyEvent {
                code: KeyCode::Char('q'),
                modifiers: KeyModifiers::NONE,
                ..
            } | KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            }
        )
    }

    /// Checks if key is a submit event.
    #[must_use]
    pub fn is_submit_event(key: &KeyEvent) -> bool {
        matches!(
            key,
            KeyEvent {
                code: KeyCode::Enter,
                ..
            }
        )
    }

    /// Decodes a key press. Releases and repeats of non-navigation keys are
    /// ignored.
    #[must_use]
    pub fn action(key: &KeyEvent) -> Option<KeyAction> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if Self::is_quit_event(key) {
            return Some(KeyAction::Quit);
        }
        if Self::is_submit_event(key) {
            return Some(KeyAction::Open);
        }

        let action = match key.code {
            KeyCode::Esc | KeyCode::Backspace => KeyAction::Back,
            KeyCode::Up | KeyCode::Char('k') => KeyAction::Up,
            KeyCode::Down | KeyCode::Char('j') => KeyAction::Down,
            KeyCode::Left | KeyCode::Char('h') => KeyAction::Left,
            KeyCode::Right | KeyCode::Char('l') => KeyAction::Right,
            KeyCode::PageUp => KeyAction::PageUp,
            KeyCode::PageDown | KeyCode::Char(' ') => KeyAction::PageDown,
            KeyCode::Char('o') => KeyAction::OpenExternal,
            KeyCode::Home | KeyCode::Char('g') => KeyAction::Home,
            KeyCode::Char('r') => KeyAction::Retry,
            _ => return None,
        };
        Some(action)
    }
}
