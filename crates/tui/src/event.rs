//! Keyboard input.
//!
//! Polls crossterm for key presses and maps them onto chart actions.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::TuiResult;

/// Something the user asked the chart to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Move the row cursor down.
    Down,
    /// Move the row cursor up.
    Up,
    /// Collapse or expand the group under the cursor.
    ToggleGroup,
    /// Scroll the grid towards earlier times.
    ScrollLeft,
    /// Scroll the grid towards later times.
    ScrollRight,
    /// Finer step (more columns).
    ZoomIn,
    /// Coarser step (fewer columns).
    ZoomOut,
    /// Regroup by job instead of tool, or the reverse.
    SwitchGrouping,
    /// Re-read the schedule file.
    Reload,
}

/// Poll for keyboard events with a timeout.
///
/// Returns `Some(KeyEvent)` if a key was pressed within the timeout,
/// or `None` if no key was pressed.
pub fn poll_key(timeout: Duration) -> TuiResult<Option<KeyEvent>> {
    if event::poll(timeout)?
        && let Event::Key(key) = event::read()?
        && key.kind == KeyEventKind::Press
    {
        return Ok(Some(key));
    }
    Ok(None)
}

/// Map a key press to an action.
///
/// Vim-style letters only match without modifiers; Ctrl+C always quits.
pub fn action_for(key: &KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('j') | KeyCode::Down => Some(Action::Down),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::Up),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::ToggleGroup),
        KeyCode::Char('h') | KeyCode::Left => Some(Action::ScrollLeft),
        KeyCode::Char('l') | KeyCode::Right => Some(Action::ScrollRight),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::ZoomIn),
        KeyCode::Char('-') => Some(Action::ZoomOut),
        KeyCode::Char('g') => Some(Action::SwitchGrouping),
        KeyCode::Char('r') => Some(Action::Reload),
        _ => None,
    }
}
