use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::table::TableView;

/// Navigation commands understood by the table view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavAction {
    LineUp,
    LineDown,
    PageUp,
    PageDown,
    ColLeft,
    ColRight,
}

impl NavAction {
    /// Apply the action `count` times (pages use the view height)
    pub fn apply(self, view: &mut TableView, count: usize) {
        match self {
            NavAction::LineUp => view.move_up(count),
            NavAction::LineDown => view.move_down(count),
            NavAction::PageUp => view.page_up(count),
            NavAction::PageDown => view.page_down(count),
            NavAction::ColLeft => view.move_left(count),
            NavAction::ColRight => view.move_right(count),
        }
    }
}

/// Result of handling a key event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyResult {
    /// Run this action with a count
    Action(NavAction, usize),
    /// A count prefix is being typed
    Pending,
    /// Quit the application
    Quit,
    /// Key has no binding
    Ignored,
}

/// Map a single key to its binding
pub fn key_binding(key: KeyEvent) -> Option<KeyResult> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(KeyResult::Quit),
            _ => None,
        };
    }

    let action = match key.code {
        KeyCode::Up | KeyCode::Char('k') => NavAction::LineUp,
        KeyCode::Down | KeyCode::Char('j') => NavAction::LineDown,
        KeyCode::PageUp | KeyCode::Char('b') => NavAction::PageUp,
        KeyCode::PageDown | KeyCode::Char('f') | KeyCode::Char(' ') => NavAction::PageDown,
        KeyCode::Left | KeyCode::Char('h') => NavAction::ColLeft,
        KeyCode::Right | KeyCode::Char('l') => NavAction::ColRight,
        KeyCode::Char('q') | KeyCode::Esc => return Some(KeyResult::Quit),
        _ => return None,
    };
    Some(KeyResult::Action(action, 1))
}

/// Accumulates an optional count prefix (`5j`) in front of a binding
pub struct KeyBuffer {
    count: Option<usize>,
    last_key_time: Instant,
    timeout: Duration,
}

impl KeyBuffer {
    pub fn new() -> Self {
        Self {
            count: None,
            last_key_time: Instant::now(),
            timeout: Duration::from_millis(1000),
        }
    }

    /// Process a key event, returning what action to take
    pub fn process(&mut self, key: KeyEvent) -> KeyResult {
        // Clear the count if too much time has passed since the last key
        if self.last_key_time.elapsed() > self.timeout {
            self.count = None;
        }
        self.last_key_time = Instant::now();

        if let KeyCode::Char(c) = key.code {
            if let Some(digit) = c.to_digit(10) {
                // a leading zero is not a count
                if digit != 0 || self.count.is_some() {
                    let count = self
                        .count
                        .unwrap_or(0)
                        .saturating_mul(10)
                        .saturating_add(digit as usize);
                    self.count = Some(count);
                    return KeyResult::Pending;
                }
            }
        }

        let count = self.take_count();
        match key_binding(key) {
            Some(KeyResult::Action(action, _)) => KeyResult::Action(action, count),
            Some(other) => other,
            None => KeyResult::Ignored,
        }
    }

    /// Pending count, for display
    pub fn count(&self) -> Option<usize> {
        self.count
    }

    fn take_count(&mut self) -> usize {
        self.count.take().unwrap_or(1)
    }
}

impl Default for KeyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_default_bindings() {
        assert_eq!(key_binding(key(KeyCode::Char('j'))), Some(KeyResult::Action(NavAction::LineDown, 1)));
        assert_eq!(key_binding(key(KeyCode::Up)), Some(KeyResult::Action(NavAction::LineUp, 1)));
        assert_eq!(key_binding(key(KeyCode::Char(' '))), Some(KeyResult::Action(NavAction::PageDown, 1)));
        assert_eq!(key_binding(key(KeyCode::PageUp)), Some(KeyResult::Action(NavAction::PageUp, 1)));
        assert_eq!(key_binding(key(KeyCode::Right)), Some(KeyResult::Action(NavAction::ColRight, 1)));
        assert_eq!(key_binding(key(KeyCode::Char('h'))), Some(KeyResult::Action(NavAction::ColLeft, 1)));
        assert_eq!(key_binding(key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(key_binding(key(KeyCode::Char('q'))), Some(KeyResult::Quit));
        assert_eq!(key_binding(key(KeyCode::Esc)), Some(KeyResult::Quit));
        assert_eq!(
            key_binding(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(KeyResult::Quit)
        );
        assert_eq!(
            key_binding(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn test_count_prefix() {
        let mut buffer = KeyBuffer::new();
        assert_eq!(buffer.process(key(KeyCode::Char('1'))), KeyResult::Pending);
        assert_eq!(buffer.process(key(KeyCode::Char('2'))), KeyResult::Pending);
        assert_eq!(buffer.count(), Some(12));
        assert_eq!(
            buffer.process(key(KeyCode::Char('j'))),
            KeyResult::Action(NavAction::LineDown, 12)
        );
        // count is consumed
        assert_eq!(
            buffer.process(key(KeyCode::Char('k'))),
            KeyResult::Action(NavAction::LineUp, 1)
        );
    }

    #[test]
    fn test_leading_zero_is_not_a_count() {
        let mut buffer = KeyBuffer::new();
        assert_eq!(buffer.process(key(KeyCode::Char('0'))), KeyResult::Ignored);
        assert_eq!(buffer.count(), None);
    }

    #[test]
    fn test_unbound_key_drops_count() {
        let mut buffer = KeyBuffer::new();
        buffer.process(key(KeyCode::Char('3')));
        assert_eq!(buffer.process(key(KeyCode::Char('x'))), KeyResult::Ignored);
        assert_eq!(
            buffer.process(key(KeyCode::Down)),
            KeyResult::Action(NavAction::LineDown, 1)
        );
    }

    #[test]
    fn test_apply_actions() {
        use crate::style::Theme;
        use crate::table::Grid;

        let rows = (0..30).map(|r| vec![r.to_string(), "x".to_string()]).collect();
        let grid = Grid::new(vec!["n".to_string(), "v".to_string()], rows);
        let mut view = TableView::new(grid, 5, Theme::default());

        NavAction::PageDown.apply(&mut view, 2);
        assert_eq!(view.cursor_row(), 10);
        NavAction::LineUp.apply(&mut view, 3);
        assert_eq!(view.cursor_row(), 7);
        NavAction::ColRight.apply(&mut view, 4);
        assert_eq!(view.cursor_col(), 1);
        NavAction::ColLeft.apply(&mut view, 1);
        assert_eq!(view.cursor_col(), 0);
        NavAction::PageUp.apply(&mut view, 1);
        assert_eq!(view.cursor_row(), 2);
    }
}
