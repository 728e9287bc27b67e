// ============================================================================
// Event pump
// ============================================================================
// Polls crossterm with a 250ms timeout; no key within the window yields a
// Tick so the render loop keeps turning. Only key presses are forwarded
// (some platforms emit press and release pairs).
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};

/// Application-level input events.
#[derive(Debug, Clone)]
pub enum Event {
    Key(KeyEvent),
    Tick,
}

pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    /// Reads the next event, blocking at most 250ms.
    pub fn next(&self) -> Result<Event> {
        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    Ok(Event::Key(key))
                }
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Key classification helpers
// ============================================================================

fn is_key(event: &Event, pred: impl Fn(KeyCode) -> bool) -> bool {
    matches!(event, Event::Key(key) if pred(key.code))
}

/// 'q' quits (two-step confirmation handled by the controller).
pub fn is_quit_event(event: &Event) -> bool {
    is_key(event, |c| matches!(c, KeyCode::Char('q') | KeyCode::Char('Q')))
}

/// Up arrow or 'k'.
pub fn is_up_event(event: &Event) -> bool {
    is_key(event, |c| {
        matches!(c, KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K'))
    })
}

/// Down arrow or 'j'.
pub fn is_down_event(event: &Event) -> bool {
    is_key(event, |c| {
        matches!(c, KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J'))
    })
}

/// Enter confirms the catalog selection.
pub fn is_enter_event(event: &Event) -> bool {
    is_key(event, |c| matches!(c, KeyCode::Enter))
}

/// Tab toggles focus between the catalog and widget panels.
pub fn is_tab_event(event: &Event) -> bool {
    is_key(event, |c| matches!(c, KeyCode::Tab))
}

/// 'g' on a focused widget: show graph.
pub fn is_show_graph_event(event: &Event) -> bool {
    is_key(event, |c| matches!(c, KeyCode::Char('g') | KeyCode::Char('G')))
}

/// 'c' on a focused widget: compare (overlay).
pub fn is_compare_event(event: &Event) -> bool {
    is_key(event, |c| matches!(c, KeyCode::Char('c') | KeyCode::Char('C')))
}

/// 'd' on a focused widget: remove it.
pub fn is_remove_event(event: &Event) -> bool {
    is_key(event, |c| matches!(c, KeyCode::Char('d') | KeyCode::Char('D')))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    #[test]
    fn test_key_classification() {
        assert!(is_quit_event(&key(KeyCode::Char('q'))));
        assert!(is_show_graph_event(&key(KeyCode::Char('g'))));
        assert!(is_compare_event(&key(KeyCode::Char('C'))));
        assert!(is_remove_event(&key(KeyCode::Char('d'))));
        assert!(is_tab_event(&key(KeyCode::Tab)));
        assert!(is_up_event(&key(KeyCode::Char('k'))));
        assert!(is_down_event(&key(KeyCode::Down)));

        assert!(!is_quit_event(&key(KeyCode::Char('x'))));
        assert!(!is_quit_event(&Event::Tick));
    }
}
