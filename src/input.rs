//! Input handling - key reading and classification
//!
//! Translates raw crossterm key events into the editor's key classes.
//! The four indentation keys (Tab, Shift+Tab, Ctrl+Tab, Enter) are the
//! classes the edit-policy engine consumes; everything else is movement,
//! plain insertion, or a command chord.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::indent::EditKey;

/// A classified key input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Advance to next tab stop
    Tab,
    /// Shift+Tab: outdent the current line
    BackTab,
    /// Ctrl+Tab: force one indent level at line start
    CtrlTab,
    /// Newline with carried indentation
    Enter,
    /// Printable self-insert character
    Char(char),
    /// Control chord (Ctrl+S, Ctrl+F, ...)
    Ctrl(char),
    /// Alt chord
    Alt(char),
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// Ctrl+PageUp: previous tab
    CtrlPageUp,
    /// Ctrl+PageDown: next tab
    CtrlPageDown,
    Esc,
}

impl Key {
    /// The edit-policy class of this key, if it has one
    pub fn edit_key(&self) -> Option<EditKey> {
        match self {
            Key::Tab => Some(EditKey::Tab),
            Key::BackTab => Some(EditKey::BackTab),
            Key::CtrlTab => Some(EditKey::CtrlTab),
            Key::Enter => Some(EditKey::Enter),
            _ => None,
        }
    }
}

/// Translate a crossterm KeyEvent into a classified key
///
/// Only key-press events are translated; release and repeat events are
/// dropped (critical on Windows, where crossterm reports all kinds).
pub fn translate(event: KeyEvent) -> Option<Key> {
    let KeyEvent {
        code,
        modifiers,
        kind,
        ..
    } = event;

    if kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let alt = modifiers.contains(KeyModifiers::ALT);

    match code {
        KeyCode::Tab if ctrl => Some(Key::CtrlTab),
        KeyCode::Tab => Some(Key::Tab),
        KeyCode::BackTab => Some(Key::BackTab),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Char(ch) => {
            if ctrl {
                Some(Key::Ctrl(ch.to_ascii_lowercase()))
            } else if alt {
                Some(Key::Alt(ch.to_ascii_lowercase()))
            } else {
                Some(Key::Char(ch))
            }
        }
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Delete => Some(Key::Delete),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Home => Some(Key::Home),
        KeyCode::End => Some(Key::End),
        KeyCode::PageUp if ctrl => Some(Key::CtrlPageUp),
        KeyCode::PageDown if ctrl => Some(Key::CtrlPageDown),
        KeyCode::PageUp => Some(Key::PageUp),
        KeyCode::PageDown => Some(Key::PageDown),
        KeyCode::Esc => Some(Key::Esc),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_indent_key_classes() {
        assert_eq!(
            translate(press(KeyCode::Tab, KeyModifiers::NONE)),
            Some(Key::Tab)
        );
        assert_eq!(
            translate(press(KeyCode::BackTab, KeyModifiers::SHIFT)),
            Some(Key::BackTab)
        );
        assert_eq!(
            translate(press(KeyCode::Tab, KeyModifiers::CONTROL)),
            Some(Key::CtrlTab)
        );
        assert_eq!(
            translate(press(KeyCode::Enter, KeyModifiers::NONE)),
            Some(Key::Enter)
        );

        assert_eq!(Key::Tab.edit_key(), Some(EditKey::Tab));
        assert_eq!(Key::BackTab.edit_key(), Some(EditKey::BackTab));
        assert_eq!(Key::CtrlTab.edit_key(), Some(EditKey::CtrlTab));
        assert_eq!(Key::Enter.edit_key(), Some(EditKey::Enter));
        assert_eq!(Key::Char('x').edit_key(), None);
    }

    #[test]
    fn test_chords() {
        assert_eq!(
            translate(press(KeyCode::Char('S'), KeyModifiers::CONTROL)),
            Some(Key::Ctrl('s'))
        );
        assert_eq!(
            translate(press(KeyCode::Char('s'), KeyModifiers::ALT)),
            Some(Key::Alt('s'))
        );
        assert_eq!(
            translate(press(KeyCode::Char('s'), KeyModifiers::NONE)),
            Some(Key::Char('s'))
        );
    }

    #[test]
    fn test_release_events_dropped() {
        let mut event = press(KeyCode::Char('a'), KeyModifiers::NONE);
        event.kind = KeyEventKind::Release;
        assert_eq!(translate(event), None);
    }

    #[test]
    fn test_tab_cycling_chords() {
        assert_eq!(
            translate(press(KeyCode::PageDown, KeyModifiers::CONTROL)),
            Some(Key::CtrlPageDown)
        );
        assert_eq!(
            translate(press(KeyCode::PageUp, KeyModifiers::CONTROL)),
            Some(Key::CtrlPageUp)
        );
    }
}
