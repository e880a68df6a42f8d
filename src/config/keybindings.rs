//! Keyboard bindings configuration.

use crate::model::key_action::KeyAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Maps keyboard events to domain actions.
///
/// Provides default vim-style bindings.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&key).copied()
    }

    fn bind(&mut self, code: KeyCode, modifiers: KeyModifiers, action: KeyAction) {
        self.bindings.insert(KeyEvent::new(code, modifiers), action);
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut keys = Self {
            bindings: HashMap::new(),
        };
        let none = KeyModifiers::NONE;

        // Cursor
        keys.bind(KeyCode::Char('j'), none, KeyAction::CursorDown);
        keys.bind(KeyCode::Down, none, KeyAction::CursorDown);
        keys.bind(KeyCode::Char('k'), none, KeyAction::CursorUp);
        keys.bind(KeyCode::Up, none, KeyAction::CursorUp);
        keys.bind(KeyCode::Char('g'), none, KeyAction::CursorTop);
        keys.bind(KeyCode::Home, none, KeyAction::CursorTop);
        keys.bind(KeyCode::Char('G'), KeyModifiers::SHIFT, KeyAction::CursorBottom);
        keys.bind(KeyCode::End, none, KeyAction::CursorBottom);

        // Keyboard drag
        keys.bind(KeyCode::Char(' '), none, KeyAction::PickUp);
        keys.bind(KeyCode::Enter, none, KeyAction::Drop);
        keys.bind(KeyCode::Esc, none, KeyAction::CancelDrag);

        // Groups
        keys.bind(KeyCode::Char('c'), none, KeyAction::ToggleCollapse);
        keys.bind(KeyCode::Char('>'), KeyModifiers::SHIFT, KeyAction::SendToNextGroup);
        keys.bind(KeyCode::Char('>'), none, KeyAction::SendToNextGroup);
        keys.bind(KeyCode::Char('<'), KeyModifiers::SHIFT, KeyAction::SendToPrevGroup);
        keys.bind(KeyCode::Char('<'), none, KeyAction::SendToPrevGroup);

        // Store
        keys.bind(KeyCode::Char('r'), none, KeyAction::Refresh);

        // Application
        keys.bind(KeyCode::Char('?'), KeyModifiers::SHIFT, KeyAction::Help);
        keys.bind(KeyCode::Char('?'), none, KeyAction::Help);
        keys.bind(KeyCode::Char('q'), none, KeyAction::Quit);
        keys.bind(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyAction::Quit);

        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn vim_keys_move_cursor() {
        let keys = KeyBindings::default();
        assert_eq!(keys.get(key(KeyCode::Char('j'))), Some(KeyAction::CursorDown));
        assert_eq!(keys.get(key(KeyCode::Char('k'))), Some(KeyAction::CursorUp));
        assert_eq!(keys.get(key(KeyCode::Down)), Some(KeyAction::CursorDown));
    }

    #[test]
    fn drag_keys() {
        let keys = KeyBindings::default();
        assert_eq!(keys.get(key(KeyCode::Char(' '))), Some(KeyAction::PickUp));
        assert_eq!(keys.get(key(KeyCode::Enter)), Some(KeyAction::Drop));
        assert_eq!(keys.get(key(KeyCode::Esc)), Some(KeyAction::CancelDrag));
    }

    #[test]
    fn ctrl_c_quits_but_plain_c_collapses() {
        let keys = KeyBindings::default();
        assert_eq!(
            keys.get(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(KeyAction::Quit)
        );
        assert_eq!(keys.get(key(KeyCode::Char('c'))), Some(KeyAction::ToggleCollapse));
    }

    #[test]
    fn unbound_key_has_no_action() {
        assert_eq!(KeyBindings::default().get(key(KeyCode::Char('z'))), None);
    }
}
