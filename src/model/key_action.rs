//! Domain-level keyboard actions independent of key bindings.

/// Domain-level actions that can be mapped to configurable key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// crossterm::event::KeyEvent to KeyAction is handled by KeyBindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Cursor
    /// Move the cursor (or the carried item's target) down. Default: j/↓
    CursorDown,
    /// Move the cursor (or the carried item's target) up. Default: k/↑
    CursorUp,
    /// Jump to the first row. Default: g/Home
    CursorTop,
    /// Jump to the last row. Default: G/End
    CursorBottom,

    // Keyboard drag
    /// Pick up the item under the cursor. Default: Space
    PickUp,
    /// Drop the carried item at the cursor. Default: Enter
    Drop,
    /// Put the carried item back where it was. Default: Esc
    CancelDrag,

    // Groups
    /// Collapse or expand the group under the cursor. Default: c
    ToggleCollapse,
    /// Send the item under the cursor to the end of the next group. Default: >
    SendToNextGroup,
    /// Send the item under the cursor to the end of the previous group. Default: <
    SendToPrevGroup,

    // Store
    /// Re-read the store. Default: r
    Refresh,

    // Application
    /// Toggle the help overlay. Default: ?
    Help,
    /// Quit. Default: q
    Quit,
}

impl KeyAction {
    /// Actions that are still meaningful while an item is being carried.
    pub fn allowed_while_dragging(self) -> bool {
        matches!(
            self,
            KeyAction::CursorDown
                | KeyAction::CursorUp
                | KeyAction::CursorTop
                | KeyAction::CursorBottom
                | KeyAction::Drop
                | KeyAction::CancelDrag
                | KeyAction::ToggleCollapse
                | KeyAction::Help
                | KeyAction::Quit
        )
    }
}
