//! Keyboard action handler.
//!
//! Maps [`KeyAction`]s onto the engine. While an item is carried the cursor
//! keys move its drop target instead of the cursor.

use crate::model::{GestureError, KeyAction, ListEntry};
use crate::state::app_state::{AppState, DragInput};
use crate::store::Dispatch;
use tracing::debug;

/// What the event loop should do after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Keep running.
    Continue,
    /// Leave the event loop.
    Quit,
}

/// Apply one action to the application state.
pub fn handle_key_action<D: Dispatch>(state: &mut AppState<D>, action: KeyAction) -> KeyOutcome {
    let carrying = state.engine.active_drag().is_some();
    if carrying && !action.allowed_while_dragging() {
        debug!(?action, "Ignored while dragging");
        return KeyOutcome::Continue;
    }

    match action {
        KeyAction::Quit => return KeyOutcome::Quit,
        KeyAction::Help => state.help_visible = !state.help_visible,
        KeyAction::CancelDrag if state.help_visible && !carrying => state.help_visible = false,
        KeyAction::CursorDown if carrying => step_candidate(state, 1),
        KeyAction::CursorUp if carrying => step_candidate(state, -1),
        KeyAction::CursorTop if carrying => step_candidate(state, isize::MIN),
        KeyAction::CursorBottom if carrying => step_candidate(state, isize::MAX),
        KeyAction::CursorDown => state.move_cursor(1),
        KeyAction::CursorUp => state.move_cursor(-1),
        KeyAction::CursorTop => state.cursor_to_top(),
        KeyAction::CursorBottom => state.cursor_to_bottom(),
        KeyAction::PickUp => pick_up(state),
        KeyAction::Drop => drop_carried(state),
        KeyAction::CancelDrag => cancel_carried(state),
        KeyAction::ToggleCollapse => toggle_collapse(state),
        KeyAction::SendToNextGroup => send_to_neighbour(state, 1),
        KeyAction::SendToPrevGroup => send_to_neighbour(state, -1),
        KeyAction::Refresh => {
            state.engine.refresh();
            state.set_status("Refreshing");
        }
    }
    KeyOutcome::Continue
}

fn pick_up<D: Dispatch>(state: &mut AppState<D>) {
    let cursor = state.cursor;
    match state.engine.begin_drag(cursor) {
        Ok(()) => {
            state.drag_input = Some(DragInput::Keyboard { candidate: cursor });
            state.status = None;
        }
        Err(GestureError::StartOnHeader { .. }) => {}
        Err(err) => state.set_status(err.to_string()),
    }
}

/// Move the carried item's target `delta` visible snapshot rows.
fn step_candidate<D: Dispatch>(state: &mut AppState<D>, delta: isize) {
    let Some(DragInput::Keyboard { candidate }) = state.drag_input else {
        return;
    };
    let Some(candidates) = state.engine.visible_candidates() else {
        return;
    };
    if candidates.is_empty() {
        return;
    }
    // A candidate collapsed away continues from its header, the nearest
    // visible row above it.
    let position = candidates
        .iter()
        .position(|c| *c == candidate)
        .or_else(|| candidates.iter().rposition(|c| *c < candidate))
        .unwrap_or(0);
    let next = position
        .saturating_add_signed(delta)
        .min(candidates.len().saturating_sub(1));
    let target = candidates[next];
    if state.engine.hover(target).is_ok() {
        state.drag_input = Some(DragInput::Keyboard { candidate: target });
        follow_carried(state);
    }
}

fn drop_carried<D: Dispatch>(state: &mut AppState<D>) {
    let Some(item) = state.engine.active_drag().map(|d| d.item_id().clone()) else {
        return;
    };
    state.drag_input = None;
    match state.engine.drop() {
        Ok(_) => state.follow_item(&item),
        Err(err) => {
            state.set_status(err.to_string());
            state.follow_item(&item);
        }
    }
}

fn cancel_carried<D: Dispatch>(state: &mut AppState<D>) {
    let Some(item) = state.engine.active_drag().map(|d| d.item_id().clone()) else {
        return;
    };
    state.drag_input = None;
    if state.engine.cancel_drag().is_ok() {
        state.follow_item(&item);
    }
}

fn follow_carried<D: Dispatch>(state: &mut AppState<D>) {
    if let Some(item) = state.engine.active_drag().map(|d| d.item_id().clone()) {
        state.follow_item(&item);
    }
}

/// Collapse the bucket under the cursor: the header itself or the item's group.
fn toggle_collapse<D: Dispatch>(state: &mut AppState<D>) {
    let Some(bucket) = state.cursor_entry().map(|e| e.bucket().cloned()) else {
        return;
    };
    let on_carried = state
        .cursor_entry()
        .and_then(ListEntry::as_item)
        .zip(state.engine.active_drag())
        .is_some_and(|(item, drag)| &item.id == drag.item_id());

    state.engine.toggle_collapsed(bucket.as_ref());

    // Jump to the header so the cursor stays on something visible.
    if !on_carried {
        if let Some(header) = state.entries().iter().position(|e| {
            e.as_header()
                .is_some_and(|h| h.bucket() == bucket.as_ref())
        }) {
            state.cursor = header;
        }
    }
    state.clamp_cursor();
}

fn send_to_neighbour<D: Dispatch>(state: &mut AppState<D>, step: isize) {
    let Some(item) = state.cursor_item() else {
        return;
    };
    let Some(target) = state.engine.neighbour_bucket(&item, step) else {
        return;
    };
    match state.engine.send_to_group(&item, target.as_ref()) {
        Ok(_) => state.follow_item(&item),
        Err(err) => state.set_status(err.to_string()),
    }
}

#[cfg(test)]
#[path = "key_handler_tests.rs"]
mod tests;
