//! Mouse event handler.
//!
//! Pointer gestures map onto the drag session: press on an item picks it
//! up, dragging hovers, releasing over a row drops and releasing outside the
//! list cancels. A press on a header toggles its group.

use crate::state::app_state::{AppState, DragInput};
use crate::store::Dispatch;
use ratatui::layout::Rect;
use tracing::debug;

/// A pointer event already resolved to a row of `engine.entries()`.
///
/// `None` means the pointer is outside the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    /// Button went down.
    Press {
        /// Row under the pointer.
        row: Option<usize>,
    },
    /// Pointer moved with the button held.
    Drag {
        /// Row under the pointer.
        row: Option<usize>,
    },
    /// Button released.
    Release {
        /// Row under the pointer.
        row: Option<usize>,
    },
}

/// Map a screen position to the entry drawn there.
///
/// `list_area` is where the rows were drawn, `scroll` the first drawn
/// position within `visible_rows`.
pub fn entry_at(
    list_area: Rect,
    scroll: usize,
    visible_rows: &[usize],
    column: u16,
    row: u16,
) -> Option<usize> {
    if column < list_area.x
        || column >= list_area.x + list_area.width
        || row < list_area.y
        || row >= list_area.y + list_area.height
    {
        return None;
    }
    let offset = usize::from(row - list_area.y);
    visible_rows.get(scroll + offset).copied()
}

/// Apply one pointer event.
pub fn handle_pointer<D: Dispatch>(state: &mut AppState<D>, event: PointerEvent) {
    match event {
        PointerEvent::Press { row } => press(state, row),
        PointerEvent::Drag { row } => drag(state, row),
        PointerEvent::Release { row } => release(state, row),
    }
}

fn press<D: Dispatch>(state: &mut AppState<D>, row: Option<usize>) {
    if state.help_visible {
        state.help_visible = false;
        return;
    }
    // A keyboard carry owns the gesture until it is dropped or cancelled.
    if state.engine.active_drag().is_some() {
        return;
    }
    let Some(row) = row else {
        return;
    };
    let Some(header_bucket) = state
        .entries()
        .get(row)
        .map(|entry| entry.as_header().map(|h| h.bucket().cloned()))
    else {
        return;
    };
    state.cursor = row;

    if let Some(bucket) = header_bucket {
        state.engine.toggle_collapsed(bucket.as_ref());
        state.clamp_cursor();
        return;
    }
    match state.engine.begin_drag(row) {
        Ok(()) => {
            state.drag_input = Some(DragInput::Pointer);
            state.status = None;
        }
        Err(err) => state.set_status(err.to_string()),
    }
}

fn drag<D: Dispatch>(state: &mut AppState<D>, row: Option<usize>) {
    if state.drag_input != Some(DragInput::Pointer) {
        return;
    }
    // Outside the list the last preview stays until release.
    let Some(row) = row else {
        return;
    };
    if let Err(err) = state.engine.hover_preview_row(row) {
        debug!(row, error = %err, "Pointer hover ignored");
        return;
    }
    follow_carried(state);
}

fn release<D: Dispatch>(state: &mut AppState<D>, row: Option<usize>) {
    if state.drag_input != Some(DragInput::Pointer) {
        return;
    }
    state.drag_input = None;
    let Some(item) = state.engine.active_drag().map(|d| d.item_id().clone()) else {
        return;
    };

    let hovered = match row {
        Some(row) => state.engine.hover_preview_row(row),
        None => {
            debug!(item = %item, "Released outside the list");
            let _ = state.engine.cancel_drag();
            state.follow_item(&item);
            return;
        }
    };

    let result = hovered.and_then(|()| state.engine.drop().map(|_| ()));
    if let Err(err) = result {
        if state.engine.active_drag().is_some() {
            let _ = state.engine.cancel_drag();
        }
        state.set_status(err.to_string());
    }
    state.follow_item(&item);
}

fn follow_carried<D: Dispatch>(state: &mut AppState<D>) {
    if let Some(item) = state.engine.active_drag().map(|d| d.item_id().clone()) {
        state.follow_item(&item);
    }
}

#[cfg(test)]
#[path = "mouse_handler_tests.rs"]
mod tests;
