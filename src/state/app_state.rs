//! Application state for the terminal front end.
//!
//! Wraps the [`ReorderEngine`] with the bits only a terminal needs: a cursor,
//! a scroll offset, the help overlay flag and a status line.

use crate::engine::{EngineEvent, ReorderEngine};
use crate::model::{index_of_item, GroupId, ItemId, ListEntry, UNGROUPED_LABEL};
use crate::store::Dispatch;
use std::collections::HashMap;
use tracing::debug;

/// How a drag is being driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragInput {
    /// Picked up with the keyboard. Holds the current snapshot candidate.
    Keyboard {
        /// Snapshot index the carried item currently targets.
        candidate: usize,
    },
    /// Pressed with the mouse button, still held.
    Pointer,
}

/// Front-end state around the engine.
pub struct AppState<D> {
    /// The reorder engine this front end drives.
    pub engine: ReorderEngine<D>,
    /// Index into `engine.entries()` of the highlighted row.
    pub cursor: usize,
    /// First visible row to draw, as a position in `visible_rows()`.
    pub scroll_offset: usize,
    /// Help overlay shown.
    pub help_visible: bool,
    /// Show item counts next to group headers.
    pub show_counts: bool,
    /// Latest message for the status bar.
    pub status: Option<String>,
    /// How the current drag is driven, if one is active.
    pub drag_input: Option<DragInput>,
    /// Item counts per bucket, refreshed when the store confirms a move.
    group_counts: HashMap<Option<GroupId>, usize>,
}

impl<D: Dispatch> AppState<D> {
    /// Wrap `engine` with the cursor on the first visible row.
    pub fn new(engine: ReorderEngine<D>) -> Self {
        let mut state = Self {
            engine,
            cursor: 0,
            scroll_offset: 0,
            help_visible: false,
            show_counts: true,
            status: None,
            drag_input: None,
            group_counts: HashMap::new(),
        };
        state.recount_groups();
        state.clamp_cursor();
        state
    }

    /// Rows the engine wants drawn.
    pub fn entries(&self) -> &[ListEntry] {
        self.engine.entries()
    }

    /// See [`ReorderEngine::visible_rows`].
    pub fn visible_rows(&self) -> Vec<usize> {
        self.engine.visible_rows()
    }

    /// Row under the cursor.
    pub fn cursor_entry(&self) -> Option<&ListEntry> {
        self.entries().get(self.cursor)
    }

    /// Item under the cursor; `None` on a header.
    pub fn cursor_item(&self) -> Option<ItemId> {
        self.cursor_entry()
            .and_then(ListEntry::as_item)
            .map(|item| item.id.clone())
    }

    /// Position of the cursor within `visible_rows()`.
    pub fn cursor_position(&self) -> Option<usize> {
        self.visible_rows().iter().position(|row| *row == self.cursor)
    }

    /// Move the cursor `delta` visible rows, stopping at either end.
    pub fn move_cursor(&mut self, delta: isize) {
        let rows = self.visible_rows();
        if rows.is_empty() {
            return;
        }
        let current = self.cursor_position().unwrap_or(0);
        let last = rows.len() - 1;
        let next = current.saturating_add_signed(delta).min(last);
        self.cursor = rows[next];
    }

    /// Jump to the first visible row.
    pub fn cursor_to_top(&mut self) {
        if let Some(first) = self.visible_rows().first() {
            self.cursor = *first;
        }
    }

    /// Jump to the last visible row.
    pub fn cursor_to_bottom(&mut self) {
        if let Some(last) = self.visible_rows().last() {
            self.cursor = *last;
        }
    }

    /// Put the cursor on `item`'s row, if it is in the list.
    pub fn follow_item(&mut self, item: &ItemId) {
        if let Some(index) = index_of_item(self.entries(), item) {
            self.cursor = index;
        }
        self.clamp_cursor();
    }

    /// Keep the cursor on a visible row after the list changed.
    ///
    /// A cursor on a row that got collapsed away moves up to the nearest
    /// visible row above it, which is always its group header.
    pub fn clamp_cursor(&mut self) {
        let rows = self.visible_rows();
        if rows.contains(&self.cursor) {
            return;
        }
        self.cursor = rows
            .iter()
            .rev()
            .find(|row| **row <= self.cursor)
            .or_else(|| rows.first())
            .copied()
            .unwrap_or(0);
    }

    /// Keep the cursor inside a viewport of `height` rows.
    pub fn scroll_to_cursor(&mut self, height: usize) {
        let Some(position) = self.cursor_position() else {
            return;
        };
        if height == 0 {
            return;
        }
        if position < self.scroll_offset {
            self.scroll_offset = position;
        } else if position >= self.scroll_offset + height {
            self.scroll_offset = position + 1 - height;
        }
    }

    /// Replace the status bar message.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    /// Handle store replies and engine events. Returns whether anything changed.
    pub fn poll_store(&mut self) -> bool {
        let handled = self.engine.pump();
        if handled > 0 {
            // Refetches land without an event.
            self.recount_groups();
            self.clamp_cursor();
        }
        let changed = self.absorb_events();
        handled > 0 || changed
    }

    /// Turn engine events into status text and refreshed counts.
    pub fn absorb_events(&mut self) -> bool {
        let events = self.engine.take_events();
        if events.is_empty() {
            return false;
        }
        for event in events {
            match event {
                EngineEvent::ItemMoved { item, group } => {
                    debug!(item = %item, "Item moved; refreshing counts");
                    self.recount_groups();
                    if let Some(group) = group {
                        let name = self
                            .engine
                            .catalog()
                            .group(&group)
                            .map(|g| g.name.clone())
                            .unwrap_or_else(|| group.to_string());
                        self.set_status(format!("Moved {item} to {name}"));
                    } else {
                        self.set_status(format!("Moved {item} to {UNGROUPED_LABEL}"));
                    }
                }
                EngineEvent::Notice(notice) => {
                    self.recount_groups();
                    self.set_status(notice.to_string());
                }
            }
        }
        self.clamp_cursor();
        true
    }

    /// Confirmed item count of `bucket`.
    pub fn group_count(&self, bucket: Option<&GroupId>) -> usize {
        self.group_counts.get(&bucket.cloned()).copied().unwrap_or(0)
    }

    fn recount_groups(&mut self) {
        let mut counts = HashMap::new();
        for item in self.engine.catalog().items() {
            *counts.entry(item.group_id.clone()).or_insert(0) += 1;
        }
        self.group_counts = counts;
    }

    /// Store activity for the status bar, e.g. `syncing (2 queued)`.
    pub fn activity(&self) -> Option<String> {
        self.engine.in_flight()?;
        Some(match self.engine.queued() {
            0 => "syncing".to_string(),
            queued => format!("syncing ({queued} queued)"),
        })
    }
}

#[cfg(test)]
#[path = "app_state_tests.rs"]
mod tests;
