//! Drag gesture state machine.
//!
//! ```text
//! Idle --start--> Dragging --drop--> Committing --finish--> Idle
//!                    |
//!                    +--cancel--> Idle
//! ```
//!
//! Everything a gesture needs (snapshot, source, candidate, preview) lives in
//! one [`ActiveDrag`] value, so a transition either happens completely or not
//! at all. Previews are always recomputed from the immutable snapshot; the
//! previous preview is never an input, so repeated hovers cannot drift.

use crate::model::{GestureError, GroupId, ItemId, ListEntry, Snapshot};
use tracing::debug;

/// Observable phase of a [`DragSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// No gesture.
    Idle,
    /// An item is held.
    Dragging,
    /// Dropped, reconciliation running.
    Committing,
}

/// State of one in-progress gesture.
#[derive(Debug, Clone)]
pub struct ActiveDrag {
    snapshot: Snapshot,
    item_id: ItemId,
    source_index: usize,
    source_group_id: Option<GroupId>,
    /// Snapshot index last hovered, `None` until the first live update.
    candidate: Option<usize>,
    preview: Vec<ListEntry>,
}

impl ActiveDrag {
    /// List captured when the drag started.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// The carried item.
    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    /// Snapshot row the item was picked up from.
    pub fn source_index(&self) -> usize {
        self.source_index
    }

    /// Bucket the item was picked up from.
    pub fn source_group_id(&self) -> Option<&GroupId> {
        self.source_group_id.as_ref()
    }

    /// Snapshot row last hovered.
    pub fn candidate(&self) -> Option<usize> {
        self.candidate
    }

    /// The list as it would look after dropping here.
    pub fn preview(&self) -> &[ListEntry] {
        &self.preview
    }
}

/// What a drop hands to the reconciler.
#[derive(Debug, Clone)]
pub struct DropRequest {
    /// List at drag start.
    pub before: Snapshot,
    /// Preview at drop time.
    pub after: Vec<ListEntry>,
    /// The dropped item.
    pub item_id: ItemId,
}

/// The gesture state machine.
#[derive(Debug, Clone, Default)]
pub enum DragSession {
    /// No gesture.
    #[default]
    Idle,
    /// Item held, preview follows the pointer.
    Dragging(ActiveDrag),
    /// Dropped; waiting for the reconciler.
    Committing(ActiveDrag),
}

impl DragSession {
    /// An idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> DragPhase {
        match self {
            DragSession::Idle => DragPhase::Idle,
            DragSession::Dragging(_) => DragPhase::Dragging,
            DragSession::Committing(_) => DragPhase::Committing,
        }
    }

    /// The active gesture, in either Dragging or Committing.
    pub fn active(&self) -> Option<&ActiveDrag> {
        match self {
            DragSession::Idle => None,
            DragSession::Dragging(drag) | DragSession::Committing(drag) => Some(drag),
        }
    }

    /// Preview while dragging.
    pub fn preview(&self) -> Option<&[ListEntry]> {
        match self {
            DragSession::Dragging(drag) => Some(&drag.preview),
            _ => None,
        }
    }

    /// Begin a gesture over the entry at `index` of `snapshot`.
    ///
    /// # Errors
    ///
    /// - `AlreadyDragging` unless Idle
    /// - `OutOfRange` if `index` is past the end
    /// - `StartOnHeader` if the entry is a group header
    pub fn start(&mut self, snapshot: Snapshot, index: usize) -> Result<(), GestureError> {
        if !matches!(self, DragSession::Idle) {
            return Err(GestureError::AlreadyDragging);
        }
        let entries = snapshot.entries();
        let entry = entries.get(index).ok_or(GestureError::OutOfRange {
            index,
            len: entries.len(),
        })?;
        let ListEntry::Item { item, group_id } = entry else {
            return Err(GestureError::StartOnHeader { index });
        };

        let item_id = item.id.clone();
        let source_group_id = group_id.clone();
        let preview = entries.to_vec();
        debug!(item = %item_id, index, "Drag started");

        *self = DragSession::Dragging(ActiveDrag {
            snapshot,
            item_id,
            source_index: index,
            source_group_id,
            candidate: None,
            preview,
        });
        Ok(())
    }

    /// Live update: the pointer is over snapshot entry `candidate`.
    ///
    /// On error the previous preview is kept.
    ///
    /// # Errors
    ///
    /// - `NotDragging` unless Dragging
    /// - `OutOfRange` / `InvalidDropTarget` for candidates that resolve to no slot
    pub fn hover(&mut self, candidate: usize) -> Result<&[ListEntry], GestureError> {
        let DragSession::Dragging(drag) = self else {
            return Err(GestureError::NotDragging);
        };
        let preview = compute_preview(drag.snapshot.entries(), drag.source_index, candidate)?;
        drag.candidate = Some(candidate);
        drag.preview = preview;
        Ok(&drag.preview)
    }

    /// Commit the last computed preview: Dragging → Committing.
    ///
    /// A drop without any hover commits the unchanged snapshot order.
    ///
    /// # Errors
    ///
    /// Returns `NotDragging` unless Dragging.
    pub fn drop(&mut self) -> Result<DropRequest, GestureError> {
        match std::mem::take(self) {
            DragSession::Dragging(drag) => {
                let request = DropRequest {
                    before: drag.snapshot.clone(),
                    after: drag.preview.clone(),
                    item_id: drag.item_id.clone(),
                };
                debug!(item = %drag.item_id, candidate = ?drag.candidate, "Drag dropped");
                *self = DragSession::Committing(drag);
                Ok(request)
            }
            other => {
                *self = other;
                Err(GestureError::NotDragging)
            }
        }
    }

    /// Abandon the gesture: Dragging → Idle. Returns the snapshot to restore.
    ///
    /// # Errors
    ///
    /// Returns `NotDragging` unless Dragging.
    pub fn cancel(&mut self) -> Result<Snapshot, GestureError> {
        match std::mem::take(self) {
            DragSession::Dragging(drag) => {
                debug!(item = %drag.item_id, "Drag cancelled");
                Ok(drag.snapshot)
            }
            other => {
                *self = other;
                Err(GestureError::NotDragging)
            }
        }
    }

    /// Committing → Idle once the commit has been handed off.
    pub fn finish(&mut self) {
        if matches!(self, DragSession::Committing(_)) {
            *self = DragSession::Idle;
        }
    }
}

/// Compute the preview for moving `source` onto snapshot entry `target`.
///
/// - Item target: the dragged entry is reinserted at `target`, ending up
///   after it when moving down and before it when moving up. Its effective
///   bucket is that of the row right above the insertion point.
/// - Header target: the dragged entry becomes the first item under that
///   header, taking the header's bucket.
///
/// # Errors
///
/// `OutOfRange` for a target past the end, `InvalidDropTarget` when the slot
/// has no header above it.
pub fn compute_preview(
    entries: &[ListEntry],
    source: usize,
    target: usize,
) -> Result<Vec<ListEntry>, GestureError> {
    let len = entries.len();
    if target >= len || source >= len {
        return Err(GestureError::OutOfRange { index: target, len });
    }

    let mut preview = entries.to_vec();
    let mut dragged = preview.remove(source);

    let insert_at = match &entries[target] {
        ListEntry::Header(_) if target < source => target + 1,
        _ => target,
    };
    let bucket = match &entries[target] {
        ListEntry::Header(header) => header.bucket().cloned(),
        ListEntry::Item { .. } => {
            let above = insert_at
                .checked_sub(1)
                .and_then(|i| preview.get(i))
                .ok_or(GestureError::InvalidDropTarget { index: target })?;
            above.bucket().cloned()
        }
    };

    if let ListEntry::Item { group_id, .. } = &mut dragged {
        *group_id = bucket;
    }
    preview.insert(insert_at, dragged);
    Ok(preview)
}

#[cfg(test)]
#[path = "drag_session_tests.rs"]
mod tests;
