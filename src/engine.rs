//! Reorder engine: the single entry point for front ends.
//!
//! Owns the persistence adapter, the drag session and the presentation
//! filter, and exposes what a front end needs to draw the list and drive
//! gestures:
//!
//! - `entries()` - rows to draw (the preview while a drag is active)
//! - `visible_rows()` - which of those rows are not collapsed away
//! - `begin_drag` / `hover` / `drop` / `cancel_drag` - per-row drag callbacks
//! - `toggle_collapsed` - per-header collapse callback
//! - `take_events()` - item-moved notifications and user-facing notices
//!
//! The canonical list is rebuilt only while no gesture is active. Store
//! replies that arrive mid-drag mark the view stale; it is rebuilt when the
//! gesture ends.

use crate::list_model;
use crate::model::{
    BucketLabel, Catalog, GestureError, GroupId, ItemId, ListEntry, Snapshot, StoreError,
};
use crate::persistence::{CommitOutcome, PersistenceAdapter, Resolution};
use crate::state::drag_session::{ActiveDrag, DragPhase, DragSession};
use crate::state::presentation::PresentationFilter;
use crate::state::reconciler::reconcile;
use crate::store::{Dispatch, StoreReply, Ticket};
use std::fmt;
use tracing::{debug, info, warn};

/// Construction options.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Queue a refetch after a failed write.
    pub refetch_on_failure: bool,
    /// Buckets collapsed at startup (`None` is the ungrouped bucket).
    pub start_collapsed: Vec<Option<GroupId>>,
    /// Collapse every bucket at startup.
    pub collapse_all: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            refetch_on_failure: true,
            start_collapsed: Vec::new(),
            collapse_all: false,
        }
    }
}

/// User-facing notice about a store failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A write failed and the list was rolled back.
    ChangeReverted {
        /// Why the store refused.
        error: StoreError,
        /// Queued requests dropped along with the failed one.
        discarded: usize,
    },
    /// A fetch failed; the list shows the last known data.
    RefreshFailed {
        /// Why the fetch failed.
        error: StoreError,
    },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::ChangeReverted { error, discarded: 0 } => {
                write!(f, "Change reverted: {error}")
            }
            Notification::ChangeReverted { error, discarded } => {
                write!(f, "Change reverted ({discarded} more dropped): {error}")
            }
            Notification::RefreshFailed { error } => write!(f, "Refresh failed: {error}"),
        }
    }
}

/// Something a front end may want to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A group change was confirmed by the store.
    ItemMoved {
        /// The moved item.
        item: ItemId,
        /// Its new group; `None` is the ungrouped bucket.
        group: Option<GroupId>,
    },
    /// Something went wrong and the user should be told.
    Notice(Notification),
}

/// Grouped reordering over a dispatcher `D`.
pub struct ReorderEngine<D> {
    adapter: PersistenceAdapter<D>,
    session: DragSession,
    filter: PresentationFilter,
    view: Vec<ListEntry>,
    view_stale: bool,
    events: Vec<EngineEvent>,
}

impl<D: Dispatch> ReorderEngine<D> {
    /// Start from `catalog`, which is assumed to match the store.
    pub fn new(dispatch: D, catalog: Catalog, options: EngineOptions) -> Self {
        let view = list_model::build_from_catalog(&catalog);
        let mut filter = PresentationFilter::with_collapsed(options.start_collapsed);
        if options.collapse_all {
            filter.collapse_all(&view);
        }
        let adapter = PersistenceAdapter::new(dispatch, catalog)
            .with_refetch_on_failure(options.refetch_on_failure);
        Self {
            adapter,
            session: DragSession::new(),
            filter,
            view,
            view_stale: false,
            events: Vec::new(),
        }
    }

    // ===== Render contract =====

    /// Rows to draw: the live preview while dragging, else the current list.
    pub fn entries(&self) -> &[ListEntry] {
        self.session.preview().unwrap_or(&self.view)
    }

    /// Indices into [`Self::entries`] that are not hidden by a collapsed bucket.
    ///
    /// The dragged item is always included.
    pub fn visible_rows(&self) -> Vec<usize> {
        let carried = self.session.active().map(ActiveDrag::item_id);
        self.filter.visible_rows(self.entries(), carried)
    }

    /// Snapshot indices a keyboard-driven drag can target: the rows of the
    /// snapshot that are not collapsed away, plus the dragged item.
    pub fn visible_candidates(&self) -> Option<Vec<usize>> {
        let drag = self.session.active()?;
        Some(
            self.filter
                .visible_rows(drag.snapshot().entries(), Some(drag.item_id())),
        )
    }

    /// Local catalog, including writes the store has not confirmed yet.
    pub fn catalog(&self) -> &Catalog {
        self.adapter.local()
    }

    /// Whether `bucket` is collapsed.
    pub fn is_collapsed(&self, bucket: Option<&GroupId>) -> bool {
        self.filter.is_collapsed(bucket)
    }

    /// Current gesture phase.
    pub fn phase(&self) -> DragPhase {
        self.session.phase()
    }

    /// The drag in progress, if any.
    pub fn active_drag(&self) -> Option<&ActiveDrag> {
        self.session.active()
    }

    /// Request in flight, if any.
    pub fn in_flight(&self) -> Option<Ticket> {
        self.adapter.in_flight()
    }

    /// Requests waiting behind the in-flight one.
    pub fn queued(&self) -> usize {
        self.adapter.queued()
    }

    /// The underlying dispatcher.
    pub fn dispatcher(&self) -> &D {
        self.adapter.dispatcher()
    }

    /// Mutable access to the dispatcher, for polling replies.
    pub fn dispatcher_mut(&mut self) -> &mut D {
        self.adapter.dispatcher_mut()
    }

    /// Drain pending events, oldest first.
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    // ===== Gestures =====

    /// Pick up the item at row `index` of the current list.
    ///
    /// # Errors
    ///
    /// `StartOnHiddenItem` for an item inside a collapsed bucket, plus
    /// everything [`DragSession::start`] refuses.
    pub fn begin_drag(&mut self, index: usize) -> Result<(), GestureError> {
        if self.session.phase() != DragPhase::Idle {
            return Err(GestureError::AlreadyDragging);
        }
        if self.filter.is_hidden(&self.view, index) {
            return Err(GestureError::StartOnHiddenItem { index });
        }
        let catalog = self.adapter.local();
        let snapshot = Snapshot::capture(&self.view, catalog.groups(), catalog.items());
        self.session.start(snapshot, index)
    }

    /// Live update with a snapshot index as the candidate.
    ///
    /// On error the previous preview stays in place.
    ///
    /// # Errors
    ///
    /// See [`DragSession::hover`].
    pub fn hover(&mut self, candidate: usize) -> Result<(), GestureError> {
        self.session.hover(candidate).map(|_| ())
    }

    /// Live update with a row of the current preview as the candidate.
    ///
    /// This is what a pointer reports: the row under it as drawn. The row is
    /// mapped back to the snapshot entry it shows. Hovering the dragged item
    /// itself keeps the current preview.
    ///
    /// # Errors
    ///
    /// `NotDragging` outside a drag, `OutOfRange` for a row past the end.
    pub fn hover_preview_row(&mut self, row: usize) -> Result<(), GestureError> {
        let Some(candidate) = self.preview_row_to_candidate(row)? else {
            return Ok(());
        };
        self.hover(candidate)
    }

    /// Snapshot index shown at preview `row`, or `None` for the dragged item.
    pub fn preview_row_to_candidate(&self, row: usize) -> Result<Option<usize>, GestureError> {
        let drag = self.session.active().ok_or(GestureError::NotDragging)?;
        let preview = drag.preview();
        let entry = preview.get(row).ok_or(GestureError::OutOfRange {
            index: row,
            len: preview.len(),
        })?;
        let snapshot = drag.snapshot().entries();
        let index = match entry {
            ListEntry::Item { item, .. } if &item.id == drag.item_id() => return Ok(None),
            ListEntry::Item { item, .. } => drag.snapshot().index_of_item(&item.id),
            ListEntry::Header(header) => snapshot.iter().position(|e| {
                e.as_header()
                    .is_some_and(|h| h.bucket() == header.bucket())
            }),
        };
        index
            .map(Some)
            .ok_or(GestureError::InvalidDropTarget { index: row })
    }

    /// Commit the current preview.
    ///
    /// A drop on the original spot finishes the gesture without any store
    /// call.
    ///
    /// # Errors
    ///
    /// - `NotDragging` outside a drag
    /// - `Reconcile` if the preview cannot be mapped to groups
    /// - `Stale` if the list changed under the gesture (a rollback or
    ///   refresh landed mid-drag)
    ///
    /// On any error after the drop the gesture is abandoned and the current
    /// list is shown.
    pub fn drop(&mut self) -> Result<CommitOutcome, GestureError> {
        let request = self.session.drop()?;
        let result = reconcile(&request.before, &request.after, &request.item_id)
            .map_err(GestureError::from)
            .and_then(|delta| {
                self.adapter
                    .apply_reorder(&delta)
                    .map_err(GestureError::from)
            });
        self.session.finish();
        self.rebuild_view();

        match &result {
            Ok(outcome) => debug!(item = %request.item_id, ?outcome, "Drop committed"),
            Err(err) => warn!(item = %request.item_id, error = %err, "Drop abandoned"),
        }
        result
    }

    /// Hover `candidate` then drop. An invalid candidate cancels the gesture.
    ///
    /// # Errors
    ///
    /// The hover error, or anything [`Self::drop`] returns.
    pub fn drop_at(&mut self, candidate: usize) -> Result<CommitOutcome, GestureError> {
        if let Err(err) = self.hover(candidate) {
            if self.session.phase() == DragPhase::Dragging {
                self.cancel_drag()?;
            }
            return Err(err);
        }
        self.drop()
    }

    /// Put the dragged item back. The list returns to the snapshot, or to
    /// newer data if store replies arrived during the drag.
    ///
    /// # Errors
    ///
    /// Returns `NotDragging` outside a drag.
    pub fn cancel_drag(&mut self) -> Result<(), GestureError> {
        let snapshot = self.session.cancel()?;
        if self.view_stale {
            self.rebuild_view();
        } else {
            self.view = snapshot.entries().to_vec();
        }
        Ok(())
    }

    // ===== Groups =====

    /// Collapse or expand a bucket. Returns the new collapsed state.
    pub fn toggle_collapsed(&mut self, bucket: Option<&GroupId>) -> bool {
        let collapsed = self.filter.toggle(bucket);
        debug!(bucket = %BucketLabel(bucket), collapsed, "Toggled group");
        collapsed
    }

    /// Collapse every bucket in the current list.
    pub fn collapse_all(&mut self) {
        let view = &self.view;
        self.filter.collapse_all(view);
    }

    /// Expand every bucket.
    pub fn expand_all(&mut self) {
        self.filter.expand_all();
    }

    /// Move an item to the end of another bucket with a single move call.
    ///
    /// # Errors
    ///
    /// `AlreadyDragging` during a gesture, `Stale` for an unknown item or
    /// target group.
    pub fn send_to_group(
        &mut self,
        item: &ItemId,
        target: Option<&GroupId>,
    ) -> Result<CommitOutcome, GestureError> {
        if self.session.phase() != DragPhase::Idle {
            return Err(GestureError::AlreadyDragging);
        }
        let outcome = self.adapter.apply_move(item, target)?;
        self.rebuild_view();
        Ok(outcome)
    }

    /// Bucket `step` places away from `item`'s bucket in display order.
    ///
    /// Display order is the groups by sort order followed by the ungrouped
    /// bucket. Returns `None` past either end or for an unknown item.
    pub fn neighbour_bucket(&self, item: &ItemId, step: isize) -> Option<Option<GroupId>> {
        let catalog = self.adapter.local();
        let current = catalog.item(item)?.group_id.clone();
        let mut buckets: Vec<Option<GroupId>> = catalog
            .sorted_groups()
            .into_iter()
            .map(|g| Some(g.id.clone()))
            .collect();
        buckets.push(None);
        let position = buckets.iter().position(|b| *b == current)?;
        let next = position.checked_add_signed(step)?;
        buckets.get(next).cloned()
    }

    // ===== Store =====

    /// Queue a full refetch.
    pub fn refresh(&mut self) -> CommitOutcome {
        info!("Refresh requested");
        self.adapter.refresh()
    }

    /// Feed one store reply.
    pub fn resolve(&mut self, ticket: Ticket, result: Result<StoreReply, StoreError>) {
        let resolution = self.adapter.resolve(ticket, result);
        self.absorb(resolution);
    }

    /// Drain every ready reply from the dispatcher. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let resolutions = self.adapter.pump();
        let handled = resolutions.len();
        for resolution in resolutions {
            self.absorb(resolution);
        }
        handled
    }

    fn absorb(&mut self, resolution: Resolution) {
        match resolution {
            Resolution::Committed { moved: Some((item, group)) } => {
                self.events.push(EngineEvent::ItemMoved { item, group });
            }
            Resolution::Committed { moved: None } | Resolution::Ignored => {}
            Resolution::Refreshed => {
                let catalog = self.adapter.local();
                self.filter.retain_known(|id| catalog.group(id).is_some());
            }
            Resolution::RolledBack {
                error, discarded, ..
            } => self
                .events
                .push(EngineEvent::Notice(Notification::ChangeReverted { error, discarded })),
            Resolution::FetchFailed { error } => self
                .events
                .push(EngineEvent::Notice(Notification::RefreshFailed { error })),
        }
        self.rebuild_view();
    }

    /// Rebuild from the local catalog, or defer while a gesture is active.
    fn rebuild_view(&mut self) {
        if self.session.phase() == DragPhase::Idle {
            self.view = list_model::build_from_catalog(self.adapter.local());
            self.view_stale = false;
        } else {
            self.view_stale = true;
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
