//! Persistence adapter: optimistic writes with rollback.
//!
//! Two catalogs are kept:
//!
//! - `canonical` - what the store last confirmed (a fetch or an applied write)
//! - `local` - `canonical` plus every optimistic change not yet confirmed
//!
//! At most one store request is in flight. Commits made meanwhile queue up
//! behind it and go out in order. When a write fails, `local` is reset to
//! `canonical` and the queued writes are discarded, since they were computed
//! from the state that was just rejected.

use crate::model::{
    BucketLabel, Catalog, CatalogError, GroupId, ItemId, OrderDelta, StoreError,
};
use crate::store::{Dispatch, StoreReply, StoreRequest, Ticket};
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// What happened to a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Nothing to persist (no-op drop, or move into the current group).
    Skipped,
    /// Sent to the store.
    Dispatched(Ticket),
    /// Waiting behind the in-flight request.
    Queued(Ticket),
}

impl CommitOutcome {
    /// Ticket of the request, unless skipped.
    pub fn ticket(self) -> Option<Ticket> {
        match self {
            CommitOutcome::Skipped => None,
            CommitOutcome::Dispatched(ticket) | CommitOutcome::Queued(ticket) => Some(ticket),
        }
    }
}

/// Result of feeding a store reply to the adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// A write was confirmed.
    Committed {
        /// Set when the write changed an item's group.
        moved: Option<(ItemId, Option<GroupId>)>,
    },
    /// A fetch replaced the canonical catalog.
    Refreshed,
    /// A write failed; local state is back to canonical.
    RolledBack {
        /// Why the write failed.
        error: StoreError,
        /// Queued writes dropped along with the failed one.
        discarded: usize,
        /// Whether a refetch was queued.
        refetching: bool,
    },
    /// A fetch failed. Nothing was rolled back.
    FetchFailed {
        /// Why the fetch failed.
        error: StoreError,
    },
    /// The ticket does not match the in-flight request.
    Ignored,
}

#[derive(Debug, Clone)]
struct Pending {
    ticket: Ticket,
    request: StoreRequest,
}

/// Optimistic front for an item store.
pub struct PersistenceAdapter<D> {
    dispatch: D,
    canonical: Catalog,
    local: Catalog,
    in_flight: Option<Pending>,
    queue: VecDeque<Pending>,
    next_ticket: Ticket,
    refetch_on_failure: bool,
}

impl<D: Dispatch> PersistenceAdapter<D> {
    /// Start from an already fetched catalog.
    pub fn new(dispatch: D, canonical: Catalog) -> Self {
        Self {
            dispatch,
            local: canonical.clone(),
            canonical,
            in_flight: None,
            queue: VecDeque::new(),
            next_ticket: 1,
            refetch_on_failure: true,
        }
    }

    /// Whether a failed write also queues a full refetch.
    pub fn with_refetch_on_failure(mut self, enabled: bool) -> Self {
        self.refetch_on_failure = enabled;
        self
    }

    /// The catalog to render: canonical plus unconfirmed changes.
    pub fn local(&self) -> &Catalog {
        &self.local
    }

    /// The last store-confirmed catalog.
    pub fn canonical(&self) -> &Catalog {
        &self.canonical
    }

    /// The wrapped dispatcher.
    pub fn dispatcher(&self) -> &D {
        &self.dispatch
    }

    /// Mutable access to the wrapped dispatcher.
    pub fn dispatcher_mut(&mut self) -> &mut D {
        &mut self.dispatch
    }

    /// Ticket of the request awaiting a reply.
    pub fn in_flight(&self) -> Option<Ticket> {
        self.in_flight.as_ref().map(|p| p.ticket)
    }

    /// Number of queued requests.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Nothing in flight and nothing queued.
    pub fn is_settled(&self) -> bool {
        self.in_flight.is_none() && self.queue.is_empty()
    }

    /// Persist a reconciled drop.
    ///
    /// No-op deltas are skipped without touching the store. Otherwise the
    /// delta becomes one all-or-nothing batch covering every touched bucket,
    /// applied to `local` first and then sent.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the batch no longer fits the local catalog
    /// (the list changed during the gesture). Nothing is sent in that case.
    pub fn apply_reorder(&mut self, delta: &OrderDelta) -> Result<CommitOutcome, CatalogError> {
        if delta.is_noop() {
            debug!(item = %delta.moved_item_id, "Skipping no-op reorder");
            return Ok(CommitOutcome::Skipped);
        }
        let batch = delta.to_batch();
        self.local.apply_batch(&batch)?;
        info!(
            item = %delta.moved_item_id,
            to = %BucketLabel(delta.target_group_id.as_ref()),
            entries = batch.len(),
            "Committing reorder"
        );
        Ok(self.submit(StoreRequest::SetSortOrders(batch)))
    }

    /// Persist a single-item move to the end of `target`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` for an unknown item or target group.
    pub fn apply_move(
        &mut self,
        item: &ItemId,
        target: Option<&GroupId>,
    ) -> Result<CommitOutcome, CatalogError> {
        if !self.local.move_item(item, target)? {
            return Ok(CommitOutcome::Skipped);
        }
        info!(item = %item, to = %BucketLabel(target), "Committing move");
        Ok(self.submit(StoreRequest::MoveItem {
            item: item.clone(),
            target: target.cloned(),
        }))
    }

    /// Queue a full refetch.
    pub fn refresh(&mut self) -> CommitOutcome {
        self.submit(StoreRequest::Fetch)
    }

    /// Drain every reply the dispatcher has ready.
    pub fn pump(&mut self) -> Vec<Resolution> {
        let mut resolutions = Vec::new();
        while let Some((ticket, result)) = self.dispatch.poll_reply() {
            resolutions.push(self.resolve(ticket, result));
        }
        resolutions
    }

    /// Apply one store reply.
    pub fn resolve(
        &mut self,
        ticket: Ticket,
        result: Result<StoreReply, StoreError>,
    ) -> Resolution {
        let pending = match self.in_flight.take() {
            Some(pending) if pending.ticket == ticket => pending,
            other => {
                warn!(ticket, expected = ?other.as_ref().map(|p| p.ticket), "Reply for unknown ticket");
                self.in_flight = other;
                return Resolution::Ignored;
            }
        };

        let resolution = match (pending.request, result) {
            (StoreRequest::Fetch, Ok(StoreReply::Fetched(catalog))) => {
                debug!(ticket, groups = catalog.groups().len(), items = catalog.items().len(), "Fetched catalog");
                self.canonical = catalog;
                Resolution::Refreshed
            }
            (StoreRequest::Fetch, Ok(StoreReply::Applied)) => Resolution::FetchFailed {
                error: StoreError::unavailable("store answered a fetch without data"),
            },
            (StoreRequest::Fetch, Err(error)) => {
                warn!(ticket, error = %error, "Fetch failed");
                Resolution::FetchFailed { error }
            }
            (request, Ok(StoreReply::Applied)) => self.confirm(ticket, request),
            (_, Ok(StoreReply::Fetched(_))) => {
                self.roll_back(StoreError::unavailable("store answered a write with data"))
            }
            (_, Err(error)) => self.roll_back(error),
        };

        self.advance();
        resolution
    }

    fn confirm(&mut self, ticket: Ticket, request: StoreRequest) -> Resolution {
        let (applied, moved) = match &request {
            StoreRequest::SetSortOrders(batch) => {
                let moved = batch
                    .entries
                    .iter()
                    .find_map(|e| e.group_change.as_ref().map(|c| (e.id.clone(), c.to.clone())));
                (self.canonical.apply_batch(batch).map(|()| true), moved)
            }
            StoreRequest::MoveItem { item, target } => {
                let applied = self.canonical.move_item(item, target.as_ref());
                let moved = matches!(applied, Ok(true)).then(|| (item.clone(), target.clone()));
                (applied, moved)
            }
            StoreRequest::Fetch => (Ok(false), None),
        };

        if let Err(err) = applied {
            // The store accepted something our copy of its data cannot
            // explain, so our copy is out of date.
            warn!(ticket, error = %err, "Confirmed write does not fit canonical catalog; refetching");
            self.enqueue_refetch();
        } else {
            debug!(ticket, request = request.label(), "Write confirmed");
        }
        Resolution::Committed { moved }
    }

    fn roll_back(&mut self, error: StoreError) -> Resolution {
        let before = self.queue.len();
        self.queue.retain(|p| !p.request.is_write());
        let discarded = before - self.queue.len();
        self.local = self.canonical.clone();

        let refetching = self.refetch_on_failure;
        if refetching {
            self.enqueue_refetch();
        }
        warn!(error = %error, discarded, refetching, "Store write failed; rolled back");
        Resolution::RolledBack {
            error,
            discarded,
            refetching,
        }
    }

    fn enqueue_refetch(&mut self) {
        if !self.queue.iter().any(|p| !p.request.is_write()) {
            let ticket = self.take_ticket();
            self.queue.push_back(Pending {
                ticket,
                request: StoreRequest::Fetch,
            });
        }
    }

    /// Send the next queued request, or converge `local` once idle.
    fn advance(&mut self) {
        if self.in_flight.is_some() {
            return;
        }
        match self.queue.pop_front() {
            Some(next) => {
                debug!(ticket = next.ticket, request = next.request.label(), "Dispatching queued request");
                self.dispatch.dispatch(next.ticket, next.request.clone());
                self.in_flight = Some(next);
            }
            None => self.local = self.canonical.clone(),
        }
    }

    fn submit(&mut self, request: StoreRequest) -> CommitOutcome {
        let ticket = self.take_ticket();
        let pending = Pending { ticket, request };
        if self.in_flight.is_none() {
            self.dispatch.dispatch(ticket, pending.request.clone());
            self.in_flight = Some(pending);
            CommitOutcome::Dispatched(ticket)
        } else {
            debug!(ticket, queued = self.queue.len() + 1, "Store busy; queueing request");
            self.queue.push_back(pending);
            CommitOutcome::Queued(ticket)
        }
    }

    fn take_ticket(&mut self) -> Ticket {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        ticket
    }
}

#[cfg(test)]
#[path = "persistence_tests.rs"]
mod tests;
