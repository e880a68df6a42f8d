//! Item store collaborator.
//!
//! The store owns the canonical copy of groups and items. The reordering core
//! talks to it only through two calls (a batch of sort orders, and a single
//! item move) plus a full fetch.
//!
//! - [`ItemStore`] - synchronous store interface
//! - [`Dispatch`] - how requests reach a store and how replies come back
//! - [`SyncDispatch`] - runs requests inline, replies on the next poll
//! - [`StoreWorker`] - runs requests on a background thread

use crate::model::{Catalog, GroupId, ItemId, ReorderBatch, StoreError};
use std::collections::VecDeque;

pub mod json_file;
pub mod memory;
pub mod worker;

pub use json_file::{JsonFileStore, StoreDocument};
pub use memory::MemoryStore;
pub use worker::StoreWorker;

/// Correlates a request with its reply.
pub type Ticket = u64;

/// One call against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreRequest {
    /// All-or-nothing sort-order batch, possibly carrying one group change.
    SetSortOrders(ReorderBatch),
    /// Move one item to the end of `target`.
    MoveItem {
        /// Item to move.
        item: ItemId,
        /// Destination bucket.
        target: Option<GroupId>,
    },
    /// Read the full catalog.
    Fetch,
}

impl StoreRequest {
    /// Whether the request changes stored data.
    pub fn is_write(&self) -> bool {
        !matches!(self, StoreRequest::Fetch)
    }

    /// Short name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            StoreRequest::SetSortOrders(_) => "set_sort_orders",
            StoreRequest::MoveItem { .. } => "move_item",
            StoreRequest::Fetch => "fetch",
        }
    }
}

/// Successful answer to a [`StoreRequest`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreReply {
    /// A write was applied.
    Applied,
    /// Result of a fetch.
    Fetched(Catalog),
}

/// Synchronous access to the backing store.
pub trait ItemStore {
    /// Read every group and item.
    fn fetch(&mut self) -> Result<Catalog, StoreError>;

    /// Apply a sort-order batch, entirely or not at all.
    fn set_sort_orders(&mut self, batch: &ReorderBatch) -> Result<(), StoreError>;

    /// Move an item to the end of another bucket.
    fn move_item(&mut self, item: &ItemId, target: Option<&GroupId>) -> Result<(), StoreError>;

    /// Run any request through the matching method.
    fn execute(&mut self, request: &StoreRequest) -> Result<StoreReply, StoreError> {
        match request {
            StoreRequest::SetSortOrders(batch) => {
                self.set_sort_orders(batch).map(|()| StoreReply::Applied)
            }
            StoreRequest::MoveItem { item, target } => self
                .move_item(item, target.as_ref())
                .map(|()| StoreReply::Applied),
            StoreRequest::Fetch => self.fetch().map(StoreReply::Fetched),
        }
    }
}

/// Transport between the persistence adapter and a store.
///
/// `dispatch` never blocks on the store; the answer arrives later through
/// `poll_reply`, tagged with the same ticket.
pub trait Dispatch {
    /// Send `request`; its reply will carry `ticket`.
    fn dispatch(&mut self, ticket: Ticket, request: StoreRequest);

    /// Next available reply, if any.
    fn poll_reply(&mut self) -> Option<(Ticket, Result<StoreReply, StoreError>)> {
        None
    }
}

/// Runs each request immediately and hands back the reply on the next poll.
#[derive(Debug)]
pub struct SyncDispatch<S> {
    store: S,
    replies: VecDeque<(Ticket, Result<StoreReply, StoreError>)>,
}

impl<S: ItemStore> SyncDispatch<S> {
    /// Wrap `store`.
    pub fn new(store: S) -> Self {
        Self {
            store,
            replies: VecDeque::new(),
        }
    }

    /// The wrapped store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the wrapped store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

impl<S: ItemStore> Dispatch for SyncDispatch<S> {
    fn dispatch(&mut self, ticket: Ticket, request: StoreRequest) {
        let reply = self.store.execute(&request);
        self.replies.push_back((ticket, reply));
    }

    fn poll_reply(&mut self) -> Option<(Ticket, Result<StoreReply, StoreError>)> {
        self.replies.pop_front()
    }
}
