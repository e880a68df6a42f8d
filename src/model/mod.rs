//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod catalog;
pub mod delta;
pub mod error;
pub mod group;
pub mod identifiers;
pub mod item;
pub mod key_action;
pub mod list_entry;
pub mod snapshot;

// Re-export for convenience
pub use catalog::{Catalog, InvariantViolation, check_invariants};
pub use delta::{GroupChange, OrderAssignment, OrderDelta, ReorderBatch, ReorderEntry};
pub use error::{
    AppError, CatalogError, FailureKind, GestureError, ReconcileError, StoreError,
};
pub use group::Group;
pub use identifiers::{BucketLabel, GroupId, InvalidGroupId, InvalidItemId, ItemId};
pub use item::Item;
pub use key_action::KeyAction;
pub use list_entry::{Header, ListEntry, UNGROUPED_LABEL};
pub use snapshot::{Snapshot, index_of_item};
