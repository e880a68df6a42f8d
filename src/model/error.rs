//! Error types for regroup.
//!
//! This module defines the error taxonomy using `thiserror`. Errors compose via
//! `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error for the binary (config, logging, store, terminal)
//! - [`StoreError`] - Failures reported by the backing store. Both variants are
//!   recoverable: the engine rolls back to the canonical catalog and notifies.
//! - [`GestureError`] - Local precondition violations. Raised synchronously,
//!   before any store call; the gesture simply cancels.
//! - [`ReconcileError`] - The after-sequence cannot be mapped back to groups.
//! - [`CatalogError`] - A batch or move that would break the ordering invariants.
//!
//! Nothing in the reordering core is fatal to the process.

use super::identifiers::{GroupId, ItemId};
use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// The log file could not be set up.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// The store failed at startup.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Terminal setup or drawing failed.
    #[error("Terminal error: {0}")]
    Tui(#[from] crate::view::TuiError),
}

/// Which recovery class a store failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The store answered and refused the change.
    Validation,
    /// No usable answer from the store.
    Transport,
}

/// Failure of a store call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Validation rejection, e.g. the target group no longer exists.
    #[error("Store rejected the change: {reason}")]
    Rejected {
        /// Store's explanation.
        reason: String,
    },

    /// Transport failure or unreadable backing file.
    #[error("Store unavailable: {reason}")]
    Unavailable {
        /// What went wrong on the way.
        reason: String,
    },
}

impl StoreError {
    /// Shorthand for [`StoreError::Rejected`].
    pub fn rejected(reason: impl Into<String>) -> Self {
        StoreError::Rejected {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`StoreError::Unavailable`].
    pub fn unavailable(reason: impl Into<String>) -> Self {
        StoreError::Unavailable {
            reason: reason.into(),
        }
    }

    /// Recovery class of this failure.
    pub fn kind(&self) -> FailureKind {
        match self {
            StoreError::Rejected { .. } => FailureKind::Validation,
            StoreError::Unavailable { .. } => FailureKind::Transport,
        }
    }
}

impl From<CatalogError> for StoreError {
    fn from(err: CatalogError) -> Self {
        StoreError::rejected(err.to_string())
    }
}

/// A batch or move that cannot be applied to a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No item with this id.
    #[error("Unknown item: {0}")]
    UnknownItem(ItemId),

    /// No group with this id.
    #[error("Unknown group: {0}")]
    UnknownGroup(GroupId),

    /// The batch lists an item twice.
    #[error("Item {0} appears more than once in the batch")]
    DuplicateItem(ItemId),

    /// Nothing to apply.
    #[error("Batch is empty")]
    EmptyBatch,

    /// The resulting sort orders of a bucket are not exactly `0..n`.
    #[error("Sort orders in {bucket} would not be contiguous")]
    NotContiguous {
        /// Display label of the bucket.
        bucket: String,
    },
}

/// The before/after sequences do not describe a valid move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// The dragged item is absent from one of the sequences.
    #[error("Moved item {item} is missing from the {side} sequence")]
    MovedItemMissing {
        /// The dragged item.
        item: ItemId,
        /// `"before"` or `"after"`.
        side: &'static str,
    },

    /// The bucket above the drop row names a missing group.
    #[error("Drop target group {0} does not exist")]
    UnknownTargetGroup(GroupId),
}

/// Local precondition violation during a gesture.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GestureError {
    /// Only one drag at a time.
    #[error("A drag is already in progress")]
    AlreadyDragging,

    /// Hover, drop or cancel without a drag.
    #[error("No drag is in progress")]
    NotDragging,

    /// Headers cannot be dragged.
    #[error("Cannot drag a group header (row {index})")]
    StartOnHeader {
        /// Row that was pressed.
        index: usize,
    },

    /// The item is collapsed away.
    #[error("Cannot drag an item hidden in a collapsed group (row {index})")]
    StartOnHiddenItem {
        /// Row that was pressed.
        index: usize,
    },

    /// Row index past the end of the list.
    #[error("Row {index} is outside the list ({len} rows)")]
    OutOfRange {
        /// Requested row.
        index: usize,
        /// Rows in the list.
        len: usize,
    },

    /// No bucket can be derived for the target row.
    #[error("Drop target at row {index} resolves to no group")]
    InvalidDropTarget {
        /// Target row.
        index: usize,
    },

    /// Reconciliation of the drop failed.
    #[error("Cannot reconcile drop: {0}")]
    Reconcile(#[from] ReconcileError),

    /// The list changed underneath the gesture and the drop no longer applies.
    #[error("List changed during the drag: {0}")]
    Stale(#[from] CatalogError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_kinds() {
        assert_eq!(StoreError::rejected("x").kind(), FailureKind::Validation);
        assert_eq!(StoreError::unavailable("x").kind(), FailureKind::Transport);
    }

    #[test]
    fn catalog_error_converts_to_rejection() {
        let err: StoreError = CatalogError::UnknownGroup(GroupId::new("gone").unwrap()).into();
        assert_eq!(
            err,
            StoreError::Rejected {
                reason: "Unknown group: gone".to_string()
            }
        );
    }

    #[test]
    fn gesture_error_messages_carry_context() {
        let err = GestureError::OutOfRange { index: 9, len: 4 };
        assert_eq!(err.to_string(), "Row 9 is outside the list (4 rows)");
    }
}
