//! Reconciliation output and the store's batch contract.

use super::identifiers::{GroupId, ItemId};
use std::collections::BTreeMap;

/// New rank for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderAssignment {
    /// The item being ranked.
    pub item_id: ItemId,
    /// Its zero-based position within the bucket.
    pub sort_order: u32,
}

/// The order and membership changes implied by one committed gesture.
///
/// `affected_group_orders` holds the full, renumbered member list of each
/// touched bucket (`None` is the ungrouped bucket). It is empty for a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDelta {
    /// The dragged item.
    pub moved_item_id: ItemId,
    /// Bucket it was picked up from.
    pub source_group_id: Option<GroupId>,
    /// Bucket it was dropped into.
    pub target_group_id: Option<GroupId>,
    /// Source and target buckets differ.
    pub group_changed: bool,
    /// The item's rank changed.
    pub position_changed: bool,
    /// Renumbered members of each touched bucket.
    pub affected_group_orders: BTreeMap<Option<GroupId>, Vec<OrderAssignment>>,
}

impl OrderDelta {
    /// A drop back onto the original spot. Callers must not persist it.
    pub fn is_noop(&self) -> bool {
        !self.group_changed && !self.position_changed
    }

    /// Flatten into the single all-or-nothing store batch.
    ///
    /// Only the moved item carries a `group_change`, and only when its group
    /// actually changed.
    pub fn to_batch(&self) -> ReorderBatch {
        let entries = self
            .affected_group_orders
            .iter()
            .flat_map(|(bucket, orders)| {
                orders.iter().map(move |assignment| {
                    let group_change = (self.group_changed
                        && assignment.item_id == self.moved_item_id)
                        .then(|| GroupChange { to: bucket.clone() });
                    ReorderEntry {
                        id: assignment.item_id.clone(),
                        sort_order: assignment.sort_order,
                        group_change,
                    }
                })
            })
            .collect();
        ReorderBatch { entries }
    }
}

/// Membership change carried by exactly one batch entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupChange {
    /// Destination bucket (`None` moves the item to the ungrouped bucket).
    pub to: Option<GroupId>,
}

/// One `{ id, sortOrder, groupId? }` tuple of a reorder call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderEntry {
    /// Item to update.
    pub id: ItemId,
    /// New sort order.
    pub sort_order: u32,
    /// Set only for the moved item when its group changed.
    pub group_change: Option<GroupChange>,
}

/// A set-sort-orders request. Applied entirely or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReorderBatch {
    /// One entry per item whose rank is rewritten.
    pub entries: Vec<ReorderEntry>,
}

impl ReorderBatch {
    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the batch has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
