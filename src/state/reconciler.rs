//! Reconciler: turns a before/after pair into per-group order assignments.

use crate::model::{
    index_of_item, BucketLabel, GroupId, ItemId, ListEntry, OrderAssignment, OrderDelta,
    ReconcileError, Snapshot,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Compute the minimal order/membership changes for a committed gesture.
///
/// Only touched buckets are rewritten: the target bucket, plus the source
/// bucket when the item changed groups. Each touched bucket is renumbered
/// `0, 1, 2, ...` in the order its items appear in `after`. A drop back onto
/// the original spot yields a delta with [`OrderDelta::is_noop`] set and no
/// assignments.
///
/// # Errors
///
/// - `MovedItemMissing` if `moved` is absent from either sequence
/// - `UnknownTargetGroup` if the item resolves to a group the snapshot does not know
pub fn reconcile(
    before: &Snapshot,
    after: &[ListEntry],
    moved: &ItemId,
) -> Result<OrderDelta, ReconcileError> {
    let before_index = before
        .index_of_item(moved)
        .ok_or_else(|| ReconcileError::MovedItemMissing {
            item: moved.clone(),
            side: "before",
        })?;
    let after_index =
        index_of_item(after, moved).ok_or_else(|| ReconcileError::MovedItemMissing {
            item: moved.clone(),
            side: "after",
        })?;

    let source_group_id = before.entries()[before_index].bucket().cloned();
    let target_group_id = after[after_index].bucket().cloned();
    if let Some(target) = &target_group_id {
        if !before.has_bucket(Some(target)) {
            return Err(ReconcileError::UnknownTargetGroup(target.clone()));
        }
    }

    let group_changed = source_group_id != target_group_id;
    let position_changed =
        rank_in_bucket(before.entries(), before_index) != rank_in_bucket(after, after_index);

    let mut delta = OrderDelta {
        moved_item_id: moved.clone(),
        source_group_id,
        target_group_id,
        group_changed,
        position_changed,
        affected_group_orders: BTreeMap::new(),
    };

    if delta.is_noop() {
        debug!(item = %moved, "Drop at original position; nothing to reconcile");
        return Ok(delta);
    }

    let mut touched = vec![delta.target_group_id.clone()];
    if group_changed {
        touched.push(delta.source_group_id.clone());
    }
    for bucket in touched {
        let orders = renumber(after, bucket.as_ref());
        delta.affected_group_orders.insert(bucket, orders);
    }

    debug!(
        item = %moved,
        from = %BucketLabel(delta.source_group_id.as_ref()),
        to = %BucketLabel(delta.target_group_id.as_ref()),
        groups = delta.affected_group_orders.len(),
        "Reconciled drop"
    );
    Ok(delta)
}

/// Position of the entry among the items of its own bucket.
fn rank_in_bucket(entries: &[ListEntry], index: usize) -> usize {
    let bucket = entries[index].bucket();
    entries[..index]
        .iter()
        .filter(|entry| !entry.is_header() && entry.bucket() == bucket)
        .count()
}

fn renumber(after: &[ListEntry], bucket: Option<&GroupId>) -> Vec<OrderAssignment> {
    after
        .iter()
        .filter_map(|entry| match entry {
            ListEntry::Item { item, group_id } if group_id.as_ref() == bucket => {
                Some(item.id.clone())
            }
            _ => None,
        })
        .enumerate()
        .map(|(rank, item_id)| OrderAssignment {
            item_id,
            sort_order: rank as u32,
        })
        .collect()
}
