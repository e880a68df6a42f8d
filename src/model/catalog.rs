//! Canonical group/item collections and the ordering invariants.
//!
//! The reordering core only ever reassigns `sort_order` and `group_id`;
//! entities are created and destroyed by outside collaborators.

use super::delta::ReorderBatch;
use super::error::CatalogError;
use super::group::Group;
use super::identifiers::{BucketLabel, GroupId, ItemId};
use super::item::Item;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::warn;

/// A violated ordering invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    /// Item sort orders within a bucket are not exactly `0..n`.
    #[error("items in {} have sort orders {orders:?}, expected 0..{}", BucketLabel(.bucket.as_ref()), .orders.len())]
    ItemOrderGap {
        /// The offending bucket.
        bucket: Option<GroupId>,
        /// Sort orders found there, ascending.
        orders: Vec<u32>,
    },

    /// Group sort orders are not exactly `0..n`.
    #[error("groups have sort orders {orders:?}, expected 0..{}", .orders.len())]
    GroupOrderGap {
        /// Group sort orders, ascending.
        orders: Vec<u32>,
    },

    /// An item references a group that does not exist.
    #[error("item {item} references missing group {group}")]
    DanglingGroup {
        /// The item holding the reference.
        item: ItemId,
        /// The group it points at.
        group: GroupId,
    },
}

/// Check the three ordering invariants over raw collections.
///
/// Returns every violation found; an empty vector means the data is consistent.
pub fn check_invariants(groups: &[Group], items: &[Item]) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    let group_ids: HashSet<&GroupId> = groups.iter().map(|g| &g.id).collect();
    let mut by_bucket: HashMap<Option<&GroupId>, Vec<u32>> = HashMap::new();
    for item in items {
        if let Some(group) = &item.group_id {
            if !group_ids.contains(group) {
                violations.push(InvariantViolation::DanglingGroup {
                    item: item.id.clone(),
                    group: group.clone(),
                });
            }
        }
        by_bucket
            .entry(item.group_id.as_ref())
            .or_default()
            .push(item.sort_order);
    }

    let mut buckets: Vec<_> = by_bucket.into_iter().collect();
    buckets.sort_by(|a, b| a.0.cmp(&b.0));
    for (bucket, mut orders) in buckets {
        orders.sort_unstable();
        if !is_contiguous(&orders) {
            violations.push(InvariantViolation::ItemOrderGap {
                bucket: bucket.cloned(),
                orders,
            });
        }
    }

    let mut group_orders: Vec<u32> = groups.iter().map(|g| g.sort_order).collect();
    group_orders.sort_unstable();
    if !is_contiguous(&group_orders) {
        violations.push(InvariantViolation::GroupOrderGap {
            orders: group_orders,
        });
    }

    violations
}

/// `sorted` must already be ascending.
fn is_contiguous(sorted: &[u32]) -> bool {
    sorted
        .iter()
        .enumerate()
        .all(|(rank, order)| *order as usize == rank)
}

/// Groups and items as last known, either canonical or optimistic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Catalog {
    groups: Vec<Group>,
    items: Vec<Item>,
}

impl Catalog {
    /// Build a catalog, detaching items that reference missing groups.
    ///
    /// Such items land in the ungrouped bucket so that every item entry can be
    /// resolved to an existing bucket.
    pub fn new(groups: Vec<Group>, mut items: Vec<Item>) -> Self {
        let known: HashSet<GroupId> = groups.iter().map(|g| g.id.clone()).collect();
        for item in &mut items {
            if let Some(group) = &item.group_id {
                if !known.contains(group) {
                    warn!(item = %item.id, group = %group, "Item references missing group; treating as ungrouped");
                    item.group_id = None;
                }
            }
        }
        Self { groups, items }
    }

    /// Groups in storage order, not necessarily sorted.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// All items.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Look up a group by id.
    pub fn group(&self, id: &GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| &g.id == id)
    }

    /// Look up an item by id.
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// `None` (ungrouped) always exists.
    pub fn has_bucket(&self, bucket: Option<&GroupId>) -> bool {
        bucket.is_none_or(|id| self.group(id).is_some())
    }

    /// Number of items in `bucket`.
    pub fn bucket_len(&self, bucket: Option<&GroupId>) -> usize {
        self.items
            .iter()
            .filter(|i| i.group_id.as_ref() == bucket)
            .count()
    }

    /// Groups in display order.
    pub fn sorted_groups(&self) -> Vec<&Group> {
        let mut groups: Vec<&Group> = self.groups.iter().collect();
        groups.sort_by_key(|g| g.sort_order);
        groups
    }

    /// Items of a bucket in `sort_order`.
    pub fn bucket_items(&self, bucket: Option<&GroupId>) -> Vec<&Item> {
        let mut items: Vec<&Item> = self
            .items
            .iter()
            .filter(|i| i.group_id.as_ref() == bucket)
            .collect();
        items.sort_by_key(|i| i.sort_order);
        items
    }

    /// Split into the inputs of [`crate::list_model::build`].
    pub fn partition(&self) -> (Vec<Group>, HashMap<GroupId, Vec<Item>>, Vec<Item>) {
        let mut by_group: HashMap<GroupId, Vec<Item>> = HashMap::new();
        let mut ungrouped = Vec::new();
        for item in &self.items {
            match &item.group_id {
                Some(group) => by_group.entry(group.clone()).or_default().push(item.clone()),
                None => ungrouped.push(item.clone()),
            }
        }
        (self.groups.clone(), by_group, ungrouped)
    }

    /// See the free function [`check_invariants`].
    pub fn check_invariants(&self) -> Vec<InvariantViolation> {
        check_invariants(&self.groups, &self.items)
    }

    /// Apply a set-sort-orders batch, all or nothing.
    ///
    /// Every bucket the batch touches (including the source bucket of a moved
    /// item) must end up with sort orders exactly `0..n`; otherwise the catalog
    /// is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` for unknown ids, duplicate entries, an empty
    /// batch, or a result that would break contiguity.
    pub fn apply_batch(&mut self, batch: &ReorderBatch) -> Result<(), CatalogError> {
        if batch.is_empty() {
            return Err(CatalogError::EmptyBatch);
        }

        let positions: HashMap<&ItemId, usize> = self
            .items
            .iter()
            .enumerate()
            .map(|(pos, item)| (&item.id, pos))
            .collect();

        let mut next = self.items.clone();
        let mut seen: HashSet<&ItemId> = HashSet::new();
        let mut touched: BTreeSet<Option<GroupId>> = BTreeSet::new();

        for entry in &batch.entries {
            if !seen.insert(&entry.id) {
                return Err(CatalogError::DuplicateItem(entry.id.clone()));
            }
            let pos = *positions
                .get(&entry.id)
                .ok_or_else(|| CatalogError::UnknownItem(entry.id.clone()))?;
            let item = &mut next[pos];
            touched.insert(item.group_id.clone());

            if let Some(change) = &entry.group_change {
                if let Some(target) = &change.to {
                    if self.group(target).is_none() {
                        return Err(CatalogError::UnknownGroup(target.clone()));
                    }
                }
                item.group_id = change.to.clone();
                touched.insert(change.to.clone());
            }
            item.sort_order = entry.sort_order;
        }

        for bucket in &touched {
            let mut orders: Vec<u32> = next
                .iter()
                .filter(|i| &i.group_id == bucket)
                .map(|i| i.sort_order)
                .collect();
            orders.sort_unstable();
            if !is_contiguous(&orders) {
                return Err(CatalogError::NotContiguous {
                    bucket: BucketLabel(bucket.as_ref()).to_string(),
                });
            }
        }

        self.items = next;
        Ok(())
    }

    /// Move an item to the end of another bucket, closing the gap it leaves.
    ///
    /// Returns `Ok(false)` when the item is already in `target`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` for an unknown item or target group.
    pub fn move_item(&mut self, id: &ItemId, target: Option<&GroupId>) -> Result<bool, CatalogError> {
        let pos = self
            .items
            .iter()
            .position(|i| &i.id == id)
            .ok_or_else(|| CatalogError::UnknownItem(id.clone()))?;
        if let Some(group) = target {
            if self.group(group).is_none() {
                return Err(CatalogError::UnknownGroup(group.clone()));
            }
        }

        let source = self.items[pos].group_id.clone();
        if source.as_ref() == target {
            return Ok(false);
        }

        let old_order = self.items[pos].sort_order;
        let new_order = self.bucket_len(target) as u32;
        for item in &mut self.items {
            if item.group_id == source && item.sort_order > old_order {
                item.sort_order -= 1;
            }
        }
        let item = &mut self.items[pos];
        item.group_id = target.cloned();
        item.sort_order = new_order;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
