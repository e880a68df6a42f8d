//! Immutable capture of model state taken when a gesture starts.

use super::group::Group;
use super::identifiers::{GroupId, ItemId};
use super::item::Item;
use super::list_entry::ListEntry;
use std::sync::Arc;

/// The list as it was when the gesture began.
///
/// Cheap to clone; every clone shares the same immutable data. A snapshot is
/// discarded when the gesture is committed or cancelled and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    inner: Arc<SnapshotData>,
}

#[derive(Debug, PartialEq)]
struct SnapshotData {
    entries: Vec<ListEntry>,
    groups: Vec<Group>,
    items: Vec<Item>,
}

impl Snapshot {
    /// Copy the list and catalog as they are at drag start.
    pub fn capture(entries: &[ListEntry], groups: &[Group], items: &[Item]) -> Self {
        Self {
            inner: Arc::new(SnapshotData {
                entries: entries.to_vec(),
                groups: groups.to_vec(),
                items: items.to_vec(),
            }),
        }
    }

    /// Rows at capture time.
    pub fn entries(&self) -> &[ListEntry] {
        &self.inner.entries
    }

    /// Groups at capture time.
    pub fn groups(&self) -> &[Group] {
        &self.inner.groups
    }

    /// Items at capture time.
    pub fn items(&self) -> &[Item] {
        &self.inner.items
    }

    /// Index of the item entry with the given id.
    pub fn index_of_item(&self, id: &ItemId) -> Option<usize> {
        index_of_item(self.entries(), id)
    }

    /// Whether `bucket` names the ungrouped bucket or a group known to this snapshot.
    pub fn has_bucket(&self, bucket: Option<&GroupId>) -> bool {
        match bucket {
            None => true,
            Some(id) => self.groups().iter().any(|g| &g.id == id),
        }
    }
}

/// Position of an item entry within a flattened sequence.
pub fn index_of_item(entries: &[ListEntry], id: &ItemId) -> Option<usize> {
    entries
        .iter()
        .position(|entry| entry.as_item().is_some_and(|item| &item.id == id))
}
