//! Flattened, renderable list entries.
//!
//! A `ListEntry` sequence is always derived from the catalog; it is never a
//! source of truth.

use super::group::Group;
use super::identifiers::GroupId;
use super::item::Item;

/// Label shown for the synthetic ungrouped bucket.
pub const UNGROUPED_LABEL: &str = "Ungrouped";

/// A group header row.
#[derive(Debug, Clone, PartialEq)]
pub enum Header {
    /// Header of a real group.
    Group(Group),
    /// Sentinel header for items whose `group_id` is `None`.
    Ungrouped,
}

impl Header {
    /// Bucket this header opens (`None` for the ungrouped bucket).
    pub fn bucket(&self) -> Option<&GroupId> {
        match self {
            Header::Group(group) => Some(&group.id),
            Header::Ungrouped => None,
        }
    }

    /// Text drawn on the header row.
    pub fn label(&self) -> &str {
        match self {
            Header::Group(group) => &group.name,
            Header::Ungrouped => UNGROUPED_LABEL,
        }
    }
}

/// One row of the flattened list.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEntry {
    /// Start of a bucket.
    Header(Header),
    /// An item and the bucket it currently resolves to.
    ///
    /// During a drag preview `group_id` may differ from `item.group_id`;
    /// the entry's `group_id` is what reconciliation reads.
    Item {
        /// The item as stored.
        item: Item,
        /// Bucket the row resolves to.
        group_id: Option<GroupId>,
    },
}

impl ListEntry {
    /// Item entry resolved to the item's own group.
    pub fn item(item: Item) -> Self {
        let group_id = item.group_id.clone();
        ListEntry::Item { item, group_id }
    }

    /// Whether this row is a header.
    pub fn is_header(&self) -> bool {
        matches!(self, ListEntry::Header(_))
    }

    /// The item, for item rows.
    pub fn as_item(&self) -> Option<&Item> {
        match self {
            ListEntry::Item { item, .. } => Some(item),
            ListEntry::Header(_) => None,
        }
    }

    /// The header, for header rows.
    pub fn as_header(&self) -> Option<&Header> {
        match self {
            ListEntry::Header(header) => Some(header),
            ListEntry::Item { .. } => None,
        }
    }

    /// Bucket of this row: the header's own bucket, or the item's resolved bucket.
    pub fn bucket(&self) -> Option<&GroupId> {
        match self {
            ListEntry::Header(header) => header.bucket(),
            ListEntry::Item { group_id, .. } => group_id.as_ref(),
        }
    }
}
