//! Item: the unit being reordered.

use super::identifiers::{GroupId, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A reorderable item.
///
/// `group_id == None` places the item in the synthetic ungrouped bucket.
/// `sort_order` is unique among items sharing the same `group_id`.
/// Everything except `id`, `group_id` and `sort_order` is opaque to ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Stable identifier.
    pub id: ItemId,
    /// Owning group; `None` for ungrouped.
    #[serde(default)]
    pub group_id: Option<GroupId>,
    /// Rank within the bucket.
    pub sort_order: u32,
    /// Display text.
    pub title: String,
    /// Favorite flag. Only used to break sort-order ties for display.
    #[serde(default)]
    pub pinned: bool,
    /// Display attributes the engine carries but never interprets.
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Item {
    /// Unpinned item with no extra attributes.
    pub fn new(
        id: ItemId,
        group_id: Option<GroupId>,
        sort_order: u32,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id,
            group_id,
            sort_order,
            title: title.into(),
            pinned: false,
            extra: BTreeMap::new(),
        }
    }

    /// Builder-style setter for the favorite flag.
    pub fn with_pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }
}
