//! Group: a named, ordered bucket of items.

use super::identifiers::GroupId;
use serde::{Deserialize, Serialize};

/// A named bucket owned by the collection.
///
/// `sort_order` is unique among groups and, outside of a gesture, contiguous
/// from zero. Whether a group is collapsed is a presentation concern and is
/// tracked by [`crate::state::PresentationFilter`], never here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Stable identifier.
    pub id: GroupId,
    /// Display name shown on the header.
    pub name: String,
    /// Rank among groups.
    pub sort_order: u32,
    /// System groups cannot be renamed or removed by normal users.
    #[serde(default)]
    pub is_system: bool,
    /// Whether the user may delete the group.
    #[serde(default = "default_deletable")]
    pub is_deletable: bool,
}

fn default_deletable() -> bool {
    true
}

impl Group {
    /// Create a user group (not system, deletable).
    pub fn new(id: GroupId, name: impl Into<String>, sort_order: u32) -> Self {
        Self {
            id,
            name: name.into(),
            sort_order,
            is_system: false,
            is_deletable: true,
        }
    }
}
