//! Presentation filter: which buckets are collapsed.
//!
//! Pure view concern. Hidden rows are still part of the entry sequence and
//! the reconciler never consults this filter.

use crate::model::{GroupId, ItemId, ListEntry};
use std::collections::HashSet;

/// Collapsed state per bucket (`None` is the ungrouped bucket).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentationFilter {
    collapsed: HashSet<Option<GroupId>>,
}

impl PresentationFilter {
    /// Everything expanded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the given buckets collapsed.
    pub fn with_collapsed(buckets: impl IntoIterator<Item = Option<GroupId>>) -> Self {
        Self {
            collapsed: buckets.into_iter().collect(),
        }
    }

    /// Whether `bucket` is collapsed.
    pub fn is_collapsed(&self, bucket: Option<&GroupId>) -> bool {
        self.collapsed.contains(&bucket.cloned())
    }

    /// Flip a bucket. Returns the new collapsed state.
    pub fn toggle(&mut self, bucket: Option<&GroupId>) -> bool {
        let key = bucket.cloned();
        if !self.collapsed.remove(&key) {
            self.collapsed.insert(key);
            true
        } else {
            false
        }
    }

    /// Collapse or expand a bucket.
    pub fn set_collapsed(&mut self, bucket: Option<&GroupId>, collapsed: bool) {
        if collapsed {
            self.collapsed.insert(bucket.cloned());
        } else {
            self.collapsed.remove(&bucket.cloned());
        }
    }

    /// Collapse every bucket that has a header in `entries`.
    pub fn collapse_all(&mut self, entries: &[ListEntry]) {
        self.collapsed.extend(
            entries
                .iter()
                .filter_map(ListEntry::as_header)
                .map(|h| h.bucket().cloned()),
        );
    }

    /// Expand every bucket.
    pub fn expand_all(&mut self) {
        self.collapsed.clear();
    }

    /// Forget collapsed state for groups that no longer exist.
    pub fn retain_known(&mut self, known: impl Fn(&GroupId) -> bool) {
        self.collapsed
            .retain(|bucket| bucket.as_ref().is_none_or(|id| known(id)));
    }

    /// Whether row `index` of `entries` is hidden by a collapsed bucket.
    ///
    /// Headers are never hidden. The entry's resolved bucket decides, so an
    /// item previewed inside a collapsed group is hidden like its neighbours.
    pub fn is_hidden(&self, entries: &[ListEntry], index: usize) -> bool {
        match entries.get(index) {
            Some(entry @ ListEntry::Item { .. }) => self.is_collapsed(entry.bucket()),
            _ => false,
        }
    }

    /// Indices of the rows to draw.
    ///
    /// `keep` names an item that stays visible regardless (the item being
    /// dragged), so the user never loses sight of what they are carrying.
    pub fn visible_rows(&self, entries: &[ListEntry], keep: Option<&ItemId>) -> Vec<usize> {
        entries
            .iter()
            .enumerate()
            .filter(|(index, entry)| {
                let carried = match (entry.as_item(), keep) {
                    (Some(item), Some(kept)) => &item.id == kept,
                    _ => false,
                };
                carried || !self.is_hidden(entries, *index)
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// Collapsed buckets, for diagnostics.
    pub fn collapsed_count(&self) -> usize {
        self.collapsed.len()
    }
}
