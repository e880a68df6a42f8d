//! In-memory store with fault injection.

use super::ItemStore;
use crate::model::{Catalog, GroupId, ItemId, ReorderBatch, StoreError};
use tracing::debug;

/// Store backed by a [`Catalog`] held in memory.
///
/// Validates every write the same way a real backend would. Failures can be
/// scripted with [`MemoryStore::reject_next`] and [`MemoryStore::fail_next`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    catalog: Catalog,
    injected: Option<StoreError>,
    writes: usize,
}

impl MemoryStore {
    /// Store holding `catalog`.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            injected: None,
            writes: 0,
        }
    }

    /// Current contents.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Number of writes that were applied.
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Make the next call fail with a validation rejection.
    pub fn reject_next(&mut self, reason: impl Into<String>) {
        self.injected = Some(StoreError::rejected(reason));
    }

    /// Make the next call fail as if the store could not be reached.
    pub fn fail_next(&mut self, reason: impl Into<String>) {
        self.injected = Some(StoreError::unavailable(reason));
    }

    fn take_injected(&mut self) -> Result<(), StoreError> {
        match self.injected.take() {
            Some(err) => {
                debug!(error = %err, "Injected store failure");
                Err(err)
            }
            None => Ok(()),
        }
    }
}

impl ItemStore for MemoryStore {
    fn fetch(&mut self) -> Result<Catalog, StoreError> {
        self.take_injected()?;
        Ok(self.catalog.clone())
    }

    fn set_sort_orders(&mut self, batch: &ReorderBatch) -> Result<(), StoreError> {
        self.take_injected()?;
        self.catalog.apply_batch(batch)?;
        self.writes += 1;
        Ok(())
    }

    fn move_item(&mut self, item: &ItemId, target: Option<&GroupId>) -> Result<(), StoreError> {
        self.take_injected()?;
        if self.catalog.move_item(item, target)? {
            self.writes += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GroupChange, ReorderEntry};
    use crate::test_harness::{catalog, gid, iid, order_of};

    fn store() -> MemoryStore {
        MemoryStore::new(catalog(&[("a", &["x", "y"]), ("b", &["p"])], &[]))
    }

    #[test]
    fn applies_valid_batch() {
        let mut store = store();
        let batch = ReorderBatch {
            entries: vec![
                ReorderEntry {
                    id: iid("y"),
                    sort_order: 0,
                    group_change: None,
                },
                ReorderEntry {
                    id: iid("x"),
                    sort_order: 1,
                    group_change: None,
                },
            ],
        };
        store.set_sort_orders(&batch).unwrap();
        assert_eq!(order_of(store.catalog(), Some("a")), vec!["y", "x"]);
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn rejects_batch_into_missing_group_without_changes() {
        let mut store = store();
        let before = store.catalog().clone();
        let batch = ReorderBatch {
            entries: vec![ReorderEntry {
                id: iid("x"),
                sort_order: 0,
                group_change: Some(GroupChange {
                    to: Some(gid("gone")),
                }),
            }],
        };
        let err = store.set_sort_orders(&batch).unwrap_err();
        assert_eq!(err, StoreError::rejected("Unknown group: gone"));
        assert_eq!(store.catalog(), &before);
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn injected_failure_applies_once() {
        let mut store = store();
        store.fail_next("connection reset");
        assert_eq!(
            store.fetch().unwrap_err(),
            StoreError::unavailable("connection reset")
        );
        assert!(store.fetch().is_ok());
    }

    #[test]
    fn injected_rejection_blocks_the_write() {
        let mut store = store();
        store.reject_next("group locked");
        assert!(store.move_item(&iid("x"), Some(&gid("b"))).is_err());
        assert_eq!(order_of(store.catalog(), Some("b")), vec!["p"]);
    }

    #[test]
    fn move_to_same_group_is_not_counted_as_write() {
        let mut store = store();
        store.move_item(&iid("x"), Some(&gid("a"))).unwrap();
        assert_eq!(store.writes(), 0);
        store.move_item(&iid("x"), Some(&gid("b"))).unwrap();
        assert_eq!(store.writes(), 1);
        assert_eq!(order_of(store.catalog(), Some("b")), vec!["p", "x"]);
    }
}
