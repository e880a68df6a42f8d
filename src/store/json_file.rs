//! JSON document store.
//!
//! The whole catalog lives in one file:
//!
//! ```json
//! { "saved_at": "2026-01-01T00:00:00Z", "groups": [...], "items": [...] }
//! ```
//!
//! Every write re-reads the file, validates the change against it, and
//! replaces the file atomically (write to a sibling temp file, then rename).

use super::ItemStore;
use crate::model::{Catalog, Group, GroupId, Item, ItemId, ReorderBatch, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// On-disk layout of a store file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    /// Time of the last write. Absent in hand-written files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    /// Every group.
    #[serde(default)]
    pub groups: Vec<Group>,
    /// Every item.
    #[serde(default)]
    pub items: Vec<Item>,
}

impl StoreDocument {
    /// Read and parse a store file without repairing anything.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            StoreError::unavailable(format!("cannot read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            StoreError::unavailable(format!("cannot parse {}: {e}", path.display()))
        })
    }

    /// Catalog view of the document, with dangling group references detached.
    pub fn into_catalog(self) -> Catalog {
        Catalog::new(self.groups, self.items)
    }
}

/// [`ItemStore`] persisted as a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Open an existing store file.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the file is missing or unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self { path: path.into() };
        StoreDocument::load(&store.path)?;
        Ok(store)
    }

    /// Create a store file holding `catalog`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the file cannot be written.
    pub fn create(path: impl Into<PathBuf>, catalog: &Catalog) -> Result<Self, StoreError> {
        let store = Self { path: path.into() };
        store.save(catalog)?;
        Ok(store)
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Catalog, StoreError> {
        StoreDocument::load(&self.path).map(StoreDocument::into_catalog)
    }

    fn save(&self, catalog: &Catalog) -> Result<(), StoreError> {
        let document = StoreDocument {
            saved_at: Some(Utc::now()),
            groups: catalog.groups().to_vec(),
            items: catalog.items().to_vec(),
        };
        let json = serde_json::to_string_pretty(&document)
            .map_err(|e| StoreError::unavailable(format!("cannot encode store: {e}")))?;

        let tmp = self.temp_path();
        fs::write(&tmp, json).map_err(|e| {
            StoreError::unavailable(format!("cannot write {}: {e}", tmp.display()))
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            StoreError::unavailable(format!("cannot replace {}: {e}", self.path.display()))
        })?;
        debug!(path = %self.path.display(), "Store file written");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ItemStore for JsonFileStore {
    fn fetch(&mut self) -> Result<Catalog, StoreError> {
        self.load()
    }

    fn set_sort_orders(&mut self, batch: &ReorderBatch) -> Result<(), StoreError> {
        let mut catalog = self.load()?;
        catalog.apply_batch(batch)?;
        self.save(&catalog)?;
        info!(entries = batch.len(), "Sort orders saved");
        Ok(())
    }

    fn move_item(&mut self, item: &ItemId, target: Option<&GroupId>) -> Result<(), StoreError> {
        let mut catalog = self.load()?;
        if catalog.move_item(item, target)? {
            self.save(&catalog)?;
            info!(item = %item, "Item move saved");
        }
        Ok(())
    }
}
