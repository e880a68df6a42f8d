//! regroup
//!
//! Drag-and-drop reordering of items organized into groups, with optimistic
//! updates against a store.
//!
//! Pure core / impure shell: `model`, `list_model`, `state`, `persistence`
//! and `engine` never touch the terminal or the file system. `store`,
//! `logging` and `view` do.

pub mod check;
pub mod config;
pub mod engine;
pub mod list_model;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod state;
pub mod store;
pub mod view;

pub use engine::{EngineEvent, EngineOptions, Notification, ReorderEngine};
pub use persistence::{CommitOutcome, PersistenceAdapter, Resolution};

#[cfg(test)]
#[allow(dead_code)] // Not every helper is used by every test module
mod test_harness;
