//! Offline consistency check of a store file (`regroup --check`).

use crate::list_model::{build_from_catalog, outline};
use crate::model::{check_invariants, InvariantViolation, StoreError};
use crate::store::StoreDocument;
use std::fmt;
use std::path::Path;

/// What `--check` found in a store file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Number of groups in the file.
    pub groups: usize,
    /// Number of items in the file.
    pub items: usize,
    /// Ordering invariants that do not hold.
    pub violations: Vec<InvariantViolation>,
    /// The list as it would be drawn.
    pub outline: String,
}

impl CheckReport {
    /// True when no violation was found.
    pub fn is_consistent(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.outline)?;
        writeln!(f)?;
        if self.violations.is_empty() {
            write!(f, "ok: {} groups, {} items", self.groups, self.items)
        } else {
            for violation in &self.violations {
                writeln!(f, "violation: {violation}")?;
            }
            write!(f, "{} violation(s)", self.violations.len())
        }
    }
}

/// Load the store file at `path` and check the ordering invariants.
///
/// # Errors
///
/// Returns `StoreError::Unavailable` if the file cannot be read or parsed.
pub fn check_store(path: &Path) -> Result<CheckReport, StoreError> {
    let document = StoreDocument::load(path)?;
    let violations = check_invariants(&document.groups, &document.items);
    let groups = document.groups.len();
    let items = document.items.len();
    let outline = outline(&build_from_catalog(&document.into_catalog()));
    Ok(CheckReport {
        groups,
        items,
        violations,
        outline,
    })
}
