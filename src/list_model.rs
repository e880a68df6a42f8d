//! List Model Builder.
//!
//! Flattens groups and their items into the renderable [`ListEntry`]
//! sequence. Pure: called once initially and again whenever canonical data
//! changes while no gesture is in progress.

use crate::model::{Catalog, Group, GroupId, Header, Item, ListEntry};
use std::collections::HashMap;

/// Flatten groups into header + item entries.
///
/// Groups are emitted by `sort_order`, each followed by its items in
/// `sort_order`. Ties (only possible in data that does not yet satisfy the
/// contiguity invariant) put pinned items first; otherwise input order is
/// kept. A synthetic ungrouped header follows the real groups when
/// `ungrouped` is non-empty. Empty real groups still get a header so they
/// can receive drops.
pub fn build(
    groups: &[Group],
    items_by_group: &HashMap<GroupId, Vec<Item>>,
    ungrouped: &[Item],
) -> Vec<ListEntry> {
    let mut ordered_groups: Vec<&Group> = groups.iter().collect();
    ordered_groups.sort_by_key(|g| g.sort_order);

    let mut entries = Vec::with_capacity(
        groups.len() + 1 + ungrouped.len() + items_by_group.values().map(Vec::len).sum::<usize>(),
    );

    for group in ordered_groups {
        entries.push(ListEntry::Header(Header::Group(group.clone())));
        if let Some(items) = items_by_group.get(&group.id) {
            entries.extend(display_order(items).into_iter().map(|item| ListEntry::Item {
                item: item.clone(),
                group_id: Some(group.id.clone()),
            }));
        }
    }

    if !ungrouped.is_empty() {
        entries.push(ListEntry::Header(Header::Ungrouped));
        entries.extend(display_order(ungrouped).into_iter().map(|item| ListEntry::Item {
            item: item.clone(),
            group_id: None,
        }));
    }

    entries
}

/// Build the list for a whole catalog.
pub fn build_from_catalog(catalog: &Catalog) -> Vec<ListEntry> {
    let (groups, by_group, ungrouped) = catalog.partition();
    build(&groups, &by_group, &ungrouped)
}

fn display_order(items: &[Item]) -> Vec<&Item> {
    let mut sorted: Vec<&Item> = items.iter().collect();
    // Stable sort: equal keys keep input order.
    sorted.sort_by_key(|item| (item.sort_order, !item.pinned));
    sorted
}

/// Plain-text outline of a list: headers flush left, items indented.
///
/// Used by `--check` output and by tests.
pub fn outline(entries: &[ListEntry]) -> String {
    entries
        .iter()
        .map(|entry| match entry {
            ListEntry::Header(header) => format!("# {}", header.label()),
            ListEntry::Item { item, .. } => format!("  {}", item.id),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
