//! Drag preview and reconcile benchmarks over large catalogs.
//!
//! Run with: cargo bench --bench reconcile_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use regroup::list_model::build_from_catalog;
use regroup::model::{Catalog, Group, GroupId, Item, ItemId, ListEntry, Snapshot};
use regroup::state::{compute_preview, reconcile};

/// `groups` groups of `per_group` items each.
fn generate_catalog(groups: usize, per_group: usize) -> Catalog {
    let mut all_groups = Vec::with_capacity(groups);
    let mut items = Vec::with_capacity(groups * per_group);
    for g in 0..groups {
        let id = GroupId::new(format!("g{g}")).expect("valid group id");
        all_groups.push(Group::new(id.clone(), format!("Group {g}"), g as u32));
        for i in 0..per_group {
            let item = ItemId::new(format!("g{g}i{i}")).expect("valid item id");
            items.push(Item::new(item, Some(id.clone()), i as u32, format!("item {i}")));
        }
    }
    Catalog::new(all_groups, items)
}

/// First item row and the last row of the list: a move across every group.
fn far_move(entries: &[ListEntry]) -> (usize, usize) {
    let source = entries
        .iter()
        .position(|e| !e.is_header())
        .expect("catalog has items");
    (source, entries.len() - 1)
}

fn benchmark_preview(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_preview");

    for per_group in [100, 1_000, 10_000] {
        let entries = build_from_catalog(&generate_catalog(10, per_group));
        let (source, target) = far_move(&entries);

        group.bench_with_input(BenchmarkId::from_parameter(per_group), &entries, |b, entries| {
            b.iter(|| compute_preview(black_box(entries), source, black_box(target)));
        });
    }

    group.finish();
}

fn benchmark_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");

    for per_group in [100, 1_000, 10_000] {
        let catalog = generate_catalog(10, per_group);
        let entries = build_from_catalog(&catalog);
        let (source, target) = far_move(&entries);
        let moved = entries[source]
            .as_item()
            .map(|item| item.id.clone())
            .expect("source is an item");
        let snapshot = Snapshot::capture(&entries, catalog.groups(), catalog.items());
        let after = compute_preview(&entries, source, target).expect("target in range");

        group.bench_with_input(BenchmarkId::from_parameter(per_group), &after, |b, after| {
            b.iter(|| reconcile(black_box(&snapshot), black_box(after), &moved));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_preview, benchmark_reconcile);
criterion_main!(benches);
