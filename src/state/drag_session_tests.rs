//! Tests for the drag gesture state machine.

use super::*;
use crate::list_model::build_from_catalog;
use crate::model::{Item, ListEntry};
use crate::test_harness::{catalog, gid, iid, ids_in};

/// Rows: 0 #A, 1 x, 2 y, 3 z, 4 #B, 5 p, 6 q
fn two_groups() -> Snapshot {
    let cat = catalog(&[("a", &["x", "y", "z"]), ("b", &["p", "q"])], &[]);
    let entries = build_from_catalog(&cat);
    Snapshot::capture(&entries, cat.groups(), cat.items())
}

fn dragging(source: usize) -> DragSession {
    let mut session = DragSession::new();
    session.start(two_groups(), source).expect("start on item");
    session
}

fn bucket_of(entries: &[ListEntry], id: &str) -> Option<GroupId> {
    entries
        .iter()
        .find(|e| e.as_item().is_some_and(|i| i.id.as_str() == id))
        .and_then(|e| e.bucket().cloned())
}

// ===== Start =====

#[test]
fn start_on_item_enters_dragging() {
    let session = dragging(1);
    assert_eq!(session.phase(), DragPhase::Dragging);
    let drag = session.active().expect("active drag");
    assert_eq!(drag.item_id(), &iid("x"));
    assert_eq!(drag.source_index(), 1);
    assert_eq!(drag.source_group_id(), Some(&gid("a")));
    assert_eq!(drag.candidate(), None);
    assert_eq!(drag.preview(), drag.snapshot().entries());
}

#[test]
fn start_on_header_is_rejected() {
    let mut session = DragSession::new();
    assert_eq!(
        session.start(two_groups(), 4),
        Err(GestureError::StartOnHeader { index: 4 })
    );
    assert_eq!(session.phase(), DragPhase::Idle);
}

#[test]
fn start_out_of_range_is_rejected() {
    let mut session = DragSession::new();
    assert_eq!(
        session.start(two_groups(), 7),
        Err(GestureError::OutOfRange { index: 7, len: 7 })
    );
}

#[test]
fn second_start_is_rejected_while_dragging() {
    let mut session = dragging(1);
    assert_eq!(
        session.start(two_groups(), 2),
        Err(GestureError::AlreadyDragging)
    );
    assert_eq!(session.active().map(|d| d.source_index()), Some(1));
}

// ===== Live updates =====

#[test]
fn hover_requires_dragging() {
    let mut session = DragSession::new();
    assert_eq!(session.hover(1).err(), Some(GestureError::NotDragging));
}

#[test]
fn hover_down_onto_item_lands_after_it() {
    let mut session = dragging(1);
    let preview = session.hover(5).expect("valid hover").to_vec();
    assert_eq!(ids_in(&preview, Some("b")), vec!["p", "x", "q"]);
    assert_eq!(ids_in(&preview, Some("a")), vec!["y", "z"]);
    assert_eq!(bucket_of(&preview, "x"), Some(gid("b")));
}

#[test]
fn hover_up_onto_item_lands_before_it() {
    let mut session = dragging(6);
    let preview = session.hover(2).expect("valid hover").to_vec();
    assert_eq!(ids_in(&preview, Some("a")), vec!["x", "q", "y", "z"]);
    assert_eq!(ids_in(&preview, Some("b")), vec!["p"]);
}

#[test]
fn moving_up_cannot_land_after_last_item_of_group_above() {
    // z is the closest slot; the end of A is only reachable with a move call.
    let mut session = dragging(5);
    let preview = session.hover(3).expect("valid hover").to_vec();
    assert_eq!(ids_in(&preview, Some("a")), vec!["x", "y", "p", "z"]);

    let preview = session.hover(4).expect("valid hover").to_vec();
    assert_eq!(ids_in(&preview, Some("a")), vec!["x", "y", "z"]);
    assert_eq!(ids_in(&preview, Some("b")), vec!["p", "q"]);
}

#[test]
fn hover_on_header_below_makes_first_item_of_that_group() {
    let mut session = dragging(1);
    let preview = session.hover(4).expect("valid hover").to_vec();
    assert_eq!(ids_in(&preview, Some("b")), vec!["x", "p", "q"]);
}

#[test]
fn hover_on_header_above_makes_first_item_of_that_group() {
    let mut session = dragging(6);
    let preview = session.hover(0).expect("valid hover").to_vec();
    assert_eq!(ids_in(&preview, Some("a")), vec!["q", "x", "y", "z"]);
}

#[test]
fn hover_on_own_header_is_no_move() {
    let mut session = dragging(5);
    let snapshot_entries = session.active().unwrap().snapshot().entries().to_vec();
    let preview = session.hover(4).expect("valid hover").to_vec();
    assert_eq!(preview, snapshot_entries);
}

#[test]
fn hover_does_not_change_items_own_group_field() {
    let mut session = dragging(1);
    let preview = session.hover(5).unwrap().to_vec();
    let x = preview
        .iter()
        .find_map(|e| e.as_item().filter(|i| i.id.as_str() == "x"))
        .unwrap();
    assert_eq!(x.group_id, Some(gid("a")), "only the entry's resolved bucket changes");
}

#[test]
fn repeated_hovers_do_not_drift() {
    let mut session = dragging(1);
    session.hover(6).unwrap();
    session.hover(3).unwrap();
    session.hover(0).unwrap();
    let after_many = session.hover(5).unwrap().to_vec();

    let mut fresh = dragging(1);
    let after_one = fresh.hover(5).unwrap().to_vec();
    assert_eq!(after_many, after_one);
    assert_eq!(session.active().unwrap().snapshot(), fresh.active().unwrap().snapshot());
}

#[test]
fn invalid_hover_keeps_previous_preview() {
    let mut session = dragging(1);
    let good = session.hover(5).unwrap().to_vec();
    assert_eq!(
        session.hover(99).err(),
        Some(GestureError::OutOfRange { index: 99, len: 7 })
    );
    assert_eq!(session.preview(), Some(good.as_slice()));
    assert_eq!(session.active().unwrap().candidate(), Some(5));
}

// ===== Drop / cancel =====

#[test]
fn drop_hands_last_preview_and_enters_committing() {
    let mut session = dragging(1);
    let preview = session.hover(5).unwrap().to_vec();
    let request = session.drop().expect("drop while dragging");
    assert_eq!(request.after, preview);
    assert_eq!(request.item_id, iid("x"));
    assert_eq!(request.before, two_groups());
    assert_eq!(session.phase(), DragPhase::Committing);

    session.finish();
    assert_eq!(session.phase(), DragPhase::Idle);
}

#[test]
fn drop_without_hover_commits_original_order() {
    let mut session = dragging(2);
    let request = session.drop().unwrap();
    assert_eq!(request.after, request.before.entries());
}

#[test]
fn drop_while_committing_keeps_committing() {
    let mut session = dragging(1);
    session.drop().unwrap();
    assert_eq!(session.drop().err(), Some(GestureError::NotDragging));
    assert_eq!(session.phase(), DragPhase::Committing);
    assert_eq!(session.cancel().err(), Some(GestureError::NotDragging));
    assert_eq!(session.phase(), DragPhase::Committing);
}

#[test]
fn cancel_returns_snapshot_and_goes_idle() {
    let mut session = dragging(1);
    session.hover(6).unwrap();
    session.hover(4).unwrap();
    let snapshot = session.cancel().expect("cancel while dragging");
    assert_eq!(snapshot, two_groups());
    assert_eq!(session.phase(), DragPhase::Idle);
    assert!(session.preview().is_none());
}

#[test]
fn cancel_when_idle_fails() {
    let mut session = DragSession::new();
    assert_eq!(session.cancel().err(), Some(GestureError::NotDragging));
}

#[test]
fn finish_is_ignored_unless_committing() {
    let mut session = dragging(1);
    session.finish();
    assert_eq!(session.phase(), DragPhase::Dragging);
}

// ===== compute_preview =====

#[test]
fn slot_without_header_above_is_invalid() {
    let entries = vec![
        ListEntry::item(Item::new(iid("u"), None, 0, "u")),
        ListEntry::item(Item::new(iid("v"), None, 1, "v")),
    ];
    assert_eq!(
        compute_preview(&entries, 1, 0),
        Err(GestureError::InvalidDropTarget { index: 0 })
    );
}

#[test]
fn preview_keeps_length() {
    let snapshot = two_groups();
    for target in 0..snapshot.entries().len() {
        let preview = compute_preview(snapshot.entries(), 2, target).unwrap();
        assert_eq!(preview.len(), snapshot.entries().len());
    }
}
