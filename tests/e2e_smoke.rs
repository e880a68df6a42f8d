//! E2E smoke tests for the regroup binary
//!
//! These tests execute the compiled binary in a pseudo terminal.
//! They are gated behind the `e2e-tests` feature flag.
//!
//! Run with: `cargo test --features e2e-tests`

#![cfg(feature = "e2e-tests")]

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use expectrl::{spawn, Eof, Regex};

fn binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_regroup"))
}

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/groceries.json")
}

/// Copy the fixture so the TUI may write to it.
fn scratch_store(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("regroup_e2e_{}_{name}.json", std::process::id()));
    fs::copy(fixture(), &path).expect("copy fixture");
    path
}

#[test]
fn smoke_help_flag() {
    let mut session =
        spawn(format!("{} --help", binary().display())).expect("Failed to spawn regroup");

    let _ = session
        .expect(Regex("Drag-and-drop reordering of grouped items"))
        .expect("Failed to find description");
    let _ = session
        .expect(Regex("Usage:"))
        .expect("Failed to find help output");
    let _ = session.expect(Eof).expect("Process should exit");
}

#[test]
fn smoke_version_flag() {
    let mut session =
        spawn(format!("{} --version", binary().display())).expect("Failed to spawn regroup");

    let _ = session
        .expect(Regex(r"regroup \d+\.\d+\.\d+"))
        .expect("Failed to find version output");
    let _ = session.expect(Eof).expect("Process should exit");
}

#[test]
fn smoke_check_prints_outline() {
    let mut session = spawn(format!("{} --check {}", binary().display(), fixture().display()))
        .expect("Failed to spawn regroup");

    let _ = session.expect(Regex("# Produce")).expect("Failed to find outline");
    let _ = session
        .expect(Regex("ok: 2 groups, 5 items"))
        .expect("Failed to find summary");
    let _ = session.expect(Eof).expect("Process should exit");
}

/// Launch, move the cursor, send an item to the next group and quit.
#[test]
fn smoke_app_starts_moves_and_quits() {
    let store = scratch_store("move");
    let mut session = spawn(format!("{} --no-color {}", binary().display(), store.display()))
        .expect("Failed to spawn regroup");

    std::thread::sleep(Duration::from_millis(500));
    let is_alive = session.is_alive().expect("Failed to check process status");
    assert!(is_alive, "Process should be running after startup");

    session.send("j").expect("Failed to send cursor down");
    session.send(">").expect("Failed to send move");
    std::thread::sleep(Duration::from_millis(500));

    session.send("q").expect("Failed to send quit command");
    let _ = session.expect(Eof).expect("Process should exit");

    let saved = fs::read_to_string(&store).expect("store still readable");
    fs::remove_file(&store).ok();
    assert!(saved.contains("saved_at"), "the move was written back");
}
