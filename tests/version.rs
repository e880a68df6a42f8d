//! Integration test: Verify binary prints correct version

use std::process::Command;

#[test]
fn binary_prints_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_regroup"))
        .arg("--version")
        .output()
        .expect("Failed to execute binary");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(
        stdout.contains(env!("CARGO_PKG_VERSION")),
        "Expected output to contain version '{}', but got: {}",
        env!("CARGO_PKG_VERSION"),
        stdout
    );
}

#[test]
fn missing_store_path_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_regroup"))
        .arg("--check")
        .env_remove("REGROUP_STORE")
        .env("REGROUP_CONFIG", "/nonexistent/regroup/config.toml")
        .output()
        .expect("Failed to execute binary");

    assert!(!output.status.success());
}
