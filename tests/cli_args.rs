//! Integration tests for CLI argument handling
//!
//! Tests argument validation and help output of the oneview binary.

use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_oneview"))
        .args(args)
        .output()
        .expect("Failed to execute oneview")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("oneview"), "Help should mention oneview");
    assert!(stdout.contains("--url"), "Help should mention --url");
    assert!(stdout.contains("--path"), "Help should mention --path");
    assert!(stdout.contains("--format"), "Help should mention --format");
}

#[test]
fn test_missing_url_prints_error_and_exits() {
    let output = run_cli(&[]);
    assert!(!output.status.success(), "Expected missing --url to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("--url"),
        "Should point at the missing --url argument: {}",
        stderr
    );
}

#[test]
fn test_version_flag_exits_successfully() {
    let output = run_cli(&["--version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("oneview"));
}

#[test]
fn test_invalid_proxy_index_is_rejected() {
    let output = run_cli(&["--url", "https://a.test/x", "--proxy", "abc"]);
    assert!(
        !output.status.success(),
        "Expected non-numeric proxy index to fail"
    );
}
