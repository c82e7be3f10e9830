//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. Network
//! paths are exercised only far enough to hit the local guard rails.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "mongle-cli", "--"])
        .args(args)
        .env("MONGLE_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn config_show_prints_all_sections() {
    let (stdout, _, code) = run_cli(&["config", "show"]);
    assert_eq!(code, 0, "config show failed");
    assert!(stdout.contains("[remote]"));
    assert!(stdout.contains("[pet]"));
}

#[test]
fn config_get_known_key() {
    let (stdout, _, code) = run_cli(&["config", "get", "pet.decay_window_secs"]);
    assert_eq!(code, 0, "config get failed");
    assert!(!stdout.trim().is_empty());
}

#[test]
fn config_get_unknown_key_fails() {
    let (_, stderr, code) = run_cli(&["config", "get", "pet.nonexistent"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn config_path_points_at_toml() {
    let (stdout, _, code) = run_cli(&["config", "path"]);
    assert_eq!(code, 0, "config path failed");
    assert!(stdout.trim().ends_with("config.toml"));
}

#[test]
fn cache_show_runs_offline() {
    let (_, _, code) = run_cli(&["cache", "show"]);
    assert_eq!(code, 0, "cache show failed");
}
