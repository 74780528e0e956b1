//! Config command E2E tests.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_lullaby"))
        .args(args)
        .env("LULLABY_DATA_DIR", data_dir)
        .output()
        .expect("Failed to execute CLI command");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

#[test]
fn test_config_defaults() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "program.poll_interval_secs"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "30");
    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn test_config_set_get_reset() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "set", "program.first_prompt_min", "15"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");

    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "program.first_prompt_min"]);
    assert_eq!(stdout.trim(), "15");

    let (stdout, _, code) = run_cli(dir.path(), &["config", "list"]);
    assert_eq!(code, 0);
    let listed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(listed["program"]["first_prompt_min"], 15);

    run_cli(dir.path(), &["config", "reset"]);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "program.first_prompt_min"]);
    assert_eq!(stdout.trim(), "20");
}

#[test]
fn test_config_unknown_key() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "no.such.key"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));

    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "no.such.key", "1"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown config key"));
}
