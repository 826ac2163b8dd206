//! CLI integration tests for drip-send
//!
//! These only exercise the paths that stop before authentication; nothing
//! here ever reaches the network.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn drip_send() -> Command {
    let mut cmd = Command::cargo_bin("drip-send").unwrap();
    // Keep the test hermetic: no user config, no ambient credentials.
    cmd.env("DRIPCAST_CONFIG", "/nonexistent/dripcast/config.toml")
        .env_remove("DRIPCAST_USERNAME")
        .env_remove("DRIPCAST_PASSWORD")
        .env_remove("DRIPCAST_EMAIL");
    cmd
}

fn write_posts(dir: &TempDir, content: &str) -> String {
    let path = dir.path().join("posts.json");
    fs::write(&path, content).unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn test_help_flag_output() {
    drip_send()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Dispatch a batch of pre-defined posts at a throttled cadence",
        ))
        .stdout(predicate::str::contains("--delay"))
        .stdout(predicate::str::contains("--count"))
        .stdout(predicate::str::contains("--username"))
        .stdout(predicate::str::contains("--verbose"));
}

#[test]
fn test_version_flag_output() {
    drip_send()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("drip-send"));
}

#[test]
fn test_invalid_delay_format_is_startup_error() {
    let dir = TempDir::new().unwrap();
    let posts = write_posts(&dir, r#"[{"content": "hello"}]"#);

    drip_send()
        .args(["--delay", "90s"])
        .arg(&posts)
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Invalid delay '90s'"));
}

#[test]
fn test_fractional_delay_rejected() {
    drip_send()
        .args(["--delay", "2.5"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Invalid delay"));
}

#[test]
fn test_missing_posts_file() {
    drip_send()
        .arg("/nonexistent/posts.json")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to read post definitions"));
}

#[test]
fn test_posts_store_not_a_sequence() {
    let dir = TempDir::new().unwrap();
    let posts = write_posts(&dir, r#"{"content": "not an array"}"#);

    drip_send()
        .arg(&posts)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("must be a JSON array"));
}

#[test]
fn test_posts_store_record_without_content() {
    let dir = TempDir::new().unwrap();
    let posts = write_posts(&dir, r#"[{"content": "ok"}, {"media": ["a.png"]}]"#);

    drip_send()
        .arg(&posts)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse post definitions"));
}

#[test]
fn test_empty_posts_store_completes_cleanly() {
    let dir = TempDir::new().unwrap();
    let posts = write_posts(&dir, "[]");

    drip_send().arg(&posts).assert().success().code(0);
}

#[test]
fn test_invalid_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "not valid [ toml").unwrap();
    let posts = write_posts(&dir, r#"[{"content": "hello"}]"#);

    drip_send()
        .env("DRIPCAST_CONFIG", config.to_string_lossy().to_string())
        .arg(&posts)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse config"));
}
