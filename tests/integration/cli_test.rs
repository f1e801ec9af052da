//! CLI binary tests
//!
//! Each test runs with HOME pointed at a temp directory so the user's
//! config file never leaks in.

use assert_cmd::Command;
use predicates::prelude::*;

use crate::helpers::{fixture_path, temp_home};

fn chatstats(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("chatstats").unwrap();
    cmd.env("HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// analyze
// ============================================================================

#[test]
fn analyze_prints_tables() {
    let home = temp_home(None);
    chatstats(&home)
        .arg("analyze")
        .arg(fixture_path("two_person.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Average length         24.33       14.00"))
        .stdout(predicate::str::contains("Monthly growth        -50.0%      -50.0%"))
        .stdout(predicate::str::contains("Monthly messages 2024"));
}

#[test]
fn analyze_json_output() {
    let home = temp_home(None);
    let output = chatstats(&home)
        .arg("analyze")
        .arg(fixture_path("two_person.txt"))
        .arg("--json")
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["person1"]["characters"], 73);
    assert_eq!(value["person2"]["media_count"], 1);
}

#[test]
fn analyze_warns_about_excluded_senders() {
    let home = temp_home(None);
    chatstats(&home)
        .arg("analyze")
        .arg(fixture_path("group.txt"))
        .assert()
        .success()
        .stderr(predicate::str::contains("excluded Fay (1 messages)"));
}

#[test]
fn analyze_day_first_flag() {
    let home = temp_home(None);
    chatstats(&home)
        .args(["analyze", "--json", "--day-first"])
        .arg(fixture_path("day_first.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"active_days_percentage\": 10.0"));
}

#[test]
fn analyze_day_first_from_config() {
    let home = temp_home(Some("[parser]\ndate_order = \"day-first\"\n"));
    chatstats(&home)
        .args(["analyze", "--json"])
        .arg(fixture_path("day_first.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"active_days_percentage\": 5.0"));
}

#[test]
fn analyze_system_only_fails() {
    let home = temp_home(None);
    chatstats(&home)
        .arg("analyze")
        .arg(fixture_path("system_only.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No chat messages found"));
}

#[test]
fn analyze_missing_file_fails() {
    let home = temp_home(None);
    chatstats(&home)
        .args(["analyze", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found: does-not-exist.txt"));
}

#[test]
fn analyze_rejects_invalid_config() {
    let home = temp_home(Some("[chart]\nfirst_year = 2030\nlast_year = 2020\n"));
    chatstats(&home)
        .arg("analyze")
        .arg(fixture_path("two_person.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config"));
}

// ============================================================================
// config
// ============================================================================

#[test]
fn config_show_prints_defaults() {
    let home = temp_home(None);
    chatstats(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bind = \"127.0.0.1:5000\""))
        .stdout(predicate::str::contains("date_order = \"month-first\""));
}

#[test]
fn config_init_then_refuse() {
    let home = temp_home(None);
    chatstats(&home)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(home
        .path()
        .join(".config")
        .join("chatstats")
        .join("config.toml")
        .exists());

    chatstats(&home)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn config_path_points_into_home() {
    let home = temp_home(None);
    chatstats(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".config/chatstats/config.toml"));
}

// ============================================================================
// completions
// ============================================================================

#[test]
fn completions_generate_for_bash() {
    let home = temp_home(None);
    chatstats(&home)
        .args(["completions", "--shell", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("chatstats"));
}
