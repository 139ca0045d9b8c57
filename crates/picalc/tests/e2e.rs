//! End-to-end CLI integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn picalc() -> Command {
    let mut cmd = Command::cargo_bin("picalc").expect("binary not found");
    cmd.env_remove("PICALC_TIME_LIMIT").env("NO_COLOR", "1");
    cmd
}

/// A short, fast run that starts from 50 digits.
fn short_run(cmd: &mut Command, out: &Path) {
    cmd.args([
        "--time-limit",
        "300ms",
        "--initial-precision",
        "50",
        "--precision-step",
        "10",
        "--iterations-per-step",
        "2",
        "--display-interval",
        "50ms",
        "--no-prompt",
        "--output-dir",
    ])
    .arg(out);
}

fn saved_files(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect()
}

#[test]
fn help_flag() {
    picalc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--time-limit"))
        .stdout(predicate::str::contains("--initial-precision"));
}

#[test]
fn version_flag() {
    picalc()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("picalc"));
}

#[test]
fn timed_run_writes_text_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = picalc();
    short_run(&mut cmd, dir.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Continuous Pi Calculation"))
        .stdout(predicate::str::contains("time limit reached"))
        .stdout(predicate::str::contains("Result saved to:"));

    let files = saved_files(dir.path());
    assert_eq!(files.len(), 1);
    let name = files[0].file_name().unwrap().to_str().unwrap().to_string();
    assert!(name.starts_with("pi_calculation_"));
    assert!(name.ends_with(".txt"));

    let contents = fs::read_to_string(&files[0]).unwrap();
    assert!(contents.starts_with("Pi Calculation\nAchieved Precision: ~"));
    assert!(contents.contains("Stop Reason: time limit reached"));
    assert!(contents.contains("\n\n3.14159265358979323846"));
}

#[test]
fn quiet_prints_digits_only() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = picalc();
    short_run(&mut cmd, dir.path());
    cmd.arg("-q")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("3.14159265358979323846"))
        .stdout(predicate::str::contains("Continuous").not());
}

#[test]
fn json_format() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = picalc();
    short_run(&mut cmd, dir.path());
    cmd.args(["-q", "--format", "json"]).assert().success();

    let files = saved_files(dir.path());
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].extension().and_then(|e| e.to_str()), Some("json"));
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&files[0]).unwrap()).unwrap();
    assert_eq!(value["result"]["stop_reason"], "TimeLimitReached");
    assert_eq!(value["config"]["initial_precision"], 50);
    assert!(value["result"]["snapshot"]["digits"]
        .as_str()
        .unwrap()
        .starts_with("3.14159265358979323846"));
}

#[test]
fn no_save_leaves_directory_empty() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = picalc();
    short_run(&mut cmd, dir.path());
    cmd.args(["-q", "--no-save"]).assert().success();
    assert!(saved_files(dir.path()).is_empty());
}

#[test]
fn time_limit_from_env() {
    let dir = tempfile::tempdir().unwrap();
    picalc()
        .env("PICALC_TIME_LIMIT", "200ms")
        .args(["-q", "--no-save", "--initial-precision", "50", "--display-interval", "50ms"])
        .arg("--output-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("3.14159"));
}

#[test]
fn zero_precision_is_config_error() {
    picalc()
        .args(["--initial-precision", "0", "--time-limit", "1s", "-q"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("initial_precision"));
}

#[test]
fn zero_time_limit_is_config_error() {
    picalc()
        .args(["--time-limit", "0", "-q"])
        .assert()
        .code(4);
}

#[test]
fn malformed_time_limit_is_rejected() {
    picalc()
        .args(["--time-limit", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid duration"));
}

#[test]
fn bash_completion() {
    picalc()
        .args(["--completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("picalc"));
}
