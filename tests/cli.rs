//! Smoke tests for the codescout binary

use assert_cmd::Command;
use predicates::prelude::*;

fn codescout() -> Command {
    let mut cmd = Command::cargo_bin("codescout").unwrap();
    cmd.env_remove("CODESCOUT_API_URL").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    codescout()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("upload"))
        .stdout(predicate::str::contains("stats"));
}

#[test]
fn test_version() {
    codescout()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_config_show_reads_file_and_url_override() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[search]\ntop_k = 7\n").unwrap();

    codescout()
        .args(["--config", path.to_str().unwrap(), "config", "--show"])
        .env("CODESCOUT_API_URL", "http://search.internal:9000")
        .assert()
        .success()
        .stdout(predicate::str::contains("top_k = 7"))
        .stdout(predicate::str::contains("http://search.internal:9000"))
        .stdout(predicate::str::contains("debounce_ms = 500"));
}

#[test]
fn test_config_init_writes_defaults_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("codescout.toml");
    let path_str = path.to_str().unwrap();

    codescout()
        .args(["--config", path_str, "config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration initialized"));
    assert!(std::fs::read_to_string(&path).unwrap().contains("refresh_secs = 30"));

    codescout()
        .args(["--config", path_str, "config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_search_against_unreachable_backend() {
    codescout()
        .args(["--api-url", "http://127.0.0.1:19999", "search", "find", "auth"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Failed to perform search. Is the backend running?",
        ));
}

#[test]
fn test_upload_missing_archive() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.zip");

    codescout()
        .args([
            "--api-url",
            "http://127.0.0.1:19999",
            "upload",
            missing.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.zip"));
}

#[test]
fn test_explain_rejects_bad_range() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("auth.py");
    std::fs::write(&file, "def login():\n    pass\n").unwrap();

    codescout()
        .args(["explain", file.to_str().unwrap(), "--lines", "5-2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid line range"));
}
