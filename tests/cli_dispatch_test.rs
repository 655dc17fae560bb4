// tests/cli_dispatch_test.rs

use assert_cmd::Command;
use imgur_upload::constants;
use predicates::prelude::*;
use tempfile::tempdir;

// Helper, avoids repetition
fn main_command() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

// --- Basic CLI behavior ---

#[test]
fn test_help_flag() {
    let mut cmd = main_command();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Print this help message and exit"))
        .stdout(predicate::str::contains("--anonymous"));
}

#[test]
fn test_version_flag() {
    let mut cmd = main_command();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_flag_is_rejected() {
    let mut cmd = main_command();
    cmd.arg("--definitely-not-a-flag");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unexpected argument"));
}

// --- Entry dispatch ---

#[test]
fn test_zero_args_opens_the_interactive_form() {
    // No arguments at all lands in the interactive form. Closing stdin at
    // the first prompt aborts the run.
    let mut cmd = main_command();
    cmd.write_stdin("");
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("Imgur Upload"))
        .stderr(predicate::str::contains("run failed"));
}

#[test]
fn test_flag_run_prompts_for_missing_credentials() {
    // With a target given but no stored credentials, the run opens the
    // registration guide and prompts; EOF there aborts before any request.
    let dir = tempdir().unwrap();
    let creds_path = dir.path().join("creds.json");

    let mut cmd = main_command();
    cmd.env(constants::CREDS_PATH_ENV, &creds_path)
        .arg("https://example.com/cat.png")
        .write_stdin("");
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("Imgur application required"))
        .stderr(predicate::str::contains("run failed"));
}
