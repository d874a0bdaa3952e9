//! Tests for the `poison-demo` binary running against the mock database.

use std::path::PathBuf;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;

fn run(args: &[&str]) -> Output {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("missing.toml");
    let testdata = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demo/testdata");

    Command::new(env!("CARGO_BIN_EXE_poison-demo"))
        .arg("--mock-db")
        .arg("--config")
        .arg(&config)
        .arg("--testdata")
        .arg(&testdata)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_select_prints_mock_table() {
    let output = run(&["--select", "3"]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "result\n---\nMock result for: select * from test_table limit 3\n"
    );
}

#[test]
fn test_logs_go_to_stderr() {
    let output = run(&["--create", "--insert", "2", "--seed", "1"]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Table has been successfully created"));
    assert!(stderr.contains("rowsAffected: 1"));
    assert!(stderr.contains("Insert has been successful"));
}

#[test]
fn test_insert_limit_exits_nonzero() {
    let output = run(&["--insert", "26"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8(output.stderr)
        .unwrap()
        .contains("Use value from range [1 .. 25]"));
}

#[test]
fn test_invalid_poison_exits_nonzero() {
    let output = run(&["--insert-poison", "***"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Decode Error: Poison record is not valid base64"));
    assert_eq!(stderr.to_lowercase().matches("decode error").count(), 1);
}

#[test]
fn test_no_action_is_a_no_op() {
    let output = run(&[]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}
