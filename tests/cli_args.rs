//! Tests for CLI argument parsing, run against the built binary.

mod common;

use std::process::Command;

fn classroll_cmd(config_dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_classroll"));
    cmd.arg("--config")
        .arg(config_dir.path().join("config.toml"))
        .env_remove("CLASSROLL_LOG");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    let dir = tempfile::tempdir().unwrap();
    let output = classroll_cmd(&dir)
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("serve"));
    assert!(stdout.contains("class-entities"));
    assert!(stdout.contains("students"));
    assert!(stdout.contains("--base-url"));
}

#[test]
fn test_invalid_json_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = classroll_cmd(&dir)
        .args(["students", "create", "{not json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: Invalid student JSON"), "got: {}", stderr);
}

#[test]
fn test_invalid_base_url_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = classroll_cmd(&dir)
        .args(["--base-url", "school.example.com", "students", "get", "1"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("must start with http"), "got: {}", stderr);
}

#[test]
fn test_unreachable_api_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    let base_url = format!("http://127.0.0.1:{}", common::free_port());
    let output = classroll_cmd(&dir)
        .args(["--base-url", &base_url, "class-entities", "list"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: Request to"), "got: {}", stderr);
}

#[tokio::test]
async fn test_create_prints_saved_record() {
    let server = common::TestServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = classroll_cmd(&dir);
    cmd.args([
        "--base-url",
        &server.base_url(),
        "class-entities",
        "create",
        r#"{"classId": 32152, "name": "Directives"}"#,
    ]);

    let output = tokio::task::spawn_blocking(move || cmd.output())
        .await
        .unwrap()
        .expect("Failed to execute command");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let printed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(printed["id"], 1);
    assert_eq!(printed["name"], "Directives");
}
