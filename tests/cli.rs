//! Smoke tests for the `ogi` binary.

use assert_cmd::Command;
use tempfile::TempDir;

/// An `ogi` invocation isolated to `dir`: its own cwd, database and home.
fn ogi(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ogi").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("OGI_DB", dir.path().join("issues.db"))
        .env_remove("OGI_BACKEND")
        .env_remove("OGI_API_URL")
        .env_remove("GITHUB_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

fn write_scope(dir: &TempDir) {
    std::fs::write(
        dir.path().join(".ogi.json"),
        r#"{"owner":"octo","repo":"hello"}"#,
    )
    .unwrap();
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    let output = ogi(&dir).arg("version").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("ogi version "));
}

#[test]
fn test_version_json() {
    let dir = TempDir::new().unwrap();
    let output = ogi(&dir).args(["version", "--json"]).output().unwrap();

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(value["backend"], "sqlite");
    let db = dir.path().join("issues.db");
    assert_eq!(value["database"], db.to_str().unwrap());
    assert_eq!(value["authenticated"], false);
}

#[test]
fn test_list_without_scope_explains_setup() {
    let dir = TempDir::new().unwrap();
    let output = ogi(&dir).arg("list").output().unwrap();

    assert_eq!(output.status.code(), Some(7));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("ogi sync owner/repo"));
    assert!(!dir.path().join("issues.db").exists());
}

#[test]
fn test_list_without_scope_json_error() {
    let dir = TempDir::new().unwrap();
    let output = ogi(&dir).args(["list", "--json"]).output().unwrap();

    let value: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(value["error"]["code"], "SCOPE_MISSING");
}

#[test]
fn test_list_empty_store() {
    let dir = TempDir::new().unwrap();
    write_scope(&dir);

    let output = ogi(&dir).args(["list", "--state", "all"]).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("=== (0) Issues ==="));
}

#[test]
fn test_list_raw_is_json_array() {
    let dir = TempDir::new().unwrap();
    write_scope(&dir);

    let output = ogi(&dir).args(["list", "--raw", "--backend", "memory"]).output().unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value, serde_json::json!([]));
}

#[test]
fn test_show_missing_issue() {
    let dir = TempDir::new().unwrap();
    write_scope(&dir);

    let output = ogi(&dir).args(["show", "42"]).output().unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_sync_unreachable_remote_is_transport_error() {
    let dir = TempDir::new().unwrap();
    let output = ogi(&dir)
        .args(["sync", "octo/hello", "--backend", "memory"])
        .env("OGI_API_URL", "http://127.0.0.1:1")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(6));
    assert!(!dir.path().join(".ogi.json").exists());
}

#[test]
fn test_delete_removes_database() {
    let dir = TempDir::new().unwrap();
    write_scope(&dir);

    // Creates the database
    ogi(&dir).arg("list").assert().success();
    assert!(dir.path().join("issues.db").exists());

    ogi(&dir).arg("delete").assert().success();
    assert!(!dir.path().join("issues.db").exists());
    assert!(!dir.path().join("issues.db-wal").exists());

    // Nothing left to delete is still a success
    ogi(&dir).arg("delete").assert().success();
}
