//! End-to-end tests for the fsinv binary

use crate::fixtures::create_scenario_tree;
use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn fsinv(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fsinv"))
        .args(args)
        .output()
        .expect("Failed to execute fsinv")
}

#[test]
fn test_help_lists_commands() {
    let output = fsinv(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Filesystem Inventory CLI"));
    assert!(stdout.contains("scan"));
    assert!(stdout.contains("query"));
}

#[test]
fn test_version_reports_package_version() {
    let output = fsinv(&["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with(&format!("fsinv {}", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn test_scan_without_database_is_usage_error() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_scenario_tree(temp_dir.path()).unwrap();

    let output = fsinv(&["scan", root.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--db"));
}

#[test]
fn test_unknown_option_is_usage_error() {
    let output = fsinv(&["scan", "/tmp", "--frobnicate"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_scan_then_query() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_scenario_tree(temp_dir.path()).unwrap();
    let db = temp_dir.path().join("tree.db");
    let db_arg = db.to_str().unwrap();

    let output = fsinv(&["scan", root.to_str().unwrap(), "--db", db_arg, "--transaction"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    // One visit line per entry below the root
    let stderr = String::from_utf8_lossy(&output.stderr);
    let visits: Vec<&str> = stderr
        .lines()
        .filter(|line| line.starts_with("D ") || line.starts_with("F "))
        .collect();
    assert_eq!(visits.len(), 3);
    assert!(visits.iter().any(|line| line.starts_with("F ") && line.ends_with("f")));

    let output = fsinv(&[
        "query",
        db_arg,
        "SELECT name, size, md5 FROM nodes WHERE type = ?1 ORDER BY name",
        "8",
    ]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "name,size,md5\nf,2,49f68a5c8493ec2c0bf489821c21fc3b\ng,0,d41d8cd98f00b204e9800998ecf8427e\n"
    );
}

#[test]
fn test_quiet_json_scan_prints_only_json() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_scenario_tree(temp_dir.path()).unwrap();
    let db = temp_dir.path().join("tree.db");

    let output = fsinv(&[
        "scan",
        root.to_str().unwrap(),
        "--db",
        db.to_str().unwrap(),
        "--name",
        "home",
        "--quiet",
        "--json",
    ]);
    assert!(output.status.success());
    assert!(output.stderr.is_empty());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["stats"]["nodes"], 4);
    assert_eq!(json["error_count"], 0);
}

#[test]
fn test_query_script_from_stdin() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_scenario_tree(temp_dir.path()).unwrap();
    let db = temp_dir.path().join("tree.db");
    let db_arg = db.to_str().unwrap();

    let output = fsinv(&["scan", root.to_str().unwrap(), "--db", db_arg, "--quiet"]);
    assert!(output.status.success());

    let mut child = Command::new(env!("CARGO_BIN_EXE_fsinv"))
        .args(["query", db_arg])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(
            b"SELECT count(*) AS n FROM nodes;\nSELECT count(*) AS n FROM nodes WHERE type = 4;\n",
        )
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "n\n4\n2\n");
}

#[test]
fn test_query_syntax_error_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("empty.db");

    let output = fsinv(&["query", db.to_str().unwrap(), "SELEKT 1"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(output.stdout.is_empty());
}
