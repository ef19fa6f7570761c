//! Contract test for CSV query output over a scanned database

use crate::fixtures::create_scenario_tree;
use fsinv::io::query::{open_database, run_script, run_statement};
use fsinv::{ScanOptions, SqliteStore};
use std::ffi::OsStr;
use tempfile::TempDir;

fn scanned_database(temp_dir: &TempDir) -> std::path::PathBuf {
    let root = create_scenario_tree(temp_dir.path()).unwrap();
    let db_path = temp_dir.path().join("nodes.db");
    let mut store = SqliteStore::open(&db_path).unwrap();
    fsinv::scan_tree(&root, OsStr::new("r"), None, &mut store, &ScanOptions::default()).unwrap();
    db_path
}

#[test]
fn test_blob_columns_render_as_lowercase_hex() {
    let temp_dir = TempDir::new().unwrap();
    let conn = open_database(scanned_database(&temp_dir), true).unwrap();

    let mut out = Vec::new();
    let rows = run_statement(
        &conn,
        "SELECT name, sha1 FROM nodes WHERE name = ?1",
        &["f".to_string()],
        &mut out,
    )
    .unwrap();

    assert_eq!(rows, 1);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "name,sha1\nf,c22b5f9178342609428d6f51b2c5af4c0bde6a42\n"
    );
}

#[test]
fn test_null_columns_render_empty() {
    let temp_dir = TempDir::new().unwrap();
    let conn = open_database(scanned_database(&temp_dir), true).unwrap();

    let mut out = Vec::new();
    run_statement(
        &conn,
        "SELECT name, parent, md5 FROM nodes WHERE parent IS NULL",
        &[],
        &mut out,
    )
    .unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "name,parent,md5\nr,,\n");
}

#[test]
fn test_script_can_modify_and_read_back() {
    let temp_dir = TempDir::new().unwrap();
    let conn = open_database(scanned_database(&temp_dir), true).unwrap();

    let mut out = Vec::new();
    let rows = run_script(
        &conn,
        "DELETE FROM nodes WHERE name = 'a';
         SELECT name FROM nodes ORDER BY name;",
        &mut out,
    )
    .unwrap();

    // Deleting `a` cascades to `f` through the parent reference.
    assert_eq!(rows, 2);
    assert_eq!(String::from_utf8(out).unwrap(), "name\ng\nr\n");
}
